//! Fixed-point money in integer minor units (cents)
//!
//! All aggregation runs on `Money`; decimal values only appear when a
//! report is serialized.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use serde::Serialize;

/// An amount of money in minor currency units. Serializes as the raw cent
/// count; report types convert to decimal themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Convert a decimal major-unit amount, rounding half away from zero.
    ///
    /// NaN and infinities become zero so a bad value can never poison a sum.
    pub fn from_major(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        // `as` saturates at the i64 bounds
        Self((value * 100.0).round() as i64)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Decimal major units, for the output boundary only
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply by a factor, rounding half away from zero to the cent
    pub fn scale(self, factor: f64) -> Self {
        Self::from_cents((self.0 as f64 * factor).round() as i64)
    }

    /// Divide by a count, rounding half away from zero. Division by zero
    /// yields zero.
    pub fn div_round(self, divisor: i64) -> Self {
        if divisor == 0 {
            return Self::ZERO;
        }
        let quotient = self.0 / divisor;
        let remainder = self.0 % divisor;
        if remainder.unsigned_abs() * 2 >= divisor.unsigned_abs() {
            let step = if (self.0 < 0) == (divisor < 0) { 1 } else { -1 };
            Self(quotient + step)
        } else {
            Self(quotient)
        }
    }

    /// Share of `total` as a percentage; `0.0` when `total` is zero
    pub fn percentage_of(self, total: Money) -> f64 {
        if total.is_zero() {
            0.0
        } else {
            self.0 as f64 / total.0 as f64 * 100.0
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0.saturating_mul(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_rounds_to_cent() {
        assert_eq!(Money::from_major(15.99).cents(), 1599);
        assert_eq!(Money::from_major(-5.0).cents(), -500);
        assert_eq!(Money::from_major(0.07).cents(), 7);
        assert_eq!(Money::from_major(-1234.5).cents(), -123450);
    }

    #[test]
    fn test_from_major_non_finite_is_zero() {
        assert_eq!(Money::from_major(f64::NAN), Money::ZERO);
        assert_eq!(Money::from_major(f64::INFINITY), Money::ZERO);
    }

    #[test]
    fn test_repeated_addition_does_not_drift() {
        // 0.1 + 0.2 style drift would show up here with f64
        let total: Money = (0..1000).map(|_| Money::from_major(0.1)).sum();
        assert_eq!(total, Money::from_cents(10_000));
        assert_eq!(total.to_major(), 100.0);
    }

    #[test]
    fn test_div_round() {
        assert_eq!(Money::from_cents(1000).div_round(2), Money::from_cents(500));
        assert_eq!(Money::from_cents(1000).div_round(3), Money::from_cents(333));
        assert_eq!(Money::from_cents(1001).div_round(2), Money::from_cents(501));
        assert_eq!(Money::from_cents(-1001).div_round(2), Money::from_cents(-501));
        assert_eq!(Money::from_cents(1000).div_round(0), Money::ZERO);
    }

    #[test]
    fn test_scale() {
        assert_eq!(Money::from_cents(500).scale(0.2), Money::from_cents(100));
        assert_eq!(Money::from_cents(333).scale(0.2), Money::from_cents(67));
    }

    #[test]
    fn test_percentage_of_zero_total() {
        assert_eq!(Money::from_cents(100).percentage_of(Money::ZERO), 0.0);
        assert_eq!(Money::from_cents(25).percentage_of(Money::from_cents(100)), 25.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(123456).to_string(), "$1234.56");
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }
}
