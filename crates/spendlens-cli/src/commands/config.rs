//! Config command implementation

use anyhow::Result;
use serde_json::json;
use spendlens_core::config::default_config_path;
use spendlens_core::Analyzer;

use super::print_json;

pub fn cmd_config(analyzer: &Analyzer, json: bool) -> Result<()> {
    let config = analyzer.config();

    if json {
        return print_json(&json!({
            "windowMonths": config.window_months,
            "smallThreshold": config.small_threshold.to_major(),
            "reductionFactor": config.reduction_factor,
            "maxRecommendations": config.max_recommendations,
        }));
    }

    println!();
    println!("⚙️  Analysis Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Window:               {} months", config.window_months);
    println!("   Small threshold:      {}", config.small_threshold);
    println!(
        "   Reduction factor:     {:.0}%",
        config.reduction_factor * 100.0
    );
    println!("   Max recommendations:  {}", config.max_recommendations);
    if let Some(path) = default_config_path() {
        println!();
        println!("   Override file: {}", path.display());
        if !path.exists() {
            println!("   \x1b[2m(not present)\x1b[0m");
        }
    }

    Ok(())
}
