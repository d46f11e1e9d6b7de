//! `vitalwatch rules`: show the effective rule set.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::engine::{Check, Rule};

/// Print the effective configuration as TOML, or a table with `list`
pub fn execute(config: Option<PathBuf>, list: bool) -> Result<()> {
    let config = Config::resolve(config.as_deref())?;

    if !list {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    println!(
        "{:32} {:20} {:24} {:8}",
        "NAME".bold(),
        "SIGNAL".bold(),
        "CHECK".bold(),
        "ENABLED".bold()
    );
    println!("{}", "─".repeat(87));

    for rule in &config.rules {
        let enabled = if rule.enabled {
            "yes".green()
        } else {
            "no".dimmed()
        };
        println!(
            "{:32} {:20} {:24} {:8}",
            rule.name.cyan(),
            rule.signal.to_string(),
            check_summary(rule),
            enabled
        );
    }

    Ok(())
}

/// One-line description of a rule's check
pub fn check_summary(rule: &Rule) -> String {
    match &rule.check {
        Check::RangeBreach { .. } => "range breach".to_string(),
        Check::FirstBreach { .. } => "first breach".to_string(),
        Check::Trend { min_delta } => format!("trend ≥ {min_delta}"),
        Check::AbsoluteDrop { min_points } => format!("drop ≥ {min_points}"),
        Check::PercentDrop { min_percent } => format!("drop ≥ {min_percent}%"),
        Check::IntervalIrregularity { tolerance } => {
            format!("interval ± {}%", tolerance * 100.0)
        }
        Check::Correlation { with, .. } => format!("with {}", with.signal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::default_rules;

    #[test]
    fn test_check_summary() {
        let summaries: Vec<String> = default_rules().iter().map(check_summary).collect();
        assert_eq!(summaries[0], "range breach");
        assert_eq!(summaries[2], "trend ≥ 10");
        assert_eq!(summaries[5], "drop ≥ 5");
        assert_eq!(summaries[9], "with Saturation");
    }
}
