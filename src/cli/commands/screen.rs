//! Screen command implementation.

use anyhow::{Context, Result};
use screener_config::AppConfig;
use screener_screening::{screen, Criterion, EmaPeriod, FilterCriteria, SortCriteria};

use super::{analyzed_records, print_table};
use crate::cli::{OutputFormat, ScreenArgs};

/// Build the criteria from flags plus the optional criteria file.
fn build_criteria(args: &ScreenArgs) -> Result<FilterCriteria> {
    let mut criteria = match &args.criteria_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read criteria file {}", path.display()))?;
            FilterCriteria::from_json(&json).context("Invalid criteria file")?
        }
        None => FilterCriteria::new(),
    };

    if args.rsi_min.is_some() || args.rsi_max.is_some() {
        criteria = criteria.rsi_range(args.rsi_min.unwrap_or(0.0), args.rsi_max.unwrap_or(100.0));
    }
    criteria = criteria
        .above_ema(EmaPeriod::P21, args.above_21)
        .above_ema(EmaPeriod::P44, args.above_44)
        .above_ema(EmaPeriod::P200, args.above_200)
        .macd_state(args.macd)
        .with(Criterion::EmaCrossover {
            pair: args.ema_pair,
            direction: args.direction,
            lookback: args.lookback,
        });

    criteria.validate()?;
    Ok(criteria)
}

pub async fn run(args: ScreenArgs, config: &AppConfig) -> Result<()> {
    let criteria = build_criteria(&args)?;
    let sort = args.sort_by.map(|key| SortCriteria::new(key, args.order));

    let (_snapshot, records) = analyzed_records(config).await?;
    let mut results = screen(&records, &criteria, sort.as_ref());
    if let Some(limit) = args.limit {
        results.truncate(limit);
    }

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Text => {
            if results.is_empty() {
                println!("No symbols match the criteria.");
            } else {
                print_table(&results);
                println!();
                println!("{} of {} symbols matched", results.len(), records.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use screener_screening::{CrossDirection, EmaPair, FlagFilter, MacdStateFilter};

    fn screen_args(flags: &[&str]) -> ScreenArgs {
        let argv: Vec<&str> = ["screener", "screen"].into_iter().chain(flags.iter().copied()).collect();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Screen(args) => args,
            _ => panic!("expected the screen command"),
        }
    }

    fn active(criteria: &FilterCriteria) -> Vec<Criterion> {
        criteria.active().cloned().collect()
    }

    #[test]
    fn test_rsi_min_alone_caps_at_100() {
        let criteria = build_criteria(&screen_args(&["--rsi-min", "30"])).unwrap();
        assert_eq!(active(&criteria), vec![Criterion::RsiRange { min: 30.0, max: 100.0 }]);

        let criteria = build_criteria(&screen_args(&["--rsi-max", "40"])).unwrap();
        assert_eq!(active(&criteria), vec![Criterion::RsiRange { min: 0.0, max: 40.0 }]);

        let criteria = build_criteria(&screen_args(&[])).unwrap();
        assert!(active(&criteria).is_empty());
    }

    #[test]
    fn test_criteria_file_is_anded_with_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("criteria.json");
        std::fs::write(
            &path,
            r#"{"criteria": [
                {"kind": "macd_state", "state": "bullish"},
                {"kind": "above_ema", "period": 200, "expect": "true"}
            ]}"#,
        )
        .unwrap();
        let path = path.to_string_lossy().into_owned();

        let args = screen_args(&[
            "--criteria-file",
            &path,
            "--rsi-max",
            "40",
            "--above-21",
            "false",
            "--ema-pair",
            "21x44",
            "--direction",
            "bullish",
            "--lookback",
            "5",
        ]);
        let criteria = build_criteria(&args).unwrap();

        assert_eq!(
            active(&criteria),
            vec![
                Criterion::MacdState { state: MacdStateFilter::Bullish },
                Criterion::AboveEma { period: EmaPeriod::P200, expect: FlagFilter::True },
                Criterion::RsiRange { min: 0.0, max: 40.0 },
                Criterion::AboveEma { period: EmaPeriod::P21, expect: FlagFilter::False },
                Criterion::EmaCrossover {
                    pair: EmaPair::E21x44,
                    direction: CrossDirection::Bullish,
                    lookback: Some(5),
                },
            ]
        );
    }

    #[test]
    fn test_bad_criteria_are_rejected() {
        assert!(build_criteria(&screen_args(&["--rsi-min", "70", "--rsi-max", "30"])).is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"criteria": [{"kind": "volume_spike"}]}"#).unwrap();
        let path = path.to_string_lossy().into_owned();
        assert!(build_criteria(&screen_args(&["--criteria-file", &path])).is_err());

        let missing = dir.path().join("missing.json").to_string_lossy().into_owned();
        assert!(build_criteria(&screen_args(&["--criteria-file", &missing])).is_err());
    }
}
