//! Heatmap command implementation.

use anyhow::Result;
use screener_config::AppConfig;
use screener_core::types::IngestRequest;
use screener_heatmap::{aggregate, Heatmap};
use std::fmt::Write;
use std::time::Duration;

use super::{fmt_opt, load_snapshot};
use crate::cli::{HeatmapArgs, OutputFormat};

pub async fn run(args: HeatmapArgs, config: &AppConfig) -> Result<()> {
    let horizon = args.duration.unwrap_or(config.heatmap.default_duration);

    let snapshot = load_snapshot(config, IngestRequest::default(), Duration::from_millis(20), |_| {}).await?;
    let heatmap = aggregate(snapshot.series(), horizon, &snapshot.universe);

    print!("{}", render(&heatmap, args.output)?);
    Ok(())
}

/// Render a heatmap. An empty one is reported as such in every format.
fn render(heatmap: &Heatmap, output: OutputFormat) -> Result<String> {
    let mut out = String::new();

    if heatmap.is_empty() {
        writeln!(out, "No data available for duration {}.", heatmap.duration)?;
        return Ok(out);
    }

    if output == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(heatmap)?)?;
        return Ok(out);
    }

    writeln!(out, "Sector heatmap ({})", heatmap.duration)?;
    writeln!(out)?;
    for (sector, summary) in &heatmap.sectors {
        writeln!(
            out,
            "{:<28} {:>8} %  ({} symbols)",
            sector,
            fmt_opt(summary.avg_change_pct, 2),
            summary.members.len()
        )?;
        for member in &summary.members {
            writeln!(
                out,
                "    {:<10} {:>10.2} {:>8} %  {}",
                member.symbol,
                member.close,
                fmt_opt(member.change_pct, 2),
                member.name.as_deref().unwrap_or("")
            )?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use screener_core::types::{Bar, BarSeries, Universe, UniverseEntry};
    use screener_heatmap::Horizon;

    fn heatmap() -> Heatmap {
        let universe = Universe::new(vec![UniverseEntry::new("AAA").with_sector("Tech")]);
        let bars = vec![
            Bar::close_only(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(), Some(100.0)),
            Bar::close_only(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), Some(110.0)),
        ];
        aggregate(&vec![BarSeries::from_bars("AAA", bars)], Horizon::D1, &universe)
    }

    #[test]
    fn test_empty_heatmap_reports_no_data_in_json_too() {
        let empty = aggregate(&Vec::<BarSeries>::new(), Horizon::W1, &Universe::default());

        for output in [OutputFormat::Json, OutputFormat::Text] {
            let text = render(&empty, output).unwrap();
            assert_eq!(text, "No data available for duration 1w.\n");
        }
    }

    #[test]
    fn test_render_formats() {
        let heatmap = heatmap();

        let json: serde_json::Value = serde_json::from_str(&render(&heatmap, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["duration"], "1d");
        assert_eq!(json["sectors"]["Tech"]["members"][0]["symbol"], "AAA");

        let text = render(&heatmap, OutputFormat::Text).unwrap();
        assert!(text.starts_with("Sector heatmap (1d)"));
        assert!(text.contains("Tech"));
        assert!(text.contains("10.00 %"));
    }
}
