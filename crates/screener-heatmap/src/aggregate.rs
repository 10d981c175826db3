//! Per-symbol change and sector grouping.

use chrono::{Duration, NaiveDate};
use screener_core::traits::SectorLookup;
use screener_core::types::{Bar, BarSeries, UNKNOWN_SECTOR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::horizon::Horizon;

/// One symbol on the heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapMember {
    pub symbol: String,
    pub name: Option<String>,
    /// Date of the latest bar
    pub date: NaiveDate,
    /// Latest close
    pub close: f64,
    /// Percent change over the horizon
    pub change_pct: Option<f64>,
}

/// Members of one sector and their mean change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
    pub avg_change_pct: Option<f64>,
    pub members: Vec<HeatmapMember>,
}

impl SectorSummary {
    fn push(&mut self, member: HeatmapMember) {
        self.members.push(member);
    }

    fn finish(&mut self) {
        let changes: Vec<f64> = self.members.iter().filter_map(|m| m.change_pct).collect();
        self.avg_change_pct = if changes.is_empty() {
            None
        } else {
            Some(changes.iter().sum::<f64>() / changes.len() as f64)
        };
    }
}

/// Sector name to summary, for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub duration: Horizon,
    pub sectors: BTreeMap<String, SectorSummary>,
}

impl Heatmap {
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Number of symbols across all sectors.
    pub fn member_count(&self) -> usize {
        self.sectors.values().map(|s| s.members.len()).sum()
    }
}

/// Bar whose date is closest to `latest_date - horizon`.
///
/// Every bar is a candidate, the latest included; on equal distance the
/// earlier bar wins.
fn reference_bar(bars: &[Bar], horizon: Horizon) -> Option<&Bar> {
    let latest = bars.last()?;
    let target = latest.date - Duration::days(horizon.days());

    let mut best: Option<(&Bar, i64)> = None;
    for bar in bars {
        let distance = (bar.date - target).num_days().abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((bar, distance)),
        }
    }
    best.map(|(bar, _)| bar)
}

/// Percent change of the latest close over `horizon`.
///
/// Absent when the series is empty, either close is absent, or the
/// reference close is zero. A single bar is its own reference.
pub fn change_pct(series: &BarSeries, horizon: Horizon) -> Option<f64> {
    let latest = series.last()?.close?;
    let reference = reference_bar(series.bars(), horizon)?.close?;
    if reference == 0.0 {
        return None;
    }
    Some((latest - reference) / reference * 100.0)
}

/// Group per-symbol changes by sector.
///
/// Symbols without bars or without a latest close are left out. Members
/// keep the order in which their series were given.
pub fn aggregate<'a, L>(
    series: impl IntoIterator<Item = &'a BarSeries>,
    horizon: Horizon,
    lookup: &L,
) -> Heatmap
where
    L: SectorLookup + ?Sized,
{
    let mut sectors: BTreeMap<String, SectorSummary> = BTreeMap::new();

    for bars in series {
        let Some(latest) = bars.last() else {
            debug!(symbol = %bars.symbol, "no bars, not on heatmap");
            continue;
        };
        let Some(close) = latest.close else {
            debug!(symbol = %bars.symbol, "latest close absent, not on heatmap");
            continue;
        };

        let sector = lookup.sector_of(&bars.symbol).unwrap_or(UNKNOWN_SECTOR);
        sectors.entry(sector.to_string()).or_default().push(HeatmapMember {
            symbol: bars.symbol.clone(),
            name: lookup.name_of(&bars.symbol).map(str::to_string),
            date: latest.date,
            close,
            change_pct: change_pct(bars, horizon),
        });
    }

    for summary in sectors.values_mut() {
        summary.finish();
    }

    Heatmap {
        duration: horizon,
        sectors,
    }
}
