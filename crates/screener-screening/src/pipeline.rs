//! Filter + sort over a universe of records.

use screener_core::traits::Indicator;
use screener_core::types::{CrossoverState, Series};
use screener_indicators::{detect_crossover, macd, Ema};
use std::collections::HashMap;
use tracing::debug;

use crate::criteria::{Criterion, FilterCriteria};
use crate::record::SymbolRecord;
use crate::sort::SortCriteria;

/// Series recomputed from one record's bars while its criteria are checked.
///
/// Lives for a single record evaluation, so nothing leaks across requests.
struct Recomputed<'a> {
    record: &'a SymbolRecord,
    closes: Option<Series>,
    emas: HashMap<usize, Series>,
}

impl<'a> Recomputed<'a> {
    fn new(record: &'a SymbolRecord) -> Self {
        Self {
            record,
            closes: None,
            emas: HashMap::new(),
        }
    }

    fn closes(&mut self) -> &Series {
        let record = self.record;
        self.closes.get_or_insert_with(|| record.bars.closes())
    }

    fn ensure_ema(&mut self, period: usize) {
        if !self.emas.contains_key(&period) {
            let series = Ema::new(period).calculate(self.closes());
            self.emas.insert(period, series);
        }
    }

    fn macd_state(&mut self) -> CrossoverState {
        macd(self.closes()).crossover()
    }

    fn ema_crossover(&mut self, short: usize, long: usize, lookback: Option<usize>) -> CrossoverState {
        self.ensure_ema(short);
        self.ensure_ema(long);
        detect_crossover(&self.emas[&short], &self.emas[&long], lookback)
    }
}

fn passes(criterion: &Criterion, ctx: &mut Recomputed<'_>) -> bool {
    match criterion {
        Criterion::RsiRange { min, max } => match ctx.record.rsi {
            Some(rsi) => rsi >= *min && rsi <= *max,
            None => true,
        },
        Criterion::AboveEma { period, expect } => expect.matches(ctx.record.above(*period)),
        Criterion::MacdState { state } => state.matches(ctx.macd_state()),
        Criterion::EmaCrossover {
            pair,
            direction,
            lookback,
        } => match pair.periods() {
            Some((short, long)) => {
                direction.matches(ctx.ema_crossover(short.length(), long.length(), *lookback))
            }
            None => true,
        },
    }
}

/// Whether a record passes every active criterion.
pub fn matches(record: &SymbolRecord, filter: &FilterCriteria) -> bool {
    let mut ctx = Recomputed::new(record);
    filter.active().all(|criterion| passes(criterion, &mut ctx))
}

/// Filter records and optionally sort them.
///
/// Without a sort the surviving records keep their input order. An empty
/// result is a normal outcome, not an error.
pub fn screen<'a>(
    records: &'a [SymbolRecord],
    filter: &FilterCriteria,
    sort: Option<&SortCriteria>,
) -> Vec<&'a SymbolRecord> {
    let mut selected: Vec<&SymbolRecord> = records
        .iter()
        .filter(|record| matches(record, filter))
        .collect();

    if let Some(sort) = sort {
        sort.sort(&mut selected);
    }

    debug!(
        universe = records.len(),
        selected = selected.len(),
        criteria = filter.criteria.len(),
        "screening complete"
    );

    selected
}
