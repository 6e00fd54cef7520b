use crate::models::{AggregateFn, AggregateRow, Dimension, Measure, Record};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rows retained for display.
pub const TOP_N: usize = 10;

/// Sums of all three measures for one group (year or country).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureTotals {
    pub intensity: f64,
    pub likelihood: f64,
    pub relevance: f64,
}

impl MeasureTotals {
    pub fn get(&self, m: Measure) -> f64 {
        match m {
            Measure::Intensity => self.intensity,
            Measure::Likelihood => self.likelihood,
            Measure::Relevance => self.relevance,
        }
    }

    fn add(&mut self, r: &Record) {
        self.intensity += r.intensity.unwrap_or(0.0);
        self.likelihood += r.likelihood.unwrap_or(0.0);
        self.relevance += r.relevance.unwrap_or(0.0);
    }
}

/// `Math.round` semantics: halves round toward positive infinity.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Group `records` by `dimension`, reduce each group, and rank descending.
///
/// Groups keep first-encounter order, so equal values stay in input order.
/// Absent measure values are skipped by every reducer; a group with no present
/// values reduces to 0.
pub fn aggregate_all(
    records: &[Record],
    dimension: Dimension,
    agg: AggregateFn,
    measure: Measure,
) -> Vec<AggregateRow> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<(&str, Vec<&Record>)> = Vec::new();
    for r in records {
        let key = r.dimension(dimension);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(r);
    }

    let mut rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(key, members)| AggregateRow::new(key, reduce(&members, agg, measure)))
        .collect();
    // `sort_by` is stable: ties keep encounter order.
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    log::debug!(
        "aggregated {} records into {} groups ({}/{}/{})",
        records.len(),
        rows.len(),
        dimension,
        agg,
        measure
    );
    rows
}

/// Top [`TOP_N`] rows of [`aggregate_all`].
pub fn aggregate(
    records: &[Record],
    dimension: Dimension,
    agg: AggregateFn,
    measure: Measure,
) -> Vec<AggregateRow> {
    let mut rows = aggregate_all(records, dimension, agg, measure);
    rows.truncate(TOP_N);
    rows
}

fn reduce(members: &[&Record], agg: AggregateFn, measure: Measure) -> f64 {
    let values = || members.iter().filter_map(|r| r.measure(measure));
    match agg {
        AggregateFn::Count => members.len() as f64,
        AggregateFn::Sum => values().sum(),
        AggregateFn::Max => values().reduce(f64::max).unwrap_or(0.0),
        AggregateFn::Avg => {
            let (sum, n) = values().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            if n == 0 {
                0.0
            } else {
                round_half_up(sum / n as f64)
            }
        }
    }
}

/// Per publication year, the sums of all three measures, ascending by year.
/// Records without a parseable year are skipped.
pub fn yearly_totals(records: &[Record]) -> Vec<(i32, MeasureTotals)> {
    let mut years: BTreeMap<i32, MeasureTotals> = BTreeMap::new();
    for r in records {
        if let Some(y) = r.published_year() {
            years.entry(y).or_default().add(r);
        }
    }
    years.into_iter().collect()
}

/// Per country, the sums of all three measures. Records without a country are skipped.
pub fn country_totals(records: &[Record]) -> AHashMap<String, MeasureTotals> {
    let mut out: AHashMap<String, MeasureTotals> = AHashMap::new();
    for r in records.iter().filter(|r| !r.country.is_empty()) {
        out.entry(r.country.clone()).or_default().add(r);
    }
    out
}
