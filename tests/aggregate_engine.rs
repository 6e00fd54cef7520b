use insight_dash::aggregate::{TOP_N, aggregate, aggregate_all, country_totals, yearly_totals};
use insight_dash::{AggregateFn, AggregateRow, DataStore, Dimension, Measure, Record};

fn rec(source: &str, intensity: Option<f64>) -> Record {
    Record {
        source: source.into(),
        intensity,
        ..Record::default()
    }
}

fn fixture() -> DataStore {
    DataStore::from_seed_file(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/insights.json"))
        .unwrap()
}

#[test]
fn sum_by_source_end_to_end() {
    let records = vec![rec("A", Some(10.0)), rec("A", Some(20.0)), rec("B", Some(5.0))];
    let rows = aggregate(&records, Dimension::Source, AggregateFn::Sum, Measure::Intensity);
    assert_eq!(rows, vec![AggregateRow::new("A", 30.0), AggregateRow::new("B", 5.0)]);
}

#[test]
fn count_and_avg() {
    let same: Vec<Record> = (0..7).map(|_| rec("EIA", Some(1.0))).collect();
    let count = aggregate(&same, Dimension::Source, AggregateFn::Count, Measure::Intensity);
    assert_eq!(count, vec![AggregateRow::new("EIA", 7.0)]);

    let pair = vec![rec("A", Some(1.0)), rec("A", Some(2.0))];
    let avg = aggregate(&pair, Dimension::Source, AggregateFn::Avg, Measure::Intensity);
    assert_eq!(avg, vec![AggregateRow::new("A", 2.0)]);
}

#[test]
fn ranking_is_descending_capped_and_idempotent() {
    let records: Vec<Record> = (0..15)
        .map(|i| rec(&format!("S{i}"), Some(i as f64)))
        .collect();
    let all = aggregate_all(&records, Dimension::Source, AggregateFn::Sum, Measure::Intensity);
    assert_eq!(all.len(), 15);
    assert!(all.windows(2).all(|w| w[0].value >= w[1].value));

    let top = aggregate(&records, Dimension::Source, AggregateFn::Sum, Measure::Intensity);
    assert_eq!(top.len(), TOP_N);
    assert_eq!(top[0].group, "S14");
    assert_eq!(top, aggregate(&records, Dimension::Source, AggregateFn::Sum, Measure::Intensity));
}

#[test]
fn fixture_views() {
    let store = fixture();
    let sum = aggregate(store.records(), Dimension::Source, AggregateFn::Sum, Measure::Intensity);
    assert_eq!(sum[0], AggregateRow::new("EIA", 18.0));
    assert_eq!(sum[1], AggregateRow::new("IEA", 16.0));

    let count = aggregate(store.records(), Dimension::Topic, AggregateFn::Count, Measure::Intensity);
    assert_eq!(count[0], AggregateRow::new("oil", 2.0));

    let max = aggregate(store.records(), Dimension::Sector, AggregateFn::Max, Measure::Likelihood);
    assert_eq!(max[0], AggregateRow::new("Energy", 4.0));
}

#[test]
fn yearly_and_country_totals() {
    let store = fixture();
    let years = yearly_totals(store.records());
    let keys: Vec<i32> = years.iter().map(|(y, _)| *y).collect();
    assert_eq!(keys, vec![2016, 2017]);
    assert_eq!(years[1].1.intensity, 20.0);
    assert_eq!(years[0].1.relevance, 7.0);

    let countries = country_totals(store.records());
    assert_eq!(countries["United States of America"].intensity, 18.0);
    assert_eq!(countries["Mexico"].likelihood, 4.0);
    assert!(!countries.contains_key(""));
}

#[test]
fn empty_input_gives_empty_table() {
    for agg in AggregateFn::ALL {
        for dim in Dimension::ALL {
            assert!(aggregate(&[], dim, agg, Measure::Intensity).is_empty());
            assert!(aggregate_all(&[], dim, agg, Measure::Relevance).is_empty());
        }
    }
    assert!(yearly_totals(&[]).is_empty());
    assert!(country_totals(&[]).is_empty());
}
