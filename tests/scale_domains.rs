use insight_dash::scale::{BandScale, LinearScale, bar_color_scale, domain_bound, map_color_scale, ticks};
use insight_dash::{AggregateFn, Dimension, Measure};

#[test]
fn domain_table_is_exact() {
    use AggregateFn::*;
    use Dimension::*;
    use Measure::*;
    for dim in Dimension::ALL {
        let src = dim == Source;
        assert_eq!(domain_bound(dim, Count, Intensity), if src { 50.0 } else { 500.0 });
        assert_eq!(domain_bound(dim, Sum, Intensity), if src { 500.0 } else { 5000.0 });
        let avg = if matches!(dim, Source | Topic) { 100.0 } else { 20.0 };
        assert_eq!(domain_bound(dim, Avg, Intensity), avg);
        assert_eq!(domain_bound(dim, Max, Intensity), 100.0);
        for m in [Likelihood, Relevance] {
            assert_eq!(domain_bound(dim, Sum, m), 900.0);
            assert_eq!(domain_bound(dim, Count, m), 900.0);
            assert_eq!(domain_bound(dim, Avg, m), 40.0);
            assert_eq!(domain_bound(dim, Max, m), 40.0);
        }
    }
}

#[test]
fn threshold_buckets() {
    let bar = bar_color_scale();
    assert_eq!(bar.map(-200.0), "#f7fbff");
    assert_eq!(bar.map(0.0), "#9ecae1");
    assert_eq!(bar.map(1.0), "#6baed6");
    assert_eq!(bar.map(500.0), "#08306b");

    let map = map_color_scale();
    assert_eq!(map.map(0.0), "#eff3ff");
    assert_eq!(map.map(5.0), "#9ecae1");
    assert_eq!(map.map(99.0), "#084594");
}

#[test]
fn band_scale_matches_padding() {
    let keys: Vec<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
    let y = BandScale::new(keys, (0.0, 210.0), 0.1);
    // step = 210 / (2 - 0.1 + 0.2) = 100
    assert!((y.step() - 100.0).abs() < 1e-9);
    assert!((y.bandwidth() - 90.0).abs() < 1e-9);
    assert!((y.position("A").unwrap() - 10.0).abs() < 1e-9);
    assert!((y.position("B").unwrap() - 110.0).abs() < 1e-9);
    assert_eq!(y.position("C"), None);
}

#[test]
fn linear_ticks() {
    assert_eq!(ticks(0.0, 10_000.0, 5), vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10_000.0]);
    let years = LinearScale::new((2007.0, 2020.0), (0.0, 700.0)).ticks(10);
    assert_eq!(years.len(), 14);
    let x = LinearScale::new((0.0, 500.0), (0.0, 760.0));
    assert_eq!(x.map(250.0), 380.0);
    assert_eq!(x.invert(380.0), 250.0);
}
