use insight_dash::geo::{Boundary, FileBoundaries, StaticBoundaries};
use insight_dash::viz::{self, BarChart, ChartState, LineChart, UNAVAILABLE_NOTICE, WorldMap};
use insight_dash::{AggregateFn, DataStore, Dimension, Dimensions, Measure, Record, ViewState};
use std::fs;
use std::sync::Arc;

fn records() -> Arc<[Record]> {
    DataStore::from_seed_file(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/insights.json"))
        .unwrap()
        .shared()
}

fn world() -> StaticBoundaries {
    StaticBoundaries(vec![
        Boundary {
            name: "USA".into(),
            polygons: vec![vec![vec![(-120.0, 30.0), (-70.0, 30.0), (-70.0, 48.0), (-120.0, 48.0)]]],
        },
        Boundary {
            name: "Mexico".into(),
            polygons: vec![vec![vec![(-115.0, 16.0), (-90.0, 16.0), (-90.0, 30.0), (-115.0, 30.0)]]],
        },
    ])
}

#[test]
fn nothing_renders_without_a_size() {
    let mut bar = BarChart::new();
    bar.set_data(records());
    assert_eq!(viz::Chart::lifecycle(&bar).state(), ChartState::Measuring);
    assert!(viz::render_svg(&mut bar).unwrap().is_none());

    bar.resize(Dimensions::new(1000.0, 400.0));
    let svg = viz::render_svg(&mut bar).unwrap().unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("EIA"));
    assert_eq!(viz::Chart::lifecycle(&bar).state(), ChartState::Rendered);
}

#[test]
fn container_resize_forces_a_fresh_render() {
    let mut bar = BarChart::new();
    bar.set_data(records());
    bar.resize(Dimensions::new(1000.0, 400.0));
    let wide = viz::render_svg(&mut bar).unwrap().unwrap();

    assert!(!bar.resize(Dimensions::new(1000.0, 400.0)));
    assert_eq!(viz::Chart::lifecycle(&bar).state(), ChartState::Rendered);

    assert!(bar.resize(Dimensions::new(640.0, 300.0)));
    assert_eq!(viz::Chart::lifecycle(&bar).state(), ChartState::Measuring);
    assert!(viz::Chart::lifecycle(&bar).needs_render());

    let narrow = viz::render_svg(&mut bar).unwrap().unwrap();
    assert_ne!(wide, narrow);
    assert_eq!(viz::Chart::lifecycle(&bar).state(), ChartState::Rendered);
    assert_eq!(viz::Chart::lifecycle(&bar).render_count(), 2);
}

#[test]
fn bar_redraws_on_view_change() {
    let mut bar = BarChart::with_view(ViewState::new(Dimension::Topic, AggregateFn::Count, Measure::Intensity));
    bar.set_data(records());
    bar.resize(Dimensions::new(600.0, 330.0));
    let first = viz::render_svg(&mut bar).unwrap().unwrap();
    assert!(first.contains("oil"));

    bar.set_view(ViewState::new(Dimension::Sector, AggregateFn::Sum, Measure::Relevance));
    assert_eq!(viz::Chart::lifecycle(&bar).state(), ChartState::Measuring);
    let second = viz::render_svg(&mut bar).unwrap().unwrap();
    assert!(second.contains("Energy"));
    assert!(!second.contains(">oil<"));
}

#[test]
fn bar_tooltip_is_drawn_last() {
    let mut bar = BarChart::new();
    bar.set_data(records());
    bar.resize(Dimensions::new(1000.0, 400.0));
    let first = bar.layout().unwrap().bars[0].clone();
    bar.hover(Some((first.left + 2.0, first.top + 2.0)));
    let svg = viz::render_svg(&mut bar).unwrap().unwrap();
    assert!(svg.contains("source: EIA"));
    assert!(svg.contains("intensity: 18"));
}

#[test]
fn line_chart_writes_svg_and_png() {
    let dir = tempfile::tempdir().unwrap();
    let mut line = LineChart::new();
    line.set_data(records());
    line.resize(Dimensions::new(800.0, 400.0));

    let svg_path = dir.path().join("line.svg");
    assert!(viz::render_to_file(&mut line, &svg_path).unwrap());
    let svg = fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains("Intensity"));
    assert!(svg.contains("10,000"));

    let png_path = dir.path().join("line.png");
    assert!(viz::render_to_file(&mut line, &png_path).unwrap());
    assert!(fs::metadata(&png_path).unwrap().len() > 0);
}

#[test]
fn map_renders_with_static_boundaries() {
    let mut map = WorldMap::new(Box::new(world()));
    map.set_data(records());
    map.resize(Dimensions::new(800.0, 420.0));
    let svg = viz::render_svg(&mut map).unwrap().unwrap();
    assert!(svg.contains("<polygon"));
    assert!(map.boundaries_loaded());
    assert_eq!(viz::Chart::lifecycle(&map).state(), ChartState::Rendered);

    let layout = map.layout().unwrap();
    let usa = layout
        .countries
        .iter()
        .find(|c| c.shade.name == "United States of America")
        .unwrap();
    assert_eq!(usa.shade.totals.intensity, 18.0);
    let inside = layout.projection.project(-95.0, 40.0);
    map.hover(Some(inside));
    let svg = viz::render_svg(&mut map).unwrap().unwrap();
    assert!(svg.contains("Country: United States of America"));
}

#[test]
fn map_falls_back_when_boundaries_fail() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("world.geojson");
    let mut map = WorldMap::new(Box::new(FileBoundaries { path: missing.clone() }));
    map.set_data(records());
    map.resize(Dimensions::new(800.0, 420.0));

    let svg = viz::render_svg(&mut map).unwrap().unwrap();
    assert!(svg.contains(UNAVAILABLE_NOTICE));
    assert!(matches!(viz::Chart::lifecycle(&map).state(), ChartState::Failed(_)));
    assert!(!map.boundaries_loaded());

    // The next render tries again.
    fs::write(
        &missing,
        r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"name":"Mexico"},
            "geometry":{"type":"Polygon","coordinates":[[[-115,16],[-90,16],[-90,30],[-115,30]]]}}]}"#,
    )
    .unwrap();
    let svg = viz::render_svg(&mut map).unwrap().unwrap();
    assert!(!svg.contains(UNAVAILABLE_NOTICE));
    assert_eq!(viz::Chart::lifecycle(&map).state(), ChartState::Rendered);
}
