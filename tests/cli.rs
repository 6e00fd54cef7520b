use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const SEED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/insights.json");

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("insight-dash").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("insight-dash"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn aggregate_prints_ranked_table() {
    let mut cmd = Command::cargo_bin("insight-dash").unwrap();
    cmd.args(["aggregate", "--seed", SEED, "--dimension", "source", "--aggregate", "sum"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("source\tintensity"))
        .stdout(predicate::str::contains("EIA\t18"));
}

#[test]
fn aggregate_saves_csv() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("count.csv");
    let mut cmd = Command::cargo_bin("insight-dash").unwrap();
    cmd.args(["aggregate", "--seed", SEED, "--dimension", "topic", "--aggregate", "count", "--out"])
        .arg(&out);
    cmd.assert().success();
    let txt = std::fs::read_to_string(&out).unwrap();
    assert!(txt.starts_with("topic,count"));
}

#[test]
fn unknown_dimension_is_rejected() {
    let mut cmd = Command::cargo_bin("insight-dash").unwrap();
    cmd.args(["aggregate", "--seed", SEED, "--dimension", "planet"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown dimension"));
}

#[test]
fn facets_lists_values() {
    let mut cmd = Command::cargo_bin("insight-dash").unwrap();
    cmd.args(["facets", "--seed", SEED]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"Northern America\""));
}

#[test]
fn render_writes_charts_with_local_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let world = dir.path().join("world.geojson");
    std::fs::write(
        &world,
        r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"name":"USA"},
            "geometry":{"type":"Polygon","coordinates":[[[-120,30],[-70,30],[-70,48],[-120,48]]]}}]}"#,
    )
    .unwrap();
    let out_dir = dir.path().join("charts");
    let mut cmd = Command::cargo_bin("insight-dash").unwrap();
    cmd.args(["render", "--seed", SEED, "--width", "800", "--height", "400", "--boundaries"])
        .arg(&world)
        .arg("--out-dir")
        .arg(&out_dir);
    cmd.assert().success();
    for name in ["bar.svg", "line.svg", "map.svg"] {
        assert!(out_dir.join(name).exists(), "{} missing", name);
    }
}

#[test]
fn render_rejects_tiny_canvas() {
    let mut cmd = Command::cargo_bin("insight-dash").unwrap();
    cmd.args(["render", "--seed", SEED, "--width", "20"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("width"));
}

#[test]
fn aggregate_table_formats_values_like_tooltips() {
    let dir = tempfile::tempdir().unwrap();
    let seed = dir.path().join("seed.json");
    std::fs::write(&seed, r#"[{"source":"A","intensity":0.123456},{"source":"B","intensity":2}]"#).unwrap();
    let mut cmd = Command::cargo_bin("insight-dash").unwrap();
    cmd.args(["aggregate", "--dimension", "source", "--aggregate", "max", "--seed"])
        .arg(&seed);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("B\t2\n"))
        .stdout(predicate::str::contains("A\t0.12\n"))
        .stdout(predicate::str::contains("0.1235").not());
}
