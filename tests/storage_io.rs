use insight_dash::AggregateRow;
use insight_dash::storage;
use std::fs;

fn rows() -> Vec<AggregateRow> {
    vec![AggregateRow::new("EIA", 18.0), AggregateRow::new("IEA", 16.0)]
}

#[test]
fn save_csv_and_json() {
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("agg.csv");
    storage::save_csv(&rows(), "source", "intensity", &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("source,intensity"));
    assert_eq!(csv_txt.lines().count(), 3);
    assert!(csv_txt.contains("EIA,18"));

    let json_path = dir.path().join("agg.json");
    storage::save_json(&rows(), &json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v[1]["group"], "IEA");
    assert_eq!(v.as_array().unwrap().len(), 2);
}

#[test]
fn seed_must_be_an_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.json");
    fs::write(&path, r#"{"source": "EIA"}"#).unwrap();
    let err = storage::load_seed(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("JSON array"));

    fs::write(&path, r#"[{"source": "EIA", "_id": "1"}, {"source": "IEA"}]"#).unwrap();
    let docs = storage::load_seed(&path).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["_id"], "1");
}
