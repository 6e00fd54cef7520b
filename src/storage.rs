use crate::models::AggregateRow;
use anyhow::{Context, Result, bail};
use csv::WriterBuilder;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Read a seed file: a JSON array of record documents, kept verbatim.
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open seed file {}", path.display()))?;
    let v: Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse seed file {}", path.display()))?;
    match v {
        Value::Array(docs) => Ok(docs),
        other => bail!(
            "seed file {} must hold a JSON array, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Save an aggregate table as CSV with a `<group_label>,<value_label>` header.
pub fn save_csv<P: AsRef<Path>>(
    rows: &[AggregateRow],
    group_label: &str,
    value_label: &str,
    path: P,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((group_label, value_label))?;
    for r in rows {
        wtr.serialize((&r.group, r.value))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save an aggregate table as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(rows: &[AggregateRow], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let rows = vec![AggregateRow::new("EIA", 30.0), AggregateRow::new("OPEC", 5.0)];
        save_csv(&rows, "source", "intensity", &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();
        let text = std::fs::read_to_string(&csvp).unwrap();
        assert!(text.starts_with("source,intensity\n"));
        assert!(text.contains("EIA,30.0"));
        assert!(jsonp.exists());
    }

    #[test]
    fn seed_must_be_an_array() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("seed.json");
        std::fs::write(&p, r#"{"source":"A"}"#).unwrap();
        let err = load_seed(&p).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }
}
