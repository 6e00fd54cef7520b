use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Categorical field used to group records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    #[default]
    Source,
    Topic,
    Pestle,
    Sector,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Source,
        Dimension::Topic,
        Dimension::Pestle,
        Dimension::Sector,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Source => "source",
            Dimension::Topic => "topic",
            Dimension::Pestle => "pestle",
            Dimension::Sector => "sector",
        }
    }
}

/// Numeric field being aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    #[default]
    Intensity,
    Likelihood,
    Relevance,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::Intensity, Measure::Likelihood, Measure::Relevance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Measure::Intensity => "intensity",
            Measure::Likelihood => "likelihood",
            Measure::Relevance => "relevance",
        }
    }

    /// Capitalized label used in legends and tooltips.
    pub fn title(&self) -> &'static str {
        match self {
            Measure::Intensity => "Intensity",
            Measure::Likelihood => "Likelihood",
            Measure::Relevance => "Relevance",
        }
    }
}

/// Per-group reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFn {
    #[default]
    Sum,
    Max,
    Count,
    Avg,
}

impl AggregateFn {
    pub const ALL: [AggregateFn; 4] = [
        AggregateFn::Sum,
        AggregateFn::Max,
        AggregateFn::Count,
        AggregateFn::Avg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFn::Sum => "sum",
            AggregateFn::Max => "max",
            AggregateFn::Count => "count",
            AggregateFn::Avg => "avg",
        }
    }
}

macro_rules! impl_str_enum {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| format!("unknown {} '{}'", $what, s))
            }
        }
    };
}

impl_str_enum!(Dimension, "dimension");
impl_str_enum!(Measure, "measure");
impl_str_enum!(AggregateFn, "aggregate");

/// One ingested data point. Categorical fields default to `""`; measures that are
/// missing, empty, or non-numeric deserialize to `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record {
    #[serde(default, deserialize_with = "de_string_or_null")]
    pub source: String,
    #[serde(default, deserialize_with = "de_string_or_null")]
    pub topic: String,
    #[serde(default, deserialize_with = "de_string_or_null")]
    pub pestle: String,
    #[serde(default, deserialize_with = "de_string_or_null")]
    pub sector: String,
    #[serde(default, deserialize_with = "de_string_or_null")]
    pub region: String,
    #[serde(default, deserialize_with = "de_string_or_null")]
    pub country: String,
    #[serde(default, deserialize_with = "de_string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "de_string_or_null")]
    pub published: String,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub start_year: Option<f64>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub end_year: Option<f64>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub intensity: Option<f64>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub likelihood: Option<f64>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub relevance: Option<f64>,
}

impl Record {
    /// Value of a grouping dimension.
    pub fn dimension(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::Source => &self.source,
            Dimension::Topic => &self.topic,
            Dimension::Pestle => &self.pestle,
            Dimension::Sector => &self.sector,
        }
    }

    /// Value of a measure, `None` when the field was missing or malformed.
    pub fn measure(&self, m: Measure) -> Option<f64> {
        match m {
            Measure::Intensity => self.intensity,
            Measure::Likelihood => self.likelihood,
            Measure::Relevance => self.relevance,
        }
    }

    /// Publication year parsed from `published`.
    pub fn published_year(&self) -> Option<i32> {
        parse_year(&self.published)
    }
}

/// Extract a calendar year from the dataset's date strings.
///
/// Tries the dataset format (`January, 20 2017 03:51:25`), RFC 3339, and `YYYY-MM-DD`
/// before falling back to the first plausible 4-digit year in the text.
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%B, %d %Y %H:%M:%S") {
        return Some(dt.year());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.year());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.year());
    }
    static YEAR: OnceLock<Regex> = OnceLock::new();
    let re = YEAR.get_or_init(|| Regex::new(r"\b(19|20)\d{2}\b").expect("year regex"));
    re.find(s).and_then(|m| m.as_str().parse().ok())
}

/// Serde helper: `null` becomes an empty string.
fn de_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde helper: accept a JSON number, a numeric string, or anything else (→ `None`).
fn de_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
    struct LenientVisitor;

    impl<'de> Visitor<'de> for LenientVisitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a number, a numeric string, or an empty value")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v.is_finite().then_some(v))
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
            Ok(s.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: serde::Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(LenientVisitor)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

/// One ranked `(group, value)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateRow {
    pub group: String,
    pub value: f64,
}

impl AggregateRow {
    pub fn new(group: impl Into<String>, value: f64) -> Self {
        Self {
            group: group.into(),
            value,
        }
    }
}

/// Per-chart selection of what to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub dimension: Dimension,
    pub aggregate: AggregateFn,
    pub measure: Measure,
}

impl ViewState {
    pub fn new(dimension: Dimension, aggregate: AggregateFn, measure: Measure) -> Self {
        Self {
            dimension,
            aggregate,
            measure,
        }
    }

    /// Column label for exported values: the measure, or `count`.
    pub fn value_label(&self) -> &'static str {
        match self.aggregate {
            AggregateFn::Count => "count",
            _ => self.measure.as_str(),
        }
    }
}

/// Size of a chart container in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
