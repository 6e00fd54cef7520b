//! Filter state: the active [`FilterSet`], the panel's editable draft, and facet options.

use crate::models::Record;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A filterable categorical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Topic,
    Sector,
    Region,
    Country,
    Source,
}

impl Facet {
    /// Panel order.
    pub const ALL: [Facet; 5] = [
        Facet::Topic,
        Facet::Sector,
        Facet::Region,
        Facet::Country,
        Facet::Source,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Topic => "topic",
            Facet::Sector => "sector",
            Facet::Region => "region",
            Facet::Country => "country",
            Facet::Source => "source",
        }
    }

    pub fn value_of<'r>(&self, r: &'r Record) -> &'r str {
        match self {
            Facet::Topic => &r.topic,
            Facet::Sector => &r.sector,
            Facet::Region => &r.region,
            Facet::Country => &r.country,
            Facet::Source => &r.source,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Facet::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| format!("unknown facet '{}'", s))
    }
}

/// Active filter. An empty facet set places no restriction on that facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub topic: BTreeSet<String>,
    pub sector: BTreeSet<String>,
    pub region: BTreeSet<String>,
    pub country: BTreeSet<String>,
    pub source: BTreeSet<String>,
}

impl FilterSet {
    pub fn facet(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Topic => &self.topic,
            Facet::Sector => &self.sector,
            Facet::Region => &self.region,
            Facet::Country => &self.country,
            Facet::Source => &self.source,
        }
    }

    pub fn facet_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Topic => &mut self.topic,
            Facet::Sector => &mut self.sector,
            Facet::Region => &mut self.region,
            Facet::Country => &mut self.country,
            Facet::Source => &mut self.source,
        }
    }

    /// True when no facet or year bound is set.
    pub fn is_empty(&self) -> bool {
        self.start_year.is_none()
            && self.end_year.is_none()
            && Facet::ALL.iter().all(|f| self.facet(*f).is_empty())
    }

    /// Whether a record passes every facet and year bound.
    ///
    /// The lower bound is checked against the record's `start_year` (else its
    /// publication year) and the upper bound against `end_year` (else publication
    /// year). Records with no year at all fail any year bound.
    pub fn matches(&self, r: &Record) -> bool {
        for facet in Facet::ALL {
            let allowed = self.facet(facet);
            if !allowed.is_empty() && !allowed.contains(facet.value_of(r)) {
                return false;
            }
        }
        let published = r.published_year();
        if let Some(lo) = self.start_year {
            match r.start_year.map(|y| y as i32).or(published) {
                Some(y) if y >= lo => {}
                _ => return false,
            }
        }
        if let Some(hi) = self.end_year {
            match r.end_year.map(|y| y as i32).or(published) {
                Some(y) if y <= hi => {}
                _ => return false,
            }
        }
        true
    }

    /// Records passing the filter, in input order.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        if self.is_empty() {
            return records.to_vec();
        }
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// What the panel hands to its parent.
///
/// On the wire a reset is exactly `{"reset": true}`; any other object is read
/// as a [`FilterSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventWire", into = "EventWire")]
pub enum FilterEvent {
    /// Clear every filter.
    Reset,
    /// Replace the active filter.
    Apply(FilterSet),
}

impl FilterEvent {
    pub fn reset() -> Self {
        FilterEvent::Reset
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum EventWire {
    Reset { reset: bool },
    Apply(FilterSet),
}

impl TryFrom<EventWire> for FilterEvent {
    type Error = String;

    fn try_from(wire: EventWire) -> Result<Self, Self::Error> {
        match wire {
            EventWire::Reset { reset: true } => Ok(FilterEvent::Reset),
            EventWire::Reset { reset: false } => Err("`reset` must be true when present".to_string()),
            EventWire::Apply(set) => Ok(FilterEvent::Apply(set)),
        }
    }
}

impl From<FilterEvent> for EventWire {
    fn from(event: FilterEvent) -> Self {
        match event {
            FilterEvent::Reset => EventWire::Reset { reset: true },
            FilterEvent::Apply(set) => EventWire::Apply(set),
        }
    }
}

/// Text fields of the year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearField {
    Start,
    End,
}

/// Editable draft behind the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPanel {
    start_year: String,
    end_year: String,
    draft: FilterSet,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text input change: overwrite the field.
    pub fn set_year_text(&mut self, field: YearField, text: impl Into<String>) {
        match field {
            YearField::Start => self.start_year = text.into(),
            YearField::End => self.end_year = text.into(),
        }
    }

    pub fn year_text(&self, field: YearField) -> &str {
        match field {
            YearField::Start => &self.start_year,
            YearField::End => &self.end_year,
        }
    }

    /// Checkbox change: add on check (once), remove by value on uncheck.
    pub fn toggle(&mut self, facet: Facet, value: &str, checked: bool) {
        let set = self.draft.facet_mut(facet);
        if checked {
            set.insert(value.to_string());
        } else {
            set.remove(value);
        }
    }

    pub fn is_checked(&self, facet: Facet, value: &str) -> bool {
        self.draft.facet(facet).contains(value)
    }

    pub fn selected(&self, facet: Facet) -> &BTreeSet<String> {
        self.draft.facet(facet)
    }

    /// Emit the draft as the new active filter and clear it.
    pub fn submit(&mut self) -> FilterEvent {
        let mut set = std::mem::take(&mut self.draft);
        set.start_year = parse_year_text(&std::mem::take(&mut self.start_year));
        set.end_year = parse_year_text(&std::mem::take(&mut self.end_year));
        FilterEvent::Apply(set)
    }

    /// Uncheck everything and ask the parent to drop all filters.
    pub fn reset(&mut self) -> FilterEvent {
        *self = Self::default();
        FilterEvent::reset()
    }
}

fn parse_year_text(s: &str) -> Option<i32> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    match t.parse::<i32>() {
        Ok(y) => Some(y),
        Err(_) => {
            log::warn!("ignoring non-numeric year filter '{}'", t);
            None
        }
    }
}

/// Checkbox options for one facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub facet: Facet,
    pub values: Vec<String>,
}

/// Distinct non-empty values of every facet, in first-seen order.
pub fn facet_options(records: &[Record]) -> Vec<FacetOptions> {
    Facet::ALL
        .iter()
        .map(|facet| {
            let mut seen: AHashSet<&str> = AHashSet::new();
            let values = records
                .iter()
                .map(|r| facet.value_of(r))
                .filter(|v| !v.is_empty() && seen.insert(*v))
                .map(str::to_string)
                .collect();
            FacetOptions {
                facet: *facet,
                values,
            }
        })
        .collect()
}
