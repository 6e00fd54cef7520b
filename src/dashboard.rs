//! One dashboard session: the loaded records, the active filter, and the three charts.
//!
//! The record set is loaded once. Filter events replace the active filter and
//! hand the same filtered slice to every chart; each chart then keeps its own
//! view, size, and hover state.

use crate::config::ImageFormat;
use crate::filter::{FacetOptions, FilterEvent, FilterPanel, FilterSet};
use crate::geo::BoundaryProvider;
use crate::models::{Dimensions, Record};
use crate::store::DataStore;
use crate::viz::{self, BarChart, LineChart, WorldMap};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The three charts of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Map,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Map];

    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Map => "map",
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    store: DataStore,
    active: FilterSet,
    filtered: Arc<[Record]>,
    pub panel: FilterPanel,
    pub bar: BarChart,
    pub line: LineChart,
    pub map: WorldMap,
}

impl Dashboard {
    pub fn new(store: DataStore, boundaries: Box<dyn BoundaryProvider>) -> Self {
        let mut d = Self {
            filtered: store.shared(),
            store,
            active: FilterSet::default(),
            panel: FilterPanel::new(),
            bar: BarChart::new(),
            line: LineChart::new(),
            map: WorldMap::new(boundaries),
        };
        d.push_data();
        d
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Facet choices offered by the filter panel.
    pub fn facets(&self) -> &[FacetOptions] {
        self.store.facets()
    }

    pub fn active_filter(&self) -> &FilterSet {
        &self.active
    }

    /// Records passing the active filter, in load order.
    pub fn filtered(&self) -> &[Record] {
        &self.filtered
    }

    /// Apply or reset the active filter and refresh every chart.
    pub fn handle(&mut self, event: FilterEvent) {
        self.active = match event {
            FilterEvent::Reset => FilterSet::default(),
            FilterEvent::Apply(set) => set,
        };
        self.filtered = if self.active.is_empty() {
            self.store.shared()
        } else {
            self.active.apply(self.store.records()).into()
        };
        log::debug!(
            "filter matched {} of {} records",
            self.filtered.len(),
            self.store.len()
        );
        self.push_data();
    }

    /// Submit the panel's draft as the new filter.
    pub fn submit_panel(&mut self) {
        let event = self.panel.submit();
        self.handle(event);
    }

    /// Clear the panel and the active filter.
    pub fn reset_panel(&mut self) {
        let event = self.panel.reset();
        self.handle(event);
    }

    fn push_data(&mut self) {
        self.bar.set_data(Arc::clone(&self.filtered));
        self.line.set_data(Arc::clone(&self.filtered));
        self.map.set_data(Arc::clone(&self.filtered));
    }

    /// Give every chart the same container size.
    pub fn resize_all(&mut self, dims: Dimensions) {
        self.bar.resize(dims);
        self.line.resize(dims);
        self.map.resize(dims);
    }

    /// Render every chart that has a size into `out_dir` as `<chart>.<ext>`.
    ///
    /// A map whose boundaries cannot be loaded still produces a file, showing
    /// a notice in place of the map.
    pub fn render_all<P: AsRef<Path>>(&mut self, out_dir: P, format: ImageFormat) -> Result<Vec<PathBuf>> {
        let out_dir = out_dir.as_ref();
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("create output directory {}", out_dir.display()))?;
        let mut written = Vec::new();
        for kind in ChartKind::ALL {
            let path = out_dir.join(format!("{}.{}", kind.file_stem(), format.extension()));
            let drawn = match kind {
                ChartKind::Bar => viz::render_to_file(&mut self.bar, &path),
                ChartKind::Line => viz::render_to_file(&mut self.line, &path),
                ChartKind::Map => viz::render_to_file(&mut self.map, &path),
            }
            .with_context(|| format!("render {} chart", kind.file_stem()))?;
            if drawn {
                log::info!("wrote {}", path.display());
                written.push(path);
            }
        }
        Ok(written)
    }

    /// Render one chart to an SVG document; `None` while it has no size.
    pub fn render_svg(&mut self, kind: ChartKind) -> Result<Option<String>> {
        match kind {
            ChartKind::Bar => viz::render_svg(&mut self.bar),
            ChartKind::Line => viz::render_svg(&mut self.line),
            ChartKind::Map => viz::render_svg(&mut self.map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Facet;
    use crate::geo::StaticBoundaries;
    use serde_json::json;

    fn dashboard() -> Dashboard {
        let store = DataStore::from_documents(vec![
            json!({"source": "A", "topic": "oil", "intensity": 30, "published": "January, 20 2017 03:51:25"}),
            json!({"source": "B", "topic": "gas", "intensity": 5, "published": "January, 20 2016 03:51:25"}),
        ]);
        Dashboard::new(store, Box::new(StaticBoundaries::default()))
    }

    #[test]
    fn filter_round_trip_through_panel() {
        let mut d = dashboard();
        assert_eq!(d.filtered().len(), 2);
        d.panel.toggle(Facet::Topic, "oil", true);
        d.submit_panel();
        assert_eq!(d.filtered().len(), 1);
        assert_eq!(d.bar.rows().len(), 1);
        assert_eq!(d.line.totals().len(), 1);
        d.reset_panel();
        assert!(d.active_filter().is_empty());
        assert_eq!(d.bar.rows().len(), 2);
    }
}
