//! Choropleth world map of per-country intensity.

use super::text::fmt_value;
use super::tooltip::Tooltip;
use super::{Chart, Lifecycle, canvas_px, hex_color, px};
use crate::aggregate::{MeasureTotals, country_totals};
use crate::error::Result as DashResult;
use crate::geo::{Boundary, BoundaryProvider, CountryShade, Mercator, ProjectedShape, join_country_totals};
use crate::models::{Dimensions, Record};
use crate::scale::map_color_scale;
use ahash::AHashMap;
use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::sync::Arc;

const TOOLTIP_OFFSET: (f64, f64) = (20.0, 0.0);
const TOOLTIP_BG: &str = "#2c3e50";
const DIMMED_OPACITY: f64 = 0.5;

/// A boundary with its joined measures and fill.
#[derive(Debug, Clone, PartialEq)]
pub struct MapCountry {
    pub shape: ProjectedShape,
    pub shade: CountryShade,
    pub fill: &'static str,
}

/// Projected scene for one draw. Countries are in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    pub width: f64,
    pub height: f64,
    pub projection: Mercator,
    pub countries: Vec<MapCountry>,
    pub hovered: Option<usize>,
}

impl MapLayout {
    /// Canvas is 20 px shorter than the container; the projection centers on the container.
    pub fn canvas(dims: Dimensions) -> (f64, f64) {
        (dims.width, (dims.height - 20.0).max(0.0))
    }

    pub fn compute(
        boundaries: &[Boundary],
        totals: &AHashMap<String, MeasureTotals>,
        dims: Dimensions,
        pointer: Option<(f64, f64)>,
    ) -> Self {
        let (width, height) = Self::canvas(dims);
        let projection = Mercator::world(dims.width, dims.height);
        let colors = map_color_scale();
        let mut countries: Vec<MapCountry> = boundaries
            .iter()
            .zip(join_country_totals(boundaries, totals))
            .map(|(b, shade)| MapCountry {
                shape: ProjectedShape::project(b, &projection),
                fill: colors.map(shade.totals.intensity),
                shade,
            })
            .collect();
        // Large outlines first so enclaves stay visible on top.
        countries.sort_by(|a, b| bbox_area(&b.shape).total_cmp(&bbox_area(&a.shape)));
        let hovered = pointer.and_then(|p| countries.iter().rposition(|c| c.shape.contains(p)));
        Self {
            width,
            height,
            projection,
            countries,
            hovered,
        }
    }

    /// Fill opacity of the country at `index`.
    pub fn opacity(&self, index: usize) -> f64 {
        match self.hovered {
            Some(h) if h != index => DIMMED_OPACITY,
            _ => 1.0,
        }
    }
}

fn bbox_area(shape: &ProjectedShape) -> f64 {
    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &(x, y) in shape.polygons.iter().flatten().flatten() {
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
    }
    if min.0.is_finite() {
        (max.0 - min.0) * (max.1 - min.1)
    } else {
        0.0
    }
}

/// World map. Boundaries are loaded once, on the first draw that needs them.
#[derive(Debug)]
pub struct WorldMap {
    provider: Box<dyn BoundaryProvider>,
    boundaries: Option<Vec<Boundary>>,
    totals: AHashMap<String, MeasureTotals>,
    pointer: Option<(f64, f64)>,
    lifecycle: Lifecycle,
}

impl WorldMap {
    pub fn new(provider: Box<dyn BoundaryProvider>) -> Self {
        Self {
            provider,
            boundaries: None,
            totals: AHashMap::new(),
            pointer: None,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn set_data(&mut self, data: Arc<[Record]>) {
        self.totals = country_totals(&data);
        self.lifecycle.data_changed();
    }

    pub fn resize(&mut self, dims: Dimensions) -> bool {
        self.lifecycle.resize(dims)
    }

    pub fn hover(&mut self, pointer: Option<(f64, f64)>) {
        if pointer != self.pointer {
            self.pointer = pointer;
            self.lifecycle.invalidate();
        }
    }

    pub fn boundaries_loaded(&self) -> bool {
        self.boundaries.is_some()
    }

    /// Per-country totals of the current records.
    pub fn totals(&self) -> &AHashMap<String, MeasureTotals> {
        &self.totals
    }

    /// `None` until both a size and the boundaries are available.
    pub fn layout(&self) -> Option<MapLayout> {
        let dims = self.lifecycle.dimensions()?;
        let boundaries = self.boundaries.as_deref()?;
        Some(MapLayout::compute(boundaries, &self.totals, dims, self.pointer))
    }

    pub fn hovered(&self) -> Option<CountryShade> {
        let layout = self.layout()?;
        layout.hovered.map(|i| layout.countries[i].shade.clone())
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        let layout = self.layout()?;
        self.tooltip_in(&layout)
    }

    fn tooltip_in(&self, layout: &MapLayout) -> Option<Tooltip> {
        let p = self.pointer?;
        let c = &layout.countries[layout.hovered?];
        let t = c.shade.totals;
        let lines = vec![
            format!("Country: {}", c.shade.name),
            format!("Intensity: {}", fmt_value(t.intensity)),
            format!("Likelihood: {}", fmt_value(t.likelihood)),
            format!("Relevance: {}", fmt_value(t.relevance)),
        ];
        Some(Tooltip::place(lines, p, TOOLTIP_OFFSET, (layout.width, layout.height)))
    }
}

impl Chart for WorldMap {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    /// Load the boundary set if it is not cached yet. A failure leaves the cache
    /// empty so the next render tries again.
    fn prepare(&mut self) -> DashResult<()> {
        if self.boundaries.is_some() {
            return Ok(());
        }
        let loaded = self.provider.load()?;
        log::info!(
            "loaded {} boundaries from {}",
            loaded.len(),
            self.provider.describe()
        );
        self.boundaries = Some(loaded);
        Ok(())
    }

    fn canvas_size(&self, dims: Dimensions) -> (u32, u32) {
        let (w, h) = MapLayout::canvas(dims);
        (canvas_px(w), canvas_px(h))
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, dims: Dimensions) -> Result<()> {
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        let Some(boundaries) = self.boundaries.as_deref() else {
            return Err(anyhow!("boundaries not loaded"));
        };
        let layout = MapLayout::compute(boundaries, &self.totals, dims, self.pointer);

        for (i, c) in layout.countries.iter().enumerate() {
            let style = hex_color(c.fill).mix(layout.opacity(i)).filled();
            for rings in &c.shape.polygons {
                let Some(outer) = rings.first() else {
                    continue;
                };
                let pts: Vec<(i32, i32)> = outer.iter().map(|&(x, y)| (px(x), px(y))).collect();
                root.draw(&Polygon::new(pts, style))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }

        if let Some(h) = layout.hovered {
            for ring in layout.countries[h].shape.polygons.iter().flatten() {
                let mut pts: Vec<(i32, i32)> = ring.iter().map(|&(x, y)| (px(x), px(y))).collect();
                if let Some(&first) = pts.first() {
                    pts.push(first);
                }
                root.draw(&PathElement::new(pts, YELLOW))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }

        if let Some(tip) = self.tooltip_in(&layout) {
            tip.draw(root, hex_color(TOOLTIP_BG))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::StaticBoundaries;

    fn square(name: &str, lon: f64, lat: f64, size: f64) -> Boundary {
        Boundary {
            name: name.into(),
            polygons: vec![vec![vec![
                (lon, lat),
                (lon + size, lat),
                (lon + size, lat + size),
                (lon, lat + size),
            ]]],
        }
    }

    fn map() -> WorldMap {
        let provider = StaticBoundaries(vec![square("Big", -10.0, 0.0, 40.0), square("USA", 0.0, 10.0, 5.0)]);
        let mut m = WorldMap::new(Box::new(provider));
        let data: Arc<[Record]> = vec![Record {
            country: "United States of America".into(),
            intensity: Some(12.0),
            likelihood: Some(3.0),
            relevance: Some(2.0),
            ..Record::default()
        }]
        .into();
        m.set_data(data);
        m.resize(Dimensions::new(800.0, 420.0));
        m
    }

    #[test]
    fn enclave_drawn_last_and_hovered() {
        let mut m = map();
        assert!(m.layout().is_none());
        m.prepare().unwrap();
        let layout = m.layout().unwrap();
        assert_eq!(layout.countries[0].shade.name, "Big");
        assert_eq!(layout.countries[1].shade.name, "United States of America");
        assert_eq!(layout.countries[1].fill, "#6baed6");
        assert_eq!(layout.countries[0].fill, "#eff3ff");

        let center = layout.projection.project(2.5, 12.5);
        m.hover(Some(center));
        let hovered = m.hovered().unwrap();
        assert_eq!(hovered.totals.intensity, 12.0);
        let layout = m.layout().unwrap();
        assert_eq!(layout.opacity(1), 1.0);
        assert_eq!(layout.opacity(0), 0.5);
        let tip = m.tooltip().unwrap();
        assert_eq!(tip.lines[0], "Country: United States of America");
        assert_eq!(tip.lines[1], "Intensity: 12");

        m.hover(None);
        let layout = m.layout().unwrap();
        assert_eq!(layout.opacity(0), 1.0);
        assert_eq!(layout.opacity(1), 1.0);
    }
}
