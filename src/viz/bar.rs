//! Horizontal bar chart of the top groups for one view selection.

use super::text::{fmt_value, truncate_to_width};
use super::tooltip::Tooltip;
use super::{Chart, Lifecycle, canvas_px, hex_color, px};
use crate::aggregate::aggregate;
use crate::models::{AggregateRow, Dimensions, Record, ViewState};
use crate::scale::{BandScale, LinearScale, bar_color_scale, domain_bound};
use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::sync::Arc;

/// Width reserved left of the bars for group labels.
pub const LABEL_BAND_PX: f64 = 140.0;
const AXIS_FONT_PX: u32 = 10;
const VALUE_FONT_PX: u32 = 14;
const TICK_PX: f64 = 6.0;
const TOOLTIP_OFFSET: (f64, f64) = (20.0, -100.0);

/// One laid-out bar, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGeom {
    pub group: String,
    pub value: f64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub fill: &'static str,
}

impl BarGeom {
    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }

    /// Anchor of the in-bar value label.
    pub fn label_at(&self, x: &LinearScale) -> (f64, f64) {
        (LABEL_BAND_PX + x.map(self.value) - 40.0, self.top + 18.0)
    }
}

/// Pixel layout for one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub width: f64,
    pub height: f64,
    pub x: LinearScale,
    pub y: BandScale,
    pub bars: Vec<BarGeom>,
}

impl BarLayout {
    /// Canvas size for a container: 90 % of the width; shorter on narrow screens.
    pub fn canvas(dims: Dimensions) -> (f64, f64) {
        let width = dims.width * 0.9;
        let height = if dims.width < 400.0 {
            dims.height - 40.0
        } else if dims.width < 768.0 {
            dims.height - 30.0
        } else {
            dims.height
        };
        (width, height.max(0.0))
    }

    pub fn compute(rows: &[AggregateRow], view: ViewState, dims: Dimensions) -> Self {
        let (width, height) = Self::canvas(dims);
        let x = LinearScale::new(
            (0.0, domain_bound(view.dimension, view.aggregate, view.measure)),
            (0.0, width - LABEL_BAND_PX),
        );
        let y = BandScale::new(
            rows.iter().map(|r| r.group.clone()).collect(),
            (0.0, height),
            0.1,
        );
        let colors = bar_color_scale();
        let bars = rows
            .iter()
            .filter_map(|r| {
                let top = y.position(&r.group)?;
                Some(BarGeom {
                    group: r.group.clone(),
                    value: r.value,
                    left: LABEL_BAND_PX + x.map(0.0),
                    top,
                    width: (x.map(r.value) - x.map(0.0)).max(0.0),
                    height: y.bandwidth(),
                    fill: colors.map(r.value),
                })
            })
            .collect();
        Self {
            width,
            height,
            x,
            y,
            bars,
        }
    }

    /// Topmost bar under `pointer`.
    pub fn hit(&self, pointer: (f64, f64)) -> Option<&BarGeom> {
        self.bars.iter().rev().find(|b| b.contains(pointer))
    }
}

/// Ranked bar chart with its own view selection and hover state.
#[derive(Debug, Clone, Default)]
pub struct BarChart {
    view: ViewState,
    data: Arc<[Record]>,
    rows: Vec<AggregateRow>,
    pointer: Option<(f64, f64)>,
    lifecycle: Lifecycle,
}

impl BarChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(view: ViewState) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn set_data(&mut self, data: Arc<[Record]>) {
        self.data = data;
        self.recompute();
        self.lifecycle.data_changed();
    }

    pub fn set_view(&mut self, view: ViewState) {
        if view != self.view {
            self.view = view;
            self.recompute();
            self.lifecycle.invalidate();
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    fn recompute(&mut self) {
        self.rows = aggregate(&self.data, self.view.dimension, self.view.aggregate, self.view.measure);
    }

    /// Ranked rows currently shown (at most the top ten).
    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn resize(&mut self, dims: Dimensions) -> bool {
        self.lifecycle.resize(dims)
    }

    pub fn layout(&self) -> Option<BarLayout> {
        self.lifecycle
            .dimensions()
            .map(|d| BarLayout::compute(&self.rows, self.view, d))
    }

    /// Move the pointer (canvas pixels), or `None` when it leaves the chart.
    pub fn hover(&mut self, pointer: Option<(f64, f64)>) {
        if pointer != self.pointer {
            self.pointer = pointer;
            self.lifecycle.invalidate();
        }
    }

    /// Group under the pointer, if any.
    pub fn hovered(&self) -> Option<AggregateRow> {
        let p = self.pointer?;
        let layout = self.layout()?;
        layout
            .hit(p)
            .map(|b| AggregateRow::new(b.group.clone(), b.value))
    }

    /// Tooltip for the hovered bar, placed for the current size.
    pub fn tooltip(&self) -> Option<Tooltip> {
        let layout = self.layout()?;
        self.tooltip_in(&layout)
    }

    fn tooltip_in(&self, layout: &BarLayout) -> Option<Tooltip> {
        let p = self.pointer?;
        let bar = layout.hit(p)?;
        let lines = vec![
            format!("{}: {}", self.view.dimension, bar.group),
            format!("{}: {}", self.view.measure, fmt_value(bar.value)),
        ];
        Some(Tooltip::place(lines, p, TOOLTIP_OFFSET, (layout.width, layout.height)))
    }
}

impl Chart for BarChart {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn canvas_size(&self, dims: Dimensions) -> (u32, u32) {
        let (w, h) = BarLayout::canvas(dims);
        (canvas_px(w), canvas_px(h))
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, dims: Dimensions) -> Result<()> {
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        let layout = BarLayout::compute(&self.rows, self.view, dims);

        for bar in &layout.bars {
            root.draw(&Rectangle::new(
                [
                    (px(bar.left), px(bar.top)),
                    (px(bar.left + bar.width), px(bar.top + bar.height)),
                ],
                hex_color(bar.fill).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
            let value_style = TextStyle::from((FontFamily::SansSerif, VALUE_FONT_PX))
                .color(&WHITE)
                .pos(Pos::new(HPos::Left, VPos::Bottom));
            let (lx, ly) = bar.label_at(&layout.x);
            root.draw(&Text::new(fmt_value(bar.value), (px(lx), px(ly)), value_style))
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        draw_band_axis(root, &layout)?;

        if let Some(tip) = self.tooltip_in(&layout) {
            tip.draw(root, BLACK)?;
        }
        Ok(())
    }
}

/// Left axis: domain line at the label band edge, one tick and label per band.
fn draw_band_axis<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, layout: &BarLayout) -> Result<()> {
    let axis_x = LABEL_BAND_PX;
    root.draw(&PathElement::new(
        vec![
            (px(axis_x - TICK_PX), 0),
            (px(axis_x), 0),
            (px(axis_x), px(layout.height)),
            (px(axis_x - TICK_PX), px(layout.height)),
        ],
        BLACK,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let label_style = TextStyle::from((FontFamily::SansSerif, AXIS_FONT_PX))
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    let max_label_px = (LABEL_BAND_PX - TICK_PX - 6.0) as u32;
    for key in layout.y.keys() {
        let Some(top) = layout.y.position(key) else {
            continue;
        };
        let cy = px(top + layout.y.bandwidth() / 2.0);
        root.draw(&PathElement::new(
            vec![(px(axis_x - TICK_PX), cy), (px(axis_x), cy)],
            BLACK,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        let label = truncate_to_width(key, AXIS_FONT_PX, max_label_px);
        root.draw(&Text::new(label, (px(axis_x - TICK_PX - 3.0), cy), label_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregateFn, Dimension, Measure};

    fn rows() -> Vec<AggregateRow> {
        vec![AggregateRow::new("A", 30.0), AggregateRow::new("B", 5.0)]
    }

    #[test]
    fn canvas_shrinks_on_narrow_screens() {
        assert_eq!(BarLayout::canvas(Dimensions::new(1000.0, 400.0)), (900.0, 400.0));
        assert_eq!(BarLayout::canvas(Dimensions::new(500.0, 400.0)), (450.0, 370.0));
        assert_eq!(BarLayout::canvas(Dimensions::new(300.0, 400.0)), (270.0, 360.0));
    }

    #[test]
    fn bars_follow_scales() {
        let view = ViewState::new(Dimension::Source, AggregateFn::Sum, Measure::Intensity);
        let l = BarLayout::compute(&rows(), view, Dimensions::new(1000.0, 400.0));
        // sum/intensity/source bound is 500 over 900 - 140 px.
        assert_eq!(l.x.domain, (0.0, 500.0));
        assert!((l.bars[0].width - 30.0 / 500.0 * 760.0).abs() < 1e-9);
        assert_eq!(l.bars[0].left, LABEL_BAND_PX);
        assert!(l.bars[0].top < l.bars[1].top);
        // Both values sit in the [1, 50) bucket.
        assert_eq!(l.bars[0].fill, "#6baed6");
        assert_eq!(l.bars[1].fill, "#6baed6");
    }

    #[test]
    fn hover_yields_tooltip_then_hides() {
        let mut chart = BarChart::new();
        let data: Arc<[Record]> = vec![
            Record {
                source: "A".into(),
                intensity: Some(30.0),
                ..Record::default()
            },
            Record {
                source: "B".into(),
                intensity: Some(5.0),
                ..Record::default()
            },
        ]
        .into();
        chart.set_data(data);
        chart.resize(Dimensions::new(1000.0, 400.0));
        let bar = chart.layout().unwrap().bars[0].clone();
        chart.hover(Some((bar.left + 1.0, bar.top + 1.0)));
        assert_eq!(chart.hovered(), Some(AggregateRow::new("A", 30.0)));
        let tip = chart.tooltip().unwrap();
        assert_eq!(tip.lines, vec!["source: A", "intensity: 30"]);
        chart.hover(Some((5.0, 5.0)));
        assert!(chart.tooltip().is_none());
        chart.hover(None);
        assert!(chart.hovered().is_none());
    }

    #[test]
    fn count_tooltip_names_the_measure() {
        let data: Arc<[Record]> = vec![
            Record {
                topic: "oil".into(),
                likelihood: Some(3.0),
                ..Record::default()
            };
            3
        ]
        .into();
        let mut chart = BarChart::with_view(ViewState::new(Dimension::Topic, AggregateFn::Count, Measure::Likelihood));
        chart.set_data(data);
        chart.resize(Dimensions::new(1000.0, 400.0));
        let bar = chart.layout().unwrap().bars[0].clone();
        chart.hover(Some((bar.left + 1.0, bar.top + 1.0)));
        assert_eq!(chart.tooltip().unwrap().lines, vec!["topic: oil", "likelihood: 3"]);
    }
}
