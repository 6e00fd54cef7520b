//! Yearly totals of the three measures as monotone curves with point markers.

use super::curve::monotone_x;
use super::text::{fmt_tick, fmt_year};
use super::{Chart, Lifecycle, canvas_px, hex_color, px};
use crate::aggregate::{MeasureTotals, yearly_totals};
use crate::models::{Dimensions, Measure, Record};
use crate::scale::LinearScale;
use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::sync::Arc;

pub const YEAR_DOMAIN: (f64, f64) = (2007.0, 2020.0);
pub const VALUE_DOMAIN: (f64, f64) = (0.0, 10_000.0);
/// Plot origin inside the canvas.
pub const PLOT_OFFSET: (f64, f64) = (40.0, 20.0);
const AXIS_FONT_PX: u32 = 10;
const LEGEND_FONT_PX: u32 = 12;
const GRID_COLOR: &str = "#e0e0e0";

/// Series color of a measure.
pub fn measure_color(m: Measure) -> &'static str {
    match m {
        Measure::Intensity => "#CC0000",
        Measure::Likelihood => "#008000",
        Measure::Relevance => "#0000FF",
    }
}

/// One measure's points and sampled curve, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub measure: Measure,
    pub points: Vec<(f64, f64)>,
    pub curve: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub x: LinearScale,
    pub y: LinearScale,
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    pub series: Vec<Series>,
    pub width: f64,
    pub height: f64,
}

impl LineLayout {
    pub fn compute(totals: &[(i32, MeasureTotals)], dims: Dimensions) -> Self {
        let x = LinearScale::new(YEAR_DOMAIN, (0.0, dims.width - 100.0));
        let y = LinearScale::new(VALUE_DOMAIN, (dims.height - 40.0, 0.0));
        let (ox, oy) = PLOT_OFFSET;
        let series = Measure::ALL
            .iter()
            .map(|&measure| {
                let points: Vec<(f64, f64)> = totals
                    .iter()
                    .map(|(year, t)| (ox + x.map(*year as f64), oy + y.map(t.get(measure))))
                    .collect();
                Series {
                    measure,
                    curve: monotone_x(&points),
                    points,
                }
            })
            .collect();
        Self {
            x_ticks: x.ticks(10),
            y_ticks: y.ticks(5),
            x,
            y,
            series,
            width: dims.width,
            height: dims.height,
        }
    }
}

/// Line chart over the filtered records.
#[derive(Debug, Clone, Default)]
pub struct LineChart {
    totals: Vec<(i32, MeasureTotals)>,
    lifecycle: Lifecycle,
}

impl LineChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, data: Arc<[Record]>) {
        self.totals = yearly_totals(&data);
        self.lifecycle.data_changed();
    }

    /// Per-year sums, ascending by year.
    pub fn totals(&self) -> &[(i32, MeasureTotals)] {
        &self.totals
    }

    pub fn resize(&mut self, dims: Dimensions) -> bool {
        self.lifecycle.resize(dims)
    }

    pub fn layout(&self) -> Option<LineLayout> {
        self.lifecycle
            .dimensions()
            .map(|d| LineLayout::compute(&self.totals, d))
    }
}

impl Chart for LineChart {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn canvas_size(&self, dims: Dimensions) -> (u32, u32) {
        (canvas_px(dims.width), canvas_px(dims.height))
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, dims: Dimensions) -> Result<()> {
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        let layout = LineLayout::compute(&self.totals, dims);
        let (ox, oy) = PLOT_OFFSET;
        let plot_w = dims.width - 100.0;

        // Grid first so the series sit on top.
        let grid = hex_color(GRID_COLOR);
        for t in &layout.y_ticks {
            let gy = px(oy + layout.y.map(*t));
            root.draw(&PathElement::new(vec![(px(ox), gy), (px(ox + plot_w), gy)], grid))
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        draw_axes(root, &layout)?;

        for s in &layout.series {
            let color = hex_color(measure_color(s.measure));
            let path: Vec<(i32, i32)> = s.curve.iter().map(|&(x, y)| (px(x), px(y))).collect();
            if path.len() > 1 {
                root.draw(&PathElement::new(path, color.stroke_width(2)))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
            for &(x, y) in &s.points {
                root.draw(&Circle::new((px(x), px(y)), 3, color.filled()))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }

        // Legend: swatch and capitalized label per measure.
        let legend_style = TextStyle::from((FontFamily::SansSerif, LEGEND_FONT_PX))
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (i, m) in Measure::ALL.iter().enumerate() {
            let lx = dims.width - 100.0;
            let ly = 30.0 + 20.0 * i as f64;
            root.draw(&Rectangle::new(
                [(px(lx), px(ly - 5.0)), (px(lx + 10.0), px(ly + 5.0))],
                hex_color(measure_color(*m)).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
            root.draw(&Text::new(m.title().to_string(), (px(lx + 15.0), px(ly)), legend_style.clone()))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        Ok(())
    }
}

/// Bottom year axis at `height - 20`, left value axis at the plot origin.
fn draw_axes<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, layout: &LineLayout) -> Result<()> {
    let (ox, oy) = PLOT_OFFSET;
    let axis_y = layout.height - 20.0;
    let (x0, x1) = layout.x.range;
    root.draw(&PathElement::new(
        vec![(px(ox + x0), px(axis_y)), (px(ox + x1), px(axis_y))],
        BLACK,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    let x_style = TextStyle::from((FontFamily::SansSerif, AXIS_FONT_PX))
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for t in &layout.x_ticks {
        let tx = px(ox + layout.x.map(*t));
        root.draw(&PathElement::new(vec![(tx, px(axis_y)), (tx, px(axis_y + 6.0))], BLACK))
            .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(fmt_year(*t), (tx, px(axis_y + 8.0)), x_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let (y0, y1) = layout.y.range;
    root.draw(&PathElement::new(
        vec![(px(ox), px(oy + y0)), (px(ox), px(oy + y1))],
        BLACK,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    let y_style = TextStyle::from((FontFamily::SansSerif, AXIS_FONT_PX))
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for t in &layout.y_ticks {
        let ty = px(oy + layout.y.map(*t));
        root.draw(&PathElement::new(vec![(px(ox - 6.0), ty), (px(ox), ty)], BLACK))
            .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(fmt_tick(*t), (px(ox - 9.0), ty), y_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> Vec<(i32, MeasureTotals)> {
        vec![
            (
                2016,
                MeasureTotals {
                    intensity: 1000.0,
                    likelihood: 200.0,
                    relevance: 100.0,
                },
            ),
            (
                2017,
                MeasureTotals {
                    intensity: 5000.0,
                    likelihood: 400.0,
                    relevance: 300.0,
                },
            ),
        ]
    }

    #[test]
    fn layout_uses_fixed_domains() {
        let l = LineLayout::compute(&totals(), Dimensions::new(800.0, 440.0));
        assert_eq!(l.x.range, (0.0, 700.0));
        assert_eq!(l.y.range, (400.0, 0.0));
        assert_eq!(l.y_ticks, vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10000.0]);
        assert_eq!(l.x_ticks.first(), Some(&2007.0));
        assert_eq!(l.x_ticks.last(), Some(&2020.0));

        let intensity = &l.series[0];
        assert_eq!(intensity.measure, Measure::Intensity);
        // 2016 is 9/13 of the way across; 1000 is a tenth of the way up.
        let (x, y) = intensity.points[0];
        assert!((x - (40.0 + 700.0 * 9.0 / 13.0)).abs() < 1e-9);
        assert!((y - (20.0 + 360.0)).abs() < 1e-9);
    }

    #[test]
    fn legend_colors() {
        assert_eq!(measure_color(Measure::Intensity), "#CC0000");
        assert_eq!(measure_color(Measure::Likelihood), "#008000");
        assert_eq!(measure_color(Measure::Relevance), "#0000FF");
    }
}
