//! Chart rendering: the bar, line, and map views drawn to **SVG** or **PNG**.
//!
//! Every chart owns a [`Lifecycle`]: it renders nothing until it has a size, and
//! each draw is a full clear-and-redraw built from the chart's current inputs.
//! Charts are laid out in pixel space by the [`crate::scale`] mappers and drawn
//! with plain Plotters elements on the root drawing area.

pub mod bar;
pub mod curve;
pub mod lifecycle;
pub mod line;
pub mod map;
pub mod text;
pub mod tooltip;

pub use bar::BarChart;
pub use lifecycle::{ChartState, Lifecycle};
pub use line::LineChart;
pub use map::WorldMap;
pub use tooltip::Tooltip;

use crate::models::Dimensions;
use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::Once;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        if plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        )
        .is_err()
        {
            log::warn!("bundled font could not be registered; text may not render");
        }
    });
}

/// Text shown in place of a chart whose inputs could not be obtained.
pub const UNAVAILABLE_NOTICE: &str = "Map data unavailable";

/// A chart that can lay itself out for a container size and draw the result.
pub trait Chart {
    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Obtain anything the draw needs beyond the records (e.g. boundary data).
    fn prepare(&mut self) -> crate::error::Result<()> {
        Ok(())
    }

    /// Pixel size of the drawing surface for a container of `dims`.
    fn canvas_size(&self, dims: Dimensions) -> (u32, u32);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, dims: Dimensions) -> Result<()>;
}

/// Render a chart into an SVG document.
///
/// Returns `Ok(None)` while the chart has no size yet.
pub fn render_svg<C: Chart>(chart: &mut C) -> Result<Option<String>> {
    let Some(dims) = chart.lifecycle().dimensions() else {
        return Ok(None);
    };
    ensure_fonts_registered();
    let prepared = chart.prepare();
    let size = chart.canvas_size(dims);
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw_scene(&*chart, &root, dims, &prepared)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    settle(chart, prepared);
    Ok(Some(buf))
}

/// Render a chart to `out_path`: SVG when the extension is `.svg`, PNG otherwise.
///
/// Returns `Ok(false)` (and writes nothing) while the chart has no size yet.
pub fn render_to_file<C: Chart, P: AsRef<Path>>(chart: &mut C, out_path: P) -> Result<bool> {
    let Some(dims) = chart.lifecycle().dimensions() else {
        return Ok(false);
    };
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let prepared = chart.prepare();
    let size = chart.canvas_size(dims);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, size).into_drawing_area();
        draw_scene(&*chart, &root, dims, &prepared)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    } else {
        let root = BitMapBackend::new(out_path, size).into_drawing_area();
        draw_scene(&*chart, &root, dims, &prepared)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    settle(chart, prepared);
    Ok(true)
}

fn draw_scene<C: Chart, DB: DrawingBackend>(
    chart: &C,
    root: &DrawingArea<DB, Shift>,
    dims: Dimensions,
    prepared: &crate::error::Result<()>,
) -> Result<()> {
    match prepared {
        Ok(()) => chart.draw(root, dims),
        Err(_) => draw_notice(root, UNAVAILABLE_NOTICE),
    }
}

fn settle<C: Chart>(chart: &mut C, prepared: crate::error::Result<()>) {
    match prepared {
        Ok(()) => chart.lifecycle_mut().mark_rendered(),
        Err(e) => {
            log::warn!("chart inputs unavailable: {}", e);
            chart.lifecycle_mut().mark_failed(e.to_string());
        }
    }
}

/// Blank canvas with a centered message.
fn draw_notice<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, msg: &str) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let (w, h) = root.dim_in_pixel();
    let style = TextStyle::from((FontFamily::SansSerif, 16).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(msg.to_string(), (w as i32 / 2, h as i32 / 2), style))
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Parse `#rrggbb`; anything else is black.
pub fn hex_color(hex: &str) -> RGBColor {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        return BLACK;
    }
    let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).unwrap_or(0);
    RGBColor(channel(0), channel(2), channel(4))
}

/// Pixel coordinate from a layout value.
pub(crate) fn px(v: f64) -> i32 {
    v.round() as i32
}

/// Canvas extent from a layout value; at least one pixel.
pub(crate) fn canvas_px(v: f64) -> u32 {
    v.max(1.0).round() as u32
}
