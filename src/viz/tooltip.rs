//! Stateless tooltip view: a box of text lines placed near the pointer.

use super::text::estimate_text_width_px;
use super::px;
use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

const FONT_PX: u32 = 13;
const LINE_PX: f64 = 18.0;
const PADDING_PX: f64 = 8.0;

/// A placed tooltip. Built from the hovered entity on every draw; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub lines: Vec<String>,
    /// Top-left corner in canvas pixels.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Tooltip {
    /// Place at `pointer + offset`, then clamp so the box stays inside `bounds`.
    pub fn place(
        lines: Vec<String>,
        pointer: (f64, f64),
        offset: (f64, f64),
        bounds: (f64, f64),
    ) -> Self {
        let widest = lines
            .iter()
            .map(|l| estimate_text_width_px(l, FONT_PX))
            .max()
            .unwrap_or(0) as f64;
        let width = widest + 2.0 * PADDING_PX;
        let height = lines.len() as f64 * LINE_PX + 2.0 * PADDING_PX;
        let x = (pointer.0 + offset.0).min(bounds.0 - width).max(0.0);
        let y = (pointer.1 + offset.1).min(bounds.1 - height).max(0.0);
        Self {
            lines,
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains_box(&self, bounds: (f64, f64)) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= bounds.0 + 0.5
            && self.y + self.height <= bounds.1 + 0.5
    }

    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        background: RGBColor,
    ) -> Result<()> {
        root.draw(&Rectangle::new(
            [
                (px(self.x), px(self.y)),
                (px(self.x + self.width), px(self.y + self.height)),
            ],
            background.mix(0.9).filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        let style = TextStyle::from((FontFamily::SansSerif, FONT_PX)).color(&WHITE);
        for (i, line) in self.lines.iter().enumerate() {
            let at = (
                px(self.x + PADDING_PX),
                px(self.y + PADDING_PX + i as f64 * LINE_PX),
            );
            root.draw(&Text::new(line.clone(), at, style.clone()))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        Ok(())
    }
}
