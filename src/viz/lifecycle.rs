//! Per-chart render lifecycle.

use crate::models::Dimensions;
use crate::surface::SurfaceTracker;

/// Where a chart is in its render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartState {
    /// Nothing attached yet: no data, no size.
    Uninitialized,
    /// Waiting for a container size, or holding changes not yet drawn.
    Measuring,
    /// The last draw reflects the current data, size, and view.
    Rendered,
    /// The last draw could not obtain its inputs; a fallback notice was shown.
    Failed(String),
}

/// Tracks size, pending changes, and the render state of one chart.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    surface: SurfaceTracker,
    has_data: bool,
    dirty: bool,
    rendered: bool,
    failure: Option<String>,
    renders: u64,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChartState {
        if let Some(msg) = &self.failure {
            return ChartState::Failed(msg.clone());
        }
        if self.rendered && !self.dirty {
            ChartState::Rendered
        } else if self.has_data || self.surface.dimensions().is_some() {
            ChartState::Measuring
        } else {
            ChartState::Uninitialized
        }
    }

    /// New input data arrived.
    pub fn data_changed(&mut self) {
        self.has_data = true;
        self.invalidate();
    }

    /// View selection or hover changed.
    pub fn invalidate(&mut self) {
        self.dirty = true;
        self.failure = None;
    }

    /// Container resized; returns `true` when a redraw is due.
    pub fn resize(&mut self, dims: Dimensions) -> bool {
        let changed = self.surface.observe(dims);
        if changed {
            self.invalidate();
        }
        changed
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.surface.dimensions()
    }

    /// A size is known and something changed since the last draw.
    pub fn needs_render(&self) -> bool {
        self.surface.dimensions().is_some() && (self.dirty || !self.rendered)
    }

    pub(crate) fn mark_rendered(&mut self) {
        self.rendered = true;
        self.dirty = false;
        self.failure = None;
        self.renders += 1;
    }

    pub(crate) fn mark_failed(&mut self, msg: impl Into<String>) {
        self.failure = Some(msg.into());
        self.renders += 1;
    }

    /// Completed draws, fallbacks included.
    pub fn render_count(&self) -> u64 {
        self.renders
    }
}
