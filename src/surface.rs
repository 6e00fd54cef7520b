//! Responsive surface tracking: the last observed container size of a chart.

use crate::models::Dimensions;

/// Observes a container's size and reports layout changes.
///
/// Sizes are compared at whole-pixel precision so sub-pixel jitter from a
/// layout pass does not trigger a redraw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceTracker {
    current: Option<Dimensions>,
}

impl SurfaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new observation. Returns `true` when the layout changed.
    pub fn observe(&mut self, dims: Dimensions) -> bool {
        if !(dims.width.is_finite() && dims.height.is_finite()) {
            return false;
        }
        let dims = Dimensions::new(dims.width.max(0.0).round(), dims.height.max(0.0).round());
        if self.current == Some(dims) {
            return false;
        }
        self.current = Some(dims);
        true
    }

    /// Current size, `None` until the first observation.
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.current
    }

    /// Forget the size, e.g. when the container is detached.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
