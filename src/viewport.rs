//! Pan/zoom transform for the image stage.

use crate::config::{ZOOM_INITIAL, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use std::rc::Rc;
use yew::Reducible;

/// Scale and translation applied to the stage content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanZoom {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for PanZoom {
    fn default() -> Self {
        Self::identity()
    }
}

impl PanZoom {
    pub fn identity() -> Self {
        Self {
            scale: ZOOM_INITIAL,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    /// Zoom by `factor` keeping the content point under the cursor fixed.
    ///
    /// `cursor_x`/`cursor_y` are relative to the wrapper's top-left corner.
    /// The resulting scale is clamped to the configured zoom limits.
    pub fn zoom_at(&self, factor: f64, cursor_x: f64, cursor_y: f64) -> PanZoom {
        let scale = (self.scale * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        // Content-space point under the cursor before zooming
        let content_x = (cursor_x - self.pan_x) / self.scale;
        let content_y = (cursor_y - self.pan_y) / self.scale;
        PanZoom {
            scale,
            pan_x: cursor_x - content_x * scale,
            pan_y: cursor_y - content_y * scale,
        }
    }

    /// One wheel notch: negative `delta_y` zooms in, positive zooms out.
    pub fn wheel(&self, delta_y: f64, cursor_x: f64, cursor_y: f64) -> PanZoom {
        if delta_y < 0.0 {
            self.zoom_at(ZOOM_STEP, cursor_x, cursor_y)
        } else if delta_y > 0.0 {
            self.zoom_at(1.0 / ZOOM_STEP, cursor_x, cursor_y)
        } else {
            *self
        }
    }

    pub fn pan_by(&self, dx: f64, dy: f64) -> PanZoom {
        PanZoom {
            scale: self.scale,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }

    /// CSS `transform` for the content element (origin at top-left).
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.pan_x, self.pan_y, self.scale
        )
    }
}

/// Pointer input for the stage. Applied through `use_reducer` so bursts of
/// mouse events always build on the latest transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanZoomAction {
    Wheel { delta_y: f64, cursor_x: f64, cursor_y: f64 },
    Pan { dx: f64, dy: f64 },
    Reset,
}

impl Reducible for PanZoom {
    type Action = PanZoomAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            PanZoomAction::Wheel {
                delta_y,
                cursor_x,
                cursor_y,
            } => self.wheel(delta_y, cursor_x, cursor_y),
            PanZoomAction::Pan { dx, dy } => self.pan_by(dx, dy),
            PanZoomAction::Reset => PanZoom::identity(),
        };
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}
