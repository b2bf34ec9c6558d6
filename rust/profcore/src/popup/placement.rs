//! Popup positioning with viewport clamping
//!
//! All coordinates are CSS pixels relative to the viewport (what
//! `getBoundingClientRect` returns), so the popup uses `position: fixed`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Fixed popup box parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopupGeometry {
    pub width: f64,
    pub max_height: f64,
    pub margin: f64,
}

impl Default for PopupGeometry {
    fn default() -> Self {
        Self {
            width: 400.0,
            max_height: 600.0,
            margin: 10.0,
        }
    }
}

/// Top-left corner of the popup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
}

/// Place a popup of `height` (clamped to `max_height`) next to `anchor`.
///
/// Horizontal: left-align with the anchor, or right-align when that would run
/// past the right edge; never closer than `margin` to either edge.
/// Vertical: below the anchor, unless there is more room above and not enough
/// below for a full-height popup; then shifted up if the bottom would overflow.
pub fn place_popup(anchor: Rect, viewport: Viewport, geometry: PopupGeometry, height: f64) -> Placement {
    let PopupGeometry {
        width,
        max_height,
        margin,
    } = geometry;
    let height = height.min(max_height).max(0.0);

    let mut left = anchor.left;
    if left + width + margin > viewport.width {
        left = anchor.right - width;
    }
    left = left.min(viewport.width - width - margin).max(margin);

    let space_below = viewport.height - anchor.bottom;
    let space_above = anchor.top;
    let mut top = if space_above > space_below && space_below < max_height + margin {
        (anchor.top - height - margin).max(margin)
    } else {
        anchor.bottom + margin
    };
    if top + height > viewport.height - margin {
        top = viewport.height - margin - height;
    }
    top = top.max(margin);

    Placement { left, top }
}
