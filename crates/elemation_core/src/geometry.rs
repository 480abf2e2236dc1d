//! Trigger geometry
//!
//! All values are CSS pixels measured from the top of the document.

/// Layout box of an element, relative to the document origin
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    /// X position (offsetLeft)
    pub x: f32,
    /// Y position (offsetTop)
    pub y: f32,
    /// Rendered width (offsetWidth)
    pub width: f32,
    /// Rendered height (offsetHeight)
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds spanning `height` pixels down from `top`, with zero width
    pub fn vertical(top: f32, height: f32) -> Self {
        Self::new(0.0, top, 0.0, height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Vertical window in which the viewport midpoint fires the trigger
///
/// `top <= bottom` always holds; negative heights collapse to a zero-height
/// window at `top`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Endstops {
    top: f32,
    bottom: f32,
}

impl Endstops {
    /// Window starting at `top` and extending `height` pixels down
    pub fn from_span(top: f32, height: f32) -> Self {
        Self {
            top,
            bottom: top + height.max(0.0),
        }
    }

    /// Snapshot of an element's vertical extent
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self::from_span(bounds.y, bounds.height)
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Inclusive on both ends
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y <= self.bottom
    }
}

/// Document-space y coordinate at the vertical centre of the viewport
pub fn viewport_midpoint(scroll_y: f32, viewport_height: f32) -> f32 {
    scroll_y + viewport_height * 0.5
}
