use serde::{Deserialize, Serialize};

/// Aspect ratio of the board image (1920x1080).
pub const IMAGE_ASPECT: f64 = 1920.0 / 1080.0;

/// A point in device (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Zero-area, negative or non-finite rectangles cannot host a layout.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// The same rectangle moved by `(dx, dy)`, e.g. from container-relative to
    /// client coordinates.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }
}

/// Coordinates in percent of the fitted box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percent {
    pub x: f64,
    pub y: f64,
}

/// Bounds applied to pointer percentages. Chosen per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClampPolicy {
    /// Notes stay fully inside the image: 0 to 100.
    #[default]
    Strict,
    /// Custom bounds, e.g. -10 to 110 to allow slight overshoot at the edges.
    Range { min: f64, max: f64 },
    /// No clamping at all.
    Unbounded,
}

impl ClampPolicy {
    /// The free-drag bounds used by boards that let notes hang off the edge.
    pub fn overshoot() -> Self {
        Self::Range {
            min: -10.0,
            max: 110.0,
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Strict => value.clamp(0.0, 100.0),
            Self::Range { min, max } => value.max(min).min(max),
            Self::Unbounded => value,
        }
    }
}

/// Largest box of `aspect` (width / height) that fits the container,
/// centered ("contain" fit).
///
/// Returns `None` for degenerate containers or aspect ratios; callers skip
/// layout in that case.
pub fn fit_box(container_width: f64, container_height: f64, aspect: f64) -> Option<BoxRect> {
    let container = BoxRect::new(0.0, 0.0, container_width, container_height);
    if container.is_degenerate() || !aspect.is_finite() || aspect <= 0.0 {
        return None;
    }

    let mut width = container_width;
    let mut height = width / aspect;
    if height > container_height {
        height = container_height;
        width = height * aspect;
    }

    Some(BoxRect {
        left: (container_width - width) / 2.0,
        top: (container_height - height) / 2.0,
        width,
        height,
    })
}

/// Map a pointer position to percent coordinates of `rect`, clamped by
/// `clamp`. `None` when `rect` is degenerate.
pub fn pointer_to_percent(pointer: Point, rect: &BoxRect, clamp: ClampPolicy) -> Option<Percent> {
    if rect.is_degenerate() {
        return None;
    }
    let x = (pointer.x - rect.left) / rect.width * 100.0;
    let y = (pointer.y - rect.top) / rect.height * 100.0;
    Some(Percent {
        x: clamp.apply(x),
        y: clamp.apply(y),
    })
}
