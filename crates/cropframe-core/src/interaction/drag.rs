//! Drag geometry in layout pixels.
//!
//! These functions only see pixel rectangles and a frame size. Converting to
//! and from the normalized crop is the caller's job.

use serde::{Deserialize, Serialize};

use crate::crop::{PixelRect, Point};

/// One of the four draggable corners, in hit-test order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    UpperLeft,
    UpperRight,
    LowerRight,
    LowerLeft,
}

impl Corner {
    /// Hit-test priority: the first corner that matches wins.
    pub const ALL: [Corner; 4] = [
        Corner::UpperLeft,
        Corner::UpperRight,
        Corner::LowerRight,
        Corner::LowerLeft,
    ];

    /// Position of this corner on `rect`.
    pub fn position(self, rect: &PixelRect) -> Point {
        match self {
            Corner::UpperLeft => Point::new(rect.left, rect.top),
            Corner::UpperRight => Point::new(rect.right, rect.top),
            Corner::LowerRight => Point::new(rect.right, rect.bottom),
            Corner::LowerLeft => Point::new(rect.left, rect.bottom),
        }
    }

    /// Unit direction pointing away from the rectangle at this corner.
    pub fn outward(self) -> Point {
        match self {
            Corner::UpperLeft => Point::new(-1.0, -1.0),
            Corner::UpperRight => Point::new(1.0, -1.0),
            Corner::LowerRight => Point::new(1.0, 1.0),
            Corner::LowerLeft => Point::new(-1.0, 1.0),
        }
    }

    fn is_left(self) -> bool {
        matches!(self, Corner::UpperLeft | Corner::LowerLeft)
    }

    fn is_upper(self) -> bool {
        matches!(self, Corner::UpperLeft | Corner::UpperRight)
    }
}

/// Bounds a corner drag must respect, all in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragLimits {
    /// Frame width.
    pub width: f64,
    /// Frame height.
    pub height: f64,
    /// Smallest allowed crop edge.
    pub minimum: f64,
    /// Largest allowed crop edge.
    pub maximum: f64,
    /// Width / height to restore after the edges move.
    pub aspect_ratio: Option<f64>,
}

/// Clamp `value` to `[min, max]`, or keep `current` when the range is empty.
#[inline]
fn clamp_or_keep(value: f64, min: f64, max: f64, current: f64) -> f64 {
    if min <= max {
        value.clamp(min, max)
    } else {
        current
    }
}

/// Translate `rect` so its top-left lands on `point`, staying inside the
/// `width × height` frame. The size never changes.
pub fn move_area(rect: PixelRect, point: Point, width: f64, height: f64) -> PixelRect {
    let w = rect.width();
    let h = rect.height();
    let left = point.x.clamp(0.0, (width - w).max(0.0));
    let top = point.y.clamp(0.0, (height - h).max(0.0));
    let dx = left - rect.left;
    let dy = top - rect.top;
    PixelRect::new(left, top, rect.right + dx, rect.bottom + dy)
}

/// Drag one corner of `rect` to `point`.
///
/// Only the two edges meeting at `corner` move; the opposite corner stays
/// anchored. Each edge is clamped so the crop stays inside the frame and
/// its size inside `[minimum, maximum]`. An edge whose clamp range is empty
/// keeps its previous value.
///
/// With an aspect ratio the longer side is then trimmed to match, still
/// anchored at the opposite corner. If that trim takes either edge under
/// `minimum`, both edges grow to the smallest size with the ratio and no edge
/// under `minimum`. When that size does not fit the frame the drag is
/// ignored and `rect` comes back unchanged. The ratio wins over `maximum`.
pub fn move_corner(rect: PixelRect, corner: Corner, point: Point, limits: &DragLimits) -> PixelRect {
    let PixelRect {
        mut left,
        mut top,
        mut right,
        mut bottom,
    } = rect;

    if corner.is_left() {
        let min_x = (right - limits.maximum).max(0.0);
        let max_x = right - limits.minimum;
        left = clamp_or_keep(point.x, min_x, max_x, left);
    } else {
        let min_x = left + limits.minimum;
        let max_x = (left + limits.maximum).min(limits.width);
        right = clamp_or_keep(point.x, min_x, max_x, right);
    }

    if corner.is_upper() {
        let min_y = (bottom - limits.maximum).max(0.0);
        let max_y = bottom - limits.minimum;
        top = clamp_or_keep(point.y, min_y, max_y, top);
    } else {
        let min_y = top + limits.minimum;
        let max_y = (top + limits.maximum).min(limits.height);
        bottom = clamp_or_keep(point.y, min_y, max_y, bottom);
    }

    if let Some(ratio) = limits.aspect_ratio {
        let mut w = right - left;
        let mut h = bottom - top;
        if w / h > ratio {
            w = h * ratio;
        } else {
            h = w / ratio;
        }

        // Trimming to the ratio can take an edge under the minimum.
        let grown = w < limits.minimum || h < limits.minimum;
        if w < limits.minimum {
            w = limits.minimum;
            h = w / ratio;
        }
        if h < limits.minimum {
            h = limits.minimum;
            w = h * ratio;
        }

        if corner.is_left() {
            left = right - w;
        } else {
            right = left + w;
        }
        if corner.is_upper() {
            top = bottom - h;
        } else {
            bottom = top + h;
        }

        if grown && (left < 0.0 || top < 0.0 || right > limits.width || bottom > limits.height) {
            return rect;
        }
    }

    PixelRect::new(left, top, right, bottom)
}
