//! Aspect-ratio fitting and quarter-turn transforms of a crop rectangle.
//!
//! Ratios are measured in displayed pixels, so every function here takes the
//! displayed frame size (already swapped for sideways rotations).

use super::rect::{CropRect, Point};

/// Shrink `rect` until its displayed pixel ratio equals `aspect_ratio`.
///
/// The rectangle never grows. The shrunk axis keeps its center and the other
/// axis is untouched. `None` returns the rectangle unchanged.
pub fn adjust_to_aspect_ratio(
    rect: CropRect,
    aspect_ratio: Option<f64>,
    displayed_width: f64,
    displayed_height: f64,
) -> CropRect {
    let Some(ratio) = aspect_ratio else {
        return rect;
    };

    let width = rect.width() * displayed_width;
    let height = rect.height() * displayed_height;

    if width / height > ratio {
        let w = height * ratio / displayed_width;
        let cx = rect.center().x;
        CropRect {
            left: cx - w / 2.0,
            right: cx + w / 2.0,
            ..rect
        }
    } else {
        let h = width / ratio / displayed_height;
        let cy = rect.center().y;
        CropRect {
            top: cy - h / 2.0,
            bottom: cy + h / 2.0,
            ..rect
        }
    }
}

/// The largest rectangle with the given ratio, centered in the frame.
///
/// Used right after a quarter turn, when the previous rectangle's center no
/// longer anchors anything meaningful.
pub fn fit_centered(aspect_ratio: f64, displayed_width: f64, displayed_height: f64) -> CropRect {
    let center = Point::new(0.5, 0.5);
    if displayed_width / displayed_height > aspect_ratio {
        let w = displayed_height * aspect_ratio / displayed_width;
        CropRect::from_center(center, w, 1.0)
    } else {
        let h = displayed_width / aspect_ratio / displayed_height;
        CropRect::from_center(center, 1.0, h)
    }
}

/// Move the rectangle along with a counter-clockwise quarter turn of the frame.
pub fn rotate_rect_left(rect: CropRect) -> CropRect {
    let c = rect.center();
    CropRect::from_center(Point::new(c.y, 1.0 - c.x), rect.height(), rect.width())
}

/// Move the rectangle along with a clockwise quarter turn of the frame.
pub fn rotate_rect_right(rect: CropRect) -> CropRect {
    let c = rect.center();
    CropRect::from_center(Point::new(1.0 - c.y, c.x), rect.height(), rect.width())
}
