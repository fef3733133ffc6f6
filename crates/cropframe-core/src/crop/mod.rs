//! Crop rectangle model.
//!
//! The crop is stored normalized (0.0 to 1.0) against the displayed frame,
//! which makes it independent of both the bitmap's pixel dimensions and the
//! size the presentation layer paints it at.

mod aspect;
mod rect;

pub use aspect::{adjust_to_aspect_ratio, fit_centered, rotate_rect_left, rotate_rect_right};
pub use rect::{CropRect, PixelRect, Point};
