//! Normalized and pixel-space rectangles.

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};

/// A 2D point. Units depend on context (normalized or pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Crop region as fractions (0.0 to 1.0) of the displayed frame.
///
/// Under a sideways rotation the displayed frame is the source bitmap with
/// width and height swapped, so `right - left` is a fraction of the source
/// height in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl CropRect {
    /// The whole frame.
    pub const FULL: CropRect = CropRect {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    /// Create a rectangle, rejecting coordinates outside [0, 1] and
    /// rectangles without area.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        let rect = Self {
            left,
            top,
            right,
            bottom,
        };
        rect.validate()?;
        Ok(rect)
    }

    /// Build from a center and a size without validating the result.
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            right: center.x + width / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    /// Check the rectangle invariants.
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        let valid = in_range(self.left)
            && in_range(self.top)
            && in_range(self.right)
            && in_range(self.bottom)
            && self.left < self.right
            && self.top < self.bottom;
        if valid {
            Ok(())
        } else {
            Err(CropError::InvalidCropRect {
                left: self.left,
                top: self.top,
                right: self.right,
                bottom: self.bottom,
            })
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Scale into a pixel frame of the given size.
    pub fn to_pixels(&self, width: f64, height: f64) -> PixelRect {
        PixelRect {
            left: self.left * width,
            top: self.top * height,
            right: self.right * width,
            bottom: self.bottom * height,
        }
    }

    /// Inverse of [`CropRect::to_pixels`]. The result is not validated.
    pub fn from_pixels(rect: PixelRect, width: f64, height: f64) -> Self {
        Self {
            left: rect.left / width,
            top: rect.top / height,
            right: rect.right / width,
            bottom: rect.bottom / height,
        }
    }

    /// True if `other` lies inside this rectangle, within `tolerance`.
    pub fn contains_rect(&self, other: &CropRect, tolerance: f64) -> bool {
        other.left >= self.left - tolerance
            && other.top >= self.top - tolerance
            && other.right <= self.right + tolerance
            && other.bottom <= self.bottom + tolerance
    }
}

/// A rectangle in pixel space (layout or bitmap pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}
