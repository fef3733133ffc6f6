//! Session and interaction configuration.
//!
//! All structs deserialize with defaults for missing fields, so a host can
//! keep only the overrides it cares about in its own settings file.

use serde::{Deserialize, Serialize};

use crate::crop::CropRect;
use crate::error::{CropError, Result};
use crate::orientation::{FlipMode, Rotation};

/// Default minimum crop edge, in source pixels.
pub const DEFAULT_MINIMUM_SIZE: f64 = 100.0;

/// Default side length of a corner hit box, in layout pixels.
pub const DEFAULT_TOUCH_SIZE: f64 = 50.0;

fn default_minimum() -> f64 {
    DEFAULT_MINIMUM_SIZE
}

fn default_maximum() -> f64 {
    f64::INFINITY
}

fn default_touch_size() -> f64 {
    DEFAULT_TOUCH_SIZE
}

/// Minimum and maximum crop edge length in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeConstraints {
    #[serde(default = "default_minimum")]
    pub minimum: f64,

    #[serde(default = "default_maximum")]
    pub maximum: f64,
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self {
            minimum: DEFAULT_MINIMUM_SIZE,
            maximum: f64::INFINITY,
        }
    }
}

impl SizeConstraints {
    pub fn new(minimum: f64, maximum: f64) -> Result<Self> {
        let constraints = Self { minimum, maximum };
        constraints.validate()?;
        Ok(constraints)
    }

    pub fn validate(&self) -> Result<()> {
        // NaN fails every comparison, so it lands in the error branch too.
        if self.minimum >= 0.0 && self.maximum >= self.minimum {
            Ok(())
        } else {
            Err(CropError::InvalidSizeConstraints {
                minimum: self.minimum,
                maximum: self.maximum,
            })
        }
    }

    /// Equal bounds pin the crop size, leaving only the move gesture.
    pub fn needs_corner_handles(&self) -> bool {
        self.minimum != self.maximum
    }
}

/// Pointer hit-testing parameters, in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Side of the square hit box around each corner.
    #[serde(default = "default_touch_size")]
    pub touch_size: f64,

    /// Distance the corner hit boxes are pushed outward from the corners.
    #[serde(default)]
    pub handle_offset: f64,

    /// Treat every pointer-down that misses a corner as a move, even outside
    /// the crop rectangle.
    #[serde(default)]
    pub always_move: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            touch_size: DEFAULT_TOUCH_SIZE,
            handle_offset: 0.0,
            always_move: false,
        }
    }
}

/// Initial state of a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropOptions {
    /// Width / height of the displayed crop; `None` means free selection.
    #[serde(default)]
    pub aspect_ratio: Option<f64>,

    #[serde(default)]
    pub crop: CropRect,

    #[serde(default)]
    pub rotation: Rotation,

    #[serde(default)]
    pub flip: FlipMode,

    #[serde(default)]
    pub constraints: SizeConstraints,
}

impl CropOptions {
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    pub fn with_crop(mut self, crop: CropRect) -> Self {
        self.crop = crop;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_flip(mut self, flip: FlipMode) -> Self {
        self.flip = flip;
        self
    }

    pub fn with_constraints(mut self, constraints: SizeConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Check every construction precondition.
    pub fn validate(&self) -> Result<()> {
        if let Some(ratio) = self.aspect_ratio {
            validate_aspect_ratio(ratio)?;
        }
        self.crop.validate()?;
        self.constraints.validate()
    }
}

/// Reject ratios that are zero, negative, or not finite.
pub fn validate_aspect_ratio(ratio: f64) -> Result<()> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(CropError::InvalidAspectRatio(ratio))
    }
}
