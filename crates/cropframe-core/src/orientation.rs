//! Quarter-turn rotations, axis flips, and the coordinate maps between the
//! displayed frame and the source bitmap.
//!
//! # Coordinate System
//!
//! The displayed frame is produced from the source bitmap as
//! `display = rotate(flip(source))`: the flip reflects in source axes, then
//! the result is turned clockwise by the rotation. Display coordinates are
//! normalized (0.0 to 1.0), source coordinates are in pixels, and the origin
//! is the top-left corner in both.
//!
//! ```text
//!     Deg0       Deg90      Deg180     Deg270
//!     ┌─────┐    ┌─────┐    ┌─────┐    ┌─────┐
//!     │ A B │    │ C A │    │ D C │    │ B D │
//!     │ C D │    │ D B │    │ B A │    │ A C │
//!     └─────┘    └─────┘    └─────┘    └─────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::crop::Point;

/// Clockwise rotation of the displayed image in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// Upright.
    #[default]
    Deg0,
    /// A quarter turn clockwise.
    Deg90,
    /// Upside down.
    Deg180,
    /// A quarter turn counter-clockwise.
    Deg270,
}

impl Rotation {
    /// All four rotations in clockwise order.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Build a rotation from a multiple of 90 degrees (any sign, any number
    /// of full turns). Returns `None` for other angles.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(Self::from_quarter_turns(degrees / 90))
    }

    fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    /// Number of clockwise quarter turns (0-3).
    pub fn quarter_turns(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    pub fn degrees(self) -> i32 {
        self.quarter_turns() * 90
    }

    pub fn radians(self) -> f64 {
        (self.degrees() as f64).to_radians()
    }

    /// True for 90° and 270°, where displayed width and height are the
    /// source height and width.
    #[inline]
    pub fn is_sideways(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Turn a quarter counter-clockwise.
    pub fn rotate_left(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() - 1)
    }

    /// Turn a quarter clockwise.
    pub fn rotate_right(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 1)
    }

    /// Dimensions of the displayed frame for a source of `width × height`.
    pub fn displayed_size(self, width: f64, height: f64) -> (f64, f64) {
        if self.is_sideways() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

/// Reflection of the source image about its vertical and/or horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlipMode {
    #[default]
    None,
    /// Mirror left-right.
    Horizontal,
    /// Mirror top-bottom.
    Vertical,
    /// Both mirrors, equivalent to a half turn.
    Both,
}

impl FlipMode {
    pub fn from_axes(horizontal: bool, vertical: bool) -> Self {
        match (horizontal, vertical) {
            (false, false) => FlipMode::None,
            (true, false) => FlipMode::Horizontal,
            (false, true) => FlipMode::Vertical,
            (true, true) => FlipMode::Both,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, FlipMode::Horizontal | FlipMode::Both)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, FlipMode::Vertical | FlipMode::Both)
    }

    /// XOR the horizontal axis.
    pub fn toggle_horizontal(self) -> Self {
        Self::from_axes(!self.is_horizontal(), self.is_vertical())
    }

    /// XOR the vertical axis.
    pub fn toggle_vertical(self) -> Self {
        Self::from_axes(self.is_horizontal(), !self.is_vertical())
    }
}

/// Map a normalized display point back into source pixel coordinates.
///
/// This inverts the rotation first, then the flip, both against the source
/// dimensions. [`map_source_to_display`] is its exact inverse.
pub fn map_display_to_source(
    point: Point,
    rotation: Rotation,
    flip: FlipMode,
    source_width: f64,
    source_height: f64,
) -> Point {
    let (u, v) = match rotation {
        Rotation::Deg0 => (point.x, point.y),
        Rotation::Deg90 => (point.y, 1.0 - point.x),
        Rotation::Deg180 => (1.0 - point.x, 1.0 - point.y),
        Rotation::Deg270 => (1.0 - point.y, point.x),
    };

    let mut x = source_width * u;
    let mut y = source_height * v;
    if flip.is_horizontal() {
        x = source_width - x;
    }
    if flip.is_vertical() {
        y = source_height - y;
    }
    Point::new(x, y)
}

/// Map a source pixel coordinate to its normalized display position.
pub fn map_source_to_display(
    pixel: Point,
    rotation: Rotation,
    flip: FlipMode,
    source_width: f64,
    source_height: f64,
) -> Point {
    let mut x = pixel.x;
    let mut y = pixel.y;
    if flip.is_horizontal() {
        x = source_width - x;
    }
    if flip.is_vertical() {
        y = source_height - y;
    }
    let u = x / source_width;
    let v = y / source_height;

    match rotation {
        Rotation::Deg0 => Point::new(u, v),
        Rotation::Deg90 => Point::new(1.0 - v, u),
        Rotation::Deg180 => Point::new(1.0 - u, 1.0 - v),
        Rotation::Deg270 => Point::new(v, 1.0 - u),
    }
}
