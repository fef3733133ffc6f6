//! Cropframe Core - crop selection engine
//!
//! This crate provides the geometry, interaction, and extraction logic behind
//! an interactive crop editor: a normalized crop rectangle over a decoded
//! bitmap, aspect ratio and size constraints, quarter-turn rotation and axis
//! flips, pointer-driven corner and move drags, and pixel-accurate extraction
//! of the selected region.
//!
//! Painting the selection, decoding images, and writing results to disk are
//! left to the host.
//!
//! ```ignore
//! use cropframe_core::{Bitmap, Controller, CropOptions, ExtractOptions};
//!
//! let mut controller = Controller::new(CropOptions::default().with_aspect_ratio(1.0))?;
//! controller.bind_image(Bitmap::filled(400, 200, [0, 0, 0, 255]));
//! controller.rotate_right();
//! let cropped = controller.extract(ExtractOptions::default())?;
//! ```

pub mod bitmap;
pub mod config;
pub mod controller;
pub mod crop;
pub mod error;
pub mod extract;
pub mod interaction;
pub mod orientation;

pub use bitmap::{Bitmap, FilterType};
pub use config::{CropOptions, InteractionConfig, SizeConstraints};
pub use controller::{Controller, CropState, CropView, ListenerId};
pub use crop::{CropRect, PixelRect, Point};
pub use error::{CropError, Result};
pub use extract::{extract, ExtractJob, ExtractOptions, ExtractStrategy};
pub use interaction::{CropInteraction, Handle, InteractionState, Viewport};
pub use orientation::{map_display_to_source, map_source_to_display, FlipMode, Rotation};

#[cfg(test)]
mod tests {
    use super::*;

    /// A full session: bind, constrain, drag, rotate, extract.
    #[test]
    fn test_session_round_trip() {
        let mut controller = Controller::new(CropOptions::default()).unwrap();
        controller.bind_image(Bitmap::filled(400, 200, [7, 8, 9, 255]));

        controller.set_aspect_ratio(Some(1.0)).unwrap();
        assert_eq!(controller.crop_size().unwrap(), PixelRect::new(100.0, 0.0, 300.0, 200.0));

        let mut interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 200.0);
        assert_eq!(
            interaction.pointer_down(&controller, Point::new(200.0, 100.0), &viewport),
            Some(Handle::Move)
        );
        interaction
            .pointer_move(&mut controller, Point::new(300.0, 100.0), &viewport)
            .unwrap();
        interaction.pointer_up();
        assert_eq!(controller.crop_size().unwrap(), PixelRect::new(200.0, 0.0, 400.0, 200.0));

        controller.rotate_right();
        assert_eq!(controller.displayed_size().unwrap(), (200.0, 400.0));

        let out = controller.extract(ExtractOptions::default()).unwrap();
        assert_eq!((out.width, out.height), (200, 200));
        assert_eq!(out.pixel(0, 0), [7, 8, 9, 255]);
    }
}
