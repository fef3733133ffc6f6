//! Extraction by composing `image::imageops` primitives.
//!
//! The source region under the crop is cut out, then flipped and rotated as
//! whole buffers. A final resize only runs when the output is smaller than
//! the region.

use image::{imageops, RgbaImage};

use crate::bitmap::{Bitmap, FilterType};
use crate::crop::{CropRect, Point};
use crate::error::{CropError, Result};
use crate::orientation::{map_display_to_source, FlipMode, Rotation};

/// Integer source region `(x, y, width, height)` covered by `crop`.
fn source_region(
    crop: &CropRect,
    rotation: Rotation,
    flip: FlipMode,
    width: u32,
    height: u32,
) -> (u32, u32, u32, u32) {
    let (w, h) = (width as f64, height as f64);
    let a = map_display_to_source(Point::new(crop.left, crop.top), rotation, flip, w, h);
    let b = map_display_to_source(Point::new(crop.right, crop.bottom), rotation, flip, w, h);

    let x0 = (a.x.min(b.x).round() as u32).min(width - 1);
    let y0 = (a.y.min(b.y).round() as u32).min(height - 1);
    let x1 = (a.x.max(b.x).round() as u32).clamp(x0 + 1, width);
    let y1 = (a.y.max(b.y).round() as u32).clamp(y0 + 1, height);
    (x0, y0, x1 - x0, y1 - y0)
}

/// Render `crop` of `source` into a `size.0 × size.1` bitmap.
///
/// Fails with `ImageNotReady` for an empty source.
pub fn compose(
    source: &Bitmap,
    crop: &CropRect,
    rotation: Rotation,
    flip: FlipMode,
    size: (u32, u32),
    filter: FilterType,
) -> Result<Bitmap> {
    if source.is_empty() {
        return Err(CropError::ImageNotReady);
    }
    let view = source.to_rgba_image()?;

    let (x, y, w, h) = source_region(crop, rotation, flip, source.width, source.height);
    let mut region: RgbaImage = imageops::crop_imm(&view, x, y, w, h).to_image();

    if flip.is_horizontal() {
        imageops::flip_horizontal_in_place(&mut region);
    }
    if flip.is_vertical() {
        imageops::flip_vertical_in_place(&mut region);
    }

    let oriented = match rotation {
        Rotation::Deg0 => region,
        Rotation::Deg90 => imageops::rotate90(&region),
        Rotation::Deg180 => {
            imageops::rotate180_in_place(&mut region);
            region
        }
        Rotation::Deg270 => imageops::rotate270(&region),
    };

    let output = if oriented.dimensions() == size {
        oriented
    } else {
        imageops::resize(&oriented, size.0, size.1, filter.to_image_filter())
    };

    Ok(Bitmap::from_rgba_image(output))
}
