//! WASM-compatible wrapper types for bitmaps.

use cropframe_core::{Bitmap, CropError, FilterType};
use wasm_bindgen::prelude::*;

/// An RGBA bitmap handed across the JavaScript boundary.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it out as a
/// `Uint8Array`, which is ready for `new ImageData(...)` on the JS side.
#[wasm_bindgen]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Wrap RGBA pixel data (4 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsBitmap {
        JsBitmap {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer releases it as well.
    pub fn free(self) {}
}

impl JsBitmap {
    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            width: bitmap.width,
            height: bitmap.height,
            pixels: bitmap.into_pixels(),
        }
    }

    /// Convert back to a core Bitmap, checking the buffer length.
    pub(crate) fn to_bitmap(&self) -> Result<Bitmap, CropError> {
        Bitmap::new(self.width, self.height, self.pixels.clone())
    }
}

/// Convert a u8 quality value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (pixel-exact, fastest)
/// - 1 = Bilinear
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}
