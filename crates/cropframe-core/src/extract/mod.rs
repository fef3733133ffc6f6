//! Extraction of the selected region into a new bitmap.
//!
//! The output is the crop exactly as displayed: rotated, flipped, and
//! optionally downscaled so neither edge exceeds `max_size`.
//!
//! # Strategies
//!
//! - **Resample**: inverse-maps every output pixel through rotation and flip
//!   and samples the source (nearest, bilinear, or Lanczos3).
//! - **Compose**: crops the source region, then flips, rotates, and resizes
//!   it with `image::imageops` primitives. Prefer it for strong downscales.
//!
//! Both give identical pixels for pixel-aligned crops at full size.

mod compose;
mod resample;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, FilterType};
use crate::crop::CropRect;
use crate::error::{CropError, Result};
use crate::orientation::{FlipMode, Rotation};

pub use compose::compose;
pub use resample::resample;

/// How the output pixels are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtractStrategy {
    #[default]
    Resample,
    Compose,
}

/// Output parameters for an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Longest allowed output edge in pixels; larger crops are scaled down.
    #[serde(default)]
    pub max_size: Option<f64>,

    /// Sampling filter. Under `Resample`, bilinear and Lanczos3 read a fixed
    /// neighborhood at source scale and alias when `max_size` shrinks the
    /// crop a lot; `Compose` widens its filter with the scale instead.
    #[serde(default)]
    pub quality: FilterType,

    #[serde(default)]
    pub strategy: ExtractStrategy,
}

impl ExtractOptions {
    pub fn with_max_size(mut self, max_size: f64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_quality(mut self, quality: FilterType) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_strategy(mut self, strategy: ExtractStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Callback that draws over the finished output before it is returned.
pub type OverlayHook = Box<dyn FnOnce(&mut Bitmap) + Send + 'static>;

/// Size of the crop in source pixels, measured in the displayed orientation.
pub fn footprint(crop: &CropRect, rotation: Rotation, width: u32, height: u32) -> (f64, f64) {
    let (w, h) = rotation.displayed_size(width as f64, height as f64);
    (crop.width() * w, crop.height() * h)
}

/// Uniform downscale factor (at most 1) that fits the footprint in `max_size`.
pub fn scale_factor(footprint_width: f64, footprint_height: f64, max_size: Option<f64>) -> f64 {
    match max_size {
        Some(max) if footprint_width > max || footprint_height > max => {
            max / footprint_width.max(footprint_height)
        }
        _ => 1.0,
    }
}

/// Final output dimensions, never smaller than 1x1.
pub fn output_size(footprint_width: f64, footprint_height: f64, factor: f64) -> (u32, u32) {
    let w = (footprint_width * factor).round() as u32;
    let h = (footprint_height * factor).round() as u32;
    if w == 0 || h == 0 {
        log::warn!(
            "Crop footprint {:.2}x{:.2} rounds to zero, using 1px",
            footprint_width * factor,
            footprint_height * factor
        );
    }
    (w.max(1), h.max(1))
}

/// A snapshot of everything needed to produce one output bitmap.
pub struct ExtractJob {
    source: Arc<Bitmap>,
    crop: CropRect,
    rotation: Rotation,
    flip: FlipMode,
    options: ExtractOptions,
    overlay: Option<OverlayHook>,
}

impl fmt::Debug for ExtractJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractJob")
            .field("source", &(self.source.width, self.source.height))
            .field("crop", &self.crop)
            .field("rotation", &self.rotation)
            .field("flip", &self.flip)
            .field("options", &self.options)
            .field("overlay", &self.overlay.is_some())
            .finish()
    }
}

/// Reject inputs no extraction can satisfy.
fn check(source: &Bitmap, crop: &CropRect, options: &ExtractOptions) -> Result<()> {
    if source.is_empty() {
        return Err(CropError::ImageNotReady);
    }
    crop.validate()?;
    match options.max_size {
        Some(max) if !(max.is_finite() && max > 0.0) => Err(CropError::InvalidMaxSize(max)),
        _ => Ok(()),
    }
}

/// Produce the output bitmap for already checked inputs.
fn render(
    source: &Bitmap,
    crop: &CropRect,
    rotation: Rotation,
    flip: FlipMode,
    options: &ExtractOptions,
) -> Result<Bitmap> {
    let (fw, fh) = footprint(crop, rotation, source.width, source.height);
    let size = output_size(fw, fh, scale_factor(fw, fh, options.max_size));
    log::debug!(
        "Extracting {}x{} from {}x{} source ({}°, {:?}, {:?})",
        size.0,
        size.1,
        source.width,
        source.height,
        rotation.degrees(),
        flip,
        options.strategy
    );

    let output = match options.strategy {
        ExtractStrategy::Resample => resample(source, crop, rotation, flip, size, options.quality)?,
        ExtractStrategy::Compose => compose(source, crop, rotation, flip, size, options.quality)?,
    };
    log::debug!("Extracted {}x{}", output.width, output.height);
    Ok(output)
}

impl ExtractJob {
    /// # Errors
    ///
    /// `ImageNotReady` for an empty source, `InvalidCropRect` for a bad crop,
    /// and `InvalidMaxSize` for a `max_size` that is not a positive number.
    pub fn new(
        source: Arc<Bitmap>,
        crop: CropRect,
        rotation: Rotation,
        flip: FlipMode,
        options: ExtractOptions,
    ) -> Result<Self> {
        check(&source, &crop, &options)?;
        Ok(Self {
            source,
            crop,
            rotation,
            flip,
            options,
            overlay: None,
        })
    }

    /// Draw over the output before it is returned.
    pub fn with_overlay(mut self, hook: impl FnOnce(&mut Bitmap) + Send + 'static) -> Self {
        self.overlay = Some(Box::new(hook));
        self
    }

    pub fn footprint(&self) -> (f64, f64) {
        footprint(&self.crop, self.rotation, self.source.width, self.source.height)
    }

    pub fn output_size(&self) -> (u32, u32) {
        let (fw, fh) = self.footprint();
        output_size(fw, fh, scale_factor(fw, fh, self.options.max_size))
    }

    /// Produce the output on the calling thread.
    pub fn run(self) -> Result<Bitmap> {
        let mut output = render(
            &self.source,
            &self.crop,
            self.rotation,
            self.flip,
            &self.options,
        )?;
        if let Some(hook) = self.overlay {
            hook(&mut output);
        }
        Ok(output)
    }

    /// Produce the output on tokio's blocking pool.
    #[cfg(feature = "async")]
    pub async fn spawn(self) -> Result<Bitmap> {
        tokio::task::spawn_blocking(move || self.run())
            .await
            .map_err(|e| CropError::Render(format!("Extraction task failed: {}", e)))?
    }
}

/// One-shot extraction from a borrowed bitmap.
pub fn extract(
    source: &Bitmap,
    crop: &CropRect,
    rotation: Rotation,
    flip: FlipMode,
    options: ExtractOptions,
) -> Result<Bitmap> {
    check(source, crop, &options)?;
    render(source, crop, rotation, flip, &options)
}
