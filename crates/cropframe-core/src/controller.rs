//! Crop session state and the controller that owns it.
//!
//! Every mutation builds a new [`CropState`], swaps it in, and then calls
//! each registered listener synchronously with the new state. Listeners get
//! a shared reference only, so they cannot mutate the controller from inside
//! a notification.

use std::fmt;
use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::config::{validate_aspect_ratio, CropOptions, SizeConstraints};
use crate::crop::{
    adjust_to_aspect_ratio, fit_centered, rotate_rect_left, rotate_rect_right, CropRect, PixelRect,
};
use crate::error::{CropError, Result};
use crate::extract::{ExtractJob, ExtractOptions};
use crate::orientation::{FlipMode, Rotation};

/// Snapshot of everything a crop session knows, except the pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropState {
    pub crop: CropRect,
    pub aspect_ratio: Option<f64>,
    pub rotation: Rotation,
    pub flip: FlipMode,
    pub constraints: SizeConstraints,
}

impl CropState {
    pub fn needs_corner_handles(&self) -> bool {
        self.constraints.needs_corner_handles()
    }

    /// What the presentation layer needs to paint the overlay.
    pub fn view(&self) -> CropView {
        CropView {
            crop: self.crop,
            rotation: self.rotation,
            flip: self.flip,
            needs_corner_handles: self.needs_corner_handles(),
        }
    }
}

/// Paint-time view of the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropView {
    pub crop: CropRect,
    pub rotation: Rotation,
    pub flip: FlipMode,
    pub needs_corner_handles: bool,
}

/// Handle returned by [`Controller::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&CropState)>;

/// Mutable crop session: current crop, ratio, orientation, and bound image.
pub struct Controller {
    state: CropState,
    image: Option<Arc<Bitmap>>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field(
                "image",
                &self.image.as_ref().map(|img| (img.width, img.height)),
            )
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Controller {
    /// Start a session.
    ///
    /// # Errors
    ///
    /// Fails on a non-positive aspect ratio, an initial crop outside [0, 1]
    /// or without area, or inverted size constraints.
    pub fn new(options: CropOptions) -> Result<Self> {
        options.validate()?;
        log::debug!(
            "Crop session created: ratio {:?}, rotation {}°, flip {:?}",
            options.aspect_ratio,
            options.rotation.degrees(),
            options.flip
        );
        Ok(Self {
            state: CropState {
                crop: options.crop,
                aspect_ratio: options.aspect_ratio,
                rotation: options.rotation,
                flip: options.flip,
                constraints: options.constraints,
            },
            image: None,
            listeners: Vec::new(),
            next_listener: 0,
        })
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    pub fn view(&self) -> CropView {
        self.state.view()
    }

    /// Register a callback fired after every mutation.
    pub fn add_listener(&mut self, listener: impl FnMut(&CropState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was already removed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, state: CropState) {
        self.state = state;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }

    // ========================================================================
    // Image binding
    // ========================================================================

    /// Bind a freshly decoded bitmap and re-fit the crop to the ratio, which
    /// depends on the pixel dimensions.
    pub fn bind_image(&mut self, image: impl Into<Arc<Bitmap>>) {
        let image = image.into();
        log::debug!("Bound {}x{} image", image.width, image.height);
        self.image = Some(image);

        let mut state = self.state;
        state.crop = self.fit(state.crop, state.aspect_ratio, state.rotation);
        self.commit(state);
    }

    pub fn image(&self) -> Option<&Arc<Bitmap>> {
        self.image.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.image.as_ref().is_some_and(|img| !img.is_empty())
    }

    fn ready_image(&self) -> Result<&Arc<Bitmap>> {
        self.image
            .as_ref()
            .filter(|img| !img.is_empty())
            .ok_or(CropError::ImageNotReady)
    }

    /// Displayed frame size in pixels, swapped under sideways rotations.
    pub fn displayed_size(&self) -> Result<(f64, f64)> {
        let image = self.ready_image()?;
        Ok(self
            .state
            .rotation
            .displayed_size(image.width as f64, image.height as f64))
    }

    /// Re-fit `crop` to `ratio` for `rotation`. Without an image there are no
    /// pixel dimensions to fit against, so the crop is returned as is.
    fn fit(&self, crop: CropRect, ratio: Option<f64>, rotation: Rotation) -> CropRect {
        match &self.image {
            Some(image) if !image.is_empty() => {
                let (w, h) = rotation.displayed_size(image.width as f64, image.height as f64);
                adjust_to_aspect_ratio(crop, ratio, w, h)
            }
            _ => crop,
        }
    }

    // ========================================================================
    // Aspect ratio
    // ========================================================================

    pub fn aspect_ratio(&self) -> Option<f64> {
        self.state.aspect_ratio
    }

    /// Set or clear the ratio. Setting re-fits the current crop at once;
    /// clearing leaves it alone.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: Option<f64>) -> Result<()> {
        if let Some(ratio) = aspect_ratio {
            validate_aspect_ratio(ratio)?;
        }
        let mut state = self.state;
        state.aspect_ratio = aspect_ratio;
        state.crop = self.fit(state.crop, aspect_ratio, state.rotation);
        self.commit(state);
        Ok(())
    }

    // ========================================================================
    // Crop
    // ========================================================================

    pub fn crop(&self) -> CropRect {
        self.state.crop
    }

    pub fn set_crop(&mut self, crop: CropRect) -> Result<()> {
        crop.validate()?;
        let mut state = self.state;
        state.crop = self.fit(crop, state.aspect_ratio, state.rotation);
        self.commit(state);
        Ok(())
    }

    /// Crop in displayed-frame bitmap pixels.
    pub fn crop_size(&self) -> Result<PixelRect> {
        let (w, h) = self.displayed_size()?;
        Ok(self.state.crop.to_pixels(w, h))
    }

    pub fn set_crop_size(&mut self, rect: PixelRect) -> Result<()> {
        let (w, h) = self.displayed_size()?;
        self.set_crop(CropRect::from_pixels(rect, w, h))
    }

    /// Commit a crop computed by a drag. Rounding noise at the frame edges is
    /// clamped away; a rectangle that still has no area is dropped in favor
    /// of the current crop.
    pub(crate) fn apply_drag(&mut self, crop: CropRect) -> CropRect {
        let clamped = CropRect {
            left: crop.left.clamp(0.0, 1.0),
            top: crop.top.clamp(0.0, 1.0),
            right: crop.right.clamp(0.0, 1.0),
            bottom: crop.bottom.clamp(0.0, 1.0),
        };
        let mut state = self.state;
        if clamped.validate().is_ok() {
            state.crop = self.fit(clamped, state.aspect_ratio, state.rotation);
        }
        self.commit(state);
        self.state.crop
    }

    // ========================================================================
    // Rotation and flip
    // ========================================================================

    pub fn rotation(&self) -> Rotation {
        self.state.rotation
    }

    /// Jump straight to `rotation`. The crop keeps its normalized position
    /// and is only re-fit to the ratio for the new frame shape.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        let mut state = self.state;
        state.rotation = rotation;
        state.crop = self.fit(state.crop, state.aspect_ratio, rotation);
        self.commit(state);
    }

    pub fn rotate_left(&mut self) {
        self.turn(self.state.rotation.rotate_left(), rotate_rect_left(self.state.crop));
    }

    pub fn rotate_right(&mut self) {
        self.turn(self.state.rotation.rotate_right(), rotate_rect_right(self.state.crop));
    }

    /// A quarter turn carries the crop along with the frame. With a ratio set
    /// the crop is replaced by the largest centered fit instead.
    fn turn(&mut self, rotation: Rotation, turned: CropRect) {
        let mut state = self.state;
        state.rotation = rotation;
        state.crop = match (state.aspect_ratio, self.ready_image()) {
            (Some(ratio), Ok(image)) => {
                let (w, h) = rotation.displayed_size(image.width as f64, image.height as f64);
                fit_centered(ratio, w, h)
            }
            _ => turned,
        };
        log::debug!("Rotated to {}°", rotation.degrees());
        self.commit(state);
    }

    pub fn flip(&self) -> FlipMode {
        self.state.flip
    }

    pub fn set_flip(&mut self, flip: FlipMode) {
        let mut state = self.state;
        state.flip = flip;
        self.commit(state);
    }

    pub fn flip_horizontal(&mut self) {
        self.set_flip(self.state.flip.toggle_horizontal());
    }

    pub fn flip_vertical(&mut self) {
        self.set_flip(self.state.flip.toggle_vertical());
    }

    pub fn constraints(&self) -> SizeConstraints {
        self.state.constraints
    }

    // ========================================================================
    // Extraction
    // ========================================================================

    /// Snapshot the current session into a job that can run anywhere.
    pub fn extract_job(&self, options: ExtractOptions) -> Result<ExtractJob> {
        let image = self.ready_image()?;
        ExtractJob::new(
            Arc::clone(image),
            self.state.crop,
            self.state.rotation,
            self.state.flip,
            options,
        )
    }

    /// Extract the current crop on the calling thread.
    pub fn extract(&self, options: ExtractOptions) -> Result<Bitmap> {
        self.extract_job(options)?.run()
    }

    /// Like [`Controller::extract`], returned as an `image::RgbaImage`.
    pub fn extract_image(&self, options: ExtractOptions) -> Result<image::RgbaImage> {
        self.extract(options)?.to_rgba_image()
    }

    /// Extract on a blocking worker. The session is snapshotted now, so later
    /// edits do not affect the result.
    #[cfg(feature = "async")]
    pub fn extract_async(
        &self,
        options: ExtractOptions,
    ) -> impl std::future::Future<Output = Result<Bitmap>> + Send + 'static {
        let job = self.extract_job(options);
        async move { job?.spawn().await }
    }

    /// End the session, releasing the bitmap and every listener.
    pub fn dispose(self) {
        log::debug!("Crop session disposed");
    }
}
