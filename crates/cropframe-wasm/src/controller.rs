//! WASM bindings for a crop session.
//!
//! `JsCropController` owns both the core controller and the pointer state
//! machine, so the page only forwards raw pointer events together with the
//! size of the element the image is painted into.

use crate::types::{filter_from_u8, JsBitmap};
use cropframe_core::{
    Bitmap, Controller, CropInteraction, CropOptions, CropRect, ExtractOptions, FlipMode,
    ListenerId, Point, Rotation, SizeConstraints, Viewport,
};
use wasm_bindgen::prelude::*;

fn rotation_from_degrees(degrees: i32) -> Result<Rotation, JsError> {
    Rotation::from_degrees(degrees)
        .ok_or_else(|| JsError::new(&format!("Rotation must be a multiple of 90, got {}", degrees)))
}

fn crop_from_slice(values: &[f64]) -> Result<CropRect, JsError> {
    match *values {
        [left, top, right, bottom] => Ok(CropRect::new(left, top, right, bottom)?),
        _ => Err(JsError::new("Crop must be [left, top, right, bottom]")),
    }
}

fn crop_to_vec(crop: &CropRect) -> Vec<f64> {
    vec![crop.left, crop.top, crop.right, crop.bottom]
}

fn viewport(width: f64, height: f64, padding: f64) -> Viewport {
    Viewport::new(width, height).with_padding(padding)
}

/// An interactive crop session for JavaScript.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const session = new JsCropController(16 / 9, undefined, 0, false, false, 100, undefined);
/// session.bind_image(image.width, image.height, rgba);
/// session.set_on_crop((crop: Float64Array) => redraw(crop));
///
/// canvas.onpointerdown = (e) => session.pointer_down(e.offsetX, e.offsetY, w, h, 16);
/// canvas.onpointermove = (e) => session.pointer_move(e.offsetX, e.offsetY, w, h, 16);
/// canvas.onpointerup = () => session.pointer_up();
///
/// const result = session.extract(2048, 2);
/// ```
#[wasm_bindgen]
pub struct JsCropController {
    controller: Controller,
    interaction: CropInteraction,
    on_crop: Option<ListenerId>,
}

#[wasm_bindgen]
impl JsCropController {
    /// Start a session.
    ///
    /// # Arguments
    ///
    /// * `aspect_ratio` - Width / height of the crop, or undefined for free selection
    /// * `crop` - Initial `[left, top, right, bottom]` in [0, 1], or undefined for the full frame
    /// * `rotation_degrees` - Initial rotation, a multiple of 90
    /// * `flip_horizontal` / `flip_vertical` - Initial mirroring
    /// * `min_size` / `max_size` - Crop edge limits in source pixels
    #[wasm_bindgen(constructor)]
    pub fn new(
        aspect_ratio: Option<f64>,
        crop: Option<Vec<f64>>,
        rotation_degrees: i32,
        flip_horizontal: bool,
        flip_vertical: bool,
        min_size: f64,
        max_size: Option<f64>,
    ) -> Result<JsCropController, JsError> {
        let options = CropOptions {
            aspect_ratio,
            crop: match crop {
                Some(values) => crop_from_slice(&values)?,
                None => CropRect::FULL,
            },
            rotation: rotation_from_degrees(rotation_degrees)?,
            flip: FlipMode::from_axes(flip_horizontal, flip_vertical),
            constraints: SizeConstraints::new(min_size, max_size.unwrap_or(f64::INFINITY))?,
        };
        Ok(JsCropController {
            controller: Controller::new(options)?,
            interaction: CropInteraction::default(),
            on_crop: None,
        })
    }

    /// Bind decoded RGBA pixels as the source image.
    pub fn bind_image(&mut self, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), JsError> {
        self.controller.bind_image(Bitmap::new(width, height, pixels)?);
        Ok(())
    }

    /// Bind an existing `JsBitmap` as the source image.
    pub fn bind_bitmap(&mut self, bitmap: &JsBitmap) -> Result<(), JsError> {
        self.controller.bind_image(bitmap.to_bitmap()?);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn is_ready(&self) -> bool {
        self.controller.is_ready()
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    /// Returns true when the pointer grabbed a corner or the crop itself.
    pub fn pointer_down(&mut self, x: f64, y: f64, width: f64, height: f64, padding: f64) -> bool {
        self.interaction
            .pointer_down(&self.controller, Point::new(x, y), &viewport(width, height, padding))
            .is_some()
    }

    /// Returns true when the move updated the crop.
    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        padding: f64,
    ) -> Result<bool, JsError> {
        let updated = self.interaction.pointer_move(
            &mut self.controller,
            Point::new(x, y),
            &viewport(width, height, padding),
        )?;
        Ok(updated.is_some())
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up();
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    // ========================================================================
    // State
    // ========================================================================

    /// Normalized `[left, top, right, bottom]` of the displayed frame.
    #[wasm_bindgen(getter)]
    pub fn crop(&self) -> Vec<f64> {
        crop_to_vec(&self.controller.crop())
    }

    pub fn set_crop(&mut self, crop: &[f64]) -> Result<(), JsError> {
        self.controller.set_crop(crop_from_slice(crop)?)?;
        Ok(())
    }

    /// The crop in displayed source pixels, `[left, top, right, bottom]`.
    pub fn crop_pixels(&self) -> Result<Vec<f64>, JsError> {
        let rect = self.controller.crop_size()?;
        Ok(vec![rect.left, rect.top, rect.right, rect.bottom])
    }

    #[wasm_bindgen(getter)]
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.controller.aspect_ratio()
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: Option<f64>) -> Result<(), JsError> {
        self.controller.set_aspect_ratio(aspect_ratio)?;
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> i32 {
        self.controller.rotation().degrees()
    }

    pub fn set_rotation(&mut self, degrees: i32) -> Result<(), JsError> {
        self.controller.set_rotation(rotation_from_degrees(degrees)?);
        Ok(())
    }

    pub fn rotate_left(&mut self) {
        self.controller.rotate_left();
    }

    pub fn rotate_right(&mut self) {
        self.controller.rotate_right();
    }

    #[wasm_bindgen(getter)]
    pub fn flipped_horizontally(&self) -> bool {
        self.controller.flip().is_horizontal()
    }

    #[wasm_bindgen(getter)]
    pub fn flipped_vertically(&self) -> bool {
        self.controller.flip().is_vertical()
    }

    pub fn set_flip(&mut self, horizontal: bool, vertical: bool) {
        self.controller.set_flip(FlipMode::from_axes(horizontal, vertical));
    }

    pub fn flip_horizontal(&mut self) {
        self.controller.flip_horizontal();
    }

    pub fn flip_vertical(&mut self) {
        self.controller.flip_vertical();
    }

    #[wasm_bindgen(getter)]
    pub fn needs_corner_handles(&self) -> bool {
        self.controller.view().needs_corner_handles
    }

    /// Call `callback(crop: Float64Array)` after every change, or stop with undefined.
    pub fn set_on_crop(&mut self, callback: Option<js_sys::Function>) {
        if let Some(id) = self.on_crop.take() {
            self.controller.remove_listener(id);
        }
        if let Some(callback) = callback {
            let id = self.controller.add_listener(move |state| {
                let crop = js_sys::Float64Array::from(crop_to_vec(&state.crop).as_slice());
                if let Err(e) = callback.call1(&JsValue::NULL, &crop) {
                    log::warn!("Crop callback threw: {:?}", e);
                }
            });
            self.on_crop = Some(id);
        }
    }

    // ========================================================================
    // Extraction
    // ========================================================================

    /// Extract the crop as displayed.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Longest output edge in pixels, or undefined for full size
    /// * `quality` - 0 = Nearest, 1 = Bilinear, 2 = Lanczos3
    pub fn extract(&self, max_size: Option<f64>, quality: u8) -> Result<JsBitmap, JsError> {
        let options = ExtractOptions {
            max_size,
            quality: filter_from_u8(quality),
            ..ExtractOptions::default()
        };
        Ok(JsBitmap::from_bitmap(self.controller.extract(options)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> JsCropController {
        JsCropController::new(None, None, 0, false, false, 10.0, None).unwrap()
    }

    #[test]
    fn test_new_session_defaults() {
        let s = session();
        assert_eq!(s.crop(), vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(s.rotation(), 0);
        assert!(!s.flipped_horizontally());
        assert!(s.needs_corner_handles());
        assert!(!s.is_ready());
    }

    #[test]
    fn test_initial_options() {
        let s = JsCropController::new(
            Some(1.0),
            Some(vec![0.0, 0.0, 0.5, 0.5]),
            -90,
            true,
            false,
            50.0,
            Some(50.0),
        )
        .unwrap();
        assert_eq!(s.rotation(), 270);
        assert_eq!(s.aspect_ratio(), Some(1.0));
        assert!(s.flipped_horizontally());
        assert!(!s.needs_corner_handles());
        assert_eq!(s.crop(), vec![0.0, 0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_pointer_drag_updates_crop() {
        let mut s = session();
        s.bind_image(40, 20, vec![255u8; 40 * 20 * 4]).unwrap();
        assert!(s.is_ready());

        assert!(s.pointer_down(10.0, 10.0, 400.0, 200.0, 10.0));
        assert!(s.is_dragging());
        assert!(s.pointer_move(110.0, 60.0, 400.0, 200.0, 10.0).unwrap());
        s.pointer_up();
        assert!(!s.is_dragging());

        assert_eq!(s.crop(), vec![0.25, 0.25, 1.0, 1.0]);
        assert_eq!(s.crop_pixels().unwrap(), vec![10.0, 5.0, 40.0, 20.0]);
    }

    #[test]
    fn test_rotate_and_extract() {
        let mut s = session();
        s.bind_image(40, 20, vec![9u8; 40 * 20 * 4]).unwrap();
        s.rotate_right();
        assert_eq!(s.rotation(), 90);

        let out = s.extract(None, 0).unwrap();
        assert_eq!((out.width(), out.height()), (20, 40));
        assert_eq!(out.byte_length(), 20 * 40 * 4);

        let small = s.extract(Some(10.0), 1).unwrap();
        assert_eq!((small.width(), small.height()), (5, 10));
    }

    #[test]
    fn test_flip_toggles() {
        let mut s = session();
        s.flip_horizontal();
        s.flip_vertical();
        assert!(s.flipped_horizontally() && s.flipped_vertically());
        s.set_flip(false, true);
        assert!(!s.flipped_horizontally());
    }

    #[test]
    fn test_set_crop_and_ratio() {
        let mut s = session();
        s.bind_image(100, 100, vec![0u8; 100 * 100 * 4]).unwrap();
        s.set_crop(&[0.0, 0.0, 0.5, 0.5]).unwrap();
        s.set_aspect_ratio(Some(2.0)).unwrap();
        assert_eq!(s.crop(), vec![0.0, 0.125, 0.5, 0.375]);
        s.set_rotation(180).unwrap();
        assert_eq!(s.rotation(), 180);
    }
}

/// WASM-specific tests for the error paths.
///
/// `JsError` construction calls into JavaScript, so these only run on wasm32
/// targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_rejects_odd_rotation() {
        assert!(JsCropController::new(None, None, 45, false, false, 10.0, None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_rejects_inverted_limits() {
        assert!(JsCropController::new(None, None, 0, false, false, 200.0, Some(100.0)).is_err());
    }

    #[wasm_bindgen_test]
    fn test_rejects_malformed_crop() {
        let mut s = JsCropController::new(None, None, 0, false, false, 10.0, None).unwrap();
        assert!(s.set_crop(&[0.0, 0.0, 1.0]).is_err());
        assert!(s.set_crop(&[0.6, 0.0, 0.4, 1.0]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_extract_before_bind_fails() {
        let s = JsCropController::new(None, None, 0, false, false, 10.0, None).unwrap();
        assert!(s.extract(None, 1).is_err());
        assert!(s.crop_pixels().is_err());
    }

    #[wasm_bindgen_test]
    fn test_bind_rejects_short_buffer() {
        let mut s = JsCropController::new(None, None, 0, false, false, 10.0, None).unwrap();
        assert!(s.bind_image(10, 10, vec![0u8; 10]).is_err());
    }
}
