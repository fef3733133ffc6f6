//! Pointer interaction: hit-testing handles and turning drags into crop
//! updates.
//!
//! The presentation layer paints the displayed frame into a [`Viewport`] and
//! forwards raw pointer events in viewport coordinates (padding included).
//! [`CropInteraction`] is a two-state machine:
//!
//! ```text
//!            pointer_down (hit)
//!     Idle ─────────────────────▶ Dragging(handle)
//!      ▲                               │ pointer_move
//!      │         pointer_up            │ (updates crop)
//!      └───────────────────────────────┘
//! ```
//!
//! A pointer-down that hits nothing leaves the machine idle, and moves
//! while idle are ignored.

mod drag;

pub use drag::{move_area, move_corner, Corner, DragLimits};

use crate::config::InteractionConfig;
use crate::controller::Controller;
use crate::crop::{CropRect, PixelRect, Point};
use crate::error::Result;

/// The area the displayed frame is painted into, in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Painted frame width, excluding padding.
    pub width: f64,
    /// Painted frame height, excluding padding.
    pub height: f64,
    /// Space around the frame on every side.
    pub padding: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: 0.0,
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// The crop in frame-local layout pixels.
    fn crop_pixels(&self, crop: &CropRect) -> PixelRect {
        crop.to_pixels(self.width, self.height)
    }
}

/// What a pointer-down grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Corner(Corner),
    /// The whole rectangle.
    Move,
}

/// Bookkeeping for an active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub handle: Handle,
    /// Pointer position minus the handle's anchor at pointer-down, so drags
    /// are relative instead of snapping the anchor to the pointer.
    pub offset: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragState),
}

/// Pointer state machine driving a [`Controller`].
#[derive(Debug, Clone, Default)]
pub struct CropInteraction {
    config: InteractionConfig,
    state: InteractionState,
}

impl CropInteraction {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            state: InteractionState::Idle,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    /// Find the handle under `position`, if any.
    ///
    /// Corners are tried first, in [`Corner::ALL`] order, and only when the
    /// session shows corner handles.
    pub fn hit_test(
        &self,
        crop: &CropRect,
        needs_corner_handles: bool,
        position: Point,
        viewport: &Viewport,
    ) -> Option<Handle> {
        let rect = viewport.crop_pixels(crop);
        let pad = viewport.padding;

        if needs_corner_handles {
            let half = self.config.touch_size / 2.0;
            for corner in Corner::ALL {
                let anchor = corner.position(&rect);
                let out = corner.outward();
                let cx = anchor.x + pad + out.x * self.config.handle_offset;
                let cy = anchor.y + pad + out.y * self.config.handle_offset;
                if (position.x - cx).abs() <= half && (position.y - cy).abs() <= half {
                    return Some(Handle::Corner(corner));
                }
            }
        }

        if self.config.always_move {
            return Some(Handle::Move);
        }

        let local = Point::new(position.x - pad, position.y - pad);
        rect.contains(local).then_some(Handle::Move)
    }

    /// Start a drag if `position` hits a handle. Returns the grabbed handle.
    pub fn pointer_down(
        &mut self,
        controller: &Controller,
        position: Point,
        viewport: &Viewport,
    ) -> Option<Handle> {
        let state = controller.state();
        let handle = self.hit_test(
            &state.crop,
            state.needs_corner_handles(),
            position,
            viewport,
        )?;

        let rect = viewport.crop_pixels(&state.crop);
        let anchor = match handle {
            Handle::Corner(corner) => corner.position(&rect),
            Handle::Move => rect.top_left(),
        };
        let offset = Point::new(
            position.x - anchor.x - viewport.padding,
            position.y - anchor.y - viewport.padding,
        );

        log::trace!("Drag started on {:?}", handle);
        self.state = InteractionState::Dragging(DragState { handle, offset });
        Some(handle)
    }

    /// Apply a pointer move to the controller's crop.
    ///
    /// Returns the committed crop, or `None` when no drag is active. Corner
    /// drags need a bound image to scale the size constraints.
    pub fn pointer_move(
        &mut self,
        controller: &mut Controller,
        position: Point,
        viewport: &Viewport,
    ) -> Result<Option<CropRect>> {
        let InteractionState::Dragging(drag) = self.state else {
            return Ok(None);
        };

        let point = Point::new(
            position.x - drag.offset.x - viewport.padding,
            position.y - drag.offset.y - viewport.padding,
        );
        let rect = viewport.crop_pixels(&controller.crop());

        let moved = match drag.handle {
            Handle::Move => move_area(rect, point, viewport.width, viewport.height),
            Handle::Corner(corner) => {
                let limits = drag_limits(controller, viewport)?;
                move_corner(rect, corner, point, &limits)
            }
        };

        let crop = CropRect::from_pixels(moved, viewport.width, viewport.height);
        let committed = controller.apply_drag(crop);
        log::trace!("Drag {:?} -> {:?}", drag.handle, committed);
        Ok(Some(committed))
    }

    /// End any drag.
    pub fn pointer_up(&mut self) {
        self.state = InteractionState::Idle;
    }
}

/// Size constraints scaled from source pixels into layout pixels.
fn drag_limits(controller: &Controller, viewport: &Viewport) -> Result<DragLimits> {
    let (displayed_width, _) = controller.displayed_size()?;
    let scale = viewport.width / displayed_width;
    let constraints = controller.constraints();
    Ok(DragLimits {
        width: viewport.width,
        height: viewport.height,
        minimum: constraints.minimum * scale,
        maximum: constraints.maximum * scale,
        aspect_ratio: controller.aspect_ratio(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::config::{CropOptions, SizeConstraints};
    use crate::error::CropError;

    fn controller(width: u32, height: u32, options: CropOptions) -> Controller {
        let mut controller = Controller::new(options).unwrap();
        controller.bind_image(Bitmap::filled(width, height, [0, 0, 0, 255]));
        controller
    }

    fn assert_rect_near(a: CropRect, b: CropRect) {
        let close = (a.left - b.left).abs() < 1e-9
            && (a.top - b.top).abs() < 1e-9
            && (a.right - b.right).abs() < 1e-9
            && (a.bottom - b.bottom).abs() < 1e-9;
        assert!(close, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_hit_test_corner_priority() {
        let interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 200.0);
        let crop = CropRect::FULL;

        let hit = interaction.hit_test(&crop, true, Point::new(5.0, 5.0), &viewport);
        assert_eq!(hit, Some(Handle::Corner(Corner::UpperLeft)));

        let hit = interaction.hit_test(&crop, true, Point::new(390.0, 195.0), &viewport);
        assert_eq!(hit, Some(Handle::Corner(Corner::LowerRight)));

        let hit = interaction.hit_test(&crop, true, Point::new(200.0, 100.0), &viewport);
        assert_eq!(hit, Some(Handle::Move));
    }

    #[test]
    fn test_overlapping_corners_pick_first() {
        // A tiny crop puts every corner box over the same point.
        let interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 200.0);
        let crop = CropRect::new(0.5, 0.5, 0.51, 0.52).unwrap();
        let hit = interaction.hit_test(&crop, true, Point::new(203.0, 102.0), &viewport);
        assert_eq!(hit, Some(Handle::Corner(Corner::UpperLeft)));
    }

    #[test]
    fn test_hit_test_outside_is_none() {
        let interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 200.0);
        let crop = CropRect::new(0.25, 0.25, 0.5, 0.5).unwrap();
        let hit = interaction.hit_test(&crop, true, Point::new(350.0, 180.0), &viewport);
        assert_eq!(hit, None);
    }

    #[test]
    fn test_always_move() {
        let interaction = CropInteraction::new(InteractionConfig {
            always_move: true,
            ..InteractionConfig::default()
        });
        let viewport = Viewport::new(400.0, 200.0);
        let crop = CropRect::new(0.25, 0.25, 0.5, 0.5).unwrap();
        let hit = interaction.hit_test(&crop, true, Point::new(350.0, 180.0), &viewport);
        assert_eq!(hit, Some(Handle::Move));
    }

    #[test]
    fn test_handle_offset_and_padding() {
        let interaction = CropInteraction::new(InteractionConfig {
            touch_size: 10.0,
            handle_offset: 20.0,
            always_move: false,
        });
        let viewport = Viewport::new(400.0, 200.0).with_padding(30.0);
        let crop = CropRect::FULL;

        // Upper-left corner sits at (30, 30); its box is pushed out to (10, 10).
        let hit = interaction.hit_test(&crop, true, Point::new(10.0, 10.0), &viewport);
        assert_eq!(hit, Some(Handle::Corner(Corner::UpperLeft)));
        let hit = interaction.hit_test(&crop, true, Point::new(30.0, 30.0), &viewport);
        assert_eq!(hit, Some(Handle::Move));
    }

    #[test]
    fn test_miss_stays_idle() {
        let ctrl = controller(400, 200, CropOptions::default().with_crop(
            CropRect::new(0.25, 0.25, 0.5, 0.5).unwrap(),
        ));
        let mut interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 200.0);
        assert_eq!(
            interaction.pointer_down(&ctrl, Point::new(390.0, 10.0), &viewport),
            None
        );
        assert!(!interaction.is_dragging());
    }

    #[test]
    fn test_drag_upper_left_corner() {
        let mut ctrl = controller(400, 200, CropOptions::default());
        let mut interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 200.0);

        // Grab slightly off the corner; the offset keeps the drag relative.
        let handle = interaction.pointer_down(&ctrl, Point::new(3.0, 4.0), &viewport);
        assert_eq!(handle, Some(Handle::Corner(Corner::UpperLeft)));

        let crop = interaction
            .pointer_move(&mut ctrl, Point::new(53.0, 54.0), &viewport)
            .unwrap()
            .unwrap();
        assert_rect_near(crop, CropRect::new(0.125, 0.25, 1.0, 1.0).unwrap());
        assert_eq!(ctrl.crop(), crop);

        interaction.pointer_up();
        assert_eq!(interaction.state(), InteractionState::Idle);
        assert_eq!(
            interaction
                .pointer_move(&mut ctrl, Point::new(100.0, 100.0), &viewport)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_drag_move_in_scaled_viewport() {
        let mut ctrl = controller(
            400,
            200,
            CropOptions::default().with_crop(CropRect::new(0.0, 0.0, 0.5, 0.5).unwrap()),
        );
        let mut interaction = CropInteraction::default();
        // Painted at half size, with padding.
        let viewport = Viewport::new(200.0, 100.0).with_padding(10.0);

        let handle = interaction.pointer_down(&ctrl, Point::new(60.0, 35.0), &viewport);
        assert_eq!(handle, Some(Handle::Move));

        let crop = interaction
            .pointer_move(&mut ctrl, Point::new(110.0, 60.0), &viewport)
            .unwrap()
            .unwrap();
        assert_rect_near(crop, CropRect::new(0.25, 0.25, 0.75, 0.75).unwrap());

        // Dragging far away pins the rectangle against the frame.
        let crop = interaction
            .pointer_move(&mut ctrl, Point::new(1000.0, 1000.0), &viewport)
            .unwrap()
            .unwrap();
        assert_rect_near(crop, CropRect::new(0.5, 0.5, 1.0, 1.0).unwrap());
    }

    #[test]
    fn test_corner_drag_scales_minimum_size() {
        let options = CropOptions::default().with_constraints(SizeConstraints::new(100.0, 300.0).unwrap());
        let mut ctrl = controller(400, 200, options);
        let mut interaction = CropInteraction::default();
        // 400px source painted at 200px: limits halve to 50 / 150.
        let viewport = Viewport::new(200.0, 100.0);

        interaction.pointer_down(&ctrl, Point::new(200.0, 100.0), &viewport);
        let crop = interaction
            .pointer_move(&mut ctrl, Point::new(0.0, 0.0), &viewport)
            .unwrap()
            .unwrap();
        assert_rect_near(crop, CropRect::new(0.0, 0.0, 0.25, 0.5).unwrap());

        let crop = interaction
            .pointer_move(&mut ctrl, Point::new(250.0, 150.0), &viewport)
            .unwrap()
            .unwrap();
        assert_rect_near(crop, CropRect::new(0.0, 0.0, 0.75, 1.0).unwrap());
    }

    #[test]
    fn test_ratio_drag_after_quarter_turn() {
        let mut ctrl = controller(400, 200, CropOptions::default().with_aspect_ratio(1.0));
        ctrl.rotate_right();
        assert_rect_near(ctrl.crop(), CropRect::new(0.0, 0.25, 1.0, 0.75).unwrap());

        let mut interaction = CropInteraction::default();
        // The displayed frame is 200x400 once turned sideways.
        let viewport = Viewport::new(200.0, 400.0);
        let handle = interaction.pointer_down(&ctrl, Point::new(200.0, 300.0), &viewport);
        assert_eq!(handle, Some(Handle::Corner(Corner::LowerRight)));

        let crop = interaction
            .pointer_move(&mut ctrl, Point::new(150.0, 280.0), &viewport)
            .unwrap()
            .unwrap();
        assert_rect_near(crop, CropRect::new(0.0, 0.25, 0.75, 0.625).unwrap());

        // Square in displayed pixels, upper-left still anchored.
        let px = ctrl.crop_size().unwrap();
        assert!((px.left - 0.0).abs() < 1e-6 && (px.top - 100.0).abs() < 1e-6);
        assert!((px.width() - 150.0).abs() < 1e-6);
        assert!((px.height() - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_ratio_drag_keeps_minimum_size() {
        let options = CropOptions::default()
            .with_aspect_ratio(0.5)
            .with_constraints(SizeConstraints::new(100.0, f64::INFINITY).unwrap());
        let mut ctrl = controller(400, 200, options);
        let mut interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 200.0);

        // Centered fit for 0.5 on 400x200 is 100x200 at x = 150.
        let px = ctrl.crop_size().unwrap();
        assert!((px.left - 150.0).abs() < 1e-6 && (px.width() - 100.0).abs() < 1e-6);

        interaction.pointer_down(&ctrl, Point::new(250.0, 200.0), &viewport);
        interaction
            .pointer_move(&mut ctrl, Point::new(160.0, 20.0), &viewport)
            .unwrap();

        let px = ctrl.crop_size().unwrap();
        assert!(px.width() >= 100.0 - 1e-6, "{:?}", px);
        assert!((px.width() / px.height() - 0.5).abs() < 1e-6, "{:?}", px);
    }

    #[test]
    fn test_corner_drag_without_image() {
        let mut ctrl = Controller::new(CropOptions::default()).unwrap();
        let mut interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 200.0);

        interaction.pointer_down(&ctrl, Point::new(0.0, 0.0), &viewport);
        let err = interaction
            .pointer_move(&mut ctrl, Point::new(10.0, 10.0), &viewport)
            .unwrap_err();
        assert_eq!(err, CropError::ImageNotReady);
    }

    #[test]
    fn test_pinned_size_only_moves() {
        let options = CropOptions::default()
            .with_crop(CropRect::new(0.0, 0.0, 0.25, 0.25).unwrap())
            .with_constraints(SizeConstraints::new(100.0, 100.0).unwrap());
        let mut ctrl = controller(400, 400, options);
        assert!(!ctrl.view().needs_corner_handles);

        let mut interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 400.0);
        let handle = interaction.pointer_down(&ctrl, Point::new(0.0, 0.0), &viewport);
        assert_eq!(handle, Some(Handle::Move));

        let crop = interaction
            .pointer_move(&mut ctrl, Point::new(100.0, 100.0), &viewport)
            .unwrap()
            .unwrap();
        assert_rect_near(crop, CropRect::new(0.25, 0.25, 0.5, 0.5).unwrap());
    }

    #[test]
    fn test_drag_notifies_listeners() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut ctrl = controller(400, 200, CropOptions::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        ctrl.add_listener(move |state| sink.borrow_mut().push(state.crop));

        let mut interaction = CropInteraction::default();
        let viewport = Viewport::new(400.0, 200.0);
        interaction.pointer_down(&ctrl, Point::new(200.0, 100.0), &viewport);
        interaction
            .pointer_move(&mut ctrl, Point::new(380.0, 180.0), &viewport)
            .unwrap();
        interaction
            .pointer_move(&mut ctrl, Point::new(370.0, 170.0), &viewport)
            .unwrap();

        assert_eq!(seen.borrow().len(), 2);
    }
}
