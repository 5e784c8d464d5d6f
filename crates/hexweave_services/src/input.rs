//! Pointer input translation
//!
//! Turns raw cursor and button events into controller actions. A press
//! followed by a release within [`CLICK_SLOP`] pixels is a click; anything
//! further is treated as a drag and ignored.

use hexweave_core::glam::Vec2;
use hexweave_core::Controller;

/// Maximum pointer travel between press and release for a click.
pub const CLICK_SLOP: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Hover(Vec2),
    Click(Vec2),
    Leave,
}

impl PointerAction {
    /// Forward this action to `controller`.
    pub fn dispatch(self, controller: &mut Controller, current_time: f64) {
        match self {
            PointerAction::Hover(point) => controller.pointer_moved(point, current_time),
            PointerAction::Click(point) => controller.pointer_pressed(point, current_time),
            PointerAction::Leave => controller.pointer_left(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    position: Option<Vec2>,
    press_origin: Option<Vec2>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position in logical pixels.
    pub fn cursor_moved(&mut self, position: Vec2) -> PointerAction {
        self.position = Some(position);
        PointerAction::Hover(position)
    }

    pub fn cursor_left(&mut self) -> PointerAction {
        self.position = None;
        self.press_origin = None;
        PointerAction::Leave
    }

    pub fn pressed(&mut self) {
        self.press_origin = self.position;
    }

    pub fn released(&mut self) -> Option<PointerAction> {
        let origin = self.press_origin.take()?;
        let position = self.position?;
        (origin.distance(position) <= CLICK_SLOP).then_some(PointerAction::Click(position))
    }

    #[inline]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }
}
