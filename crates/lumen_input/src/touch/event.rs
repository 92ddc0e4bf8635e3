//! The pooled touch event.

use lumen_core::Recyclable;

use crate::error::TouchError;

/// What a pointer did.
///
/// Codes match the platform's masked motion-event actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum TouchAction {
    /// A pointer touched the surface.
    #[default]
    Down = 0,
    /// A pointer left the surface.
    Up = 1,
    /// A pointer moved.
    Move = 2,
    /// The gesture was aborted.
    Cancel = 3,
    /// The touch happened outside the surface bounds.
    Outside = 4,
}

impl TouchAction {
    /// Platform action code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for TouchAction {
    type Error = TouchError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Down),
            1 => Ok(Self::Up),
            2 => Ok(Self::Move),
            3 => Ok(Self::Cancel),
            4 => Ok(Self::Outside),
            other => Err(TouchError::UnknownActionCode(other)),
        }
    }
}

/// One touch, borrowed from a pool for the length of a delivery.
///
/// `R` is the raw platform event the touch was read from. It is dropped when
/// the event is recycled, so a platform handle that recycles itself on drop
/// is returned at the same moment as the touch.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent<R = ()> {
    x: f32,
    y: f32,
    action: TouchAction,
    pointer_id: i32,
    raw: Option<R>,
}

impl<R> Default for TouchEvent<R> {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            action: TouchAction::Down,
            pointer_id: 0,
            raw: None,
        }
    }
}

impl<R> TouchEvent<R> {
    /// Overwrites every field.
    pub fn set(&mut self, x: f32, y: f32, action: TouchAction, pointer_id: i32, raw: Option<R>) {
        self.x = x;
        self.y = y;
        self.action = action;
        self.pointer_id = pointer_id;
        self.raw = raw;
    }

    /// Horizontal position.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical position.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// The action.
    #[inline]
    #[must_use]
    pub const fn action(&self) -> TouchAction {
        self.action
    }

    /// Platform pointer id.
    #[inline]
    #[must_use]
    pub const fn pointer_id(&self) -> i32 {
        self.pointer_id
    }

    /// The raw platform event, if one was attached.
    #[inline]
    #[must_use]
    pub const fn raw(&self) -> Option<&R> {
        self.raw.as_ref()
    }

    /// Shifts the position, e.g. from surface to scene coordinates.
    pub fn offset(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Checks for [`TouchAction::Down`].
    #[inline]
    #[must_use]
    pub fn is_action_down(&self) -> bool {
        self.action == TouchAction::Down
    }

    /// Checks for [`TouchAction::Up`].
    #[inline]
    #[must_use]
    pub fn is_action_up(&self) -> bool {
        self.action == TouchAction::Up
    }

    /// Checks for [`TouchAction::Move`].
    #[inline]
    #[must_use]
    pub fn is_action_move(&self) -> bool {
        self.action == TouchAction::Move
    }

    /// Checks for [`TouchAction::Cancel`].
    #[inline]
    #[must_use]
    pub fn is_action_cancel(&self) -> bool {
        self.action == TouchAction::Cancel
    }
}

impl<R> Recyclable for TouchEvent<R> {
    fn on_recycle(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.action = TouchAction::Down;
        self.pointer_id = 0;
        self.raw = None;
    }
}
