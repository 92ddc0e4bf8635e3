//! # Touch Input
//!
//! ```text
//! platform thread ──> TouchHandoff ──┐
//!                                    ├──> TouchDispatcher ──> callback
//! motion event ──> TouchController ──┘        │
//!                                             └── ObjectPool<TouchEvent> (recycled after every delivery)
//! ```

mod controller;
mod dispatcher;
mod event;
mod handoff;

pub use controller::{
    MultiTouchController, PointerEvent, SingleTouchController, TouchController,
    ACTION_POINTER_DOWN, ACTION_POINTER_UP,
};
pub use dispatcher::{DispatchStats, TouchDispatcher, TouchEventCallback};
pub use event::{TouchAction, TouchEvent};
pub use handoff::{RawTouch, TouchHandoff};
