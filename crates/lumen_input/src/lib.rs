//! # LUMEN Input
//!
//! Touch events delivered from a pool:
//! - One pooled event per touch, recycled the moment delivery ends
//! - Recycling happens even when the callback fails
//! - Delivery is synchronous or deferred to the tick boundary, by config
//!
//! ## Example
//!
//! ```rust
//! use lumen_input::{CallbackError, TouchAction, TouchConfig, TouchDispatcher, TouchEvent};
//!
//! let mut dispatcher: TouchDispatcher = TouchDispatcher::new(&TouchConfig::default());
//! dispatcher.set_callback(|event: &TouchEvent| -> Result<(), CallbackError> {
//!     assert_eq!((event.x(), event.y()), (10.0, 20.0));
//!     Ok(())
//! });
//! dispatcher.fire_touch_event(10.0, 20.0, TouchAction::Down, 0, None)?;
//! # Ok::<(), lumen_input::TouchError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod touch;

pub use config::{DispatchMode, TouchConfig};
pub use error::{CallbackError, HandoffError, TouchError, TouchResult};
pub use touch::{
    DispatchStats, MultiTouchController, PointerEvent, RawTouch, SingleTouchController,
    TouchAction, TouchController, TouchDispatcher, TouchEvent, TouchEventCallback, TouchHandoff,
};
