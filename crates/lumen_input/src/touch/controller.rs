//! Touch controllers: read platform motion events, fire touches through an
//! injected [`TouchDispatcher`].

use crate::error::TouchResult;
use crate::touch::{TouchAction, TouchDispatcher, TouchEventCallback};

/// Masked action code of a secondary pointer going down.
pub const ACTION_POINTER_DOWN: i32 = 5;
/// Masked action code of a secondary pointer going up.
pub const ACTION_POINTER_UP: i32 = 6;

/// A raw platform motion event.
///
/// Pointer data is addressed by index, `0..pointer_count()`.
pub trait PointerEvent {
    /// Masked action code: a [`TouchAction`] code, [`ACTION_POINTER_DOWN`]
    /// or [`ACTION_POINTER_UP`].
    fn action_masked(&self) -> i32;

    /// Index of the pointer the action refers to.
    fn action_index(&self) -> usize;

    /// Pointers on the surface.
    fn pointer_count(&self) -> usize;

    /// Stable id of the pointer at `index`.
    fn pointer_id(&self, index: usize) -> i32;

    /// Horizontal position of the pointer at `index`.
    fn x(&self, index: usize) -> f32;

    /// Vertical position of the pointer at `index`.
    fn y(&self, index: usize) -> f32;
}

/// Converts platform motion events into touches.
///
/// Every touch carries its own copy of the motion event, released when the
/// touch is recycled.
pub trait TouchController<P: PointerEvent + Clone + 'static> {
    /// Handles one motion event. Returns false if it was ignored.
    ///
    /// # Errors
    ///
    /// [`crate::TouchError::UnknownActionCode`] for an action the controller
    /// cannot map, or whatever synchronous delivery reported.
    fn on_handle_motion_event(&mut self, event: &P) -> TouchResult<bool>;

    /// The injected dispatcher.
    fn dispatcher(&self) -> &TouchDispatcher<P>;

    /// The injected dispatcher, mutably.
    fn dispatcher_mut(&mut self) -> &mut TouchDispatcher<P>;

    /// Registers the touch callback.
    fn set_touch_event_callback(&mut self, callback: impl TouchEventCallback<P> + 'static)
    where
        Self: Sized,
    {
        self.dispatcher_mut().set_callback(callback);
    }

    /// Delivers deferred touches. Call once per tick.
    ///
    /// # Errors
    ///
    /// See [`TouchDispatcher::on_update`].
    fn on_update(&mut self, delta_time: f32) -> TouchResult<usize> {
        self.dispatcher_mut().on_update(delta_time)
    }

    /// Drops everything queued.
    fn reset(&mut self) {
        self.dispatcher_mut().reset();
    }
}

fn fire_pointer<P: PointerEvent + Clone + 'static>(
    dispatcher: &mut TouchDispatcher<P>,
    event: &P,
    index: usize,
    action: TouchAction,
) -> TouchResult<()> {
    dispatcher.fire_touch_event(
        event.x(index),
        event.y(index),
        action,
        event.pointer_id(index),
        Some(event.clone()),
    )
}

/// Tracks the primary pointer only.
pub struct SingleTouchController<P: PointerEvent + Clone + 'static> {
    dispatcher: TouchDispatcher<P>,
}

impl<P: PointerEvent + Clone + 'static> SingleTouchController<P> {
    /// Wraps a dispatcher.
    #[must_use]
    pub const fn new(dispatcher: TouchDispatcher<P>) -> Self {
        Self { dispatcher }
    }
}

impl<P: PointerEvent + Clone + 'static> TouchController<P> for SingleTouchController<P> {
    fn on_handle_motion_event(&mut self, event: &P) -> TouchResult<bool> {
        let code = event.action_masked();
        if code == ACTION_POINTER_DOWN || code == ACTION_POINTER_UP {
            return Ok(false);
        }
        let action = TouchAction::try_from(code)?;
        fire_pointer(&mut self.dispatcher, event, 0, action)?;
        Ok(true)
    }

    fn dispatcher(&self) -> &TouchDispatcher<P> {
        &self.dispatcher
    }

    fn dispatcher_mut(&mut self) -> &mut TouchDispatcher<P> {
        &mut self.dispatcher
    }
}

/// Tracks every pointer.
///
/// Secondary pointers going down or up fire `Down`/`Up` for that pointer;
/// a move fires `Move` for every pointer on the surface.
pub struct MultiTouchController<P: PointerEvent + Clone + 'static> {
    dispatcher: TouchDispatcher<P>,
}

impl<P: PointerEvent + Clone + 'static> MultiTouchController<P> {
    /// Wraps a dispatcher.
    #[must_use]
    pub const fn new(dispatcher: TouchDispatcher<P>) -> Self {
        Self { dispatcher }
    }
}

impl<P: PointerEvent + Clone + 'static> TouchController<P> for MultiTouchController<P> {
    fn on_handle_motion_event(&mut self, event: &P) -> TouchResult<bool> {
        let index = event.action_index();
        match event.action_masked() {
            ACTION_POINTER_DOWN => fire_pointer(&mut self.dispatcher, event, index, TouchAction::Down)?,
            ACTION_POINTER_UP => fire_pointer(&mut self.dispatcher, event, index, TouchAction::Up)?,
            code if code == TouchAction::Move.code() => {
                let mut first_error = None;
                for pointer in 0..event.pointer_count() {
                    if let Err(err) =
                        fire_pointer(&mut self.dispatcher, event, pointer, TouchAction::Move)
                    {
                        first_error.get_or_insert(err);
                    }
                }
                if let Some(err) = first_error {
                    return Err(err);
                }
            }
            code => {
                let action = TouchAction::try_from(code)?;
                fire_pointer(&mut self.dispatcher, event, index, action)?;
            }
        }
        Ok(true)
    }

    fn dispatcher(&self) -> &TouchDispatcher<P> {
        &self.dispatcher
    }

    fn dispatcher_mut(&mut self) -> &mut TouchDispatcher<P> {
        &mut self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::{CallbackError, TouchError};
    use crate::touch::TouchEvent;

    #[derive(Debug, Clone)]
    struct Motion {
        action: i32,
        index: usize,
        pointers: Vec<(i32, f32, f32)>,
    }

    impl PointerEvent for Motion {
        fn action_masked(&self) -> i32 {
            self.action
        }
        fn action_index(&self) -> usize {
            self.index
        }
        fn pointer_count(&self) -> usize {
            self.pointers.len()
        }
        fn pointer_id(&self, index: usize) -> i32 {
            self.pointers[index].0
        }
        fn x(&self, index: usize) -> f32 {
            self.pointers[index].1
        }
        fn y(&self, index: usize) -> f32 {
            self.pointers[index].2
        }
    }

    type Log = Rc<RefCell<Vec<(TouchAction, i32)>>>;

    fn attach<C: TouchController<Motion>>(controller: &mut C) -> Log {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        controller.set_touch_event_callback(
            move |event: &TouchEvent<Motion>| -> Result<(), CallbackError> {
                assert!(event.raw().is_some());
                sink.borrow_mut().push((event.action(), event.pointer_id()));
                Ok(())
            },
        );
        log
    }

    fn two_fingers(action: i32, index: usize) -> Motion {
        Motion {
            action,
            index,
            pointers: vec![(0, 1.0, 1.0), (7, 2.0, 2.0)],
        }
    }

    #[test]
    fn test_single_touch_ignores_secondary_pointers() {
        let mut controller = SingleTouchController::new(TouchDispatcher::default());
        let log = attach(&mut controller);

        assert!(controller.on_handle_motion_event(&two_fingers(0, 0)).unwrap());
        assert!(!controller
            .on_handle_motion_event(&two_fingers(ACTION_POINTER_DOWN, 1))
            .unwrap());
        assert!(controller.on_handle_motion_event(&two_fingers(2, 0)).unwrap());

        assert_eq!(
            *log.borrow(),
            vec![(TouchAction::Down, 0), (TouchAction::Move, 0)]
        );
    }

    #[test]
    fn test_multi_touch_tracks_every_pointer() {
        let mut controller = MultiTouchController::new(TouchDispatcher::default());
        let log = attach(&mut controller);

        controller.on_handle_motion_event(&two_fingers(0, 0)).unwrap();
        controller
            .on_handle_motion_event(&two_fingers(ACTION_POINTER_DOWN, 1))
            .unwrap();
        controller.on_handle_motion_event(&two_fingers(2, 0)).unwrap();
        controller
            .on_handle_motion_event(&two_fingers(ACTION_POINTER_UP, 1))
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                (TouchAction::Down, 0),
                (TouchAction::Down, 7),
                (TouchAction::Move, 0),
                (TouchAction::Move, 7),
                (TouchAction::Up, 7),
            ]
        );
        assert_eq!(controller.dispatcher().events_in_flight(), 0);
    }

    #[test]
    fn test_unknown_action_code() {
        let mut controller = MultiTouchController::new(TouchDispatcher::default());
        let _log = attach(&mut controller);
        let err = controller
            .on_handle_motion_event(&two_fingers(42, 0))
            .unwrap_err();
        assert!(matches!(err, TouchError::UnknownActionCode(42)));
    }

    #[test]
    fn test_raw_event_released_with_touch() {
        let motion = Rc::new(two_fingers(0, 0));

        #[derive(Clone)]
        struct Shared(Rc<Motion>);
        impl PointerEvent for Shared {
            fn action_masked(&self) -> i32 {
                self.0.action_masked()
            }
            fn action_index(&self) -> usize {
                self.0.action_index()
            }
            fn pointer_count(&self) -> usize {
                self.0.pointer_count()
            }
            fn pointer_id(&self, index: usize) -> i32 {
                self.0.pointer_id(index)
            }
            fn x(&self, index: usize) -> f32 {
                self.0.x(index)
            }
            fn y(&self, index: usize) -> f32 {
                self.0.y(index)
            }
        }

        let mut shared = SingleTouchController::new(TouchDispatcher::<Shared>::default());
        shared.set_touch_event_callback(|_: &TouchEvent<Shared>| -> Result<(), CallbackError> {
            Ok(())
        });
        shared
            .on_handle_motion_event(&Shared(Rc::clone(&motion)))
            .unwrap();
        assert_eq!(Rc::strong_count(&motion), 1);
    }
}
