//! # Touch Dispatcher
//!
//! Turns raw touches into pooled [`TouchEvent`]s and hands them to the
//! registered callback.
//!
//! ```text
//! Synchronous:  fire_touch_event ──> acquire ──> callback ──> recycle
//!
//! Deferred:     fire_touch_event ──> acquire ──> queue
//!               on_update ─────────────────────> callback ──> recycle
//! ```
//!
//! In both modes the event goes back to the pool even when the callback
//! fails; the error is returned after the event is recycled.

use crossbeam_channel::Receiver;

use lumen_core::DeferredPool;

use crate::config::{DispatchMode, TouchConfig};
use crate::error::{CallbackError, TouchError, TouchResult};
use crate::touch::handoff::{self, RawTouch, TouchHandoff};
use crate::touch::{TouchAction, TouchEvent};

/// Receives touch events.
///
/// Implemented for every `FnMut(&TouchEvent<R>) -> Result<(), CallbackError>`.
/// The event is only valid for the duration of the call.
pub trait TouchEventCallback<R> {
    /// Handles one event.
    ///
    /// # Errors
    ///
    /// Whatever the handler reports; the dispatcher propagates it.
    fn on_touch_event(&mut self, event: &TouchEvent<R>) -> Result<(), CallbackError>;
}

impl<R, F> TouchEventCallback<R> for F
where
    F: FnMut(&TouchEvent<R>) -> Result<(), CallbackError>,
{
    fn on_touch_event(&mut self, event: &TouchEvent<R>) -> Result<(), CallbackError> {
        self(event)
    }
}

/// Dispatch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events handed to the callback.
    pub dispatched: u64,
    /// Deliveries where the callback returned an error.
    pub callback_errors: u64,
    /// Events discarded because no callback was registered.
    pub dropped: u64,
}

/// Pool-backed touch delivery, injected into touch controllers.
pub struct TouchDispatcher<R: 'static = ()> {
    mode: DispatchMode,
    events: DeferredPool<TouchEvent<R>>,
    callback: Option<Box<dyn TouchEventCallback<R>>>,
    handoff: Option<Receiver<RawTouch<R>>>,
    handoff_capacity: usize,
    stats: DispatchStats,
}

impl<R: 'static> Default for TouchDispatcher<R> {
    fn default() -> Self {
        Self::new(&TouchConfig::default())
    }
}

impl<R: 'static> TouchDispatcher<R> {
    /// Creates a dispatcher with no callback.
    #[must_use]
    pub fn new(config: &TouchConfig) -> Self {
        Self {
            mode: config.dispatch,
            events: DeferredPool::with_config(config.pool),
            callback: None,
            handoff: None,
            handoff_capacity: config.handoff_capacity,
            stats: DispatchStats::default(),
        }
    }

    /// Registers the callback, replacing any previous one.
    pub fn set_callback(&mut self, callback: impl TouchEventCallback<R> + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Removes the callback. Later events are dropped.
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// Checks whether a callback is registered.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Current delivery mode.
    #[must_use]
    pub const fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Switches delivery mode. Events already queued are still delivered on
    /// the next `on_update`.
    pub fn set_mode(&mut self, mode: DispatchMode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "touch dispatch mode changed");
            self.mode = mode;
        }
    }

    /// Opens a handoff queue for another thread, closing any previous one.
    pub fn handoff(&mut self) -> TouchHandoff<R> {
        let (sender, receiver) = handoff::channel(self.handoff_capacity);
        self.handoff = Some(receiver);
        sender
    }

    /// Delivers (or queues) one touch.
    ///
    /// With no callback registered the touch is dropped and counted.
    ///
    /// # Errors
    ///
    /// [`TouchError::Callback`] if the callback failed during synchronous
    /// delivery; the event has already been recycled. [`TouchError::Pool`] if
    /// a bounded event pool is exhausted.
    pub fn fire_touch_event(
        &mut self,
        x: f32,
        y: f32,
        action: TouchAction,
        pointer_id: i32,
        raw: Option<R>,
    ) -> TouchResult<()> {
        let Some(callback) = self.callback.as_mut() else {
            self.stats.dropped += 1;
            tracing::trace!(pointer = pointer_id, "touch dropped, no callback");
            return Ok(());
        };

        match self.mode {
            DispatchMode::Synchronous => {
                let mut event = self.events.pool_mut().acquire_scoped()?;
                event.set(x, y, action, pointer_id, raw);
                let result = callback.on_touch_event(&event);
                drop(event);

                self.stats.dispatched += 1;
                result.map_err(|err| {
                    self.stats.callback_errors += 1;
                    TouchError::Callback(err)
                })
            }
            DispatchMode::Deferred => {
                let handle = self.events.obtain()?;
                if let Some(event) = self.events.get_mut(handle) {
                    event.set(x, y, action, pointer_id, raw);
                }
                self.events.release(handle)?;
                Ok(())
            }
        }
    }

    /// Drains the handoff queue and delivers queued events.
    ///
    /// Returns the number of events handed to the callback during the
    /// update, failed deliveries included.
    ///
    /// # Errors
    ///
    /// The first error met. Every queued event is still delivered and
    /// recycled before it is returned; [`TouchDispatcher::stats`] counts
    /// them.
    pub fn on_update(&mut self, delta_time: f32) -> TouchResult<usize> {
        let dispatched_before = self.stats.dispatched;
        let mut first_error = None;

        let arrived = self.handoff.as_ref().map_or(0, Receiver::len);
        for _ in 0..arrived {
            let Some(touch) = self.handoff.as_ref().and_then(|rx| rx.try_recv().ok()) else {
                break;
            };
            if let Err(err) =
                self.fire_touch_event(touch.x, touch.y, touch.action, touch.pointer_id, touch.raw)
            {
                first_error.get_or_insert(err);
            }
        }

        let callback = &mut self.callback;
        let stats = &mut self.stats;
        let drained = self.events.advance_with(delta_time, |event| {
            let Some(callback) = callback.as_mut() else {
                stats.dropped += 1;
                return Ok(());
            };
            stats.dispatched += 1;
            callback.on_touch_event(event).map_err(|err| {
                stats.callback_errors += 1;
                err
            })
        });

        if let Err(err) = drained {
            first_error.get_or_insert(TouchError::Callback(err));
        }

        let delivered = self.stats.dispatched - dispatched_before;
        match first_error {
            Some(err) => Err(err),
            None => Ok(usize::try_from(delivered).unwrap_or(usize::MAX)),
        }
    }

    /// Discards queued events and pending handoff touches without delivering
    /// them.
    pub fn reset(&mut self) {
        let queued = self.events.pending_count();
        self.events.reset();
        let discarded = self
            .handoff
            .as_ref()
            .map_or(0, |receiver| receiver.try_iter().count());
        tracing::debug!(queued, discarded, "touch dispatcher reset");
    }

    /// Events queued for the next `on_update`.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.events.pending_count()
    }

    /// Events currently out of the pool, queued ones included.
    #[must_use]
    pub fn events_in_flight(&self) -> usize {
        self.events.pool().in_use_count() + self.events.pool().pending_count()
    }

    /// Slots allocated by the event pool.
    #[must_use]
    pub fn pool_capacity(&self) -> usize {
        self.events.pool().capacity()
    }

    /// Dispatch counters.
    #[must_use]
    pub const fn stats(&self) -> DispatchStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<(f32, f32, TouchAction, i32)>>>;

    fn recording(config: &TouchConfig) -> (TouchDispatcher, Log) {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let mut dispatcher = TouchDispatcher::new(config);
        dispatcher.set_callback(move |event: &TouchEvent| -> Result<(), CallbackError> {
            sink.borrow_mut()
                .push((event.x(), event.y(), event.action(), event.pointer_id()));
            Ok(())
        });
        (dispatcher, log)
    }

    fn deferred() -> TouchConfig {
        TouchConfig {
            dispatch: DispatchMode::Deferred,
            ..TouchConfig::default()
        }
    }

    #[test]
    fn test_synchronous_delivery() {
        let (mut dispatcher, log) = recording(&TouchConfig::default());
        dispatcher
            .fire_touch_event(10.0, 20.0, TouchAction::Down, 0, None)
            .unwrap();

        assert_eq!(*log.borrow(), vec![(10.0, 20.0, TouchAction::Down, 0)]);
        assert_eq!(dispatcher.events_in_flight(), 0);
        assert_eq!(dispatcher.stats().dispatched, 1);
    }

    #[test]
    fn test_callback_error_still_recycles() {
        let mut dispatcher: TouchDispatcher = TouchDispatcher::default();
        dispatcher.set_callback(|_: &TouchEvent| -> Result<(), CallbackError> {
            Err("handler exploded".into())
        });

        let err = dispatcher
            .fire_touch_event(1.0, 1.0, TouchAction::Up, 0, None)
            .unwrap_err();
        assert!(matches!(err, TouchError::Callback(_)));
        assert_eq!(dispatcher.events_in_flight(), 0);
        assert_eq!(dispatcher.stats().callback_errors, 1);
    }

    #[test]
    fn test_no_callback_drops() {
        let mut dispatcher: TouchDispatcher = TouchDispatcher::default();
        dispatcher
            .fire_touch_event(0.0, 0.0, TouchAction::Down, 0, None)
            .unwrap();
        assert_eq!(dispatcher.stats().dropped, 1);
        assert_eq!(dispatcher.events_in_flight(), 0);
    }

    #[test]
    fn test_deferred_waits_for_update() {
        let (mut dispatcher, log) = recording(&deferred());
        dispatcher
            .fire_touch_event(1.0, 2.0, TouchAction::Down, 0, None)
            .unwrap();
        dispatcher
            .fire_touch_event(3.0, 4.0, TouchAction::Move, 0, None)
            .unwrap();

        assert!(log.borrow().is_empty());
        assert_eq!(dispatcher.pending_count(), 2);

        assert_eq!(dispatcher.on_update(0.016).unwrap(), 2);
        assert_eq!(
            *log.borrow(),
            vec![
                (1.0, 2.0, TouchAction::Down, 0),
                (3.0, 4.0, TouchAction::Move, 0)
            ]
        );
        assert_eq!(dispatcher.events_in_flight(), 0);
    }

    #[test]
    fn test_deferred_error_drains_everything() {
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        let mut dispatcher: TouchDispatcher = TouchDispatcher::new(&deferred());
        dispatcher.set_callback(move |event: &TouchEvent| -> Result<(), CallbackError> {
            *counter.borrow_mut() += 1;
            if event.pointer_id() == 1 {
                return Err("bad pointer".into());
            }
            Ok(())
        });

        for pointer in 0..3 {
            dispatcher
                .fire_touch_event(0.0, 0.0, TouchAction::Down, pointer, None)
                .unwrap();
        }
        assert!(dispatcher.on_update(0.016).is_err());
        assert_eq!(*seen.borrow(), 3);
        assert_eq!(dispatcher.events_in_flight(), 0);
        assert_eq!(dispatcher.stats().callback_errors, 1);
        assert_eq!(dispatcher.stats().dispatched, 3);
    }

    #[test]
    fn test_update_counts_handoff_deliveries() {
        let (mut dispatcher, log) = recording(&TouchConfig::default());
        let handoff = dispatcher.handoff();
        handoff.touch(1.0, 1.0, TouchAction::Down, 0).unwrap();
        handoff.touch(2.0, 2.0, TouchAction::Up, 0).unwrap();

        assert_eq!(dispatcher.on_update(0.016).unwrap(), 2);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_reset_discards_queue() {
        let (mut dispatcher, log) = recording(&deferred());
        let handoff = dispatcher.handoff();
        dispatcher
            .fire_touch_event(0.0, 0.0, TouchAction::Down, 0, None)
            .unwrap();
        handoff.touch(1.0, 1.0, TouchAction::Up, 0).unwrap();

        dispatcher.reset();
        assert_eq!(dispatcher.on_update(0.016).unwrap(), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(dispatcher.events_in_flight(), 0);
    }

    #[test]
    fn test_handoff_drained_on_update() {
        let (mut dispatcher, log) = recording(&TouchConfig::default());
        let handoff = dispatcher.handoff();
        handoff.touch(7.0, 8.0, TouchAction::Down, 2).unwrap();

        dispatcher.on_update(0.016).unwrap();
        assert_eq!(*log.borrow(), vec![(7.0, 8.0, TouchAction::Down, 2)]);
    }

    #[test]
    fn test_mode_switch_keeps_queued_events() {
        let (mut dispatcher, log) = recording(&deferred());
        dispatcher
            .fire_touch_event(0.0, 0.0, TouchAction::Down, 0, None)
            .unwrap();
        dispatcher.set_mode(DispatchMode::Synchronous);
        dispatcher
            .fire_touch_event(1.0, 1.0, TouchAction::Up, 0, None)
            .unwrap();
        assert_eq!(log.borrow().len(), 1);

        dispatcher.on_update(0.016).unwrap();
        assert_eq!(log.borrow().len(), 2);
    }
}
