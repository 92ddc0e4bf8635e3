//! Cross-thread touch handoff.
//!
//! Platform input usually arrives on its own thread. A [`TouchHandoff`]
//! queues raw touches into a bounded channel; the dispatcher drains it on the
//! update thread in `on_update`.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::error::HandoffError;
use crate::touch::TouchAction;

/// A touch read on the platform thread, not yet pooled.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTouch<R = ()> {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// The action.
    pub action: TouchAction,
    /// Platform pointer id.
    pub pointer_id: i32,
    /// The raw platform event.
    pub raw: Option<R>,
}

/// Sending side of the handoff queue. Clone one per producer.
pub struct TouchHandoff<R = ()> {
    sender: Sender<RawTouch<R>>,
}

impl<R> Clone for TouchHandoff<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Creates a handoff queue holding at most `capacity` touches.
pub(crate) fn channel<R>(capacity: usize) -> (TouchHandoff<R>, Receiver<RawTouch<R>>) {
    let (sender, receiver) = bounded(capacity.max(1));
    (TouchHandoff { sender }, receiver)
}

impl<R> TouchHandoff<R> {
    /// Queues a touch without blocking.
    ///
    /// # Errors
    ///
    /// [`HandoffError::Full`] when the dispatcher is behind (the touch is
    /// dropped), [`HandoffError::Disconnected`] when the dispatcher is gone.
    pub fn send(&self, touch: RawTouch<R>) -> Result<(), HandoffError> {
        match self.sender.try_send(touch) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(touch)) => {
                tracing::warn!(
                    pointer = touch.pointer_id,
                    action = ?touch.action,
                    "touch handoff queue full, dropping touch"
                );
                Err(HandoffError::Full)
            }
            Err(TrySendError::Disconnected(_)) => Err(HandoffError::Disconnected),
        }
    }

    /// Queues a touch with no raw event attached.
    ///
    /// # Errors
    ///
    /// Same as [`TouchHandoff::send`].
    pub fn touch(
        &self,
        x: f32,
        y: f32,
        action: TouchAction,
        pointer_id: i32,
    ) -> Result<(), HandoffError> {
        self.send(RawTouch {
            x,
            y,
            action,
            pointer_id,
            raw: None,
        })
    }

    /// Touches waiting in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    /// Checks whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_queue_drops() {
        let (handoff, receiver) = channel::<()>(2);
        handoff.touch(0.0, 0.0, TouchAction::Down, 0).unwrap();
        handoff.touch(1.0, 1.0, TouchAction::Move, 0).unwrap();
        assert_eq!(handoff.touch(2.0, 2.0, TouchAction::Up, 0), Err(HandoffError::Full));
        assert_eq!(handoff.len(), 2);

        let first = receiver.try_recv().unwrap();
        assert_eq!(first.action, TouchAction::Down);
    }

    #[test]
    fn test_disconnected() {
        let (handoff, receiver) = channel::<()>(1);
        drop(receiver);
        assert_eq!(
            handoff.touch(0.0, 0.0, TouchAction::Down, 0),
            Err(HandoffError::Disconnected)
        );
    }

    #[test]
    fn test_clones_share_queue() {
        let (handoff, receiver) = channel::<()>(4);
        let other = handoff.clone();
        std::thread::spawn(move || other.touch(5.0, 5.0, TouchAction::Down, 1))
            .join()
            .unwrap()
            .unwrap();
        assert!(!handoff.is_empty());
        assert_eq!(receiver.try_recv().unwrap().pointer_id, 1);
    }
}
