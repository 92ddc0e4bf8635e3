//! # Recyclable Protocol
//!
//! The contract every pooled type implements.

/// A value that can be handed out by a pool, returned, and handed out again
/// without being reallocated.
///
/// # Contract
///
/// - [`Recyclable::on_recycle`] is called exactly once per release, before the
///   value re-enters the free list. It must reset every field a consumer may
///   have written and drop (or hand back) any external resource the value
///   wraps, so the next consumer cannot observe the previous one.
/// - [`Recyclable::on_obtain`] is called every time the value leaves the free
///   list. The default does nothing.
///
/// # Example
///
/// ```rust
/// use lumen_core::Recyclable;
///
/// #[derive(Default)]
/// struct Spark { x: f32, y: f32, life: f32 }
///
/// impl Recyclable for Spark {
///     fn on_recycle(&mut self) {
///         *self = Self::default();
///     }
/// }
/// ```
pub trait Recyclable {
    /// Resets the value before it goes back to the free list.
    fn on_recycle(&mut self);

    /// Prepares the value as it leaves the free list.
    #[inline]
    fn on_obtain(&mut self) {}
}
