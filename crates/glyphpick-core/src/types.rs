//! Type aliases for shared state.
//!
//! The glyph index is read by every selection service and written by the
//! reconstruction stage, so it travels as a [`ThreadSafeRw`].

use parking_lot::RwLock;
use std::sync::Arc;

/// A thread-safe reader-writer lock.
///
/// Use when reads greatly outnumber writes. Multiple readers can access
/// concurrently, but writes require exclusive access.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}
