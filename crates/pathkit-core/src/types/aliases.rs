//! Type aliases for commonly used complex types.
//!
//! Gives names to the nested wrapper types the optimizer and its callers
//! pass around.

use parking_lot::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// A thread-safe reader-writer lock wrapper for read-heavy state.
///
/// Uses `parking_lot::RwLock` for better performance than `std::sync::RwLock`.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// A cooperative cancellation flag shared between a worker and its callers.
pub type StopFlag = Arc<AtomicBool>;

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

/// Create a new, lowered `StopFlag`.
#[inline]
pub fn stop_flag() -> StopFlag {
    Arc::new(AtomicBool::new(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_thread_safe_rw() {
        let state = thread_safe_rw(3_u32);
        *state.write() += 1;
        assert_eq!(*state.read(), 4);
    }

    #[test]
    fn test_stop_flag_shared() {
        let flag = stop_flag();
        let other = flag.clone();
        other.store(true, Ordering::SeqCst);
        assert!(flag.load(Ordering::SeqCst));
    }
}
