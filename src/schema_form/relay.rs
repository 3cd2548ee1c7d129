//! Widget instance handle relay

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Live handle of a mounted widget, as provided by the host
#[derive(Clone)]
pub struct InstanceHandle(Arc<dyn Any + Send + Sync>);

impl InstanceHandle {
    pub fn new<T: Any + Send + Sync>(instance: T) -> Self {
        Self(Arc::new(instance))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Identity comparison; clones of one handle are the same instance
    pub fn same_instance(&self, other: &InstanceHandle) -> bool {
        Arc::as_ptr(&self.0) as *const () == Arc::as_ptr(&other.0) as *const ()
    }
}

impl fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceHandle({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Caller callback receiving the widget handle
pub type GetWidget = Arc<dyn Fn(&InstanceHandle) + Send + Sync>;

/// Forwards the widget handle to the caller whenever its identity changes.
///
/// The host calls [`notify`](Self::notify) after the widget was mounted or
/// updated; repeated notifications with the same instance are ignored.
pub struct InstanceHandleRelay {
    callback: GetWidget,
    current: Mutex<Option<InstanceHandle>>,
}

impl InstanceHandleRelay {
    pub fn new(callback: GetWidget) -> Self {
        Self {
            callback,
            current: Mutex::new(None),
        }
    }

    /// Returns whether the callback fired
    pub fn notify(&self, handle: InstanceHandle) -> bool {
        {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            if current.as_ref().is_some_and(|c| c.same_instance(&handle)) {
                return false;
            }
            *current = Some(handle.clone());
        }
        debug!(handle = ?handle, "Relaying widget instance");
        (self.callback)(&handle);
        true
    }

    /// Forget the current instance (widget unmounted)
    pub fn release(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl fmt::Debug for InstanceHandleRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("InstanceHandleRelay")
            .field("current", &*current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (InstanceHandleRelay, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let relay = InstanceHandleRelay::new(Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        (relay, count)
    }

    #[test]
    fn test_fires_once_per_identity() {
        let (relay, count) = counting();
        let first = InstanceHandle::new("input#1".to_string());

        assert!(relay.notify(first.clone()));
        assert!(!relay.notify(first.clone()));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let second = InstanceHandle::new("input#1".to_string());
        assert!(relay.notify(second));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_release_allows_refire() {
        let (relay, count) = counting();
        let handle = InstanceHandle::new(7u32);

        relay.notify(handle.clone());
        relay.release();
        relay.notify(handle);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_downcast() {
        let handle = InstanceHandle::new(42u32);
        assert_eq!(handle.downcast_ref::<u32>(), Some(&42));
        assert!(handle.downcast_ref::<String>().is_none());
    }
}
