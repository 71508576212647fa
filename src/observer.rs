//! Raw query observation
//!
//! An optional single-slot callback that receives every successful query
//! together with its raw response text. Observation is diagnostic only and
//! never changes what the executor returns.

use crate::types::Method;
use std::fmt;
use std::sync::{Arc, RwLock};

/// One executed query and its raw response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryObservation<'a> {
    /// Query string as handed to the transport
    pub query: &'a str,
    /// HTTP method used
    pub method: Method,
    /// Raw response text
    pub response: &'a str,
}

/// Callback receiving query observations
pub type QueryObserver = Arc<dyn Fn(&QueryObservation<'_>) + Send + Sync>;

/// Guarded slot holding at most one observer.
///
/// Clones share the same slot.
#[derive(Clone, Default)]
pub struct ObserverSlot {
    observer: Arc<RwLock<Option<QueryObserver>>>,
}

impl ObserverSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an observer, discarding the previous one
    pub fn set<F>(&self, observer: F)
    where
        F: Fn(&QueryObservation<'_>) + Send + Sync + 'static,
    {
        *self.write() = Some(Arc::new(observer));
    }

    /// Remove the current observer
    pub fn clear(&self) {
        *self.write() = None;
    }

    /// Check if an observer is installed
    pub fn is_set(&self) -> bool {
        self.read().is_some()
    }

    /// Deliver an observation to the installed observer, if any
    pub fn notify(&self, query: &str, method: Method, response: &str) {
        // Clone out of the lock so the callback may replace the slot.
        let observer = self.read().clone();
        if let Some(observer) = observer {
            observer(&QueryObservation {
                query,
                method,
                response,
            });
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<QueryObserver>> {
        self.observer
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<QueryObserver>> {
        self.observer
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl fmt::Debug for ObserverSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}
