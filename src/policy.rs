//! Remote failure policy
//!
//! A single switch decides whether remote service failures are swallowed
//! (surfaced as "no result") or propagated to the caller. The switch lives
//! behind a shared atomic so every clone of an [`ErrorPolicy`] observes a
//! change immediately, including pagination walks already in flight.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Shared swallow-or-propagate switch for remote failures
#[derive(Debug, Clone)]
pub struct ErrorPolicy {
    swallow: Arc<AtomicBool>,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ErrorPolicy {
    /// Create a policy with the given initial setting
    pub fn new(swallow_remote_failures: bool) -> Self {
        Self {
            swallow: Arc::new(AtomicBool::new(swallow_remote_failures)),
        }
    }

    /// Policy that swallows remote failures
    pub fn swallowing() -> Self {
        Self::new(true)
    }

    /// Policy that propagates remote failures
    pub fn strict() -> Self {
        Self::new(false)
    }

    /// Current setting
    pub fn swallow_remote_failures(&self) -> bool {
        self.swallow.load(Ordering::SeqCst)
    }

    /// Change the setting for every holder of this policy
    pub fn set_swallow_remote_failures(&self, swallow: bool) {
        self.swallow.store(swallow, Ordering::SeqCst);
    }

    /// Convert a failed outcome into "no result" when the policy allows it.
    ///
    /// Only [`Error::RemoteService`] is ever absorbed. Argument and
    /// deserialization errors always propagate.
    pub fn absorb<T>(&self, outcome: Result<T>) -> Result<Option<T>> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_remote() && self.swallow_remote_failures() => {
                warn!("Swallowing remote failure: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
