//! The capability seam to the native media-condition matching facility.
//!
//! Observing units never probe the process environment themselves; they are
//! handed a [MediaEnvironment] and ask it. This keeps "is a live matching
//! facility available" out of global state and lets tests substitute a fake
//! implementation such as [HeadlessEnvironment](crate::headless::HeadlessEnvironment).

use std::{rc::Rc, sync::atomic::AtomicU64};

use crate::error::EnvironmentError;

/// Handle for one registered change subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

impl WatchId {
    /// Mint a fresh id. Environment implementations use this when
    /// registering a watch.
    pub fn next() -> WatchId {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        WatchId(COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed))
    }
}

/// Callback invoked with the new match state on every change notification.
pub type WatchCallback = Rc<dyn Fn(bool)>;

/// A native media-condition matching facility: immediate boolean evaluation
/// of a query expression plus a subscribe/unsubscribe pair for change
/// notifications.
///
/// Notifications are synchronous and delivered in the order the facility
/// emits them; implementations must not coalesce or reorder them. Query
/// strings are passed through unmodified, so an invalid expression fails in
/// the implementation's own failure domain.
pub trait MediaEnvironment {
    /// Whether a live matching facility exists at all. When this is false,
    /// observing units resolve to their configured fallback and never call
    /// [evaluate](Self::evaluate) or [watch](Self::watch).
    fn is_live(&self) -> bool;

    /// Immediately evaluate the query expression against the current
    /// environment.
    fn evaluate(&self, query: &str) -> Result<bool, EnvironmentError>;

    /// Subscribe to match-state changes of the query expression.
    fn watch(&self, query: &str, callback: WatchCallback) -> Result<WatchId, EnvironmentError>;

    /// Detach a subscription. Unknown or already detached ids are ignored.
    fn unwatch(&self, id: WatchId);
}

/// The non-live environment: server or other non-interactive rendering where
/// no matching facility exists. Every match state resolves to its configured
/// fallback for the lifetime of the observing unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEnvironment;

impl NoopEnvironment {
    pub fn new() -> Self {
        Self
    }
}

impl MediaEnvironment for NoopEnvironment {
    fn is_live(&self) -> bool {
        false
    }

    fn evaluate(&self, _query: &str) -> Result<bool, EnvironmentError> {
        Err(EnvironmentError::NotLive)
    }

    fn watch(&self, _query: &str, _callback: WatchCallback) -> Result<WatchId, EnvironmentError> {
        Err(EnvironmentError::NotLive)
    }

    fn unwatch(&self, _id: WatchId) {}
}
