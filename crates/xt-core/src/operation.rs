//! Shared async operation lifecycle
//!
//! Every user-triggered call in the workbench (upload, analysis run, chat
//! send) goes through the same wrapper so pending/error behavior is uniform:
//! one in-flight call per instance, failures captured as state instead of
//! propagating, and a guaranteed way back to idle.

use std::future::Future;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::debug;

/// Fallback shown when a failure carries no message of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "Operation failed";

/// Lifecycle of one asynchronous operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationStatus<T> {
    /// No call has been made, or the last outcome was cleared
    Idle,

    /// A call is in flight
    Pending,

    /// The last call resolved with a value
    Success(T),

    /// The last call failed; the string is the user-facing message
    Error(String),
}

impl<T> OperationStatus<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, OperationStatus::Pending)
    }
}

/// Single-flight wrapper around an injected asynchronous action.
///
/// `trigger` is the only serialization point: while a call is pending, new
/// triggers are ignored, so rapid repeated input can never produce duplicate
/// submissions. Completion is written through a weak reference, so a result
/// arriving after the owning coordinator was dropped is silently discarded.
pub struct AsyncOperation<T> {
    status: Arc<RwLock<OperationStatus<T>>>,
    runtime: Handle,
}

impl<T: Send + Sync + 'static> AsyncOperation<T> {
    /// Create an idle operation that spawns onto the given runtime
    pub fn new(runtime: Handle) -> Self {
        Self {
            status: Arc::new(RwLock::new(OperationStatus::Idle)),
            runtime,
        }
    }

    /// Start the action unless a call is already in flight.
    ///
    /// Returns whether the action was dispatched. A prior error or result is
    /// cleared on dispatch. The action's failure is converted to a
    /// user-facing message and stored; it is never propagated further.
    pub fn trigger<F>(&self, action: F) -> bool
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        {
            let mut status = self.status.write();
            if status.is_pending() {
                debug!("trigger ignored: operation already pending");
                return false;
            }
            *status = OperationStatus::Pending;
        }

        let status: Weak<RwLock<OperationStatus<T>>> = Arc::downgrade(&self.status);
        self.runtime.spawn(async move {
            let outcome = action.await;

            // The owning coordinator may have been dropped mid-flight; the
            // result is then discarded rather than applied.
            let Some(status) = status.upgrade() else {
                return;
            };
            let mut status = status.write();

            // A reset that raced the completion wins
            if !status.is_pending() {
                return;
            }

            *status = match outcome {
                Ok(value) => OperationStatus::Success(value),
                Err(err) => OperationStatus::Error(failure_message(&err)),
            };
        });

        true
    }

    pub fn is_pending(&self) -> bool {
        self.status.read().is_pending()
    }

    /// The last failure's message, if the operation is in the error state
    pub fn error(&self) -> Option<String> {
        match &*self.status.read() {
            OperationStatus::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(&*self.status.read(), OperationStatus::Success(_))
    }

    /// Consume a success value, returning the operation to idle.
    ///
    /// Returns `None` in every other state.
    pub fn take_success(&self) -> Option<T> {
        let mut status = self.status.write();
        match std::mem::replace(&mut *status, OperationStatus::Idle) {
            OperationStatus::Success(value) => Some(value),
            other => {
                *status = other;
                None
            }
        }
    }

    /// Return to idle, clearing any stored result or error.
    ///
    /// Used when the user edits the form after a settled attempt. A pending
    /// call is not aborted, but its eventual outcome is discarded.
    pub fn reset(&self) {
        *self.status.write() = OperationStatus::Idle;
    }
}

impl<T: Clone + Send + Sync + 'static> AsyncOperation<T> {
    /// Clone of the stored success value, if any
    pub fn result(&self) -> Option<T> {
        match &*self.status.read() {
            OperationStatus::Success(value) => Some(value.clone()),
            _ => None,
        }
    }
}

fn failure_message(err: &anyhow::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn wait_until(deadline_ms: u64, mut done: impl FnMut() -> bool) -> bool {
        for _ in 0..deadline_ms / 5 {
            if done() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        done()
    }

    #[test]
    fn test_success_lifecycle() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let op: AsyncOperation<u32> = AsyncOperation::new(rt.handle().clone());

        assert!(op.trigger(async { Ok(42) }));
        assert!(wait_until(1000, || op.succeeded()));
        assert!(!op.is_pending());
        assert_eq!(op.result(), Some(42));
        assert_eq!(op.error(), None);
    }

    #[test]
    fn test_trigger_while_pending_is_ignored() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let op: AsyncOperation<u32> = AsyncOperation::new(rt.handle().clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        assert!(op.trigger(async move {
            c.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<()>().await;
            Ok(0)
        }));

        // Second trigger must not dispatch a second action
        let c = calls.clone();
        assert!(!op.trigger(async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }));

        assert!(wait_until(1000, || calls.load(Ordering::SeqCst) == 1));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(op.is_pending());
    }

    #[test]
    fn test_rejection_surfaces_message_and_clears_pending() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let op: AsyncOperation<u32> = AsyncOperation::new(rt.handle().clone());

        assert!(op.trigger(async { anyhow::bail!("Custom error message") }));
        assert!(wait_until(1000, || op.error().is_some()));
        assert_eq!(op.error().as_deref(), Some("Custom error message"));
        assert!(!op.is_pending());
    }

    #[test]
    fn test_new_trigger_clears_prior_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let op: AsyncOperation<u32> = AsyncOperation::new(rt.handle().clone());

        op.trigger(async { anyhow::bail!("first failure") });
        assert!(wait_until(1000, || op.error().is_some()));

        assert!(op.trigger(async { Ok(7) }));
        assert_eq!(op.error(), None);
        assert!(wait_until(1000, || op.succeeded()));
        assert_eq!(op.result(), Some(7));
    }

    #[test]
    fn test_take_success_returns_to_idle() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let op: AsyncOperation<String> = AsyncOperation::new(rt.handle().clone());

        op.trigger(async { Ok("reply".to_string()) });
        assert!(wait_until(1000, || op.succeeded()));

        assert_eq!(op.take_success().as_deref(), Some("reply"));
        assert_eq!(op.take_success(), None);
        assert!(!op.is_pending());
        assert!(!op.succeeded());
    }

    #[test]
    fn test_whitespace_only_failure_gets_generic_message() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let op: AsyncOperation<u32> = AsyncOperation::new(rt.handle().clone());

        op.trigger(async { Err(anyhow::anyhow!("   ")) });
        assert!(wait_until(1000, || op.error().is_some()));
        assert_eq!(op.error().as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[test]
    fn test_reset_racing_a_completion_wins() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let op: AsyncOperation<u32> = AsyncOperation::new(rt.handle().clone());
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        let finished = Arc::new(AtomicUsize::new(0));

        let g = gate.clone();
        let f = finished.clone();
        assert!(op.trigger(async move {
            let _permit = g.acquire().await;
            f.fetch_add(1, Ordering::SeqCst);
            Ok(5)
        }));
        assert!(op.is_pending());

        // The user resets while the call is still held open, then the call
        // settles. Its result must not resurrect a stale success.
        op.reset();
        gate.add_permits(1);
        assert!(wait_until(1000, || finished.load(Ordering::SeqCst) == 1));
        std::thread::sleep(Duration::from_millis(20));

        assert!(!op.is_pending());
        assert!(!op.succeeded());
        assert_eq!(op.result(), None);
        assert_eq!(op.error(), None);
    }

    #[test]
    fn test_completion_after_owner_dropped_is_discarded() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let op: AsyncOperation<u32> = AsyncOperation::new(rt.handle().clone());
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        let finished = Arc::new(AtomicUsize::new(0));

        let g = gate.clone();
        let f = finished.clone();
        assert!(op.trigger(async move {
            let _permit = g.acquire().await;
            f.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        }));

        drop(op);
        gate.add_permits(1);

        // The action still runs to completion; its result has nowhere to go
        // and is dropped without panicking.
        assert!(wait_until(1000, || finished.load(Ordering::SeqCst) == 1));
    }

    #[test]
    fn test_reset_clears_error_state() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let op: AsyncOperation<u32> = AsyncOperation::new(rt.handle().clone());

        op.trigger(async { anyhow::bail!("boom") });
        assert!(wait_until(1000, || op.error().is_some()));

        op.reset();
        assert_eq!(op.error(), None);
        assert!(!op.is_pending());

        // The operation is usable again after a reset
        assert!(op.trigger(async { Ok(1) }));
        assert!(wait_until(1000, || op.succeeded()));
    }
}
