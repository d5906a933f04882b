// ABOUTME: Cancellation handle returned by Deferred::run.
// ABOUTME: Aborts the driving task, which fires any pending cancel callback.

use tokio::task::AbortHandle;

/// Handle for canceling a running Deferred.
#[derive(Debug, Clone)]
pub struct Cancel {
    handle: AbortHandle,
}

impl Cancel {
    pub(crate) fn new(handle: AbortHandle) -> Self {
        Self { handle }
    }

    /// Cancel the computation. Has no effect once it has completed.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the computation has settled or been canceled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Holds the cancel callback of a callback computation until it settles.
pub(crate) struct CancelGuard {
    on_cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl CancelGuard {
    pub(crate) fn new(on_cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    /// The computation settled; the callback must no longer fire.
    pub(crate) fn disarm(&mut self) {
        self.on_cancel = None;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some(on_cancel) = self.on_cancel.take() {
            tracing::debug!("canceling outstanding computation");
            on_cancel();
        }
    }
}
