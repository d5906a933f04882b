// ABOUTME: Concurrent fan-out for Deferred computations.
// ABOUTME: Dispatches every computation up front, preserves input order, fails on the first error.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::task::AbortHandle;

use super::Deferred;
use crate::error::Error;

/// Aborts the spawned children if the fan-out is dropped before it settles.
struct Children {
    handles: Vec<AbortHandle>,
}

impl Children {
    /// The fan-out settled; children still running are left detached.
    fn detach(mut self) {
        self.handles.clear();
    }
}

impl Drop for Children {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            tracing::debug!(children = self.handles.len(), "canceling parallel children");
        }
        for handle in &self.handles {
            handle.abort();
        }
    }
}

pub(super) fn parallel<T: Send + 'static>(deferreds: Vec<Deferred<T>>) -> Deferred<Vec<T>> {
    Deferred::new(move || async move {
        let total = deferreds.len();
        let mut children = Children {
            handles: Vec::with_capacity(total),
        };

        // Spawning dispatches every computation even if an early one fails.
        let mut pending: FuturesUnordered<_> = deferreds
            .into_iter()
            .enumerate()
            .map(|(index, deferred)| {
                let handle = tokio::spawn(deferred.into_future());
                children.handles.push(handle.abort_handle());
                async move { (index, handle.await) }
            })
            .collect();

        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();

        while let Some((index, joined)) = pending.next().await {
            match joined {
                Ok(Ok(value)) => slots[index] = Some(value),
                Ok(Err(err)) => {
                    children.detach();
                    return Err(err);
                }
                Err(join_error) if join_error.is_panic() => {
                    children.detach();
                    std::panic::resume_unwind(join_error.into_panic())
                }
                Err(_) => {
                    children.detach();
                    return Err(Error::Canceled);
                }
            }
        }

        children.detach();
        Ok(slots.into_iter().flatten().collect())
    })
}
