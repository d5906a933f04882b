// ABOUTME: Lazy, cancelable deferred computation with separate success and error channels.
// ABOUTME: Every remote interaction in d2ship is modelled as a Deferred and composed with map/flat_map.

mod cancel;
mod parallel;

pub use cancel::Cancel;

use std::future::{Future, IntoFuture};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::Error;

use cancel::CancelGuard;

/// Settles a callback computation with a success value.
pub type Resolve<T> = Box<dyn FnOnce(T) + Send>;

/// Settles a callback computation with an error.
pub type Reject = Box<dyn FnOnce(Error) + Send>;

type Thunk<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, Error>> + Send>;

/// A computation that has not started yet.
///
/// Nothing happens until the value is either awaited or handed to [`Deferred::run`].
/// Exactly one of a success value or an [`Error`] is produced. A `Deferred` is
/// consumed when it runs, so the type system rules out running it twice.
#[must_use = "a Deferred does nothing until it is run or awaited"]
pub struct Deferred<T> {
    thunk: Thunk<T>,
}

impl<T> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Deferred<T> {
    /// Wrap an async computation. `start` is only invoked when the Deferred runs.
    pub fn new<F, Fut>(start: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        Self {
            thunk: Box::new(move || start().boxed()),
        }
    }

    /// Build a Deferred from a callback-style computation.
    ///
    /// The computation receives resolve/reject handles and returns a cancel
    /// callback. The cancel callback fires if the Deferred is canceled (or its
    /// driving future dropped) before either handle is used.
    pub fn from_computation<C, K>(computation: C) -> Self
    where
        C: FnOnce(Resolve<T>, Reject) -> K + Send + 'static,
        K: FnOnce() + Send + 'static,
    {
        Self::new(move || {
            let (tx, rx) = oneshot::channel::<Result<T, Error>>();
            let slot = Arc::new(Mutex::new(Some(tx)));

            let resolve_slot = Arc::clone(&slot);
            let resolve: Resolve<T> = Box::new(move |value| {
                if let Some(tx) = resolve_slot.lock().take() {
                    let _ = tx.send(Ok(value));
                }
            });
            let reject: Reject = Box::new(move |err| {
                if let Some(tx) = slot.lock().take() {
                    let _ = tx.send(Err(err));
                }
            });

            let mut guard = CancelGuard::new(computation(resolve, reject));

            async move {
                let outcome = rx.await;
                guard.disarm();
                outcome.unwrap_or(Err(Error::Abandoned))
            }
        })
    }

    /// An already-resolved Deferred.
    pub fn success(value: T) -> Self {
        Self::new(move || async move { Ok(value) })
    }

    /// An already-rejected Deferred.
    pub fn error(err: Error) -> Self {
        Self::new(move || async move { Err(err) })
    }

    /// Transform the success value.
    pub fn map<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Deferred::new(move || {
            let inner = (self.thunk)();
            async move { inner.await.map(f) }
        })
    }

    /// Chain a dependent computation on the success value.
    pub fn flat_map<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Deferred<U> + Send + 'static,
    {
        Deferred::new(move || {
            let inner = (self.thunk)();
            async move {
                let value = inner.await?;
                f(value).await
            }
        })
    }

    /// Recover from, or replace, an error with another computation.
    pub fn flat_map_error<F>(self, f: F) -> Deferred<T>
    where
        F: FnOnce(Error) -> Deferred<T> + Send + 'static,
    {
        Deferred::new(move || {
            let inner = (self.thunk)();
            async move {
                match inner.await {
                    Ok(value) => Ok(value),
                    Err(err) => f(err).await,
                }
            }
        })
    }

    /// Transform the error without changing the success channel.
    pub fn map_error<F>(self, f: F) -> Deferred<T>
    where
        F: FnOnce(Error) -> Error + Send + 'static,
    {
        Deferred::new(move || {
            let inner = (self.thunk)();
            async move { inner.await.map_err(f) }
        })
    }

    /// Observe the success value.
    pub fn tap<F>(self, f: F) -> Deferred<T>
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.map(move |value| {
            f(&value);
            value
        })
    }

    /// Discard the success value.
    pub fn void(self) -> Deferred<()> {
        self.map(|_| ())
    }

    /// Start the computation on the tokio runtime and report the outcome
    /// through exactly one of the callbacks.
    ///
    /// Must be called from within a tokio runtime. The returned handle cancels
    /// the computation if it is still outstanding.
    pub fn run<S, E>(self, on_success: S, on_error: E) -> Cancel
    where
        S: FnOnce(T) + Send + 'static,
        E: FnOnce(Error) + Send + 'static,
    {
        let future = (self.thunk)();
        let handle = tokio::spawn(async move {
            match future.await {
                Ok(value) => on_success(value),
                Err(err) => on_error(err),
            }
        });
        Cancel::new(handle.abort_handle())
    }

    /// Run every Deferred concurrently and collect the values in input order.
    ///
    /// Fails with the first error observed; the remaining computations keep
    /// running but are no longer awaited. Canceling the combined Deferred
    /// before it settles aborts every child, firing their cancel callbacks.
    pub fn parallel(deferreds: Vec<Deferred<T>>) -> Deferred<Vec<T>> {
        parallel::parallel(deferreds)
    }
}

impl Deferred<()> {
    /// A Deferred that succeeds with no value.
    pub fn empty() -> Self {
        Self::success(())
    }
}

impl<T> IntoFuture for Deferred<T> {
    type Output = Result<T, Error>;
    type IntoFuture = BoxFuture<'static, Result<T, Error>>;

    fn into_future(self) -> Self::IntoFuture {
        (self.thunk)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn computation_does_not_start_until_awaited() {
        let started = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&started);
        let deferred = Deferred::new(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        });

        assert_eq!(started.load(Ordering::SeqCst), 0);
        assert_eq!(deferred.await.unwrap(), 7);
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn map_is_skipped_after_error() {
        let mapped = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&mapped);
        let result = Deferred::<u32>::error(Error::transport("down"))
            .map(move |v| {
                counter.fetch_add(1, Ordering::SeqCst);
                v + 1
            })
            .await;

        assert_eq!(result.unwrap_err().to_string(), "down");
        assert_eq!(mapped.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn from_computation_resolves_once() {
        let deferred = Deferred::from_computation(|resolve, reject| {
            resolve(1);
            reject(Error::transport("ignored"));
            || {}
        });
        assert_eq!(deferred.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn dropped_handles_abandon_the_computation() {
        let deferred = Deferred::<u8>::from_computation(|_resolve, _reject| || {});
        assert!(matches!(deferred.await, Err(Error::Abandoned)));
    }
}
