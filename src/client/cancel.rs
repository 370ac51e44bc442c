//! Request cancellation tied to the lifetime of whatever started the request.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard},
};

use futures::future::{AbortHandle, Abortable};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("request cancelled")]
pub struct Cancelled;

#[derive(Default)]
struct ScopeInner {
    cancelled: bool,
    next_id: u64,
    in_flight: Vec<(u64, AbortHandle)>,
}

fn lock(inner: &Mutex<ScopeInner>) -> MutexGuard<'_, ScopeInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Owns the in-flight requests of one view. Dropping the scope aborts them.
#[derive(Default)]
pub struct RequestScope {
    inner: Arc<Mutex<ScopeInner>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fut` until it completes or the scope is cancelled.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        let (handle, registration) = AbortHandle::new_pair();
        let id = {
            let mut inner = lock(&self.inner);
            if inner.cancelled {
                return Err(Cancelled);
            }
            let id = inner.next_id;
            inner.next_id += 1;
            inner.in_flight.push((id, handle));
            id
        };

        let out = Abortable::new(fut, registration).await;
        lock(&self.inner).in_flight.retain(|(i, _)| *i != id);
        out.map_err(|_| Cancelled)
    }

    pub fn cancel(&self) {
        cancel_inner(&self.inner);
    }

    pub fn is_cancelled(&self) -> bool {
        lock(&self.inner).cancelled
    }

    /// Handle that can cancel this scope from elsewhere, e.g. a teardown hook.
    pub fn canceller(&self) -> Canceller {
        Canceller {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn in_flight(&self) -> usize {
        lock(&self.inner).in_flight.len()
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        cancel_inner(&self.inner);
    }
}

#[derive(Clone)]
pub struct Canceller {
    inner: Arc<Mutex<ScopeInner>>,
}

impl Canceller {
    pub fn cancel(&self) {
        cancel_inner(&self.inner);
    }
}

fn cancel_inner(inner: &Mutex<ScopeInner>) {
    let mut inner = lock(inner);
    inner.cancelled = true;
    for (_, handle) in inner.in_flight.drain(..) {
        handle.abort();
    }
}
