use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use pinrank_core::error::{Error, Result};
use pinrank_core::traits::PinStore;
use pinrank_core::types::PinRecord;

pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Caps how long a candidate lookup may take.
///
/// The wrapped lookup runs on its own thread; if it has not answered within
/// `budget` the caller gets [`Error::StoreUnavailable`] and the late answer is
/// thrown away. At most `max_in_flight` lookups run at once, counting the ones
/// that already timed out but have not returned yet; past that, calls fail
/// immediately instead of starting another thread. A zero budget disables the
/// bound and calls the store inline.
pub struct BoundedPinStore<S> {
    inner: Arc<S>,
    budget: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

/// Releases an in-flight slot when the lookup thread finishes, panics included.
struct Slot(Arc<AtomicUsize>);

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<S: PinStore + 'static> BoundedPinStore<S> {
    pub fn new(inner: Arc<S>, budget: Duration) -> Self {
        Self { inner, budget, max_in_flight: DEFAULT_MAX_IN_FLIGHT, in_flight: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn budget(&self) -> Duration { self.budget }

    pub fn inner(&self) -> &Arc<S> { &self.inner }

    /// Lookups started and not yet returned by the wrapped store.
    pub fn in_flight(&self) -> usize { self.in_flight.load(Ordering::Acquire) }

    fn acquire(&self) -> Option<Slot> {
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < self.max_in_flight).then_some(n + 1))
            .ok()
            .map(|_| Slot(Arc::clone(&self.in_flight)))
    }
}

impl<S: PinStore + 'static> PinStore for BoundedPinStore<S> {
    fn find_candidates(&self, query: &str) -> Result<Vec<PinRecord>> {
        if self.budget.is_zero() {
            return self.inner.find_candidates(query);
        }

        let Some(slot) = self.acquire() else {
            warn!(max_in_flight = self.max_in_flight, "pin lookups saturated");
            return Err(Error::StoreUnavailable(format!(
                "{} lookups already in flight",
                self.max_in_flight
            )));
        };

        let (tx, rx) = mpsc::sync_channel(1);
        let store = Arc::clone(&self.inner);
        let owned_query = query.to_string();
        thread::Builder::new()
            .name("pin-lookup".to_string())
            .spawn(move || {
                let _slot = slot;
                // Receiver is gone once the budget ran out.
                let _ = tx.send(store.find_candidates(&owned_query));
            })
            .map_err(|e| Error::StoreUnavailable(format!("could not start lookup: {e}")))?;

        match rx.recv_timeout(self.budget) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                let budget_ms = u64::try_from(self.budget.as_millis()).unwrap_or(u64::MAX);
                warn!(budget_ms, "pin lookup timed out");
                Err(Error::StoreUnavailable(format!("lookup exceeded {:?} budget", self.budget)))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(Error::StoreUnavailable("lookup worker exited without a result".to_string()))
            }
        }
    }
}
