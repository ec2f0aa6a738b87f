// ── Match counter ──
//
// Debounced side-channel that keeps a "N matches" readout in step with
// the filter being edited, without coupling it to the primary list fetch.
// Fed through a watch channel; publishes through another.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::filter::{self, FilterValue, QueryParams};

/// Quiet window before a count request goes out. Any edit inside the
/// window restarts the timer; only the last edit of a burst fires.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Something that can answer "how many records match this query".
///
/// The production impl asks the filter endpoint for `per_page=1` and reads
/// `meta.total`; tests substitute fakes with controlled latency.
pub trait CountSource: Send + Sync + 'static {
    fn count(&self, query: QueryParams) -> impl Future<Output = Result<u64, CoreError>> + Send;
}

/// The readout state.
///
/// `Unknown` covers "no filter", "no endpoint", and "last fetch failed" --
/// a stale or zero count is never shown as if it were authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountState {
    Unknown,
    Counting,
    Ready(u64),
}

/// Debounced filter-match counter.
///
/// Spawns a background task on creation; dropping the counter (or calling
/// [`shutdown`](Self::shutdown)) cancels it.
pub struct MatchCounter {
    filter_tx: watch::Sender<FilterValue>,
    state_rx: watch::Receiver<CountState>,
    cancel: CancellationToken,
}

impl MatchCounter {
    /// Spawn a counter over `source`. Pass `None` when the screen has no
    /// counting endpoint configured -- the readout then stays `Unknown`
    /// and no requests are ever issued.
    pub fn spawn<S: CountSource>(source: Option<Arc<S>>) -> Self {
        let (filter_tx, filter_rx) = watch::channel(FilterValue::new());
        let (state_tx, state_rx) = watch::channel(CountState::Unknown);
        let cancel = CancellationToken::new();

        tokio::spawn(counter_task(
            source,
            filter_rx,
            state_tx,
            cancel.clone(),
        ));

        Self {
            filter_tx,
            state_rx,
            cancel,
        }
    }

    /// Feed the latest filter value. Returns immediately; the count
    /// arrives through [`subscribe`](Self::subscribe) after the debounce
    /// window closes.
    pub fn update(&self, filter: FilterValue) {
        let _ = self.filter_tx.send(filter);
    }

    /// Current readout.
    pub fn state(&self) -> CountState {
        *self.state_rx.borrow()
    }

    /// Watch the readout change over time.
    pub fn subscribe(&self) -> watch::Receiver<CountState> {
        self.state_rx.clone()
    }

    /// Stop the background task.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for MatchCounter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn counter_task<S: CountSource>(
    source: Option<Arc<S>>,
    mut filter_rx: watch::Receiver<FilterValue>,
    state_tx: watch::Sender<CountState>,
    cancel: CancellationToken,
) {
    // Monotonic request generation. A response is applied only while it is
    // still the newest issued request -- in-flight requests are not
    // cancelled on supersession, so without this a slow stale response
    // could overwrite a faster, newer one.
    let generation = Arc::new(AtomicU64::new(0));

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            changed = filter_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        // Debounce: every further edit restarts the quiet window.
        loop {
            tokio::select! {
                () = cancel.cancelled() => return,
                () = tokio::time::sleep(DEBOUNCE) => break,
                changed = filter_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }

        let snapshot = filter_rx.borrow_and_update().clone();

        if snapshot.is_empty() {
            let _ = state_tx.send(CountState::Unknown);
            continue;
        }
        let Some(ref source) = source else {
            let _ = state_tx.send(CountState::Unknown);
            continue;
        };

        let this_generation = generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = state_tx.send(CountState::Counting);

        let query = filter::encode(&snapshot);
        let source = Arc::clone(source);
        let state_tx = state_tx.clone();
        let generation = Arc::clone(&generation);

        tokio::spawn(async move {
            let result = source.count(query).await;

            if generation.load(Ordering::SeqCst) != this_generation {
                debug!("discarding superseded count response");
                return;
            }

            match result {
                Ok(total) => {
                    let _ = state_tx.send(CountState::Ready(total));
                }
                Err(e) => {
                    // Count failures never block filter editing; the
                    // readout just degrades to unknown.
                    warn!(error = %e, "match count fetch failed");
                    let _ = state_tx.send(CountState::Unknown);
                }
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;

    struct FakeSource {
        calls: AtomicUsize,
        queries: Mutex<Vec<QueryParams>>,
        /// Per-call (latency, result) script; repeats the last entry.
        script: Vec<(Duration, Result<u64, ()>)>,
    }

    impl FakeSource {
        fn instant(results: Vec<Result<u64, ()>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
                script: results
                    .into_iter()
                    .map(|r| (Duration::ZERO, r))
                    .collect(),
            })
        }

        fn scripted(script: Vec<(Duration, Result<u64, ()>)>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
                script,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CountSource for FakeSource {
        async fn count(&self, query: QueryParams) -> Result<u64, CoreError> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query);
            let (latency, result) = self
                .script
                .get(index)
                .or_else(|| self.script.last())
                .cloned()
                .unwrap_or((Duration::ZERO, Ok(0)));
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result.map_err(|()| CoreError::Internal("count failed".into()))
        }
    }

    fn filter_with_min_age(age: f64) -> FilterValue {
        let mut f = FilterValue::new();
        f.update("min_age", Some(age.into()));
        f
    }

    async fn wait_for(rx: &mut watch::Receiver<CountState>, target: CountState) {
        loop {
            if *rx.borrow_and_update() == target {
                return;
            }
            rx.changed().await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_collapses_a_burst_into_one_request() {
        let source = FakeSource::instant(vec![Ok(7)]);
        let counter = MatchCounter::spawn(Some(Arc::clone(&source)));
        let mut rx = counter.subscribe();

        // Three edits 100ms apart: well inside the 500ms window.
        counter.update(filter_with_min_age(20.0));
        tokio::time::sleep(Duration::from_millis(100)).await;
        counter.update(filter_with_min_age(25.0));
        tokio::time::sleep(Duration::from_millis(100)).await;
        counter.update(filter_with_min_age(30.0));

        wait_for(&mut rx, CountState::Ready(7)).await;

        assert_eq!(source.call_count(), 1);
        // The one request carried the value from the last edit.
        let queries = source.queries.lock().unwrap();
        assert_eq!(
            queries[0],
            vec![("min_age".to_owned(), "30".to_owned())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_filter_resets_to_unknown_without_a_request() {
        let source = FakeSource::instant(vec![Ok(3)]);
        let counter = MatchCounter::spawn(Some(Arc::clone(&source)));
        let mut rx = counter.subscribe();

        counter.update(filter_with_min_age(20.0));
        wait_for(&mut rx, CountState::Ready(3)).await;
        assert_eq!(source.call_count(), 1);

        counter.update(FilterValue::new());
        wait_for(&mut rx, CountState::Unknown).await;
        // Clearing the filter issued no request.
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_endpoint_never_issues_requests() {
        let counter = MatchCounter::spawn(None::<Arc<FakeSource>>);

        counter.update(filter_with_min_age(20.0));
        // Well past the debounce window: still unknown, nothing fired.
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(counter.state(), CountState::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_degrades_to_unknown() {
        let source = FakeSource::instant(vec![Err(())]);
        let counter = MatchCounter::spawn(Some(Arc::clone(&source)));

        counter.update(filter_with_min_age(20.0));

        // Drive time until the debounced request has fired and failed.
        while source.call_count() == 0 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The failure degraded the readout, never surfaced as an error.
        assert_eq!(counter.state(), CountState::Unknown);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_does_not_overwrite_newer_one() {
        // First request is slow (returns 100), second is fast (returns 2).
        let source = FakeSource::scripted(vec![
            (Duration::from_millis(2_000), Ok(100)),
            (Duration::from_millis(10), Ok(2)),
        ]);
        let counter = MatchCounter::spawn(Some(Arc::clone(&source)));
        let mut rx = counter.subscribe();

        counter.update(filter_with_min_age(20.0));
        // Let the first request launch, then edit again while in flight.
        tokio::time::sleep(Duration::from_millis(600)).await;
        counter.update(filter_with_min_age(25.0));

        wait_for(&mut rx, CountState::Ready(2)).await;

        // Give the slow response time to land; it must be discarded.
        tokio::time::sleep(Duration::from_millis(3_000)).await;
        assert_eq!(counter.state(), CountState::Ready(2));
        assert_eq!(source.call_count(), 2);
    }
}
