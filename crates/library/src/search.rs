//! Search-as-you-type pipeline.
//!
//! A [`LiveSearch`] sits between a text field and a repository: callers
//! push raw keystrokes through [`set_query`](LiveSearch::set_query) and
//! subscribe to a results channel that only ever reflects the most recent
//! query. Three behaviours make it usable against a real store:
//!
//! * **Debounce** — a query must survive a quiet period before it runs,
//!   so intermediate keystrokes never hit SQLite.
//! * **Last-writer-wins** — editing the query drops the in-flight result
//!   stream; a stale snapshot can never overwrite a newer one.
//! * **Linger** — the driver stays warm for a grace period after the last
//!   subscriber leaves, so a quick navigation round-trip resubscribes to
//!   the same stream instead of re-running the query.

use futures::StreamExt;
use futures::stream::BoxStream;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tracing::{debug, warn};

/// Live snapshots of one queryable collection.
pub trait SearchSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Stream of snapshots of the whole collection, re-emitting on change.
    fn all(&self) -> BoxStream<'static, quire_store::error::Result<Vec<Self::Item>>>;

    /// Stream of snapshots filtered by `query`, re-emitting on change.
    fn search(&self, query: &str) -> BoxStream<'static, quire_store::error::Result<Vec<Self::Item>>>;
}

enum DriverState {
    Idle,
    Running,
}

struct Shared<S: SearchSource> {
    source: S,
    debounce: Duration,
    linger: Duration,
    query_tx: watch::Sender<String>,
    results_tx: watch::Sender<Vec<S::Item>>,
    wakeup: Notify,
    driver: Mutex<DriverState>,
}

/// A debounced, subscriber-counted live query over one [`SearchSource`].
///
/// The underlying driver task is spawned lazily on the first
/// [`subscribe`](Self::subscribe) and torn down once the linger period
/// passes with no subscribers, so an idle search costs nothing.
pub struct LiveSearch<S: SearchSource> {
    shared: Arc<Shared<S>>,
}

impl<S: SearchSource> Clone for LiveSearch<S> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<S: SearchSource> LiveSearch<S> {
    pub fn new(source: S, debounce: Duration, linger: Duration) -> Self {
        let (query_tx, _) = watch::channel(String::new());
        let (results_tx, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                source,
                debounce,
                linger,
                query_tx,
                results_tx,
                wakeup: Notify::new(),
                driver: Mutex::new(DriverState::Idle),
            }),
        }
    }

    /// Replace the current query text. A blank query means "browse
    /// everything". Never blocks; the debounce window decides when (and
    /// whether) this particular value executes.
    pub fn set_query(&self, query: impl Into<String>) {
        self.shared.query_tx.send_replace(query.into());
    }

    /// The query text as last set.
    pub fn query(&self) -> String {
        self.shared.query_tx.borrow().clone()
    }

    /// Subscribe to result snapshots. Spawns the driver task if it is not
    /// already running, so this must be called from within a Tokio runtime.
    ///
    /// The receiver starts out holding the last published snapshot (an
    /// empty list before the first query completes).
    pub fn subscribe(&self) -> watch::Receiver<Vec<S::Item>> {
        // Register the receiver before waking the driver so an in-progress
        // teardown sees a non-zero subscriber count.
        let rx = self.shared.results_tx.subscribe();
        let mut state = lock(&self.shared.driver);
        if matches!(*state, DriverState::Idle) {
            *state = DriverState::Running;
            tokio::spawn(drive(Arc::clone(&self.shared)));
        }
        drop(state);
        self.shared.wakeup.notify_waiters();
        rx
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn drive<S: SearchSource>(shared: Arc<Shared<S>>) {
    let mut queries = shared.query_tx.subscribe();
    let mut current = queries.borrow_and_update().clone();
    'session: loop {
        // Let the query settle: every edit restarts the quiet period.
        loop {
            tokio::select! {
                changed = queries.changed() => {
                    if changed.is_err() {
                        break 'session;
                    }
                    current = queries.borrow_and_update().clone();
                }
                () = tokio::time::sleep(shared.debounce) => break,
            }
        }

        debug!(query = %current, "opening search session");
        let mut snapshots = if current.trim().is_empty() {
            shared.source.all()
        } else {
            shared.source.search(&current)
        };

        loop {
            tokio::select! {
                changed = queries.changed() => {
                    if changed.is_err() {
                        break 'session;
                    }
                    current = queries.borrow_and_update().clone();
                    // Dropping `snapshots` abandons the in-flight query, so
                    // a stale result can never land after a newer edit.
                    continue 'session;
                }
                () = shared.results_tx.closed() => {
                    tokio::select! {
                        () = shared.wakeup.notified() => {}
                        () = tokio::time::sleep(shared.linger) => {
                            let mut state = lock(&shared.driver);
                            if shared.results_tx.receiver_count() == 0 {
                                *state = DriverState::Idle;
                                debug!("search session torn down after linger");
                                return;
                            }
                        }
                    }
                }
                snapshot = snapshots.next() => match snapshot {
                    Some(Ok(items)) => {
                        shared.results_tx.send_replace(items);
                    }
                    Some(Err(err)) => {
                        // Keep the last good snapshot on a transient store
                        // failure; the next change notification re-queries.
                        warn!(query = %current, error = %err, "search query failed");
                    }
                    None => {
                        // Source exhausted; nothing more until the query
                        // changes.
                        if queries.changed().await.is_err() {
                            break 'session;
                        }
                        current = queries.borrow_and_update().clone();
                        continue 'session;
                    }
                },
            }
        }
    }
}
