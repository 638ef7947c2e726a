//! Background feed loading.
//!
//! A [`Loader`] is bound to one feed URL and one observer.  Each call to
//! [`Loader::start`] begins a *load cycle*: a dedicated thread runs the
//! [`Fetcher`] and then the parser, and the result is posted back to the
//! [`Foreground`] queue, where the observer is invoked.
//!
//! ```text
//!            start()                  fetch + parse ok / failed
//!   Idle ─────────────► Loading(url) ──────────────────────────► Delivered(outcome)
//!     │                     │
//!     │ start(), url = ""   │ cancel()
//!     ▼                     ▼
//!   Delivered(NoFeed)    Cancelled
//! ```
//!
//! Every cycle gets a number.  The background thread and the foreground
//! delivery job both check that their cycle is still the current one *and*
//! that the loader is still `Loading` before going further, so a cancelled
//! or superseded cycle never reaches the observer even if its work has
//! already finished.  The final check runs on the foreground, the same
//! thread that calls `cancel()`, which closes the window between "result
//! ready" and "observer called".
//!
//! ## For contributors
//!
//! The state mutex is never held while the fetcher or the observer runs.
//! The observer may call back into the loader (`start`, `cancel`,
//! `set_url`, `redeliver`) but must not call [`Loader::on_result`].

mod foreground;

pub use foreground::{Foreground, ForegroundHandle};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;

use crate::feed::{self, Earthquake, Fetcher, LoadError};

/// The terminal result of a load cycle, as seen by the observer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The feed was fetched and parsed.
    Loaded {
        earthquakes: Vec<Earthquake>,
        /// Entries dropped for missing or malformed fields.
        skipped: usize,
    },
    /// No URL is configured; nothing was fetched.
    NoFeed,
    /// The fetch or the envelope parse failed.
    Failed(LoadError),
}

/// Snapshot of a loader's lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { url: String },
    Delivered(Outcome),
    Cancelled,
}

type Observer = Box<dyn FnMut(Outcome) + Send>;

struct Shared {
    url: String,
    state: LoadState,
    cycle: u64,
}

struct Inner {
    shared: Mutex<Shared>,
    observer: Mutex<Option<Observer>>,
    fetcher: Arc<dyn Fetcher>,
    foreground: ForegroundHandle,
}

/// Loads one feed in the background and reports each cycle's outcome once.
pub struct Loader {
    inner: Arc<Inner>,
}

/// A handle to one load cycle, returned by [`Loader::start`].
#[derive(Debug, Clone)]
pub struct LoadHandle {
    cycle: u64,
    inner: Weak<Inner>,
}

impl Loader {
    /// Create an idle loader.  Outcomes are delivered on the thread that
    /// drains the [`Foreground`] behind `foreground`.
    pub fn new(url: impl Into<String>, fetcher: Arc<dyn Fetcher>, foreground: ForegroundHandle) -> Self {
        Self {
            inner: Arc::new(Inner {
                shared: Mutex::new(Shared {
                    url: url.into(),
                    state: LoadState::Idle,
                    cycle: 0,
                }),
                observer: Mutex::new(None),
                fetcher,
                foreground,
            }),
        }
    }

    /// Register the observer, replacing any previous one.
    pub fn on_result(&self, observer: impl FnMut(Outcome) + Send + 'static) {
        *lock(&self.inner.observer) = Some(Box::new(observer));
    }

    /// Begin a load cycle.
    ///
    /// While a cycle is in flight this is a no-op that returns the in-flight
    /// cycle's handle.  With an empty URL the loader goes straight to
    /// `Delivered(NoFeed)` without touching the fetcher.
    pub fn start(&self) -> LoadHandle {
        let mut shared = self.inner.lock_shared();

        if let LoadState::Loading { url } = &shared.state {
            tracing::debug!(cycle = shared.cycle, url = %url, "start ignored, already loading");
            return self.handle(shared.cycle);
        }

        shared.cycle += 1;
        let cycle = shared.cycle;

        if shared.url.is_empty() {
            tracing::info!(cycle, "no feed configured");
            shared.state = LoadState::Delivered(Outcome::NoFeed);
            drop(shared);
            self.inner.post_delivery(cycle);
            return self.handle(cycle);
        }

        let url = shared.url.clone();
        tracing::info!(cycle, url = %url, "load started");
        shared.state = LoadState::Loading { url: url.clone() };
        drop(shared);

        let inner = Arc::clone(&self.inner);
        thread::spawn(move || run_cycle(inner, cycle, url));

        self.handle(cycle)
    }

    /// Cancel the in-flight cycle, if any.
    ///
    /// Returns `true` if a cycle was cancelled.  Its result, whenever it
    /// arrives, is dropped.
    pub fn cancel(&self) -> bool {
        self.inner.cancel_cycle(None)
    }

    /// Point the loader at a new URL and start a fresh cycle.
    ///
    /// A cycle still in flight for the old URL is superseded: its result is
    /// never delivered.
    pub fn set_url(&self, url: impl Into<String>) -> LoadHandle {
        {
            let mut shared = self.inner.lock_shared();
            shared.url = url.into();
            if let LoadState::Loading { url } = &shared.state {
                tracing::info!(cycle = shared.cycle, url = %url, "load superseded");
                shared.state = LoadState::Idle;
            }
        }
        self.start()
    }

    /// Hand the last delivered outcome to the observer again.
    ///
    /// Returns `false` (and does nothing) unless the loader is `Delivered`.
    pub fn redeliver(&self) -> bool {
        let cycle = {
            let shared = self.inner.lock_shared();
            if !matches!(shared.state, LoadState::Delivered(_)) {
                return false;
            }
            shared.cycle
        };
        self.inner.post_delivery(cycle)
    }

    pub fn state(&self) -> LoadState {
        self.inner.lock_shared().state.clone()
    }

    pub fn url(&self) -> String {
        self.inner.lock_shared().url.clone()
    }

    fn handle(&self, cycle: u64) -> LoadHandle {
        LoadHandle {
            cycle,
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl LoadHandle {
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Whether this cycle is the loader's current one and still in flight.
    pub fn is_current(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.is_loading(self.cycle))
    }

    /// Cancel this cycle.  Does nothing if a newer cycle has started or this
    /// one already finished.
    pub fn cancel(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.cancel_cycle(Some(self.cycle)))
    }
}

/// Body of the background thread for one cycle.
fn run_cycle(inner: Arc<Inner>, cycle: u64, url: String) {
    let outcome = match inner.fetcher.fetch(&url) {
        Err(e) => {
            tracing::warn!(cycle, url = %url, error = %e, "fetch failed");
            Outcome::Failed(e.into())
        }
        Ok(bytes) => {
            if !inner.is_loading(cycle) {
                tracing::debug!(cycle, "cycle no longer current, skipping parse");
                return;
            }
            match feed::parse_feed(&bytes) {
                Ok(parsed) => {
                    if parsed.skipped > 0 {
                        tracing::debug!(cycle, skipped = parsed.skipped, "skipped malformed entries");
                    }
                    Outcome::Loaded {
                        earthquakes: parsed.earthquakes,
                        skipped: parsed.skipped,
                    }
                }
                Err(e) => {
                    tracing::warn!(cycle, url = %url, error = %e, "parse failed");
                    Outcome::Failed(e.into())
                }
            }
        }
    };

    if !inner.is_loading(cycle) {
        tracing::debug!(cycle, "discarding result of stale cycle");
        return;
    }

    let job_inner = Arc::clone(&inner);
    if !inner
        .foreground
        .post(move || job_inner.complete(cycle, outcome))
    {
        tracing::debug!(cycle, "foreground gone, result dropped");
    }
}

impl Inner {
    fn lock_shared(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    fn is_loading(&self, cycle: u64) -> bool {
        let shared = self.lock_shared();
        shared.cycle == cycle && matches!(shared.state, LoadState::Loading { .. })
    }

    fn cancel_cycle(&self, only: Option<u64>) -> bool {
        let mut shared = self.lock_shared();
        if only.is_some_and(|cycle| cycle != shared.cycle) {
            return false;
        }
        match &shared.state {
            LoadState::Loading { url } => {
                tracing::info!(cycle = shared.cycle, url = %url, "load cancelled");
                shared.state = LoadState::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// Foreground side of a finished background cycle.
    fn complete(&self, cycle: u64, outcome: Outcome) {
        {
            let mut shared = self.lock_shared();
            if shared.cycle != cycle || !matches!(shared.state, LoadState::Loading { .. }) {
                tracing::debug!(cycle, "cycle cancelled or superseded before delivery");
                return;
            }
            shared.state = LoadState::Delivered(outcome.clone());
        }
        tracing::info!(cycle, "load delivered");
        self.notify(outcome);
    }

    /// Queue delivery of the retained outcome of `cycle`.
    fn post_delivery(self: &Arc<Self>, cycle: u64) -> bool {
        let inner = Arc::clone(self);
        self.foreground.post(move || inner.deliver_retained(cycle))
    }

    fn deliver_retained(&self, cycle: u64) {
        let outcome = {
            let shared = self.lock_shared();
            match &shared.state {
                LoadState::Delivered(outcome) if shared.cycle == cycle => outcome.clone(),
                _ => {
                    tracing::debug!(cycle, "retained outcome no longer current");
                    return;
                }
            }
        };
        self.notify(outcome);
    }

    fn notify(&self, outcome: Outcome) {
        match lock(&self.observer).as_mut() {
            Some(observer) => observer(outcome),
            None => tracing::debug!("no observer registered, outcome retained"),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
