//! The foreground dispatch queue.
//!
//! Background work never calls the observer directly.  It posts a job to a
//! [`ForegroundHandle`], and whichever thread owns the matching
//! [`Foreground`] runs the job when it drains the queue.  In the TUI that is
//! the event loop, once per tick.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

type Job = Box<dyn FnOnce() + Send>;

/// The receiving end, owned by the foreground thread.
pub struct Foreground {
    tx: Sender<Job>,
    rx: Receiver<Job>,
}

/// A cloneable handle for posting jobs onto a [`Foreground`].
#[derive(Clone)]
pub struct ForegroundHandle {
    tx: Sender<Job>,
}

impl Foreground {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn handle(&self) -> ForegroundHandle {
        ForegroundHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run every job that is already queued, including any posted by the
    /// jobs themselves.  Never blocks.  Returns how many jobs ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait up to `timeout` for one job and run it.
    ///
    /// Returns `false` if nothing arrived in time.
    pub fn run_next(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(job) => {
                job();
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }
}

impl Default for Foreground {
    fn default() -> Self {
        Self::new()
    }
}

impl ForegroundHandle {
    /// Queue `job` for the foreground thread.
    ///
    /// Returns `false` if the [`Foreground`] has been dropped; the job is
    /// discarded in that case.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) -> bool {
        self.tx.send(Box::new(job)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn jobs_run_only_when_drained() {
        let fg = Foreground::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = Arc::clone(&hits);
        assert!(fg.handle().post(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        assert_eq!(fg.run_pending(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(fg.run_pending(), 0);
    }

    #[test]
    fn jobs_from_other_threads_run_on_the_draining_thread() {
        let fg = Foreground::new();
        let handle = fg.handle();
        let ran_on = Arc::new(std::sync::Mutex::new(None));

        let slot = Arc::clone(&ran_on);
        thread::spawn(move || {
            handle.post(move || {
                *slot.lock().unwrap() = Some(thread::current().id());
            });
        })
        .join()
        .unwrap();

        assert!(fg.run_next(Duration::from_secs(1)));
        assert_eq!(*ran_on.lock().unwrap(), Some(thread::current().id()));
    }

    #[test]
    fn run_pending_includes_jobs_posted_while_draining() {
        let fg = Foreground::new();
        let handle = fg.handle();
        let inner = fg.handle();

        handle.post(move || {
            inner.post(|| {});
        });

        assert_eq!(fg.run_pending(), 2);
    }

    #[test]
    fn run_next_times_out_when_idle() {
        let fg = Foreground::new();
        assert!(!fg.run_next(Duration::from_millis(10)));
    }

    #[test]
    fn post_fails_after_foreground_dropped() {
        let fg = Foreground::new();
        let handle = fg.handle();
        drop(fg);
        assert!(!handle.post(|| {}));
    }
}
