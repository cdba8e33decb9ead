//! Worker pools for background loads
//!
//! The cache only needs two things from a pool: fire-and-forget submission
//! and a way to wait until nothing is in flight. [`LoaderPool`] provides both
//! on top of a dedicated Rayon thread pool; [`InlinePool`] runs every task on
//! the submitting thread.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use tracing::error;

use crate::error::CacheError;

/// A unit of background work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Default number of loader threads
pub const DEFAULT_LOADER_THREADS: usize = 2;

/// Executes background loads.
pub trait WorkerPool: Send + Sync {
    /// Run `task` on some thread and return immediately.
    fn submit(&self, task: Task);

    /// Block until every submitted task has finished.
    fn wait_for_done(&self);
}

/// Count of tasks submitted but not yet finished.
#[derive(Default)]
struct InFlight {
    count: Mutex<usize>,
    drained: Condvar,
}

impl InFlight {
    fn begin(&self) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn end(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    fn wait(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        while *count > 0 {
            count = self
                .drained
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn pending(&self) -> usize {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decrements the in-flight count even if the task panics.
struct Finish(Arc<InFlight>);

impl Drop for Finish {
    fn drop(&mut self) {
        self.0.end();
    }
}

/// Rayon-backed pool with a fixed number of loader threads.
pub struct LoaderPool {
    pool: rayon::ThreadPool,
    in_flight: Arc<InFlight>,
}

impl LoaderPool {
    /// Build a pool with `threads` loader threads.
    pub fn new(threads: usize) -> Result<Self, CacheError> {
        if threads == 0 {
            return Err(CacheError::NoLoaderThreads);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("slotcache-loader-{}", i))
            .panic_handler(|_| error!("Background image load panicked"))
            .build()?;

        Ok(Self {
            pool,
            in_flight: Arc::new(InFlight::default()),
        })
    }

    /// Number of loader threads
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Tasks submitted but not yet finished
    pub fn pending(&self) -> usize {
        self.in_flight.pending()
    }
}

impl WorkerPool for LoaderPool {
    fn submit(&self, task: Task) {
        self.in_flight.begin();
        let finish = Finish(Arc::clone(&self.in_flight));
        self.pool.spawn(move || {
            let _finish = finish;
            task();
        });
    }

    fn wait_for_done(&self) {
        self.in_flight.wait();
    }
}

/// Runs tasks synchronously on the submitting thread.
///
/// Useful where no background threads are wanted (tests, one-shot tools).
#[derive(Debug, Default, Clone, Copy)]
pub struct InlinePool;

impl WorkerPool for InlinePool {
    fn submit(&self, task: Task) {
        task();
    }

    fn wait_for_done(&self) {}
}
