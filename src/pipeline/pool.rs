//! Bounded worker pool
//!
//! A dedicated rayon pool with exactly `W` threads. Tasks are independent;
//! results come back over a channel in completion order, exactly once each.

use crate::error::{ConvertError, Result};
use crate::logging::current_dispatch;
use crossbeam_channel::unbounded;
use tracing::debug;

/// Runs closures on at most `workers` threads at a time
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Build a pool of `workers` threads.
    ///
    /// Threads inherit the tracing dispatcher of the calling thread, so worker
    /// events land in the same run log.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(ConvertError::Config("worker count must be at least 1".to_string()));
        }

        let dispatch = current_dispatch();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("worker-{}", i))
            .spawn_handler(move |thread| {
                let dispatch = dispatch.clone();
                let mut builder = std::thread::Builder::new();
                if let Some(name) = thread.name() {
                    builder = builder.name(name.to_owned());
                }
                if let Some(stack_size) = thread.stack_size() {
                    builder = builder.stack_size(stack_size);
                }
                builder.spawn(move || {
                    tracing::dispatcher::with_default(&dispatch, || thread.run())
                })?;
                Ok(())
            })
            .build()
            .map_err(|e| ConvertError::Config(format!("Failed to build worker pool: {}", e)))?;

        debug!("Configured worker pool with {} threads", workers);
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `work` on every task and hand each result to `on_complete` as it finishes.
    ///
    /// `on_complete` runs on the calling thread, in completion order. Returns
    /// once every task has delivered its result.
    pub fn run<T, R, F, C>(&self, tasks: Vec<T>, work: F, mut on_complete: C)
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
        C: FnMut(R),
    {
        let (tx, rx) = unbounded::<R>();
        let work = &work;

        self.pool.in_place_scope(|scope| {
            for task in tasks {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let result = work(task);
                    // The receiver lives until every sender is gone
                    let _ = tx.send(result);
                });
            }
            drop(tx);

            for result in rx.iter() {
                on_complete(result);
            }
        });
    }
}
