//! Fixed worker pool and the between-level barrier discipline.
//!
//! Every engine expresses one tree level as a single parallel step on this
//! pool. The step's join returns only after all of its tasks have finished
//! and their writes are visible, so the join is the barrier separating one
//! level from the next. Within a step, work is partitioned into disjoint
//! chunks of the working buffer, which is what makes the concurrent writes
//! race-free in the first place.

use std::num::NonZeroUsize;
use std::thread;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;

/// Engine configuration, passed explicitly by callers.
///
/// The library never reads process-wide state; anything environmental
/// (worker-count overrides and the like) is resolved by the caller before
/// this struct is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of worker threads in the fixed pool.
    pub workers: usize,
}

impl EngineConfig {
    /// Configuration with an explicit worker count, clamped to at least 1.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(4);
        Self { workers }
    }
}

/// Fixed pool of worker threads shared by all leveled engines.
///
/// The worker count is set once at construction and never changes for the
/// pool's lifetime, so level counts and block decompositions reported by
/// the engines always refer to the same degree of parallelism.
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let workers = config.workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("treescan-worker-{}", i))
            .build()?;
        Ok(Self { pool, workers })
    }

    /// Configured worker count. Also the default block count for the
    /// block-decomposition engines.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs one barrier-terminated parallel step.
    ///
    /// Returns only after every task spawned inside `step` has completed,
    /// so all writes made during the step are visible to the caller and to
    /// the following step.
    pub(crate) fn barrier_step<R: Send>(&self, step: impl FnOnce() -> R + Send) -> R {
        self.pool.install(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn worker_count_is_fixed() {
        let pool = WorkerPool::new(&EngineConfig::with_workers(3)).unwrap();
        assert_eq!(pool.workers(), 3);
    }

    #[test]
    fn zero_workers_clamps_to_one() {
        let config = EngineConfig::with_workers(0);
        assert_eq!(config.workers, 1);
        let pool = WorkerPool::new(&config).unwrap();
        assert_eq!(pool.workers(), 1);
    }

    #[test]
    fn default_config_has_at_least_one_worker() {
        assert!(EngineConfig::default().workers >= 1);
    }

    #[test]
    fn barrier_step_writes_are_visible_after_return() {
        let pool = WorkerPool::new(&EngineConfig::with_workers(4)).unwrap();
        let mut data = vec![0u64; 1024];
        pool.barrier_step(|| {
            data.par_iter_mut()
                .enumerate()
                .for_each(|(i, slot)| *slot = i as u64);
        });
        assert!(data.iter().enumerate().all(|(i, &v)| v == i as u64));
    }
}
