//! Barrier-synchronized parallel reduction and prefix scan over monoids.
//!
//! One primitive drives everything: a level-by-level traversal where each
//! level is a single parallel step over disjoint windows of a working
//! buffer and the step's join is the barrier to the next level. On top of
//! it sit tree reduction, the work-efficient two-phase prefix scan, and
//! block-decomposition variants of both, all generic over an associative
//! operator with identity and all verified against sequential oracles.

pub mod blelloch;
pub mod blocked;
pub mod buffer;
pub mod error;
pub mod monoid;
pub mod observer;
pub mod outcome;
pub mod pool;
pub mod reduction;
pub mod sequential;
pub mod source;
pub mod verify;

pub use buffer::PaddedBuffer;
pub use error::{Result, ScanError};
pub use monoid::{MaxOp, Monoid, SumOp};
pub use observer::{LevelObserver, Phase, Snapshot, SnapshotRecorder, DEFAULT_SNAPSHOT_PREFIX};
pub use outcome::{ReduceOutcome, ScanOutcome};
pub use pool::{EngineConfig, WorkerPool};
pub use source::ValueSource;
pub use verify::{
    compare_reduce_strategies, compare_scan_strategies, compare_sequences, ReduceComparison,
    ReduceReport, ScanComparison, ScanReport, SequenceCheck,
};

use std::fmt;

/// Reduction strategy selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceStrategy {
    /// Whole-slice fold/reduce on the pool, one joined level.
    Flat,
    /// Explicit stride-doubling tree, one barrier per level.
    Tree,
    /// Contiguous per-worker blocks, sequential combine of summaries.
    SectionsBlock,
}

impl fmt::Display for ReduceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ReduceStrategy::Flat => "flat",
            ReduceStrategy::Tree => "tree",
            ReduceStrategy::SectionsBlock => "sections-block",
        })
    }
}

/// Prefix-scan strategy selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Work-efficient upsweep/downsweep over an identity-padded buffer.
    Blelloch,
    /// Local scans per block, sequential block offsets, offset broadcast.
    BlockDecomposition,
    /// Single-threaded left-to-right reference.
    Sequential,
}

impl fmt::Display for ScanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ScanStrategy::Blelloch => "blelloch",
            ScanStrategy::BlockDecomposition => "block-decomposition",
            ScanStrategy::Sequential => "sequential",
        })
    }
}

/// Reduces `values` under `op` with the chosen strategy.
///
/// Block-decomposition strategies use one block per pool worker; call
/// [`blocked::block_reduce`] directly for an explicit block count.
pub fn reduce<T, M>(
    pool: &WorkerPool,
    values: &[T],
    op: M,
    strategy: ReduceStrategy,
) -> Result<ReduceOutcome<T>>
where
    T: Copy + Send + Sync,
    M: Monoid<T>,
{
    match strategy {
        ReduceStrategy::Flat => reduction::flat_reduce(pool, values, op),
        ReduceStrategy::Tree => reduction::tree_reduce(pool, values, op),
        ReduceStrategy::SectionsBlock => blocked::block_reduce(pool, values, op, pool.workers()),
    }
}

/// Inclusive prefix scan of `values` under `op` with the chosen strategy.
///
/// Every strategy returns exactly `values.len()` prefixes; internal
/// padding never leaks into the output.
pub fn prefix_scan<T, M>(
    pool: &WorkerPool,
    values: &[T],
    op: M,
    strategy: ScanStrategy,
) -> Result<ScanOutcome<T>>
where
    T: Copy + Send + Sync,
    M: Monoid<T>,
{
    match strategy {
        ScanStrategy::Blelloch => blelloch::scan(pool, values, op),
        ScanStrategy::BlockDecomposition => blocked::block_scan(pool, values, op, pool.workers()),
        ScanStrategy::Sequential => Ok(ScanOutcome {
            values: sequential::scan(values, op)?,
            sync_levels: 0,
            padded_len: None,
        }),
    }
}
