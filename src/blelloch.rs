//! Work-efficient two-phase prefix scan.
//!
//! The classic upsweep/downsweep pair over an identity-padded power-of-two
//! buffer. The upsweep builds partial aggregates bottom-up, leaving the
//! grand total at the root. The root is then reseeded with the identity
//! and the downsweep pushes exclusive prefixes top-down; a final parallel
//! pass folds the original input back in to turn the exclusive scan into
//! the inclusive one. Each of the `2 * log2 P` traversal levels is one
//! barrier-joined parallel step over disjoint `2^(d+1)`-slot windows, and
//! the total combine work stays O(N).
//!
//! Operand order is preserved throughout: a combine's left argument is
//! always the partial result covering earlier positions, so the scan is
//! exact for non-commutative operators.

use log::{debug, trace};
use rayon::prelude::*;

use crate::buffer::PaddedBuffer;
use crate::error::Result;
use crate::monoid::Monoid;
use crate::observer::{LevelObserver, Phase};
use crate::outcome::ScanOutcome;
use crate::pool::WorkerPool;

/// Inclusive prefix scan of `values` under `op`.
pub fn scan<T, M>(pool: &WorkerPool, values: &[T], op: M) -> Result<ScanOutcome<T>>
where
    T: Copy + Send + Sync,
    M: Monoid<T>,
{
    scan_observed(pool, values, op, &mut ())
}

/// Two-phase scan reporting the buffer to `observer` after every level.
pub fn scan_observed<T, M, O>(
    pool: &WorkerPool,
    values: &[T],
    op: M,
    observer: &mut O,
) -> Result<ScanOutcome<T>>
where
    T: Copy + Send + Sync,
    M: Monoid<T>,
    O: LevelObserver<T>,
{
    let n = values.len();
    let mut buffer = PaddedBuffer::new(values, op)?;
    let levels = buffer.levels();
    let padded = buffer.padded_len();
    debug!(
        "blelloch scan: n={} padded={} levels_per_phase={}",
        n, padded, levels
    );

    // Upsweep: each window folds its left-half aggregate into its last
    // slot, halving the number of active windows per level.
    for d in 0..levels {
        let stride = 1usize << (d + 1);
        let offset = (1usize << d) - 1;
        let data = buffer.as_mut_slice();
        pool.barrier_step(|| {
            data.par_chunks_exact_mut(stride).for_each(|chunk| {
                chunk[stride - 1] = op.combine(chunk[offset], chunk[stride - 1]);
            });
        });
        trace!("upsweep level {} (stride {}) done", d, stride);
        observer.level_done(Phase::Upsweep, d, stride, buffer.as_slice());
    }

    // Reseed the root with the identity; the downsweep then leaves the
    // exclusive scan in the buffer. The grand total the upsweep put at the
    // root reappears as the last inclusive prefix after the conversion.
    buffer.as_mut_slice()[padded - 1] = op.identity();

    // Downsweep: each window hands its stored left-half aggregate across
    // to the right and takes the parent's exclusive prefix on the left.
    for d in (0..levels).rev() {
        let stride = 1usize << (d + 1);
        let offset = (1usize << d) - 1;
        let data = buffer.as_mut_slice();
        pool.barrier_step(|| {
            data.par_chunks_exact_mut(stride).for_each(|chunk| {
                let left_total = chunk[offset];
                chunk[offset] = chunk[stride - 1];
                chunk[stride - 1] = op.combine(chunk[stride - 1], left_total);
            });
        });
        trace!("downsweep level {} (stride {}) done", d, stride);
        observer.level_done(Phase::Downsweep, d, stride, buffer.as_slice());
    }

    // Exclusive to inclusive over the original length, in place.
    let data = buffer.as_mut_slice();
    pool.barrier_step(|| {
        data[..n]
            .par_iter_mut()
            .zip(values.par_iter())
            .for_each(|(slot, &original)| {
                *slot = op.combine(*slot, original);
            });
    });

    Ok(ScanOutcome {
        values: buffer.into_prefix(),
        sync_levels: 2 * levels,
        padded_len: Some(padded),
    })
}
