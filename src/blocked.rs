//! Block-decomposition engines.
//!
//! The input is cut into `blocks` contiguous chunks of `ceil(N / blocks)`
//! slots, one per worker in the default dispatch. Reduction runs the
//! blocks in parallel and combines the block summaries sequentially in
//! block order. The scan adds a third step: after the parallel local
//! scans, the block totals get a sequential exclusive prefix, and a second
//! parallel step folds each block's offset into its elements. Block 0's
//! offset is the identity, so the broadcast skips it.

use log::debug;
use rayon::prelude::*;

use crate::error::{Result, ScanError};
use crate::monoid::Monoid;
use crate::outcome::{ReduceOutcome, ScanOutcome};
use crate::pool::WorkerPool;

/// Per-block parallel reduction, then a sequential combine of the block
/// summaries. One barrier-joined level.
pub fn block_reduce<T, M>(
    pool: &WorkerPool,
    values: &[T],
    op: M,
    blocks: usize,
) -> Result<ReduceOutcome<T>>
where
    T: Copy + Send + Sync,
    M: Monoid<T>,
{
    if values.is_empty() {
        return Err(ScanError::InvalidSize { got: 0 });
    }
    let blocks = blocks.max(1);
    let block_len = values.len().div_ceil(blocks);

    let partials: Vec<T> = pool.barrier_step(|| {
        values
            .par_chunks(block_len)
            .map(|chunk| {
                let mut acc = chunk[0];
                for &x in &chunk[1..] {
                    acc = op.combine(acc, x);
                }
                acc
            })
            .collect()
    });

    let mut value = partials[0];
    for &partial in &partials[1..] {
        value = op.combine(value, partial);
    }
    Ok(ReduceOutcome {
        value,
        sync_levels: 1,
    })
}

/// Three-step block scan: parallel local scans, sequential block offsets,
/// parallel offset broadcast. Two barrier-joined levels.
pub fn block_scan<T, M>(
    pool: &WorkerPool,
    values: &[T],
    op: M,
    blocks: usize,
) -> Result<ScanOutcome<T>>
where
    T: Copy + Send + Sync,
    M: Monoid<T>,
{
    if values.is_empty() {
        return Err(ScanError::InvalidSize { got: 0 });
    }
    let n = values.len();
    let blocks = blocks.max(1);
    let block_len = n.div_ceil(blocks);
    debug!(
        "block scan: n={} blocks={} block_len={}",
        n, blocks, block_len
    );
    let mut out = values.to_vec();

    // Step 1: each block becomes its own inclusive scan; its total is the
    // last slot, collected in block order.
    let totals: Vec<T> = pool.barrier_step(|| {
        out.par_chunks_mut(block_len)
            .map(|chunk| {
                let mut acc = chunk[0];
                for slot in &mut chunk[1..] {
                    acc = op.combine(acc, *slot);
                    *slot = acc;
                }
                acc
            })
            .collect()
    });

    // Step 2: exclusive prefix of the block totals, sequentially. The
    // offset of block b is the combined total of blocks 0..b.
    let mut offsets = Vec::with_capacity(totals.len());
    let mut running = op.identity();
    for &total in &totals {
        offsets.push(running);
        running = op.combine(running, total);
    }

    // Step 3: fold each block's offset in from the left. Block 0 carries
    // the identity offset and is skipped.
    pool.barrier_step(|| {
        out.par_chunks_mut(block_len)
            .zip(offsets.par_iter())
            .skip(1)
            .for_each(|(chunk, &offset)| {
                for slot in chunk {
                    *slot = op.combine(offset, *slot);
                }
            });
    });

    Ok(ScanOutcome {
        values: out,
        sync_levels: 2,
        padded_len: None,
    })
}
