//! Parallel reduction engines.
//!
//! Two strategies with the same outcome shape. `flat_reduce` hands the
//! whole slice to the pool's fold/reduce machinery and counts as a single
//! barrier-joined level. `tree_reduce` runs the explicit stride-doubling
//! tree with one barrier per level; it works on the input length directly
//! and guards pair access with a boundary check instead of padding, so a
//! non-power-of-two input still takes exactly `ceil(log2 N)` levels.

use log::trace;
use rayon::prelude::*;

use crate::error::{Result, ScanError};
use crate::monoid::Monoid;
use crate::observer::{LevelObserver, Phase};
use crate::outcome::ReduceOutcome;
use crate::pool::WorkerPool;

/// Pool-wide fold/reduce over the whole slice, one joined level.
///
/// Work splitting is up to the pool, but the combine is associative and
/// order-preserving, so every split yields the same value.
pub fn flat_reduce<T, M>(pool: &WorkerPool, values: &[T], op: M) -> Result<ReduceOutcome<T>>
where
    T: Copy + Send + Sync,
    M: Monoid<T>,
{
    if values.is_empty() {
        return Err(ScanError::InvalidSize { got: 0 });
    }
    let value = pool.barrier_step(|| {
        values
            .par_iter()
            .copied()
            .reduce(|| op.identity(), |a, b| op.combine(a, b))
    });
    Ok(ReduceOutcome {
        value,
        sync_levels: 1,
    })
}

/// Stride-doubling tree reduction with a barrier per level.
pub fn tree_reduce<T, M>(pool: &WorkerPool, values: &[T], op: M) -> Result<ReduceOutcome<T>>
where
    T: Copy + Send + Sync,
    M: Monoid<T>,
{
    tree_reduce_observed(pool, values, op, &mut ())
}

/// Tree reduction reporting the buffer to `observer` after every level.
///
/// At level `d` each window of `2^(d+1)` slots folds its element at offset
/// `2^d` into its first slot. Windows are disjoint chunks of the working
/// buffer, and the trailing partial window participates only when it is
/// long enough to contain the right-hand element; elements past the end
/// simply wait for a later level. The final result lands in slot 0.
pub fn tree_reduce_observed<T, M, O>(
    pool: &WorkerPool,
    values: &[T],
    op: M,
    observer: &mut O,
) -> Result<ReduceOutcome<T>>
where
    T: Copy + Send + Sync,
    M: Monoid<T>,
    O: LevelObserver<T>,
{
    if values.is_empty() {
        return Err(ScanError::InvalidSize { got: 0 });
    }
    let n = values.len();
    let mut buf = values.to_vec();
    let mut stride = 1usize;
    let mut level = 0u32;
    while stride < n {
        let window = 2 * stride;
        pool.barrier_step(|| {
            buf.par_chunks_mut(window).for_each(|chunk| {
                if stride < chunk.len() {
                    chunk[0] = op.combine(chunk[0], chunk[stride]);
                }
            });
        });
        trace!("reduce level {} (stride {}) done", level, stride);
        observer.level_done(Phase::Reduce, level, stride, &buf);
        level += 1;
        stride = window;
    }
    Ok(ReduceOutcome {
        value: buf[0],
        sync_levels: level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monoid::{MaxOp, SumOp};
    use crate::observer::SnapshotRecorder;
    use crate::pool::EngineConfig;
    use crate::sequential;
    use crate::source::ValueSource;
    use proptest::prelude::*;

    fn pool() -> WorkerPool {
        WorkerPool::new(&EngineConfig::with_workers(4)).unwrap()
    }

    #[test]
    fn flat_reduce_matches_sequential() {
        let pool = pool();
        let mut source = ValueSource::from_seed(11);
        let values = source.sequence(1000, 0i64, 999);
        let expected = sequential::reduce(&values, MaxOp).unwrap();
        let outcome = flat_reduce(&pool, &values, MaxOp).unwrap();
        assert_eq!(outcome.value, expected);
        assert_eq!(outcome.sync_levels, 1);
    }

    #[test]
    fn tree_reduce_matches_sequential_on_odd_lengths() {
        let pool = pool();
        let mut source = ValueSource::from_seed(12);
        for n in [1usize, 2, 3, 5, 7, 31, 100, 1000, 1023, 1025] {
            let values = source.sequence(n, -500i64, 500);
            let expected = sequential::reduce(&values, MaxOp).unwrap();
            let outcome = tree_reduce(&pool, &values, MaxOp).unwrap();
            assert_eq!(outcome.value, expected, "n = {}", n);
        }
    }

    #[test]
    fn tree_reduce_level_count_is_ceil_log2() {
        let pool = pool();
        for n in (1usize..=64).chain([1000, 1024, 1025]) {
            let values = vec![1i64; n];
            let outcome = tree_reduce(&pool, &values, SumOp).unwrap();
            let expected = n.next_power_of_two().trailing_zeros();
            assert_eq!(outcome.sync_levels, expected, "n = {}", n);
            assert_eq!(outcome.value, n as i64);
        }
    }

    #[test]
    fn tree_reduce_reports_each_level_once() {
        let pool = pool();
        let values = [456i64, 789, 123, 890, 234, 567, 345, 678];
        let mut recorder = SnapshotRecorder::new(16);
        let outcome = tree_reduce_observed(&pool, &values, MaxOp, &mut recorder).unwrap();
        assert_eq!(outcome.value, 890);
        assert_eq!(recorder.snapshots().len(), outcome.sync_levels as usize);
        assert_eq!(
            recorder.snapshots()[0].prefix,
            vec![789, 789, 890, 890, 567, 567, 678, 678]
        );
    }

    #[test]
    fn tree_reduce_boundary_element_survives_unpaired_levels() {
        // With n = 5, slot 4 pairs with nothing until the final level.
        let pool = pool();
        let values = [1i64, 2, 3, 4, 100];
        let outcome = tree_reduce(&pool, &values, MaxOp).unwrap();
        assert_eq!(outcome.value, 100);
        assert_eq!(outcome.sync_levels, 3);
    }

    #[test]
    fn empty_input_is_rejected() {
        let pool = pool();
        assert!(matches!(
            flat_reduce(&pool, &[] as &[i64], MaxOp).unwrap_err(),
            ScanError::InvalidSize { got: 0 }
        ));
        assert!(matches!(
            tree_reduce(&pool, &[] as &[i64], MaxOp).unwrap_err(),
            ScanError::InvalidSize { got: 0 }
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn reductions_agree_with_the_oracle(values in prop::collection::vec(any::<i64>(), 1..300)) {
            let pool = pool();
            let expected_max = sequential::reduce(&values, MaxOp).unwrap();
            let expected_sum = sequential::reduce(&values, SumOp).unwrap();
            prop_assert_eq!(flat_reduce(&pool, &values, MaxOp).unwrap().value, expected_max);
            prop_assert_eq!(tree_reduce(&pool, &values, MaxOp).unwrap().value, expected_max);
            prop_assert_eq!(flat_reduce(&pool, &values, SumOp).unwrap().value, expected_sum);
            prop_assert_eq!(tree_reduce(&pool, &values, SumOp).unwrap().value, expected_sum);
        }
    }
}
