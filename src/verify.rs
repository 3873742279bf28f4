//! Elementwise verification and the strategy comparison harness.
//!
//! A disagreement between a parallel engine and the sequential oracle is
//! reported data, not an error: the harness runs every strategy, records
//! each result independently, and lets the caller decide what a mismatch
//! means. One failing strategy never prevents the others from running.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::monoid::Monoid;
use crate::outcome::{ReduceOutcome, ScanOutcome};
use crate::pool::WorkerPool;
use crate::sequential;
use crate::{prefix_scan, reduce, ReduceStrategy, ScanStrategy};

/// Outcome of comparing a strategy's output against the oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceCheck<T> {
    /// Every position agrees.
    Match,
    /// Lengths differ; no positions were compared.
    LengthMismatch { expected: usize, actual: usize },
    /// First disagreeing position, with both values.
    Mismatch { index: usize, expected: T, actual: T },
}

impl<T> SequenceCheck<T> {
    pub fn is_match(&self) -> bool {
        matches!(self, SequenceCheck::Match)
    }
}

impl<T: fmt::Display> fmt::Display for SequenceCheck<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceCheck::Match => write!(f, "PASSED"),
            SequenceCheck::LengthMismatch { expected, actual } => {
                write!(f, "FAILED: length {} != expected {}", actual, expected)
            }
            SequenceCheck::Mismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "FAILED: index {}: expected {}, got {}",
                index, expected, actual
            ),
        }
    }
}

/// Compares `actual` against `expected`, reporting the first offender.
pub fn compare_sequences<T: Copy + PartialEq>(expected: &[T], actual: &[T]) -> SequenceCheck<T> {
    if expected.len() != actual.len() {
        return SequenceCheck::LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        };
    }
    for (index, (&e, &a)) in expected.iter().zip(actual.iter()).enumerate() {
        if e != a {
            return SequenceCheck::Mismatch {
                index,
                expected: e,
                actual: a,
            };
        }
    }
    SequenceCheck::Match
}

/// One reduction strategy's run inside a comparison.
#[derive(Debug)]
pub struct ReduceReport<T> {
    pub strategy: ReduceStrategy,
    pub outcome: Result<ReduceOutcome<T>>,
    /// `None` when the strategy itself failed; no value to compare.
    pub check: Option<SequenceCheck<T>>,
    pub elapsed: Duration,
}

impl<T> ReduceReport<T> {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok() && self.check.as_ref().is_some_and(SequenceCheck::is_match)
    }
}

/// One scan strategy's run inside a comparison.
#[derive(Debug)]
pub struct ScanReport<T> {
    pub strategy: ScanStrategy,
    pub outcome: Result<ScanOutcome<T>>,
    pub check: Option<SequenceCheck<T>>,
    pub elapsed: Duration,
}

impl<T> ScanReport<T> {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok() && self.check.as_ref().is_some_and(SequenceCheck::is_match)
    }
}

/// All reduction strategies run against the sequential oracle.
#[derive(Debug)]
pub struct ReduceComparison<T> {
    pub oracle: T,
    pub oracle_elapsed: Duration,
    pub reports: Vec<ReduceReport<T>>,
}

impl<T> ReduceComparison<T> {
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(ReduceReport::passed)
    }
}

/// All parallel scan strategies run against the sequential oracle.
#[derive(Debug)]
pub struct ScanComparison<T> {
    pub oracle: Vec<T>,
    pub oracle_elapsed: Duration,
    pub reports: Vec<ScanReport<T>>,
}

impl<T> ScanComparison<T> {
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(ScanReport::passed)
    }
}

/// Runs every reduction strategy on `values` and checks each against the
/// sequential oracle. Fails only when the oracle itself cannot run.
pub fn compare_reduce_strategies<T, M>(
    pool: &WorkerPool,
    values: &[T],
    op: M,
) -> Result<ReduceComparison<T>>
where
    T: Copy + PartialEq + Send + Sync,
    M: Monoid<T>,
{
    let start = Instant::now();
    let oracle = sequential::reduce(values, op)?;
    let oracle_elapsed = start.elapsed();

    let strategies = [
        ReduceStrategy::Flat,
        ReduceStrategy::Tree,
        ReduceStrategy::SectionsBlock,
    ];
    let reports = strategies
        .into_iter()
        .map(|strategy| {
            let start = Instant::now();
            let outcome = reduce(pool, values, op, strategy);
            let elapsed = start.elapsed();
            let check = outcome
                .as_ref()
                .ok()
                .map(|o| compare_sequences(&[oracle], &[o.value]));
            ReduceReport {
                strategy,
                outcome,
                check,
                elapsed,
            }
        })
        .collect();

    Ok(ReduceComparison {
        oracle,
        oracle_elapsed,
        reports,
    })
}

/// Runs every parallel scan strategy on `values` and checks each against
/// the sequential oracle.
pub fn compare_scan_strategies<T, M>(
    pool: &WorkerPool,
    values: &[T],
    op: M,
) -> Result<ScanComparison<T>>
where
    T: Copy + PartialEq + Send + Sync,
    M: Monoid<T>,
{
    let start = Instant::now();
    let oracle = sequential::scan(values, op)?;
    let oracle_elapsed = start.elapsed();

    let strategies = [ScanStrategy::Blelloch, ScanStrategy::BlockDecomposition];
    let reports = strategies
        .into_iter()
        .map(|strategy| {
            let start = Instant::now();
            let outcome = prefix_scan(pool, values, op, strategy);
            let elapsed = start.elapsed();
            let check = outcome
                .as_ref()
                .ok()
                .map(|o| compare_sequences(&oracle, &o.values));
            ScanReport {
                strategy,
                outcome,
                check,
                elapsed,
            }
        })
        .collect();

    Ok(ScanComparison {
        oracle,
        oracle_elapsed,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monoid::{MaxOp, SumOp};
    use crate::pool::EngineConfig;
    use crate::source::ValueSource;

    #[test]
    fn identical_sequences_match() {
        assert!(compare_sequences(&[1i64, 2, 3], &[1, 2, 3]).is_match());
    }

    #[test]
    fn first_mismatch_index_is_reported() {
        let check = compare_sequences(&[1i64, 2, 3, 4], &[1, 2, 9, 8]);
        assert_eq!(
            check,
            SequenceCheck::Mismatch {
                index: 2,
                expected: 3,
                actual: 9
            }
        );
        assert!(!check.is_match());
    }

    #[test]
    fn length_mismatch_is_reported_before_values() {
        let check = compare_sequences(&[1i64, 2, 3], &[1, 2]);
        assert_eq!(
            check,
            SequenceCheck::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn check_display_is_terse() {
        assert_eq!(SequenceCheck::<i64>::Match.to_string(), "PASSED");
        let mismatch = SequenceCheck::Mismatch {
            index: 5,
            expected: 10i64,
            actual: 11,
        };
        assert_eq!(mismatch.to_string(), "FAILED: index 5: expected 10, got 11");
    }

    #[test]
    fn reduce_comparison_passes_on_agreeing_engines() {
        let pool = WorkerPool::new(&EngineConfig::with_workers(4)).unwrap();
        let mut source = ValueSource::from_seed(41);
        let values = source.sequence(1000, 0i64, 999);
        let comparison = compare_reduce_strategies(&pool, &values, MaxOp).unwrap();
        assert_eq!(comparison.reports.len(), 3);
        assert!(comparison.all_passed());
    }

    #[test]
    fn scan_comparison_passes_on_agreeing_engines() {
        let pool = WorkerPool::new(&EngineConfig::with_workers(4)).unwrap();
        let mut source = ValueSource::from_seed(42);
        let values = source.sequence(1000, 1i64, 100);
        let comparison = compare_scan_strategies(&pool, &values, SumOp).unwrap();
        assert_eq!(comparison.reports.len(), 2);
        assert!(comparison.all_passed());
        assert_eq!(comparison.oracle.len(), values.len());
    }

    #[test]
    fn comparison_on_empty_input_fails_up_front() {
        let pool = WorkerPool::new(&EngineConfig::with_workers(2)).unwrap();
        assert!(compare_reduce_strategies(&pool, &[] as &[i64], MaxOp).is_err());
        assert!(compare_scan_strategies(&pool, &[] as &[i64], SumOp).is_err());
    }
}
