//! Single-threaded reference engines.
//!
//! These are the oracles the parallel engines are verified against: a
//! plain left-to-right fold and a left-to-right inclusive prefix. Both
//! combine strictly in position order, so they define the expected result
//! for non-commutative operators as well.

use crate::error::{Result, ScanError};
use crate::monoid::Monoid;

/// Left-to-right reduction of `values` under `op`.
pub fn reduce<T, M>(values: &[T], op: M) -> Result<T>
where
    T: Copy,
    M: Monoid<T>,
{
    let (&first, rest) = values
        .split_first()
        .ok_or(ScanError::InvalidSize { got: 0 })?;
    Ok(rest.iter().fold(first, |acc, &x| op.combine(acc, x)))
}

/// Left-to-right inclusive prefix scan; output length equals input length.
pub fn scan<T, M>(values: &[T], op: M) -> Result<Vec<T>>
where
    T: Copy,
    M: Monoid<T>,
{
    let (&first, rest) = values
        .split_first()
        .ok_or(ScanError::InvalidSize { got: 0 })?;
    let mut out = Vec::with_capacity(values.len());
    let mut acc = first;
    out.push(acc);
    for &x in rest {
        acc = op.combine(acc, x);
        out.push(acc);
    }
    Ok(out)
}
