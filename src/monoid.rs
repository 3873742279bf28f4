//! Associative operators with identity, the algebra every engine is
//! generic over.
//!
//! Operators are zero-sized values passed by copy, so engine calls
//! monomorphize and the combine inlines into the parallel loops. The
//! engines rely on associativity and the identity laws only; operands are
//! always combined in positional order, so non-commutative operators are
//! supported.

use num_traits::{Bounded, WrappingAdd, Zero};

/// An associative binary operation with a two-sided identity.
///
/// Implementations must satisfy, for all `a`, `b`, `c`:
///
/// * `combine(combine(a, b), c) == combine(a, combine(b, c))`
/// * `combine(identity(), a) == a` and `combine(a, identity()) == a`
///
/// Commutativity is not required. Callers keep the left operand as the
/// earlier-position partial result.
pub trait Monoid<T>: Copy + Send + Sync {
    /// The identity element of the operation.
    fn identity(&self) -> T;

    /// Combines two partial results, left operand first.
    fn combine(&self, left: T, right: T) -> T;
}

/// Maximum under `Ord`; identity is the type's minimum value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaxOp;

impl<T> Monoid<T> for MaxOp
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    fn identity(&self) -> T {
        T::min_value()
    }

    fn combine(&self, left: T, right: T) -> T {
        left.max(right)
    }
}

/// Wrapping addition; identity is zero.
///
/// Wrapping keeps the combine total over the whole value range, so every
/// grouping of the same inputs produces the same bits and the engines stay
/// deterministic regardless of how work is split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SumOp;

impl<T> Monoid<T> for SumOp
where
    T: Copy + Zero + WrappingAdd + Send + Sync,
{
    fn identity(&self) -> T {
        T::zero()
    }

    fn combine(&self, left: T, right: T) -> T {
        left.wrapping_add(&right)
    }
}
