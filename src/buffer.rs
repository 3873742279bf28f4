//! Identity-padded working buffer for the two-phase scan.
//!
//! The scan traversals index `2^(d+1)`-strided windows and touch the last
//! slot of each, so the working set must be a power of two. Padding with
//! the operator's identity keeps the padded suffix inert: identity slots
//! flow through every combine without changing any prefix over the
//! original input range.

use crate::error::{Result, ScanError};
use crate::monoid::Monoid;

/// Power-of-two working buffer. Positions `[0, input_len)` hold the input,
/// positions `[input_len, padded_len)` hold the operator identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddedBuffer<T> {
    data: Vec<T>,
    input_len: usize,
}

impl<T: Copy> PaddedBuffer<T> {
    /// Copies `values` and pads to `2^ceil(log2 N)` identity elements.
    ///
    /// Fails with [`ScanError::InvalidSize`] on an empty input and with
    /// [`ScanError::CapacityOverflow`] when the padded capacity does not
    /// fit in `usize`, before any allocation happens.
    pub fn new<M: Monoid<T>>(values: &[T], op: M) -> Result<Self> {
        if values.is_empty() {
            return Err(ScanError::InvalidSize { got: 0 });
        }
        let padded = values
            .len()
            .checked_next_power_of_two()
            .ok_or(ScanError::CapacityOverflow { len: values.len() })?;
        let mut data = Vec::with_capacity(padded);
        data.extend_from_slice(values);
        data.resize(padded, op.identity());
        Ok(Self {
            data,
            input_len: values.len(),
        })
    }

    /// Original input length N.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Padded capacity `P = 2^ceil(log2 N)`.
    pub fn padded_len(&self) -> usize {
        self.data.len()
    }

    /// `log2 P`: the number of levels in one traversal phase.
    pub fn levels(&self) -> u32 {
        self.data.len().trailing_zeros()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the buffer and returns the first `input_len` slots,
    /// discarding the padding.
    pub fn into_prefix(self) -> Vec<T> {
        let mut data = self.data;
        data.truncate(self.input_len);
        data
    }
}
