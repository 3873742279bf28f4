//! Result shapes shared by the engines: computed values plus the
//! synchronization shape the run reported.

/// Reduction result and the number of barrier-separated levels it took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReduceOutcome<T> {
    pub value: T,
    /// Barrier-separated parallel levels executed by the run.
    pub sync_levels: u32,
}

/// Inclusive prefix scan result.
///
/// `values` has exactly the input length; padding used internally never
/// leaks into the output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutcome<T> {
    pub values: Vec<T>,
    /// Barrier-separated parallel levels executed by the run.
    pub sync_levels: u32,
    /// Padded working capacity for engines that pad, `None` otherwise.
    pub padded_len: Option<usize>,
}

impl<T: Copy> ScanOutcome<T> {
    /// Grand total under the operator, i.e. the last inclusive prefix.
    pub fn total(&self) -> T {
        *self
            .values
            .last()
            .expect("scan outcomes are built from non-empty inputs")
    }
}
