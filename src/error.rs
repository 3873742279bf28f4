use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid sequence length: expected at least 1 element, got {got}")]
    InvalidSize { got: usize },

    #[error("Capacity overflow: padding {len} elements to the next power of two exceeds the index range")]
    CapacityOverflow { len: usize },

    #[error("Worker pool construction failed: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
