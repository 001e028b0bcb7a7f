use thiserror::Error;

pub type BufferResult<T, E = BufferError> = Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Capacity overflow: cannot grow beyond {0} slots")]
    CapacityOverflow(usize),

    #[error("Allocation failed for {slots} slots")]
    AllocFailed { slots: usize },
}
