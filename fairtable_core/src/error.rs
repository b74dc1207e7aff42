//! Error definitions.
use thiserror::Error;

/// Project-wise error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Growth or pre-sizing could not obtain memory for the requested number of buckets.
    #[error("Unable to allocate storage for {buckets} buckets.")]
    AllocationFailed { buckets: usize },
    /// The requested number of buckets does not fit the address space.
    #[error("Requested capacity overflows the address space.")]
    CapacityOverflow,
    /// A [`crate::TableConfig`] carried values the backend cannot honor.
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
    /// A variant name that does not follow `{backend}_{key}_{value}` or names an unknown kind.
    #[error("Unknown table variant: {0:?}")]
    UnknownVariant(String),
    /// A byte-encoded integer key had the wrong number of bytes.
    #[error("Key must be {expected} bytes wide, got {actual}.")]
    KeyWidth { expected: usize, actual: usize },
    /// A byte-encoded value had the wrong number of bytes.
    #[error("Value must be {expected} bytes wide, got {actual}.")]
    ValueWidth { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, TableError>;
