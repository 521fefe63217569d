use osam_types::Address;

/// Protocol violations at the storage boundary.
///
/// Every variant means the caller's bookkeeping is broken. None of them is
/// retryable.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The address was never issued by this store.
    #[error("read or write of never-allocated address {0}")]
    NeverAllocated(Address),

    /// The address was already consumed by an earlier read.
    #[error("double read of consumed address {0}")]
    DoubleRead(Address),

    /// The address already holds a block, or was consumed.
    #[error("double write to address {0}")]
    DoubleWrite(Address),

    /// The bucket component lies outside the store's declared range.
    #[error("bucket of {address} out of range: store has {buckets} buckets")]
    BucketOutOfRange { address: Address, buckets: usize },

    /// The reserved NIL address was used as a real one.
    #[error("access to the NIL address")]
    NilAddress,

    /// The store configuration cannot be used.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
