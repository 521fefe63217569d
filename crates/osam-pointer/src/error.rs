//! Error types for pointer operations.

use osam_manager::OsamError;

/// Errors that can occur during pointer operations.
///
/// Both families are fatal: they mean the alias bookkeeping is broken, and
/// a half-applied operation cannot be rolled back.
#[derive(Debug, thiserror::Error)]
pub enum PointerError {
    /// The address manager or store rejected an access.
    #[error("protocol violation: {0}")]
    Protocol(#[from] OsamError),

    /// A structural invariant of the pointer tree does not hold.
    #[error("invariant violation: {0}")]
    Invariant(String),

    /// The handle was deleted (or never pointed anywhere).
    #[error("operation on a null pointer")]
    NullPointer,
}

impl PointerError {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}

/// Convenience alias for pointer results.
pub type PointerResult<T> = Result<T, PointerError>;
