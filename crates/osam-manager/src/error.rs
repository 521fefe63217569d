//! Error types for address manager operations.

use thiserror::Error;

use osam_store::StoreError;
use osam_types::{Address, BlockKind};

/// Protocol violations seen by the address manager.
#[derive(Debug, Error)]
pub enum OsamError {
    /// The store rejected an access.
    #[error("store protocol violation: {0}")]
    Store(#[from] StoreError),

    /// A consuming read decoded to a block of the wrong kind.
    #[error("unexpected block at {address}: expected {expected}, found {found}")]
    UnexpectedBlock {
        address: Address,
        expected: BlockKind,
        found: BlockKind,
    },
}

/// Convenience type alias for address manager operations.
pub type OsamResult<T> = std::result::Result<T, OsamError>;
