use osam_types::{Address, Block};

use crate::error::StoreResult;

/// Single-use, address-keyed block store.
///
/// All implementations must satisfy these invariants:
/// - `alloc` never returns the same address twice.
/// - `access_and_remove` hands out a block at most once per address.
/// - `evict_write` places a block at an issued, not yet accessed address.
/// - Breaches are reported as errors, never ignored.
///
/// Methods take `&mut self`: a store has exactly one logical owner.
pub trait BlockStore: Send {
    /// Issue a fresh address. `hint` describes the purpose and may be used
    /// by a placement policy; it is never stored.
    fn alloc(&mut self, hint: &str) -> StoreResult<Address>;

    /// Read and remove the block at `address`.
    ///
    /// Returns `Ok(None)` if the address was issued but never written.
    fn access_and_remove(&mut self, address: Address) -> StoreResult<Option<Block>>;

    /// Place `block` at `address`.
    fn evict_write(&mut self, address: Address, block: Block) -> StoreResult<()>;
}
