//! The [`PointerScheme`] trait shared by both pointer kinds.

use osam_types::Content;

use crate::error::PointerResult;
use crate::ptr::{DeleteOutcome, Ptr};

/// Oblivious reference operations.
///
/// Every operation that takes a `&mut Ptr` replaces the handle's chain head,
/// even `get`. Operations on handles of the same object must not interleave:
/// `&mut self` on every mutating call makes the manager the single owner
/// that serializes them.
pub trait PointerScheme {
    /// Store `content` behind a new root and return its first handle.
    fn create(&mut self, content: Content) -> PointerResult<Ptr>;

    /// Create a root that holds no content yet. `get` on it yields `None`
    /// until something is `put`.
    fn create_empty(&mut self) -> PointerResult<Ptr>;

    /// Dereference. `Ok(None)` if the root holds no content.
    fn get(&mut self, ptr: &mut Ptr) -> PointerResult<Option<Content>>;

    /// Replace the content seen by every alias of `ptr`.
    fn put(&mut self, ptr: &mut Ptr, content: Content) -> PointerResult<()>;

    /// Create a new alias of `ptr`.
    fn copy(&mut self, ptr: &mut Ptr) -> PointerResult<Ptr>;

    /// Remove the alias `ptr`. The handle becomes null.
    fn delete(&mut self, ptr: &mut Ptr) -> PointerResult<DeleteOutcome>;

    fn is_null(&self, ptr: &Ptr) -> bool {
        ptr.is_null()
    }
}
