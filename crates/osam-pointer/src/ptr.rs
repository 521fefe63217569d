use std::fmt;

use osam_types::{Address, Content};

/// Client handle to a shared content object.
///
/// A `Ptr` holds the head of a single-use chain leading to its tree record.
/// Every operation consumes that chain and installs a fresh one, so the
/// stored head changes on each use while the logical target stays put.
///
/// `Ptr` is neither `Clone` nor `Copy`: duplicating a head
/// would let two holders walk the same single-use chain. New aliases come
/// only from [`PointerScheme::copy`](crate::PointerScheme::copy).
#[derive(PartialEq, Eq)]
pub struct Ptr {
    head: Address,
}

impl Ptr {
    /// A handle that points nowhere.
    pub fn null() -> Self {
        Self { head: Address::NIL }
    }

    pub(crate) fn from_head(head: Address) -> Self {
        Self { head }
    }

    /// Current chain head. Changes on every operation.
    pub fn head(&self) -> Address {
        self.head
    }

    pub(crate) fn set_head(&mut self, head: Address) {
        self.head = head;
    }

    pub fn is_null(&self) -> bool {
        self.head.is_nil()
    }
}

impl Default for Ptr {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for Ptr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ptr({})", self.head)
    }
}

/// What a `delete` did to the shared object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The handle was already null.
    Noop,
    /// The alias was removed; others remain.
    Detached,
    /// The last alias was removed. The content is handed back and the root
    /// is no longer stored.
    Drained { content: Option<Content> },
}

impl DeleteOutcome {
    pub fn is_drained(&self) -> bool {
        matches!(self, Self::Drained { .. })
    }
}
