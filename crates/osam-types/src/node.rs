//! Tree records for both pointer kinds.
//!
//! A record holds the *tails* of the FIFO chains that lead to it (one per
//! incoming edge) and the *heads* of the chains it follows itself (to its
//! parent, and in the balanced variant to its cached children). Every time a
//! record is persisted at a fresh address, that address is enqueued on each
//! of its tails so every incoming chain ends at the newest copy.
//!
//! # Invariants
//!
//! - A non-root record carries no content.
//! - A root's `parent_head` is [`Address::NIL`].
//! - A non-root [`BNode`] has `count == None`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::block::{Block, BlockKind, TreeNode};
use crate::content::Content;

/// Identifier of a tree record, issued per pointer manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One tail slot of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Left,
    Right,
    /// The edge from the parent's child cache (balanced records only).
    Parent,
}

impl Slot {
    /// The other child side. `Parent` has no mirror and maps to itself.
    pub fn mirror(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Parent => Self::Parent,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "L"),
            Self::Right => write!(f, "R"),
            Self::Parent => write!(f, "P"),
        }
    }
}

/// Common view of a persisted tree record.
///
/// The chase/persist machinery of both pointer kinds is written once against
/// this trait.
pub trait StoredNode: Clone + Into<Block> {
    /// Tail slots this record kind has, in the order a chase checks them.
    const SLOTS: &'static [Slot];

    /// The block kind this record decodes from.
    const KIND: BlockKind;

    fn id(&self) -> NodeId;

    fn is_root(&self) -> bool;

    /// Current tail in `slot`, or NIL if the slot is empty or absent.
    fn tail(&self, slot: Slot) -> Address;

    /// Mutable access to `slot`, `None` if this record kind lacks it.
    fn tail_mut(&mut self, slot: Slot) -> Option<&mut Address>;

    /// Decode from a stored tree record of the matching kind.
    fn from_tree(node: TreeNode) -> Option<Self>;

    /// Clear the slot holding `tail` and report which one it was.
    fn release_tail(&mut self, tail: Address) -> Option<Slot> {
        if tail.is_nil() {
            return None;
        }
        let slot = Self::SLOTS.iter().copied().find(|&s| self.tail(s) == tail)?;
        if let Some(t) = self.tail_mut(slot) {
            *t = Address::NIL;
        }
        Some(slot)
    }

    /// Put `tail` into `slot` and return what was there before. A slot this
    /// record kind lacks reads as NIL and ignores the write.
    fn replace_tail(&mut self, slot: Slot, tail: Address) -> Address {
        match self.tail_mut(slot) {
            Some(t) => std::mem::replace(t, tail),
            None => Address::NIL,
        }
    }

    /// First empty child slot, left preferred.
    fn free_child_slot(&self) -> Option<Slot> {
        [Slot::Left, Slot::Right]
            .into_iter()
            .find(|&s| self.tail(s).is_nil())
    }

    /// Both child slots are empty: nothing refers to this record any more.
    fn is_drained(&self) -> bool {
        self.tail(Slot::Left).is_nil() && self.tail(Slot::Right).is_nil()
    }
}

// ---------------------------------------------------------------------------
// Node (unbalanced)
// ---------------------------------------------------------------------------

/// Record of the unbalanced smart pointer tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub left_tail: Address,
    pub right_tail: Address,
    pub is_root: bool,
    /// Head of the chain to the parent record. NIL at a root.
    pub parent_head: Address,
    /// User content. Always `None` below the root.
    pub content: Option<Content>,
}

impl Node {
    /// An interior record with no edges.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            left_tail: Address::NIL,
            right_tail: Address::NIL,
            is_root: false,
            parent_head: Address::NIL,
            content: None,
        }
    }

    /// A root record holding `content`.
    pub fn root(id: NodeId, content: Option<Content>) -> Self {
        Self {
            is_root: true,
            content,
            ..Self::new(id)
        }
    }
}

impl StoredNode for Node {
    const SLOTS: &'static [Slot] = &[Slot::Left, Slot::Right];
    const KIND: BlockKind = BlockKind::Node;

    fn id(&self) -> NodeId {
        self.id
    }

    fn is_root(&self) -> bool {
        self.is_root
    }

    fn tail(&self, slot: Slot) -> Address {
        match slot {
            Slot::Left => self.left_tail,
            Slot::Right => self.right_tail,
            Slot::Parent => Address::NIL,
        }
    }

    fn tail_mut(&mut self, slot: Slot) -> Option<&mut Address> {
        match slot {
            Slot::Left => Some(&mut self.left_tail),
            Slot::Right => Some(&mut self.right_tail),
            Slot::Parent => None,
        }
    }

    fn from_tree(node: TreeNode) -> Option<Self> {
        match node {
            TreeNode::Unbalanced(n) => Some(n),
            TreeNode::Balanced(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// BNode (balanced)
// ---------------------------------------------------------------------------

/// Record of the balanced smart pointer tree.
///
/// Besides the unbalanced fields it caches the heads of the chains to its
/// left and right child records, and holds the tail of the chain its parent
/// caches for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BNode {
    pub id: NodeId,
    pub left_tail: Address,
    pub right_tail: Address,
    /// Tail of the chain behind the parent's `left_head`/`right_head`.
    pub parent_tail: Address,
    pub left_head: Address,
    pub right_head: Address,
    pub parent_head: Address,
    pub is_root: bool,
    /// Live alias count; `Some` only at a root.
    pub count: Option<u64>,
    pub content: Option<Content>,
}

impl BNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            left_tail: Address::NIL,
            right_tail: Address::NIL,
            parent_tail: Address::NIL,
            left_head: Address::NIL,
            right_head: Address::NIL,
            parent_head: Address::NIL,
            is_root: false,
            count: None,
            content: None,
        }
    }

    /// A root record holding `content`, referenced by one alias.
    pub fn root(id: NodeId, content: Option<Content>) -> Self {
        Self {
            is_root: true,
            count: Some(1),
            content,
            ..Self::new(id)
        }
    }

    /// Cached head of the chain to the child on `side`.
    pub fn child_head(&self, side: Slot) -> Address {
        match side {
            Slot::Left => self.left_head,
            Slot::Right => self.right_head,
            Slot::Parent => Address::NIL,
        }
    }

    pub fn set_child_head(&mut self, side: Slot, head: Address) {
        match side {
            Slot::Left => self.left_head = head,
            Slot::Right => self.right_head = head,
            Slot::Parent => {}
        }
    }
}

impl StoredNode for BNode {
    const SLOTS: &'static [Slot] = &[Slot::Left, Slot::Parent, Slot::Right];
    const KIND: BlockKind = BlockKind::BalancedNode;

    fn id(&self) -> NodeId {
        self.id
    }

    fn is_root(&self) -> bool {
        self.is_root
    }

    fn tail(&self, slot: Slot) -> Address {
        match slot {
            Slot::Left => self.left_tail,
            Slot::Right => self.right_tail,
            Slot::Parent => self.parent_tail,
        }
    }

    fn tail_mut(&mut self, slot: Slot) -> Option<&mut Address> {
        match slot {
            Slot::Left => Some(&mut self.left_tail),
            Slot::Right => Some(&mut self.right_tail),
            Slot::Parent => Some(&mut self.parent_tail),
        }
    }

    fn from_tree(node: TreeNode) -> Option<Self> {
        match node {
            TreeNode::Balanced(n) => Some(n),
            TreeNode::Unbalanced(_) => None,
        }
    }
}
