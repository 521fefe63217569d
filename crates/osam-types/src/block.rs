//! The value stored at one address.
//!
//! A [`Block`] is consumed on read: the store hands it out once and the slot
//! is gone. Readers decode it with an exhaustive `match`; a block of the
//! wrong kind where a queue link or node is expected is a protocol breach,
//! reported by the address manager with [`Block::kind`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::content::Content;
use crate::node::{BNode, Node};

/// One hop of a FIFO chain: the payload address carried by this cell and
/// the next cell of the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueLink {
    pub target: Address,
    pub next: Address,
}

impl QueueLink {
    pub fn new(target: Address, next: Address) -> Self {
        Self { target, next }
    }
}

/// A tree record of either pointer kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeNode {
    Unbalanced(Node),
    Balanced(BNode),
}

/// The closed set of values an address can hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    /// Nothing was ever written here.
    Empty,
    /// A bare user payload.
    Content(Content),
    /// A FIFO chain cell.
    Link(QueueLink),
    /// A pointer tree record.
    Node(TreeNode),
}

impl Block {
    /// The discriminant, for diagnostics.
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Empty => BlockKind::Empty,
            Self::Content(_) => BlockKind::Content,
            Self::Link(_) => BlockKind::Link,
            Self::Node(TreeNode::Unbalanced(_)) => BlockKind::Node,
            Self::Node(TreeNode::Balanced(_)) => BlockKind::BalancedNode,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<QueueLink> for Block {
    fn from(link: QueueLink) -> Self {
        Self::Link(link)
    }
}

impl From<Content> for Block {
    fn from(content: Content) -> Self {
        Self::Content(content)
    }
}

impl From<Node> for Block {
    fn from(node: Node) -> Self {
        Self::Node(TreeNode::Unbalanced(node))
    }
}

impl From<BNode> for Block {
    fn from(node: BNode) -> Self {
        Self::Node(TreeNode::Balanced(node))
    }
}

/// Discriminant of a [`Block`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Empty,
    Content,
    Link,
    Node,
    BalancedNode,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Content => write!(f, "Content"),
            Self::Link => write!(f, "Link"),
            Self::Node => write!(f, "Node"),
            Self::BalancedNode => write!(f, "BalancedNode"),
        }
    }
}
