//! Shared data model for the oblivious pointer layer.
//!
//! Everything stored by the address manager is a [`Block`], a closed tagged
//! union decoded exhaustively by its readers. Tree records never own each
//! other: every link between them is an [`Address`] into the store, so back
//! edges (child to parent) cannot form ownership cycles.
//!
//! # Key Types
//!
//! - [`Address`] -- single-use storage slot `(id, bucket)`, with a reserved [`Address::NIL`]
//! - [`Content`] -- opaque user payload held at a root
//! - [`Block`] -- the value stored at one address, consumed on read
//! - [`QueueLink`] -- one hop of a FIFO chain
//! - [`Node`] / [`BNode`] -- unbalanced and balanced tree records
//! - [`Slot`] -- which tail slot of a record an edge occupies

pub mod address;
pub mod block;
pub mod content;
pub mod error;
pub mod node;

pub use address::Address;
pub use block::{Block, BlockKind, QueueLink, TreeNode};
pub use content::Content;
pub use error::TypeError;
pub use node::{BNode, Node, NodeId, Slot, StoredNode};
