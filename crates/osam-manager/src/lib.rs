//! Oblivious address manager (OSAM) for the pointer layer.
//!
//! [`Osam`] wraps a [`BlockStore`](osam_store::BlockStore) and exposes the
//! primitives the pointer trees are built from:
//!
//! - `alloc` -- a fresh, globally unique address
//! - `read` -- a consuming read
//! - `write` -- a dummy consuming read of a throwaway address followed by the
//!   real store, so a write touches storage exactly like a read does
//! - `open_queue` / `enqueue` / `dequeue` -- single-use FIFO chains whose
//!   cells are themselves addresses
//!
//! A chain is read destructively: dequeuing a cell consumes it, so whoever
//! walks a chain must hand out a fresh one afterwards.

pub mod error;
pub mod osam;

pub use error::{OsamError, OsamResult};
pub use osam::Osam;
