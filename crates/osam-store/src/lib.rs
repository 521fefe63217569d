//! Single-use block storage for the oblivious pointer layer.
//!
//! The pointer layer treats storage as an opaque medium that can issue fresh
//! addresses, hand out the block at an address exactly once, and accept a
//! block for an address exactly once. Real deployments put a Path-ORAM style
//! construction behind this contract; this crate defines the contract and a
//! bucketed in-memory simulator that enforces it strictly.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlockStore`] trait:
//!
//! - [`InMemoryBlockStore`] -- bucketed `HashMap` simulator with random placement
//!
//! # Design Rules
//!
//! 1. Every address is issued once, with a monotonically increasing id.
//! 2. A read removes the block; the address can never be read again.
//! 3. An address is written at most once, and only before it is read.
//! 4. Reading an issued address that was never written yields `None`.
//! 5. Any breach of 1-3 is a protocol violation, never silently tolerated.

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryBlockStore, StoreStats};
pub use traits::BlockStore;
