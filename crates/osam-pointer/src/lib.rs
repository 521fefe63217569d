//! Oblivious smart pointers.
//!
//! A smart pointer lets many handles (aliases) share one content object while
//! every access, whether `get`, `put`, `copy` or `delete`, touches storage
//! through fresh single-use addresses only. The aliases of an object form a
//! tree: the root holds the content, each handle's chain leads to a record in
//! the tree, and each record's chain leads to its parent.
//!
//! Two schemes implement [`PointerScheme`]:
//!
//! - [`SmartPointer`] -- unbalanced tree; depth can grow with every copy
//! - [`BalancedSmartPointer`] -- complete binary tree keyed by the alias
//!   count; depth stays logarithmic
//!
//! # Example
//!
//! ```
//! use osam_pointer::{PointerConfig, PointerScheme, SmartPointer};
//! use osam_store::{InMemoryBlockStore, StoreConfig};
//! use osam_types::Content;
//!
//! let store = InMemoryBlockStore::new(StoreConfig::seeded(1)).unwrap();
//! let mut sp = SmartPointer::new(store, PointerConfig::default());
//!
//! let mut a = sp.create(Content::from("X")).unwrap();
//! let mut b = sp.copy(&mut a).unwrap();
//! sp.put(&mut b, Content::from("Y")).unwrap();
//! assert_eq!(sp.get(&mut a).unwrap(), Some(Content::from("Y")));
//! ```

mod arena;
pub mod balanced;
pub mod config;
pub mod error;
pub mod ptr;
pub mod smart;
pub mod trace;
pub mod traits;

#[cfg(test)]
mod properties;

pub use balanced::BalancedSmartPointer;
pub use config::PointerConfig;
pub use error::{PointerError, PointerResult};
pub use ptr::{DeleteOutcome, Ptr};
pub use smart::SmartPointer;
pub use trace::{LogTracer, NoopTracer, PathEvent, PathTracer, RecordingTracer};
pub use traits::PointerScheme;
