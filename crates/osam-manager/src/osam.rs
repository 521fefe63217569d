use tracing::trace;

use osam_store::BlockStore;
use osam_types::{Address, Block, BlockKind, QueueLink, StoredNode};

use crate::error::{OsamError, OsamResult};

/// The address manager.
///
/// Owns the store and issues every access the pointer layer makes. It keeps
/// no per-address state of its own; ids come from the store.
pub struct Osam<S> {
    store: S,
}

impl<S: BlockStore> Osam<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Issue a fresh address. `label` is only used for logging.
    pub fn alloc(&mut self, label: &str) -> OsamResult<Address> {
        let address = self.store.alloc(label)?;
        trace!(%address, label, "alloc");
        Ok(address)
    }

    /// Consuming read. An issued but never written address reads as
    /// [`Block::Empty`].
    pub fn read(&mut self, address: Address) -> OsamResult<Block> {
        let block = self.store.access_and_remove(address)?;
        Ok(block.unwrap_or(Block::Empty))
    }

    /// Store `block` at `address`.
    ///
    /// A throwaway address is allocated and read first, so a write performs
    /// the same read access as a read does before its eviction.
    pub fn write(&mut self, address: Address, block: impl Into<Block>) -> OsamResult<()> {
        let dummy = self.alloc("dummy")?;
        self.store.access_and_remove(dummy)?;
        self.store.evict_write(address, block.into())?;
        trace!(%address, "write");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Typed helpers
    // ---------------------------------------------------------------

    /// Write one chain cell.
    pub fn write_link(&mut self, address: Address, link: QueueLink) -> OsamResult<()> {
        self.write(address, link)
    }

    /// Write a tree record.
    pub fn write_node<N: StoredNode>(&mut self, address: Address, node: N) -> OsamResult<()> {
        self.write(address, node)
    }

    /// Consuming read that must decode to a tree record of kind `N`.
    pub fn read_node<N: StoredNode>(&mut self, address: Address) -> OsamResult<N> {
        let block = self.read(address)?;
        let found = block.kind();
        let unexpected = || OsamError::UnexpectedBlock {
            address,
            expected: N::KIND,
            found,
        };
        match block {
            Block::Node(tree) => N::from_tree(tree).ok_or_else(unexpected),
            Block::Empty | Block::Content(_) | Block::Link(_) => Err(unexpected()),
        }
    }

    // ---------------------------------------------------------------
    // Queue
    // ---------------------------------------------------------------

    /// Open an empty FIFO. Head and tail start as the same address.
    pub fn open_queue(&mut self) -> OsamResult<(Address, Address)> {
        let head = self.alloc("open_queue")?;
        Ok((head, head))
    }

    /// Append `payload` at `tail` and return the new tail.
    pub fn enqueue(&mut self, tail: Address, payload: Address) -> OsamResult<Address> {
        let new_tail = self.alloc("enqueue")?;
        self.write_link(tail, QueueLink::new(payload, new_tail))?;
        Ok(new_tail)
    }

    /// Consume the cell at `head`, returning `(payload, next_head)`.
    ///
    /// An empty cell (the current tail of a chain) yields `(NIL, NIL)`.
    pub fn dequeue(&mut self, head: Address) -> OsamResult<(Address, Address)> {
        match self.read(head)? {
            Block::Empty => Ok((Address::NIL, Address::NIL)),
            Block::Link(link) => Ok((link.target, link.next)),
            other => Err(OsamError::UnexpectedBlock {
                address: head,
                expected: BlockKind::Link,
                found: other.kind(),
            }),
        }
    }
}

impl<S: BlockStore + std::fmt::Debug> std::fmt::Debug for Osam<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Osam").field("store", &self.store).finish()
    }
}
