use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use osam_types::{Address, Block};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// State of an issued, not yet read address. A read removes the entry.
#[derive(Debug)]
enum SlotState {
    /// Issued, nothing written yet.
    Reserved,
    /// Holds a block waiting to be read.
    Filled(Block),
}

/// Access counters of a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub allocs: u64,
    pub reads: u64,
    pub writes: u64,
}

/// In-memory, bucketed block store.
///
/// Intended for tests and simulation. Each address lands in a bucket drawn
/// uniformly at random, the way a path-based oblivious store assigns a
/// random leaf. Every protocol breach is reported. Read addresses are
/// dropped from their bucket; since ids are monotonic, an issued id missing
/// from every bucket is known to be consumed.
pub struct InMemoryBlockStore {
    buckets: Vec<HashMap<u64, SlotState>>,
    next_id: u64,
    rng: StdRng,
    stats: StoreStats,
}

impl InMemoryBlockStore {
    /// Create a store from `config`.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        if config.buckets == 0 {
            return Err(StoreError::InvalidConfig(
                "bucket count must be at least 1".into(),
            ));
        }
        if u32::try_from(config.buckets).is_err() {
            return Err(StoreError::InvalidConfig(format!(
                "bucket count {} exceeds u32 range",
                config.buckets
            )));
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::with_rng(config.buckets, rng))
    }

    fn with_rng(buckets: usize, rng: StdRng) -> Self {
        Self {
            buckets: (0..buckets).map(|_| HashMap::new()).collect(),
            next_id: 0,
            rng,
            stats: StoreStats::default(),
        }
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of addresses issued so far.
    pub fn issued(&self) -> u64 {
        self.next_id
    }

    /// Number of blocks currently written and not yet read.
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|b| b.values())
            .filter(|s| matches!(s, SlotState::Filled(_)))
            .count()
    }

    /// Returns `true` if no unread block is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access counters since creation.
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Index of the bucket holding a live entry for `address`.
    ///
    /// An issued id that no bucket holds any more was consumed and is
    /// reported through `consumed`.
    fn locate(
        &self,
        address: Address,
        consumed: fn(Address) -> StoreError,
    ) -> StoreResult<usize> {
        if address.is_nil() {
            return Err(StoreError::NilAddress);
        }
        let buckets = self.buckets.len();
        let index = address.bucket() as usize;
        let bucket = self
            .buckets
            .get(index)
            .ok_or(StoreError::BucketOutOfRange { address, buckets })?;
        if bucket.contains_key(&address.id()) {
            return Ok(index);
        }
        let id = address.id();
        if id < self.next_id && !self.buckets.iter().any(|b| b.contains_key(&id)) {
            Err(consumed(address))
        } else {
            Err(StoreError::NeverAllocated(address))
        }
    }
}

impl Default for InMemoryBlockStore {
    fn default() -> Self {
        Self::with_rng(StoreConfig::default().buckets, StdRng::from_entropy())
    }
}

impl BlockStore for InMemoryBlockStore {
    fn alloc(&mut self, _hint: &str) -> StoreResult<Address> {
        let bucket = self.rng.gen_range(0..self.buckets.len());
        // Bucket count is checked against u32 at construction.
        let address = Address::new(self.next_id, bucket as u32);
        self.next_id += 1;
        self.buckets[bucket].insert(address.id(), SlotState::Reserved);
        self.stats.allocs += 1;
        Ok(address)
    }

    fn access_and_remove(&mut self, address: Address) -> StoreResult<Option<Block>> {
        let index = self.locate(address, StoreError::DoubleRead)?;
        let block = match self.buckets[index].remove(&address.id()) {
            Some(SlotState::Filled(block)) => Some(block),
            Some(SlotState::Reserved) | None => None,
        };
        self.stats.reads += 1;
        trace!(%address, bucket = address.bucket(), hit = block.is_some(), "access");
        Ok(block)
    }

    fn evict_write(&mut self, address: Address, block: Block) -> StoreResult<()> {
        let index = self.locate(address, StoreError::DoubleWrite)?;
        match self.buckets[index].get_mut(&address.id()) {
            Some(slot) if matches!(slot, SlotState::Reserved) => *slot = SlotState::Filled(block),
            _ => return Err(StoreError::DoubleWrite(address)),
        }
        self.stats.writes += 1;
        trace!(%address, bucket = address.bucket(), "evict");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlockStore")
            .field("buckets", &self.buckets.len())
            .field("issued", &self.next_id)
            .field("block_count", &self.len())
            .finish()
    }
}
