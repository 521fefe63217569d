//! Chain machinery shared by both pointer kinds.
//!
//! [`TreeArena`] owns the address manager and implements the three moves
//! every operation is built from:
//!
//! - [`chase`](TreeArena::chase): walk a chain to its record, consuming it,
//!   and clear the tail slot the chain ended in.
//! - [`add_tail_at`](TreeArena::add_tail_at): open a fresh chain into a slot.
//! - [`save_node`](TreeArena::save_node): persist a record at a fresh
//!   address and extend every incoming chain to it.
//!
//! A record in hand has been consumed from the store. It must be saved
//! exactly once, or dropped on purpose, before anything chases it again.

use osam_manager::Osam;
use osam_store::BlockStore;
use osam_types::{Address, NodeId, Slot, StoredNode};

use crate::config::PointerConfig;
use crate::error::{PointerError, PointerResult};
use crate::trace::{PathEvent, PathTracer};

pub(crate) struct TreeArena<S> {
    osam: Osam<S>,
    next_node: u64,
    tracer: Box<dyn PathTracer>,
    config: PointerConfig,
}

impl<S: BlockStore> TreeArena<S> {
    pub(crate) fn new(store: S, config: PointerConfig, tracer: Box<dyn PathTracer>) -> Self {
        Self {
            osam: Osam::new(store),
            next_node: 0,
            tracer,
            config,
        }
    }

    pub(crate) fn osam(&self) -> &Osam<S> {
        &self.osam
    }

    pub(crate) fn config(&self) -> &PointerConfig {
        &self.config
    }

    pub(crate) fn next_id(&mut self) -> NodeId {
        self.next_node += 1;
        NodeId(self.next_node)
    }

    /// Report `event` if path tracing is on and the caller asked for it.
    pub(crate) fn trace(&mut self, enabled: bool, event: PathEvent) {
        if enabled && self.config.trace_path {
            self.tracer.record(event);
        }
    }

    /// Walk the chain starting at `head` to the record it designates.
    ///
    /// The chain is consumed cell by cell. The payload of the last non-empty
    /// cell is the newest copy of the record; older payloads along the way are
    /// never read. The slot whose tail ended the walk is cleared and returned;
    /// the caller must install a new edge for whoever held `head`.
    pub(crate) fn chase<N: StoredNode>(&mut self, head: Address) -> PointerResult<(N, Slot)> {
        if head.is_nil() {
            return Err(PointerError::NullPointer);
        }
        let mut head = head;
        let mut target = Address::NIL;
        let mut latest = Address::NIL;
        let mut tail = Address::NIL;
        while !head.is_nil() {
            latest = target;
            tail = head;
            (target, head) = self.osam.dequeue(head)?;
        }
        if latest.is_nil() {
            return Err(PointerError::invariant(format!(
                "chain ending at {tail} carries no record"
            )));
        }

        let mut node: N = self.osam.read_node(latest)?;
        let slot = node.release_tail(tail).ok_or_else(|| {
            PointerError::invariant(format!("node {} holds no tail {tail}", node.id()))
        })?;
        Ok((node, slot))
    }

    /// Open a fresh chain whose tail sits in `slot` of `node`; return its head.
    pub(crate) fn add_tail_at<N: StoredNode>(
        &mut self,
        node: &mut N,
        slot: Slot,
    ) -> PointerResult<Address> {
        if !node.tail(slot).is_nil() {
            return Err(PointerError::invariant(format!(
                "slot {slot} of node {} is occupied",
                node.id()
            )));
        }
        let (head, tail) = self.osam.open_queue()?;
        let id = node.id();
        let t = node
            .tail_mut(slot)
            .ok_or_else(|| PointerError::invariant(format!("node {id} has no slot {slot}")))?;
        *t = tail;
        Ok(head)
    }

    /// Open a fresh chain into the first free child slot, left preferred.
    pub(crate) fn add_tail<N: StoredNode>(&mut self, node: &mut N) -> PointerResult<Address> {
        let slot = node.free_child_slot().ok_or_else(|| {
            PointerError::invariant(format!("node {} has no free slot", node.id()))
        })?;
        self.add_tail_at(node, slot)
    }

    /// Persist `node` at a fresh address.
    ///
    /// Each occupied tail is extended with the new address first, so the
    /// stored copy never holds a tail that already has a successor.
    pub(crate) fn save_node<N: StoredNode>(&mut self, node: &mut N) -> PointerResult<()> {
        let address = self.osam.alloc("save_node")?;
        for &slot in N::SLOTS {
            if let Some(tail) = node.tail_mut(slot) {
                if !tail.is_nil() {
                    *tail = self.osam.enqueue(*tail, address)?;
                }
            }
        }
        self.osam.write_node(address, node.clone())?;
        Ok(())
    }
}
