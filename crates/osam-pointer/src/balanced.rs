//! Balanced smart pointer.
//!
//! Same edge discipline as [`SmartPointer`](crate::SmartPointer), but the
//! root keeps the live alias count and every record caches the heads of the
//! chains to its children. With `m` aliases the attachment point of alias
//! `m` is found by walking the bits of `m - 2^floor(log2 m)` from the root
//! (0 = left, 1 = right), so the tree stays a complete binary tree and every
//! path is at most `ceil(log2 m) + 1` edges long.
//!
//! # Edges
//!
//! A child record has two incoming chains: its `parent_head` chain ends in a
//! left/right tail of the parent, and the parent's `left_head`/`right_head`
//! chain ends in the child's `parent_tail`. The first is walked upwards by
//! get/put, the second downwards by copy/delete.

use tracing::{debug, info};

use osam_manager::Osam;
use osam_store::BlockStore;
use osam_types::{Address, BNode, Content, Slot, StoredNode};

use crate::arena::TreeArena;
use crate::config::PointerConfig;
use crate::error::{PointerError, PointerResult};
use crate::ptr::{DeleteOutcome, Ptr};
use crate::trace::{LogTracer, PathEvent, PathTracer};
use crate::traits::PointerScheme;

/// Balanced oblivious pointer manager.
pub struct BalancedSmartPointer<S> {
    arena: TreeArena<S>,
}

impl<S: BlockStore> BalancedSmartPointer<S> {
    /// Create a manager over `store`, reporting paths as `tracing` events.
    pub fn new(store: S, config: PointerConfig) -> Self {
        Self::with_tracer(store, config, Box::new(LogTracer))
    }

    /// Create a manager that reports paths to `tracer`.
    pub fn with_tracer(store: S, config: PointerConfig, tracer: Box<dyn PathTracer>) -> Self {
        Self {
            arena: TreeArena::new(store, config, tracer),
        }
    }

    /// The address manager, for diagnostics.
    pub fn osam(&self) -> &Osam<S> {
        self.arena.osam()
    }

    /// Number of live aliases of the object behind `ptr`.
    ///
    /// Walks to the root like `get` and leaves the same access trace.
    pub fn count(&mut self, ptr: &mut Ptr) -> PointerResult<u64> {
        debug!(head = %ptr.head(), "count");
        let mut root = self.ascend(ptr, false)?;
        let count = alias_count(&root)?;
        self.arena.save_node(&mut root)?;
        Ok(count)
    }

    fn new_root(&mut self, content: Option<Content>) -> PointerResult<Ptr> {
        let mut root = BNode::root(self.arena.next_id(), content);
        let ptr = Ptr::from_head(self.arena.add_tail(&mut root)?);
        self.arena.save_node(&mut root)?;
        Ok(ptr)
    }

    /// Chase `ptr` and climb to the root, re-linking every edge walked into
    /// the slot it came from. Returns the root in hand.
    fn ascend(&mut self, ptr: &mut Ptr, trace: bool) -> PointerResult<BNode> {
        let (mut node, slot) = self.arena.chase::<BNode>(ptr.head())?;
        if slot == Slot::Parent {
            return Err(PointerError::invariant(format!(
                "handle chain ends in the parent slot of node {}",
                node.id
            )));
        }
        ptr.set_head(self.arena.add_tail_at(&mut node, slot)?);
        self.arena.trace(trace, PathEvent::Fetched(node.id));

        while !node.is_root {
            if node.parent_head.is_nil() {
                return Err(PointerError::invariant(format!(
                    "ascend stopped at non-root node {}",
                    node.id
                )));
            }
            let (mut parent, pslot) = self.arena.chase::<BNode>(node.parent_head)?;
            node.parent_head = self.arena.add_tail_at(&mut parent, pslot)?;
            self.arena.save_node(&mut node)?;
            node = parent;
            self.arena.trace(trace, PathEvent::Fetched(node.id));
        }
        Ok(node)
    }

    /// Walk from `root` to the attachment point of alias number `m`,
    /// creating missing records on the way.
    ///
    /// Every record left behind is saved, the root included. The last record
    /// is returned in hand together with the side it hangs from, `None` when
    /// it is the root itself.
    fn descend(&mut self, root: BNode, m: u64) -> PointerResult<(BNode, Option<Slot>)> {
        if !root.is_root {
            return Err(PointerError::invariant(format!(
                "descend started at non-root node {}",
                root.id
            )));
        }
        if m <= 1 {
            return Ok((root, None));
        }
        let pow = 63 - m.leading_zeros();
        let rightmost = m - (1u64 << pow);

        let mut node = root;
        let mut side = None;
        for bit in (0..pow).rev() {
            let s = if (rightmost >> bit) & 1 == 0 {
                Slot::Left
            } else {
                Slot::Right
            };
            let head = node.child_head(s);
            let mut next = if head.is_nil() {
                // The edge on this side moves down into the new record.
                let mut child = BNode::new(self.arena.next_id());
                child.replace_tail(s, node.replace_tail(s, Address::NIL));
                child.parent_head = self.arena.add_tail_at(&mut node, s)?;
                self.arena.trace(
                    true,
                    PathEvent::Created {
                        node: child.id,
                        parent: node.id,
                        side: s,
                    },
                );
                child
            } else {
                let (child, slot) = self.arena.chase::<BNode>(head)?;
                if slot != Slot::Parent {
                    return Err(PointerError::invariant(format!(
                        "child cache of node {} ends in slot {slot} of node {}",
                        node.id, child.id
                    )));
                }
                child
            };
            node.set_child_head(s, self.arena.add_tail_at(&mut next, Slot::Parent)?);
            self.arena.save_node(&mut node)?;
            node = next;
            side = Some(s);
        }
        Ok((node, side))
    }
}

fn alias_count(root: &BNode) -> PointerResult<u64> {
    root.count
        .ok_or_else(|| PointerError::invariant(format!("root {} carries no alias count", root.id)))
}

impl<S: BlockStore> PointerScheme for BalancedSmartPointer<S> {
    fn create(&mut self, content: Content) -> PointerResult<Ptr> {
        debug!(len = content.len(), "new");
        self.new_root(Some(content))
    }

    fn create_empty(&mut self) -> PointerResult<Ptr> {
        debug!("new (empty)");
        self.new_root(None)
    }

    fn get(&mut self, ptr: &mut Ptr) -> PointerResult<Option<Content>> {
        debug!(head = %ptr.head(), "get");
        let trace = self.arena.config().trace_path;
        let mut root = self.ascend(ptr, trace)?;
        let content = root.content.clone();
        self.arena.save_node(&mut root)?;
        Ok(content)
    }

    fn put(&mut self, ptr: &mut Ptr, content: Content) -> PointerResult<()> {
        debug!(head = %ptr.head(), len = content.len(), "put");
        let trace = self.arena.config().trace_path;
        let mut root = self.ascend(ptr, trace)?;
        root.content = Some(content);
        self.arena.save_node(&mut root)
    }

    fn copy(&mut self, ptr: &mut Ptr) -> PointerResult<Ptr> {
        debug!(head = %ptr.head(), "copy");
        let mut root = self.ascend(ptr, false)?;
        let count = alias_count(&root)? + 1;
        root.count = Some(count);

        let (mut node, _) = self.descend(root, count)?;
        let copy = Ptr::from_head(self.arena.add_tail(&mut node)?);
        self.arena.save_node(&mut node)?;
        Ok(copy)
    }

    fn delete(&mut self, ptr: &mut Ptr) -> PointerResult<DeleteOutcome> {
        if ptr.is_null() {
            return Ok(DeleteOutcome::Noop);
        }
        debug!(head = %ptr.head(), "delete");
        let mut root = self.ascend(ptr, false)?;
        let m = alias_count(&root)?;
        if m == 0 {
            return Err(PointerError::invariant(format!(
                "delete on root {} with no aliases",
                root.id
            )));
        }
        root.count = Some(m - 1);

        // The record of the last alias is vacated; the deleted edge takes
        // over one of its edges.
        let (mut last, side) = self.descend(root, m)?;
        self.arena.save_node(&mut last)?;
        let (mut holder, freed) = self.arena.chase::<BNode>(ptr.head())?;
        ptr.set_head(Address::NIL);

        let Some(side) = side else {
            if holder.is_drained() {
                info!(node = %holder.id, "all aliases deleted");
                return Ok(DeleteOutcome::Drained {
                    content: holder.content,
                });
            }
            self.arena.save_node(&mut holder)?;
            return Ok(DeleteOutcome::Detached);
        };

        let keep = if holder.id == last.id {
            // The deleted edge hung from the vacated record itself: the one
            // edge left there moves up.
            last = holder;
            if last.left_tail.is_nil() {
                last.right_tail
            } else {
                last.left_tail
            }
        } else {
            if freed == Slot::Parent {
                return Err(PointerError::invariant(format!(
                    "handle chain ends in the parent slot of node {}",
                    holder.id
                )));
            }
            holder.replace_tail(freed, last.replace_tail(side.mirror(), Address::NIL));
            self.arena.save_node(&mut holder)?;
            last.tail(side)
        };

        let (mut parent, pslot) = self.arena.chase::<BNode>(last.parent_head)?;
        if pslot != side {
            return Err(PointerError::invariant(format!(
                "node {} hangs from slot {pslot} of node {}, expected {side}",
                last.id, parent.id
            )));
        }
        parent.replace_tail(side, keep);
        parent.set_child_head(side, Address::NIL);
        self.arena.save_node(&mut parent)?;
        Ok(DeleteOutcome::Detached)
    }
}
