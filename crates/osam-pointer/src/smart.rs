//! Unbalanced smart pointer.
//!
//! The alias graph of one content object is a binary tree of [`Node`]s. The
//! root holds the content; each handle's chain ends in a tail slot of some
//! node, and each non-root node's `parent_head` chain ends in a tail slot of
//! its parent. Copying a handle that shares its node with another edge
//! splits that node, so depth can grow with the number of copies.

use tracing::{debug, info};

use osam_manager::Osam;
use osam_store::BlockStore;
use osam_types::{Address, Content, Node, StoredNode};

use crate::arena::TreeArena;
use crate::config::PointerConfig;
use crate::error::{PointerError, PointerResult};
use crate::ptr::{DeleteOutcome, Ptr};
use crate::trace::{LogTracer, PathEvent, PathTracer};
use crate::traits::PointerScheme;

/// Unbalanced oblivious pointer manager.
pub struct SmartPointer<S> {
    arena: TreeArena<S>,
}

impl<S: BlockStore> SmartPointer<S> {
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

    fn new_root(&mut self, content: Option<Content>) -> PointerResult<Ptr> {
        let mut root = Node::root(self.arena.next_id(), content);
        let ptr = Ptr::from_head(self.arena.add_tail(&mut root)?);
        self.arena.save_node(&mut root)?;
        Ok(ptr)
    }

    /// Chase `ptr` to its node and climb to the root.
    ///
    /// Every edge walked is replaced by a fresh one, and every node left
    /// behind is persisted. The root is returned in hand; the caller must
    /// save it.
    fn retrieve(&mut self, ptr: &mut Ptr, trace: bool) -> PointerResult<Node> {
        let (mut node, _) = self.arena.chase::<Node>(ptr.head())?;
        ptr.set_head(self.arena.add_tail(&mut node)?);
        self.arena.trace(trace, PathEvent::Fetched(node.id));

        while !node.is_root {
            if node.parent_head.is_nil() {
                return Err(PointerError::invariant(format!(
                    "retrieve stopped at non-root node {}",
                    node.id
                )));
            }
            let (mut parent, _) = self.arena.chase::<Node>(node.parent_head)?;
            node.parent_head = self.arena.add_tail(&mut parent)?;
            self.arena.save_node(&mut node)?;
            node = parent;
            self.arena.trace(trace, PathEvent::Fetched(node.id));
        }
        Ok(node)
    }
}

impl<S: BlockStore> PointerScheme for SmartPointer<S> {
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
        let mut root = self.retrieve(ptr, trace)?;
        let content = root.content.clone();
        self.arena.save_node(&mut root)?;
        Ok(content)
    }

    fn put(&mut self, ptr: &mut Ptr, content: Content) -> PointerResult<()> {
        debug!(head = %ptr.head(), len = content.len(), "put");
        let trace = self.arena.config().trace_path;
        let mut root = self.retrieve(ptr, trace)?;
        root.content = Some(content);
        self.arena.save_node(&mut root)
    }

    fn copy(&mut self, ptr: &mut Ptr) -> PointerResult<Ptr> {
        debug!(head = %ptr.head(), "copy");
        let (mut node, _) = self.arena.chase::<Node>(ptr.head())?;

        // The node already carries another edge: fan out below it.
        if !node.is_drained() {
            let side = node.free_child_slot().ok_or_else(|| {
                PointerError::invariant(format!("node {} has no free slot", node.id))
            })?;
            let mut child = Node::new(self.arena.next_id());
            child.parent_head = self.arena.add_tail_at(&mut node, side)?;
            self.arena.save_node(&mut node)?;
            self.arena.trace(
                true,
                PathEvent::Created {
                    node: child.id,
                    parent: node.id,
                    side,
                },
            );
            node = child;
        }

        let copy = Ptr::from_head(self.arena.add_tail(&mut node)?);
        ptr.set_head(self.arena.add_tail(&mut node)?);
        self.arena.save_node(&mut node)?;
        Ok(copy)
    }

    fn delete(&mut self, ptr: &mut Ptr) -> PointerResult<DeleteOutcome> {
        if ptr.is_null() {
            return Ok(DeleteOutcome::Noop);
        }
        debug!(head = %ptr.head(), "delete");
        let (mut node, _) = self.arena.chase::<Node>(ptr.head())?;
        ptr.set_head(Address::NIL);

        if node.is_root {
            if node.is_drained() {
                info!(node = %node.id, "all aliases deleted");
                return Ok(DeleteOutcome::Drained {
                    content: node.content,
                });
            }
            self.arena.save_node(&mut node)?;
            return Ok(DeleteOutcome::Detached);
        }

        // Splice the node out: its one remaining edge moves up to the parent.
        let remaining = if !node.left_tail.is_nil() {
            node.left_tail
        } else {
            node.right_tail
        };
        if remaining.is_nil() {
            return Err(PointerError::invariant(format!(
                "interior node {} has no remaining edge",
                node.id
            )));
        }
        let (mut parent, _) = self.arena.chase::<Node>(node.parent_head)?;
        if parent.left_tail.is_nil() {
            parent.left_tail = remaining;
        } else {
            parent.right_tail = remaining;
        }
        self.arena.save_node(&mut parent)?;
        Ok(DeleteOutcome::Detached)
    }
}
