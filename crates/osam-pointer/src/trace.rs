//! Path reporting for pointer operations.
//!
//! A [`PathTracer`] is handed to a pointer manager at construction and
//! receives the tree records an operation walks through. It replaces any
//! process-wide "print the path" switch: each manager reports to its own
//! tracer, and only when [`PointerConfig::trace_path`](crate::PointerConfig)
//! is set.

use std::sync::{Arc, Mutex};

use tracing::debug;

use osam_types::{NodeId, Slot};

/// One reported step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathEvent {
    /// A record was fetched while walking towards the root.
    Fetched(NodeId),
    /// A record was created below `parent` on `side`.
    Created {
        node: NodeId,
        parent: NodeId,
        side: Slot,
    },
}

/// Receiver of path events.
pub trait PathTracer: Send {
    fn record(&mut self, event: PathEvent);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NoopTracer;

impl PathTracer for NoopTracer {
    fn record(&mut self, _event: PathEvent) {}
}

/// Emits every event as a `tracing` debug event.
#[derive(Debug, Default)]
pub struct LogTracer;

impl PathTracer for LogTracer {
    fn record(&mut self, event: PathEvent) {
        match event {
            PathEvent::Fetched(node) => debug!(%node, "fetched node"),
            PathEvent::Created { node, parent, side } => {
                debug!(%node, %parent, %side, "created node")
            }
        }
    }
}

/// Collects events into a buffer shared with the caller.
///
/// Clone the tracer before handing it to a pointer manager and keep the
/// clone to inspect what was recorded.
#[derive(Clone, Debug, Default)]
pub struct RecordingTracer {
    events: Arc<Mutex<Vec<PathEvent>>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<PathEvent> {
        self.events.lock().expect("lock poisoned").clone()
    }

    /// Number of `Fetched` events recorded so far.
    pub fn fetched(&self) -> usize {
        self.events
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|e| matches!(e, PathEvent::Fetched(_)))
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().expect("lock poisoned").clear();
    }
}

impl PathTracer for RecordingTracer {
    fn record(&mut self, event: PathEvent) {
        self.events.lock().expect("lock poisoned").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_tracer_shares_buffer_with_clones() {
        let tracer = RecordingTracer::new();
        let mut handed_out = tracer.clone();
        handed_out.record(PathEvent::Fetched(NodeId(1)));
        handed_out.record(PathEvent::Created {
            node: NodeId(2),
            parent: NodeId(1),
            side: Slot::Left,
        });
        assert_eq!(tracer.events().len(), 2);
        assert_eq!(tracer.fetched(), 1);

        tracer.clear();
        assert!(tracer.events().is_empty());
    }

    #[test]
    fn noop_and_log_tracers_accept_events() {
        NoopTracer.record(PathEvent::Fetched(NodeId(1)));
        LogTracer.record(PathEvent::Fetched(NodeId(1)));
    }
}
