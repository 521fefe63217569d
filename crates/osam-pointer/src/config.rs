use serde::{Deserialize, Serialize};

/// Configuration shared by both pointer kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Report the nodes visited by `get`/`put` and the nodes created by
    /// `copy` to the pointer's [`PathTracer`](crate::PathTracer).
    pub trace_path: bool,
}

impl PointerConfig {
    /// Configuration with path tracing switched on.
    pub fn traced() -> Self {
        Self { trace_path: true }
    }
}
