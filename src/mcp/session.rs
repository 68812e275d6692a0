//! Handshake state shared by every request served through one dispatcher

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Tracks whether `initialize` has completed.
///
/// Clones share the same flag. Starts out not ready and never goes back once
/// ready.
#[derive(Debug, Clone, Default)]
pub struct Session {
    ready: Arc<AtomicBool>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Returns `true` when this call performed the transition.
    pub(in crate::mcp) fn mark_ready(&self) -> bool {
        !self.ready.swap(true, Ordering::AcqRel)
    }
}
