//! Server lifecycle state.
//!
//! The server starts `Uninitialized` and becomes `Ready` once startup
//! validation succeeds. The transition happens at most once and is never
//! undone.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Ready { since: DateTime<Utc> },
}

/// Shared lifecycle tracker.
#[derive(Debug)]
pub struct Lifecycle {
    created: Instant,
    ready_at: OnceLock<DateTime<Utc>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            created: Instant::now(),
            ready_at: OnceLock::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        match self.ready_at.get() {
            Some(since) => LifecycleState::Ready { since: *since },
            None => LifecycleState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready_at.get().is_some()
    }

    /// Mark startup as complete. Returns `false` if it already was.
    pub fn mark_ready(&self) -> bool {
        self.ready_at.set(Utc::now()).is_ok()
    }

    /// Time since the server was constructed.
    pub fn uptime(&self) -> Duration {
        self.created.elapsed()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_once() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Uninitialized);
        assert!(!lifecycle.is_ready());

        assert!(lifecycle.mark_ready());
        let first = lifecycle.state();
        assert!(matches!(first, LifecycleState::Ready { .. }));

        assert!(!lifecycle.mark_ready());
        assert_eq!(lifecycle.state(), first);
    }
}
