//! Worker lifecycle states.

use serde::{Deserialize, Serialize};

/// Lifecycle states of one worker instance.
///
/// An instance moves strictly forward: `Installing → Installed →
/// Activating → Activated`. There is no backward transition; a failed
/// install leaves the instance in `Installing` and the next start simply
/// retries from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    /// Precaching assets; the install gate has not resolved yet.
    Installing,
    /// Install complete, ready to activate without waiting.
    Installed,
    /// Dropping stale partitions.
    Activating,
    /// Serving; all client contexts are claimed.
    Activated,
}

impl WorkerState {
    /// Whether fetch interception is live in this state.
    pub fn can_intercept(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Installing => write!(f, "installing"),
            WorkerState::Installed => write!(f, "installed"),
            WorkerState::Activating => write!(f, "activating"),
            WorkerState::Activated => write!(f, "activated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_activated_intercepts() {
        assert!(WorkerState::Activated.can_intercept());
        assert!(!WorkerState::Installing.can_intercept());
        assert!(!WorkerState::Installed.can_intercept());
        assert!(!WorkerState::Activating.can_intercept());
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkerState::Installing.to_string(), "installing");
        assert_eq!(WorkerState::Activated.to_string(), "activated");
    }
}
