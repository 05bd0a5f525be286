//! Out-of-band control channel.
//!
//! Control messages reach the worker independently of the fetch path and
//! carry no response payload; the sender fires and forgets. The wire
//! shape is a tagged JSON object, e.g. `{"type": "CLEAR_CACHE"}`.

use serde::{Deserialize, Serialize};

use elrayan_client::Network;
use elrayan_core::Error;

use crate::state::WorkerState;
use crate::OfflineWorker;

/// Control messages the worker accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Force a pending instance to activate immediately.
    SkipWaiting,
    /// Delete every partition. Manual reset; safe on an empty store.
    ClearCache,
    /// Delete every partition, then re-seed the static partition from the
    /// asset list. Forces a refresh without a version bump in the gate.
    UpdateVersion,
}

impl<N: Network + 'static> OfflineWorker<N> {
    /// Apply one control message.
    pub async fn handle_command(&self, cmd: Command) -> Result<(), Error> {
        match cmd {
            Command::SkipWaiting => {
                if self.state() == WorkerState::Installed {
                    self.activate().await?;
                } else {
                    tracing::debug!(state = %self.state(), "skip-waiting ignored");
                }
            }
            Command::ClearCache => {
                let removed = self.db().clear_partitions().await?;
                tracing::info!(removed, "cache cleared");
            }
            Command::UpdateVersion => {
                let removed = self.db().clear_partitions().await?;
                tracing::info!(removed, "cache cleared for forced refresh");
                self.seed_static().await?;
            }
        }
        Ok(())
    }
}
