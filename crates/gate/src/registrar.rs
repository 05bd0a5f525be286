//! Worker registration seam.
//!
//! The gate only delegates registration; it neither starts the worker nor
//! cares how registration happens. Success and failure are logged by the
//! caller, never propagated.

use elrayan_core::Error;

/// Registers the interception worker for a script path.
#[async_trait::async_trait]
pub trait WorkerRegistrar: Send + Sync {
    async fn register(&self, script: &str) -> Result<(), Error>;
}

/// [`WorkerRegistrar`] that records the registration in the log and
/// nothing else. The binary uses this: its worker is started explicitly,
/// so registration is purely informational there.
#[derive(Debug, Default)]
pub struct LogRegistrar;

#[async_trait::async_trait]
impl WorkerRegistrar for LogRegistrar {
    async fn register(&self, script: &str) -> Result<(), Error> {
        tracing::info!(script = %script, "worker registration requested");
        Ok(())
    }
}
