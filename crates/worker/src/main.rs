//! offline-worker entry point.
//!
//! Boots the gate and the worker against the shared database, then reads
//! control messages from stdin as JSON lines until EOF. Logging goes to
//! stderr so stdout stays free for embedding tooling.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use elrayan_client::{FetchConfig, HttpNetwork};
use elrayan_core::{CacheDb, SiteConfig};
use elrayan_gate::{LogHints, LogRegistrar};
use elrayan_worker::{Command, OfflineWorker};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = SiteConfig::load()?;
    let db = CacheDb::open(&config.db_path).await?;

    let init = elrayan_gate::initialize(&db, &config, &LogHints, &LogRegistrar).await?;
    tracing::info!(
        version = %init.data.version,
        first_visit = init.first_visit,
        rebuilt = init.rebuilt,
        "gate initialized"
    );

    let network = HttpNetwork::new(FetchConfig::from_site(&config))?;
    let worker = Arc::new(OfflineWorker::new(db, network, config)?);

    let (tx, rx) = mpsc::unbounded_channel();
    let runner = tokio::spawn({
        let worker = Arc::clone(&worker);
        async move { worker.run(rx).await }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Command>(line) {
            Ok(cmd) => {
                if tx.send(cmd).is_err() {
                    break;
                }
            }
            Err(err) => tracing::warn!(error = %err, "ignoring malformed control message"),
        }
    }
    drop(tx);

    runner.await??;
    Ok(())
}
