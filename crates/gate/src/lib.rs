//! The Version Gate: per-page-load versioning of cached site data.
//!
//! A deliberately stateless module — every operation is a free async
//! function over an injected [`MetaStore`], so the production SQLite store
//! and an in-memory test store are interchangeable. The gate owns three
//! durable keys (version tag, site-data blob, last-visit timestamp) and
//! two side channels: resource hints after a rebuild, and worker
//! registration after every initialize.

pub mod hints;
pub mod registrar;

use chrono::Utc;
use tracing::{info, warn};

use elrayan_core::site::{self, SiteData};
use elrayan_core::{Error, MetaStore, SiteConfig};

pub use hints::{HintKind, HintSink, LogHints, ResourceHint, hints_for};
pub use registrar::{LogRegistrar, WorkerRegistrar};

/// Result of a gate initialization: the site data the page should render
/// from, plus how it got there.
#[derive(Debug, Clone)]
pub struct Initialized {
    pub data: SiteData,
    /// No last-visit timestamp existed before this call.
    pub first_visit: bool,
    /// The version-mismatch path ran (as opposed to loading the stored
    /// blob). A corrupt-blob recovery inside `load` does not set this.
    pub rebuilt: bool,
}

/// Stats report over the gate's durable keys. Pure read, no mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct GateStats {
    pub version: Option<String>,
    pub last_visit: Option<String>,
    pub is_first_visit: bool,
    /// UTF-16 size estimate over every value stored under the site's key
    /// prefix: two bytes per code unit.
    pub cache_size: u64,
}

/// Run the once-per-page-load sequence.
///
/// Reads the stored version tag; a missing or stale tag rebuilds the
/// cached-data blob, a current one loads it. The last-visit timestamp is
/// written unconditionally afterwards, then worker registration is
/// delegated — its outcome is logged, never propagated.
pub async fn initialize<S, H, R>(
    store: &S, config: &SiteConfig, hints: &H, registrar: &R,
) -> Result<Initialized, Error>
where
    S: MetaStore,
    H: HintSink,
    R: WorkerRegistrar,
{
    let stored = store.get(site::VERSION_KEY).await?;
    let last_visit = store.get(site::LAST_VISIT_KEY).await?;
    let first_visit = last_visit.is_none();

    let (data, rebuilt) = match stored.as_deref() {
        Some(tag) if tag == config.version => (load(store, config, hints).await?, false),
        Some(tag) => {
            info!(stored = %tag, current = %config.version, "version changed, rebuilding site data");
            (rebuild(store, config, hints).await?, true)
        }
        None => (rebuild(store, config, hints).await?, true),
    };

    store.set(site::LAST_VISIT_KEY, &Utc::now().to_rfc3339()).await?;

    match registrar.register(&config.worker_script).await {
        Ok(()) => info!(script = %config.worker_script, "worker registered"),
        Err(err) => warn!(script = %config.worker_script, error = %err, "worker registration failed"),
    }

    Ok(Initialized { data, first_visit, rebuilt })
}

/// Write the current version tag, persist a fresh site-data blob, and emit
/// resource hints for the critical asset list.
pub async fn rebuild<S, H>(store: &S, config: &SiteConfig, hints: &H) -> Result<SiteData, Error>
where
    S: MetaStore,
    H: HintSink,
{
    store.set(site::VERSION_KEY, &config.version).await?;

    let data = SiteData {
        version: config.version.clone(),
        timestamp: Utc::now().to_rfc3339(),
        contacts: config.contacts.clone(),
        branding: config.branding.clone(),
    };
    store.set(site::DATA_KEY, &serde_json::to_string(&data)?).await?;

    hints.apply(&hints_for(&config.critical_assets));

    info!(version = %data.version, "rebuilt cached site data");
    Ok(data)
}

/// Read and deserialize the stored blob.
///
/// A missing or unparseable blob is treated as corruption and recovered by
/// [`rebuild`]; the caller always gets usable site data.
pub async fn load<S, H>(store: &S, config: &SiteConfig, hints: &H) -> Result<SiteData, Error>
where
    S: MetaStore,
    H: HintSink,
{
    match store.get(site::DATA_KEY).await? {
        Some(raw) => match serde_json::from_str::<SiteData>(&raw) {
            Ok(data) => Ok(data),
            Err(err) => {
                warn!(error = %err, "cached site data is corrupt, rebuilding");
                rebuild(store, config, hints).await
            }
        },
        None => {
            warn!("version tag present but site data missing, rebuilding");
            rebuild(store, config, hints).await
        }
    }
}

/// Drop the version tag and the blob, then re-run [`initialize`].
/// Idempotent: a second call rebuilds to the same state.
pub async fn force_update<S, H, R>(
    store: &S, config: &SiteConfig, hints: &H, registrar: &R,
) -> Result<Initialized, Error>
where
    S: MetaStore,
    H: HintSink,
    R: WorkerRegistrar,
{
    store.remove(site::VERSION_KEY).await?;
    store.remove(site::DATA_KEY).await?;
    initialize(store, config, hints, registrar).await
}

/// Report over the gate's durable keys. Pure read.
pub async fn stats<S>(store: &S) -> Result<GateStats, Error>
where
    S: MetaStore,
{
    let version = store.get(site::VERSION_KEY).await?;
    let last_visit = store.get(site::LAST_VISIT_KEY).await?;
    let is_first_visit = last_visit.is_none();

    let cache_size = store
        .entries()
        .await?
        .iter()
        .filter(|(key, _)| key.starts_with(site::KEY_PREFIX))
        .map(|(_, value)| value.chars().count() as u64 * 2)
        .sum();

    Ok(GateStats { version, last_visit, is_first_visit, cache_size })
}
