//! The Interception Worker: install/activate/serve over two cache
//! partitions.
//!
//! One [`OfflineWorker`] instance owns the static and dynamic partitions
//! of the shared cache database and answers GET requests with a
//! cache-then-network policy: hits are served immediately and revalidated
//! in the background, misses fall through to the network, and failed
//! navigations degrade to the cached root document. The instance's
//! lifecycle state is published through a watch channel so client
//! contexts observe activation the moment it happens.

pub mod control;
pub mod lifecycle;
pub mod serve;
pub mod state;

pub use control::Command;
pub use serve::{Revalidation, Served};
pub use state::WorkerState;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use url::Url;

use elrayan_client::{Network, same_origin};
use elrayan_core::{CacheDb, Error, SiteConfig, site};

/// A single worker instance bound to one cache database and one network.
pub struct OfflineWorker<N> {
    db: CacheDb,
    net: Arc<N>,
    config: SiteConfig,
    origin: Url,
    state_tx: watch::Sender<WorkerState>,
}

impl<N: Network + 'static> OfflineWorker<N> {
    /// Create a worker in the `Installing` state.
    pub fn new(db: CacheDb, net: N, config: SiteConfig) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let (state_tx, _) = watch::channel(WorkerState::Installing);
        Ok(Self { db, net: Arc::new(net), config, origin, state_tx })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        *self.state_tx.borrow()
    }

    /// Subscribe to lifecycle transitions. Client contexts watch this to
    /// learn when a new instance has claimed them.
    pub fn subscribe(&self) -> watch::Receiver<WorkerState> {
        self.state_tx.subscribe()
    }

    pub(crate) fn transition(&self, next: WorkerState) {
        tracing::info!(state = %next, "worker state");
        self.state_tx.send_replace(next);
    }

    /// Partition that writes for this URL land in: same-origin traffic is
    /// static, everything else dynamic.
    pub(crate) fn partition_for(&self, url: &Url) -> &'static str {
        if same_origin(url, &self.origin) { site::STATIC_PARTITION } else { site::DYNAMIC_PARTITION }
    }

    pub(crate) fn db(&self) -> &CacheDb {
        &self.db
    }

    pub(crate) fn net(&self) -> &Arc<N> {
        &self.net
    }

    pub(crate) fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub(crate) fn origin(&self) -> &Url {
        &self.origin
    }

    /// Run the full lifecycle, then drain control messages until the
    /// channel closes.
    pub async fn run(&self, mut commands: mpsc::UnboundedReceiver<Command>) -> Result<(), Error> {
        self.install().await?;
        self.activate().await?;

        while let Some(cmd) = commands.recv().await {
            if let Err(err) = self.handle_command(cmd).await {
                tracing::error!(command = ?cmd, error = %err, "control command failed");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted network and config helpers shared by the worker tests.

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use elrayan_client::{Network, ResourceRequest};
    use elrayan_core::{Error, ResponseSnapshot, SiteConfig};

    enum Route {
        Ok { body: String, content_type: Option<String> },
        Fail,
    }

    #[derive(Default)]
    struct Inner {
        routes: Mutex<HashMap<String, Route>>,
        hits: Mutex<Vec<String>>,
    }

    /// In-memory [`Network`] with per-URL scripted outcomes. Unrouted URLs
    /// fail, so tests state every fetch they expect. Clones share state.
    #[derive(Clone, Default)]
    pub(crate) struct ScriptedNetwork {
        inner: Arc<Inner>,
    }

    impl ScriptedNetwork {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn route_ok(&self, url: &str, body: &str) {
            self.inner.routes.lock().unwrap().insert(
                url.to_string(),
                Route::Ok { body: body.to_string(), content_type: Some("text/html".into()) },
            );
        }

        pub(crate) fn route_fail(&self, url: &str) {
            self.inner.routes.lock().unwrap().insert(url.to_string(), Route::Fail);
        }

        pub(crate) fn hits(&self) -> Vec<String> {
            self.inner.hits.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Network for ScriptedNetwork {
        async fn fetch(&self, req: &ResourceRequest) -> Result<ResponseSnapshot, Error> {
            self.inner.hits.lock().unwrap().push(req.url.to_string());
            match self.inner.routes.lock().unwrap().get(req.url.as_str()) {
                Some(Route::Ok { body, content_type }) => Ok(ResponseSnapshot {
                    key: req.cache_key(),
                    url: req.url.to_string(),
                    status: 200,
                    content_type: content_type.clone(),
                    headers_json: None,
                    body: body.clone().into_bytes(),
                    fetched_at: chrono::Utc::now().to_rfc3339(),
                }),
                Some(Route::Fail) | None => {
                    Err(Error::Network { url: req.url.to_string(), reason: "unreachable".into() })
                }
            }
        }
    }

    /// Config with a short, fully routable asset list.
    pub(crate) fn test_config() -> SiteConfig {
        SiteConfig {
            origin: "https://elrayan.site".into(),
            static_assets: vec!["/".into(), "/styles.css".into()],
            cdn_assets: vec!["https://cdn.example/lib.css".into()],
            critical_assets: vec!["/styles.css".into()],
            ..Default::default()
        }
    }

    /// Route every configured asset as reachable.
    pub(crate) fn route_all_assets(net: &ScriptedNetwork) {
        net.route_ok("https://elrayan.site/", "<html>home</html>");
        net.route_ok("https://elrayan.site/styles.css", "body{}");
        net.route_ok("https://cdn.example/lib.css", ".lib{}");
    }
}
