//! Install and activate transitions.
//!
//! Install runs the two precache steps concurrently but with different
//! failure policies: the static partition is all-or-nothing (a missing
//! local asset is a build error and must fail the install), while the
//! dynamic partition is best effort (third-party availability is not
//! guaranteed, so each fetch is isolated). Activation evicts every
//! partition whose name is no longer current, then claims all client
//! contexts by publishing `Activated`.

use elrayan_client::{Network, ResourceRequest, resolve_asset};
use elrayan_core::{Error, site};

use crate::state::WorkerState;
use crate::OfflineWorker;

impl<N: Network + 'static> OfflineWorker<N> {
    /// Run the install gate: both partitions are warmed concurrently, and
    /// the worker does not become `Installed` until the static step has
    /// fully resolved.
    pub async fn install(&self) -> Result<(), Error> {
        let (seeded, ()) = tokio::join!(self.seed_static(), self.warm_dynamic());
        seeded?;

        // Install succeeded: ready to activate without a waiting phase.
        self.transition(WorkerState::Installed);
        Ok(())
    }

    /// Fetch every static asset into the static partition. Any single
    /// failure aborts the whole step.
    pub(crate) async fn seed_static(&self) -> Result<(), Error> {
        self.db().open_partition(site::STATIC_PARTITION).await?;

        for asset in &self.config().static_assets {
            let url = resolve_asset(self.origin(), asset).map_err(|e| Error::InvalidUrl(e.to_string()))?;
            let req = ResourceRequest::get(url);
            let snapshot = self.net().fetch(&req).await?;
            self.db().put_response(site::STATIC_PARTITION, &snapshot).await?;
        }

        tracing::info!(assets = self.config().static_assets.len(), "static partition seeded");
        Ok(())
    }

    /// Warm the dynamic partition from the CDN asset list. Each asset is
    /// isolated: a failure is logged and the rest continue.
    async fn warm_dynamic(&self) {
        if let Err(err) = self.db().open_partition(site::DYNAMIC_PARTITION).await {
            tracing::warn!(error = %err, "could not open dynamic partition");
            return;
        }

        for asset in &self.config().cdn_assets {
            let url = match resolve_asset(self.origin(), asset) {
                Ok(url) => url,
                Err(err) => {
                    tracing::warn!(asset = %asset, error = %err, "skipping unresolvable optional asset");
                    continue;
                }
            };

            let req = ResourceRequest::get(url);
            match self.net().fetch(&req).await {
                Ok(snapshot) => {
                    if let Err(err) = self.db().put_response(site::DYNAMIC_PARTITION, &snapshot).await {
                        tracing::warn!(url = %req.url, error = %err, "optional asset could not be stored");
                    }
                }
                Err(err) => {
                    tracing::warn!(url = %req.url, error = %err, "optional asset skipped");
                }
            }
        }
    }

    /// Evict stale partitions, then claim all client contexts.
    pub async fn activate(&self) -> Result<(), Error> {
        self.transition(WorkerState::Activating);

        for name in self.db().partition_names().await? {
            if name != site::STATIC_PARTITION && name != site::DYNAMIC_PARTITION {
                self.db().delete_partition(&name).await?;
                tracing::info!(partition = %name, "dropped stale partition");
            }
        }

        self.transition(WorkerState::Activated);
        Ok(())
    }
}
