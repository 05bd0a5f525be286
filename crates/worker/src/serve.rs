//! The serve path: cache-then-network with stale-while-revalidate.

use std::sync::Arc;

use elrayan_client::{Method, Network, ResourceRequest};
use elrayan_core::{CacheDb, Error, ResponseSnapshot};

use crate::OfflineWorker;

/// How a request was answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Served {
    /// Straight from a partition; revalidation continues in the
    /// background and the caller never waits on it.
    Cache(ResponseSnapshot),
    /// Cache miss answered by the network; the response was stored.
    Network(ResponseSnapshot),
    /// Network down for an HTML navigation; the cached root document
    /// stands in.
    Offline(ResponseSnapshot),
    /// Non-GET traffic is not ours to answer.
    Bypass,
}

/// Outcome of one background revalidation. Logged, never propagated:
/// a failed refresh leaves the stale entry authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revalidation {
    /// The entry was overwritten with a fresh response.
    Updated,
    /// Fetch or store failed; the cached copy stands.
    Failed,
    /// The request was not eligible for revalidation.
    Skipped,
}

impl<N: Network + 'static> OfflineWorker<N> {
    /// Answer one intercepted request.
    ///
    /// GET only; everything else passes through untouched. Hits return
    /// immediately with the cached snapshot and refresh in the
    /// background. Misses go to the network; a failed miss degrades to
    /// the cached root document when the request accepts HTML, and
    /// propagates the failure unmodified otherwise.
    pub async fn serve(&self, req: &ResourceRequest) -> Result<Served, Error> {
        if req.method != Method::GET {
            return Ok(Served::Bypass);
        }

        if let Some(hit) = self.db().match_request(&req.cache_key()).await? {
            self.spawn_revalidation(req.clone());
            return Ok(Served::Cache(hit));
        }

        match self.net().fetch(req).await {
            Ok(snapshot) => {
                self.db().put_response(self.partition_for(&req.url), &snapshot).await?;
                Ok(Served::Network(snapshot))
            }
            Err(err) => {
                if req.accepts_html() {
                    let root = ResourceRequest::get(self.origin().clone());
                    if let Some(fallback) = self.db().match_request(&root.cache_key()).await? {
                        tracing::info!(url = %req.url, "network down, serving cached root document");
                        return Ok(Served::Offline(fallback));
                    }
                }
                Err(err)
            }
        }
    }

    /// Refetch a request and overwrite its cache entry.
    pub async fn revalidate(&self, req: &ResourceRequest) -> Revalidation {
        revalidate_entry(self.db(), self.net().as_ref(), self.partition_for(&req.url), req).await
    }

    fn spawn_revalidation(&self, req: ResourceRequest) {
        let db = self.db().clone();
        let net = Arc::clone(self.net());
        let partition = self.partition_for(&req.url);
        tokio::spawn(async move {
            let outcome = revalidate_entry(&db, net.as_ref(), partition, &req).await;
            tracing::debug!(url = %req.url, outcome = ?outcome, "revalidation finished");
        });
    }
}

async fn revalidate_entry<N: Network + ?Sized>(
    db: &CacheDb, net: &N, partition: &str, req: &ResourceRequest,
) -> Revalidation {
    if req.method != Method::GET {
        return Revalidation::Skipped;
    }

    match net.fetch(req).await {
        Ok(snapshot) => match db.put_response(partition, &snapshot).await {
            Ok(()) => Revalidation::Updated,
            Err(err) => {
                tracing::warn!(url = %req.url, error = %err, "fresh response could not be stored");
                Revalidation::Failed
            }
        },
        Err(err) => {
            tracing::debug!(url = %req.url, error = %err, "revalidation fetch failed, cached copy stands");
            Revalidation::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedNetwork, route_all_assets, test_config};
    use url::Url;

    async fn activated_worker(net: ScriptedNetwork) -> OfflineWorker<ScriptedNetwork> {
        let db = elrayan_core::CacheDb::open_in_memory().await.unwrap();
        let worker = OfflineWorker::new(db, net, test_config()).unwrap();
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        worker
    }

    fn site_url(path: &str) -> Url {
        Url::parse(&format!("https://elrayan.site{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_hit_served_without_waiting_on_network() {
        let net = ScriptedNetwork::new();
        route_all_assets(&net);
        let worker = activated_worker(net.clone()).await;

        // The network now refuses this URL; a cached answer proves the
        // serve path never waited on it.
        net.route_fail("https://elrayan.site/styles.css");

        let req = ResourceRequest::get(site_url("/styles.css"));
        let served = worker.serve(&req).await.unwrap();

        match served {
            Served::Cache(snapshot) => assert_eq!(snapshot.body, b"body{}"),
            other => panic!("expected cache hit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_revalidation_overwrites_entry() {
        let net = ScriptedNetwork::new();
        route_all_assets(&net);
        let worker = activated_worker(net.clone()).await;

        net.route_ok("https://elrayan.site/styles.css", "body{margin:0}");

        let req = ResourceRequest::get(site_url("/styles.css"));
        let outcome = worker.revalidate(&req).await;

        assert_eq!(outcome, Revalidation::Updated);
        let fresh = worker.db().match_request(&req.cache_key()).await.unwrap().unwrap();
        assert_eq!(fresh.body, b"body{margin:0}");
    }

    #[tokio::test]
    async fn test_revalidation_failure_keeps_stale_entry() {
        let net = ScriptedNetwork::new();
        route_all_assets(&net);
        let worker = activated_worker(net.clone()).await;

        net.route_fail("https://elrayan.site/styles.css");

        let req = ResourceRequest::get(site_url("/styles.css"));
        let outcome = worker.revalidate(&req).await;

        assert_eq!(outcome, Revalidation::Failed);
        let stale = worker.db().match_request(&req.cache_key()).await.unwrap().unwrap();
        assert_eq!(stale.body, b"body{}");
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores_by_origin() {
        let net = ScriptedNetwork::new();
        route_all_assets(&net);
        net.route_ok("https://cdn.example/font.woff2", "woff");
        let worker = activated_worker(net.clone()).await;

        let req = ResourceRequest::get(Url::parse("https://cdn.example/font.woff2").unwrap());
        let served = worker.serve(&req).await.unwrap();

        assert!(matches!(served, Served::Network(_)));
        // Cross-origin traffic lands in the dynamic partition.
        assert_eq!(worker.db().partition_len(elrayan_core::site::DYNAMIC_PARTITION).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_navigation_falls_back_to_root() {
        let net = ScriptedNetwork::new();
        route_all_assets(&net);
        let worker = activated_worker(net.clone()).await;

        net.route_fail("https://elrayan.site/offers");

        let req = ResourceRequest::navigation(site_url("/offers"));
        let served = worker.serve(&req).await.unwrap();

        match served {
            Served::Offline(snapshot) => assert_eq!(snapshot.body, b"<html>home</html>"),
            other => panic!("expected offline fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_non_navigation_propagates() {
        let net = ScriptedNetwork::new();
        route_all_assets(&net);
        let worker = activated_worker(net.clone()).await;

        net.route_fail("https://elrayan.site/data.json");

        let req = ResourceRequest::get(site_url("/data.json"));
        let result = worker.serve(&req).await;

        assert!(matches!(result, Err(Error::Network { .. })));
    }

    #[tokio::test]
    async fn test_failed_navigation_without_root_propagates() {
        let net = ScriptedNetwork::new();
        route_all_assets(&net);
        let worker = activated_worker(net.clone()).await;

        worker.db().clear_partitions().await.unwrap();
        net.route_fail("https://elrayan.site/offers");

        let req = ResourceRequest::navigation(site_url("/offers"));
        let result = worker.serve(&req).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_non_get_bypasses() {
        let net = ScriptedNetwork::new();
        route_all_assets(&net);
        let worker = activated_worker(net.clone()).await;

        let req = ResourceRequest {
            method: Method::POST,
            url: site_url("/api/orders"),
            accept: None,
        };
        let served = worker.serve(&req).await.unwrap();

        assert_eq!(served, Served::Bypass);
        assert!(!net.hits().contains(&"https://elrayan.site/api/orders".to_string()));
    }
}
