//! HTTP fetch pipeline behind the `Network` seam.
//!
//! The worker never talks to reqwest directly: install, serve, and
//! revalidation all fetch through [`Network`], so tests substitute a
//! scripted implementation and the binary wires in [`HttpNetwork`].

pub mod url;

use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::{Client, header};

use crate::request::ResourceRequest;
use elrayan_core::{Error, ResponseSnapshot, SiteConfig};

/// Configuration for the HTTP network client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string.
    pub user_agent: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "elrayan-offline/0.1".to_string(),
            timeout: Duration::from_millis(20_000),
            max_redirects: 5,
        }
    }
}

impl FetchConfig {
    /// Derive the fetch configuration from the loaded site configuration.
    pub fn from_site(config: &SiteConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// The network as the worker sees it: one request in, one snapshot out.
///
/// A fetch that fails for any reason (transport error, non-success status)
/// is an `Err`; what that means — fatal install, silent revalidation
/// failure, offline fallback — is the caller's policy, not the network's.
#[async_trait::async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, req: &ResourceRequest) -> Result<ResponseSnapshot, Error>;
}

/// reqwest-backed [`Network`] implementation.
pub struct HttpNetwork {
    http: Client,
    config: FetchConfig,
}

impl HttpNetwork {
    /// Create a new network client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network { url: String::new(), reason: format!("failed to build HTTP client: {e}") })?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, req: &ResourceRequest) -> Result<ResponseSnapshot, Error> {
        let start = Instant::now();

        let mut request = self.http.request(req.method.clone(), req.url.clone());
        if let Some(accept) = &req.accept {
            request = request.header(header::ACCEPT, accept.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network { url: req.url.to_string(), reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus { url: req.url.to_string(), status: status.as_u16() });
        }

        let headers = response.headers().clone();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network { url: req.url.to_string(), reason: format!("failed to read body: {e}") })?;

        tracing::debug!(
            url = %req.url,
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(ResponseSnapshot {
            key: req.cache_key(),
            url: req.url.to_string(),
            status: status.as_u16(),
            content_type,
            headers_json: Some(headers_to_json(&headers)?),
            body: bytes.to_vec(),
            fetched_at: Utc::now().to_rfc3339(),
        })
    }
}

fn headers_to_json(headers: &header::HeaderMap) -> Result<String, Error> {
    let mut map = serde_json::Map::new();
    for (name, value) in headers {
        if let Ok(v) = value.to_str() {
            map.insert(name.as_str().to_string(), serde_json::Value::String(v.to_string()));
        }
    }
    Ok(serde_json::to_string(&serde_json::Value::Object(map))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "elrayan-offline/0.1");
        assert_eq!(config.timeout, Duration::from_millis(20_000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_site() {
        let site = SiteConfig { timeout_ms: 5_000, user_agent: "ua-test/1".into(), ..Default::default() };
        let config = FetchConfig::from_site(&site);
        assert_eq!(config.timeout, Duration::from_millis(5_000));
        assert_eq!(config.user_agent, "ua-test/1");
    }

    #[test]
    fn test_headers_to_json() {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/css".parse().unwrap());
        headers.insert(header::ETAG, "\"abc\"".parse().unwrap());

        let json = headers_to_json(&headers).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["content-type"], "text/css");
        assert_eq!(value["etag"], "\"abc\"");
    }

    #[tokio::test]
    async fn test_http_network_new() {
        let network = HttpNetwork::new(FetchConfig::default());
        assert!(network.is_ok());
    }
}
