//! Resource request model.
//!
//! An intercepted request carries just enough for the caching policy:
//! method (only GET is cacheable), URL (the cache identity), and the
//! declared Accept header (drives the offline HTML fallback).

use elrayan_core::cache::hash::request_key;
use url::Url;

pub use reqwest::Method;

/// One intercepted request.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    pub method: Method,
    pub url: Url,
    /// Declared acceptable content types, verbatim.
    pub accept: Option<String>,
}

impl ResourceRequest {
    /// A plain GET with no Accept preference.
    pub fn get(url: Url) -> Self {
        Self { method: Method::GET, url, accept: None }
    }

    /// A navigation-style GET that accepts HTML, the shape a browser sends
    /// for a page load.
    pub fn navigation(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            accept: Some("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".into()),
        }
    }

    /// Whether the request declared HTML as acceptable. Such requests get
    /// the cached root document as an offline fallback on network failure.
    pub fn accepts_html(&self) -> bool {
        self.accept.as_deref().is_some_and(|a| a.contains("text/html"))
    }

    /// The cache identity of this request.
    pub fn cache_key(&self) -> String {
        request_key(self.method.as_str(), self.url.as_str())
    }
}
