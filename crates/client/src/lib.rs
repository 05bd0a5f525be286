//! Network client for the El Rayan offline cache.
//!
//! This crate provides the resource request model, URL helpers for origin
//! classification, and the `Network` seam the worker fetches through.

pub mod fetch;
pub mod request;

pub use fetch::{FetchConfig, HttpNetwork, Network};
pub use fetch::url::{UrlError, canonicalize, resolve_asset, same_origin};
pub use request::{Method, ResourceRequest};
