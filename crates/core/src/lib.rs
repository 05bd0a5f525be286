//! Core types and shared functionality for the El Rayan offline cache.
//!
//! This crate provides:
//! - SQLite-backed storage: a durable key-value table for page-side state
//!   and named cache partitions for response snapshots
//! - Unified error types
//! - Layered site configuration
//! - Site metadata types (the cached-data blob)

pub mod cache;
pub mod config;
pub mod error;
pub mod site;
pub mod store;

pub use cache::{CacheDb, ResponseSnapshot};
pub use config::SiteConfig;
pub use error::Error;
pub use site::SiteData;
pub use store::{MemoryStore, MetaStore};
