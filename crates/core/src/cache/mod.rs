//! SQLite-backed storage for the offline cache.
//!
//! This module provides a persistent store with async access via
//! tokio-rusqlite. It holds two kinds of state:
//!
//! - A durable key-value table for the Version Gate (version tag,
//!   site-data blob, last-visit timestamp)
//! - Named cache partitions mapping request identities to response
//!   snapshots, with partition-name versioning as the only eviction
//!
//! Schema changes go through automatic migrations; WAL mode allows the
//! gate and the worker to share one database file.

pub mod connection;
pub mod hash;
pub mod kv;
pub mod migrations;
pub mod partitions;

pub use crate::Error;

pub use connection::CacheDb;
pub use partitions::ResponseSnapshot;
