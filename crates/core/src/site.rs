//! Site metadata types and the fixed storage names they live under.
//!
//! The cached-data blob is a small JSON snapshot of site metadata (contact
//! channels, branding) that the Version Gate rewrites whenever the release
//! version changes. It is distinct from the response cache: corrupting it
//! costs a rebuild from configuration, nothing more.

use serde::{Deserialize, Serialize};

/// Prefix shared by every durable key owned by the site. Only prefixed keys
/// count toward the stats size estimate.
pub const KEY_PREFIX: &str = "elrayan_";

/// Durable key holding the release version tag.
pub const VERSION_KEY: &str = "elrayan_version";

/// Durable key holding the serialized [`SiteData`] blob.
pub const DATA_KEY: &str = "elrayan_data";

/// Durable key holding the last-visit timestamp (RFC 3339). Reporting only,
/// never consulted for invalidation.
pub const LAST_VISIT_KEY: &str = "elrayan_last_visit";

/// Cache partition for same-origin static assets. The "v1" suffix is the
/// eviction mechanism: activation deletes every partition not carrying a
/// current name.
pub const STATIC_PARTITION: &str = "elrayan-static-v1";

/// Cache partition for cross-origin dynamic assets.
pub const DYNAMIC_PARTITION: &str = "elrayan-dynamic-v1";

/// The cached-data blob: a versioned snapshot of site metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    pub version: String,
    /// RFC 3339 timestamp of the rebuild that produced this blob.
    pub timestamp: String,
    pub contacts: Contacts,
    pub branding: Branding,
}

/// Contact channels shown by the site shell while offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contacts {
    pub telegram: Vec<ContactLink>,
    pub whatsapp: ContactLink,
    pub phones: Vec<ContactPhone>,
    /// Map link to the physical store.
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPhone {
    pub name: String,
    pub number: String,
}

/// Site branding rendered by the offline shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    pub name: String,
    pub subtitle: String,
}
