//! Request-identity cache key generation.
//!
//! A snapshot is keyed by the request that produced it, not by its content:
//! revalidation must overwrite the entry for the same URL in place.

use sha2::{Digest, Sha256};

/// Compute the cache key identifying a request.
///
/// Method and URL are both part of the identity; only GET traffic is cached
/// today, but the key shape doesn't assume that.
pub fn request_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
