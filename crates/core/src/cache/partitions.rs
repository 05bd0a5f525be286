//! Named cache partitions and response snapshot CRUD.
//!
//! A partition is a named key-value region mapping request identities to
//! response snapshots. Partitions appear on first write (or an explicit
//! open), carry no expiry or size cap, and disappear only through
//! [`CacheDb::delete_partition`] — which the worker invokes during
//! activation for every name that is no longer current, and which control
//! commands invoke for manual resets.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cached copy of one successful response.
///
/// Entries are idempotent snapshots of immutable URLs; revalidation
/// overwrites them in place, so concurrent writers racing on one key is
/// harmless (last writer wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    /// Request-identity key, see [`super::hash::request_key`].
    pub key: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    /// Response headers as a JSON object, when captured.
    pub headers_json: Option<String>,
    pub body: Vec<u8>,
    /// RFC 3339 timestamp of the fetch that produced this snapshot.
    pub fetched_at: String,
}

impl CacheDb {
    /// Ensure a partition exists. Opening an existing partition is a no-op.
    pub async fn open_partition(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO partitions (name, created_at) VALUES (?1, ?2)",
                    params![name, chrono::Utc::now().to_rfc3339()],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Names of all existing partitions, in name order.
    pub async fn partition_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM partitions ORDER BY name")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                let mut names = Vec::new();
                for row in rows {
                    names.push(row?);
                }
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a partition and every snapshot it holds.
    ///
    /// Returns whether the partition existed.
    pub async fn delete_partition(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM partitions WHERE name = ?1", params![name])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every partition unconditionally.
    ///
    /// Returns the number of partitions removed; zero on an already-empty
    /// store is success, not an error.
    pub async fn clear_partitions(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let deleted = conn.execute("DELETE FROM partitions", [])?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite a snapshot in the named partition.
    ///
    /// The partition is created on first write. Uses UPSERT semantics so a
    /// revalidation replaces the previous copy for the same key.
    pub async fn put_response(&self, partition: &str, snapshot: &ResponseSnapshot) -> Result<(), Error> {
        let partition = partition.to_string();
        let snapshot = snapshot.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO partitions (name, created_at) VALUES (?1, ?2)",
                    params![partition, chrono::Utc::now().to_rfc3339()],
                )?;
                conn.execute(
                    "INSERT INTO responses (
                        key, partition_name, url, status, content_type,
                        headers_json, body, fetched_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(key) DO UPDATE SET
                        partition_name = excluded.partition_name,
                        url = excluded.url,
                        status = excluded.status,
                        content_type = excluded.content_type,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        fetched_at = excluded.fetched_at",
                    params![
                        &snapshot.key,
                        &partition,
                        &snapshot.url,
                        snapshot.status as i64,
                        &snapshot.content_type,
                        &snapshot.headers_json,
                        &snapshot.body,
                        &snapshot.fetched_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up a snapshot by request identity across every partition.
    ///
    /// This is the unified cache view the serve path consults: the caller
    /// doesn't care which partition answered.
    pub async fn match_request(&self, key: &str) -> Result<Option<ResponseSnapshot>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<ResponseSnapshot>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key, url, status, content_type, headers_json, body, fetched_at
                     FROM responses WHERE key = ?1",
                )?;

                let result = stmt.query_row(params![key], |row| {
                    Ok(ResponseSnapshot {
                        key: row.get(0)?,
                        url: row.get(1)?,
                        status: row.get::<_, i64>(2)? as u16,
                        content_type: row.get(3)?,
                        headers_json: row.get(4)?,
                        body: row.get(5)?,
                        fetched_at: row.get(6)?,
                    })
                });

                match result {
                    Ok(s) => Ok(Some(s)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Number of snapshots held by one partition.
    pub async fn partition_len(&self, name: &str) -> Result<u64, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM responses WHERE partition_name = ?1",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
