//! Durable key-value operations on the cache database.
//!
//! Backs the [`MetaStore`] trait for production use; the gate never talks
//! to this table except through that trait.

use super::connection::CacheDb;
use crate::Error;
use crate::store::MetaStore;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl CacheDb {
    /// Read a single value, `None` when absent.
    pub async fn kv_get(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row("SELECT value FROM meta_kv WHERE key = ?1", params![key], |row| {
                    row.get::<_, String>(0)
                });
                match result {
                    Ok(v) => Ok(Some(v)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Write a value, overwriting any previous one.
    pub async fn kv_set(&self, key: &str, value: &str) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO meta_kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, value],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Remove a key. Removing an absent key succeeds.
    pub async fn kv_remove(&self, key: &str) -> Result<(), Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute("DELETE FROM meta_kv WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Every stored pair, in key order.
    pub async fn kv_entries(&self) -> Result<Vec<(String, String)>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<(String, String)>, Error> {
                let mut stmt = conn.prepare("SELECT key, value FROM meta_kv ORDER BY key")?;
                let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
                let mut entries = Vec::new();
                for row in rows {
                    entries.push(row?);
                }
                Ok(entries)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait::async_trait]
impl MetaStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.kv_get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.kv_set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        self.kv_remove(key).await
    }

    async fn entries(&self) -> Result<Vec<(String, String)>, Error> {
        self.kv_entries().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_kv_round_trip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.kv_set("elrayan_version", "1.0.0").await.unwrap();
        assert_eq!(db.kv_get("elrayan_version").await.unwrap().as_deref(), Some("1.0.0"));
    }

    #[tokio::test]
    async fn test_kv_overwrite() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.kv_set("elrayan_version", "1.0.0").await.unwrap();
        db.kv_set("elrayan_version", "1.1.0").await.unwrap();
        assert_eq!(db.kv_get("elrayan_version").await.unwrap().as_deref(), Some("1.1.0"));
    }

    #[tokio::test]
    async fn test_kv_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.kv_get("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_kv_remove_is_idempotent() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.kv_set("elrayan_data", "{}").await.unwrap();
        db.kv_remove("elrayan_data").await.unwrap();
        db.kv_remove("elrayan_data").await.unwrap();
        assert!(db.kv_get("elrayan_data").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_kv_entries_ordered() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.kv_set("elrayan_b", "z").await.unwrap();
        db.kv_set("elrayan_a", "xy").await.unwrap();
        let entries = db.kv_entries().await.unwrap();
        assert_eq!(
            entries,
            vec![("elrayan_a".into(), "xy".into()), ("elrayan_b".into(), "z".into())]
        );
    }
}
