use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::{KVStore, check_key};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// RedbStore is a KVStore implementation backed by redb, a pure-Rust embedded
/// key-value database. Every `set` is its own write transaction, which gives
/// per-key atomicity and durability on commit.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(storage)?;

        // Ensure the table exists so the first read does not fail.
        let write_txn = db.begin_write().map_err(storage)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;

        debug!("RedbStore: opened {:?}", path);
        Ok(Self { db: Arc::new(db) })
    }
}

fn storage(e: impl std::fmt::Display) -> KVError {
    KVError::Storage(e.to_string())
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        check_key(key)?;
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(storage(e)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        check_key(key)?;
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            table.insert(key, value).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;

        let mut results = Vec::new();
        let iter = table.range(prefix..).map_err(storage)?;

        for entry in iter {
            let entry = entry.map_err(storage)?;
            let key = entry.0.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key, entry.1.value().to_vec()));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (RedbStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn set_replaces_existing_value() {
        let (store, _dir) = open_temp();
        store.set("meal:preference:a", b"first").unwrap();
        store.set("meal:preference:a", b"second").unwrap();

        assert_eq!(store.get("meal:preference:a").unwrap().unwrap(), b"second");
        assert_eq!(store.scan("meal:preference:").unwrap().len(), 1);
    }

    #[test]
    fn scan_stops_at_prefix_boundary() {
        let (store, _dir) = open_temp();
        store.set("meal:preference:2026-10-20:CSE", b"1").unwrap();
        store.set("meal:preference:2026-10-20:ECE", b"2").unwrap();
        store.set("meal:preference:2026-10-21:CSE", b"3").unwrap();
        store.set("meal:settings:submissions", b"4").unwrap();

        let day = store.scan("meal:preference:2026-10-20:").unwrap();
        let keys: Vec<&str> = day.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["meal:preference:2026-10-20:CSE", "meal:preference:2026-10-20:ECE"]
        );
    }

    #[test]
    fn missing_key_reads_none() {
        let (store, _dir) = open_temp();
        assert!(store.get("nope").unwrap().is_none());
        assert!(store.scan("nope:").unwrap().is_empty());
    }

    #[test]
    fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("persist.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("meal:settings:submissions", b"{}").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert!(store.get("meal:settings:submissions").unwrap().is_some());
    }

    #[test]
    fn empty_key_is_rejected() {
        let (store, _dir) = open_temp();
        assert!(matches!(store.set("", b"v"), Err(KVError::InvalidKey(_))));
    }
}
