use crate::error::KVError;

/// KVStore is the byte-level document store every backend implements.
///
/// Keys follow a namespaced convention such as
/// `meal:preference:2026-10-20:CSE:1:John_Doe`, so related records can be
/// listed with a prefix scan. A single `set` is atomic per key; nothing
/// stronger is promised across keys.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Insert or replace the value stored under a key.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns (key, value) pairs sorted by key.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}

pub(crate) fn check_key(key: &str) -> Result<(), KVError> {
    if key.is_empty() {
        return Err(KVError::InvalidKey("key must not be empty".into()));
    }
    Ok(())
}
