use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use foodhub_core::{now_rfc3339, ServiceError};
use foodhub_kv::{KVError, KVStore};

use crate::key::{date_prefix, identity_key};
use crate::model::{Identity, Preference};

/// Key of the single submissions-open record.
pub const SUBMISSIONS_FLAG_KEY: &str = "meal:settings:submissions";

/// How many change events a slow subscriber may fall behind before it
/// starts receiving `Lagged`.
const EVENT_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Change notifications
// ---------------------------------------------------------------------------

/// Emitted after every successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A preference for `date` was created or replaced.
    PreferencesChanged { date: NaiveDate },
    /// The submissions-open flag was written.
    SubmissionsToggled { open: bool },
}

impl StoreEvent {
    /// Whether a dashboard for `date` must be recomputed.
    pub fn affects(&self, date: NaiveDate) -> bool {
        match self {
            StoreEvent::PreferencesChanged { date: changed } => *changed == date,
            StoreEvent::SubmissionsToggled { .. } => true,
        }
    }
}

// ---------------------------------------------------------------------------
// PreferenceStore
// ---------------------------------------------------------------------------

/// Everything the meal logic needs from persistence.
///
/// Implementations must surface every failure; nothing here may pretend a
/// write succeeded. Only per-key atomicity of `upsert` is assumed.
#[async_trait]
pub trait PreferenceStore: Send + Sync + 'static {
    /// Insert or replace the record stored under `key`.
    async fn upsert(&self, key: &str, preference: &Preference) -> Result<(), ServiceError>;

    /// The record for `identity` on `date`, if any.
    async fn find(
        &self,
        date: NaiveDate,
        identity: &Identity,
    ) -> Result<Option<Preference>, ServiceError>;

    /// Whether anything is recorded for `identity` on `date`. A record that
    /// exists but cannot be read still counts.
    async fn has_submitted(
        &self,
        date: NaiveDate,
        identity: &Identity,
    ) -> Result<bool, ServiceError> {
        Ok(self.find(date, identity).await?.is_some())
    }

    /// Every record for `date`. Order carries no meaning.
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Preference>, ServiceError>;

    /// Like `list_by_date`, also counting records that had to be left out.
    async fn scan_date(&self, date: NaiveDate) -> Result<DateScan, ServiceError> {
        Ok(DateScan {
            preferences: self.list_by_date(date).await?,
            unreadable: 0,
        })
    }

    /// Whether submissions are open. `true` when never set.
    async fn submissions_open(&self) -> Result<bool, ServiceError>;

    async fn set_submissions_open(&self, open: bool) -> Result<(), ServiceError>;

    /// Subscribe to change events. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// Records found under a date prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateScan {
    pub preferences: Vec<Preference>,
    /// Undecodable documents, or ones whose stored date disagrees with the key.
    pub unreadable: u32,
}

/// Stored form of the submissions-open flag.
///
/// Last writer wins; `version` only grows so readers can tell writes apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFlag {
    pub submissions_open: bool,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// KvPreferenceStore
// ---------------------------------------------------------------------------

/// PreferenceStore over any [`KVStore`] backend (redb, in-memory, ...).
///
/// Records are JSON documents. Backend calls run on the blocking pool so a
/// slow disk never stalls the runtime and caller-side timeouts stay effective.
pub struct KvPreferenceStore {
    kv: Arc<dyn KVStore>,
    events: broadcast::Sender<StoreEvent>,
}

impl KvPreferenceStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { kv, events }
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn KVStore) -> Result<T, ServiceError> + Send + 'static,
    {
        let kv = Arc::clone(&self.kv);
        tokio::task::spawn_blocking(move || op(kv.as_ref()))
            .await
            .map_err(|e| ServiceError::Internal(format!("store task failed: {e}")))?
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn kv_err(e: KVError) -> ServiceError {
    match e {
        KVError::InvalidKey(msg) => ServiceError::Validation(msg),
        other => ServiceError::Storage(other.to_string()),
    }
}

fn read_flag(kv: &dyn KVStore) -> Result<Option<SubmissionFlag>, ServiceError> {
    match kv.get(SUBMISSIONS_FLAG_KEY).map_err(kv_err)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ServiceError::Storage(format!("bad submissions flag: {e}"))),
        None => Ok(None),
    }
}

#[async_trait]
impl PreferenceStore for KvPreferenceStore {
    async fn upsert(&self, key: &str, preference: &Preference) -> Result<(), ServiceError> {
        // A key outside the date's prefix would be invisible to list_by_date.
        if !key.starts_with(&date_prefix(preference.date)) {
            return Err(ServiceError::Validation(format!(
                "key '{key}' does not belong to {}",
                preference.date
            )));
        }

        let data = serde_json::to_vec(preference)
            .map_err(|e| ServiceError::Internal(format!("serialize: {e}")))?;
        let key = key.to_string();
        let date = preference.date;

        self.blocking(move |kv| kv.set(&key, &data).map_err(kv_err))
            .await?;

        debug!("preference upserted for {date}");
        self.publish(StoreEvent::PreferencesChanged { date });
        Ok(())
    }

    async fn find(
        &self,
        date: NaiveDate,
        identity: &Identity,
    ) -> Result<Option<Preference>, ServiceError> {
        let key = identity_key(date, identity);
        self.blocking(move |kv| match kv.get(&key).map_err(kv_err)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| ServiceError::Storage(format!("bad preference {key}: {e}"))),
            None => Ok(None),
        })
        .await
    }

    async fn has_submitted(
        &self,
        date: NaiveDate,
        identity: &Identity,
    ) -> Result<bool, ServiceError> {
        let key = identity_key(date, identity);
        self.blocking(move |kv| Ok(kv.get(&key).map_err(kv_err)?.is_some()))
            .await
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Preference>, ServiceError> {
        Ok(self.scan_date(date).await?.preferences)
    }

    async fn scan_date(&self, date: NaiveDate) -> Result<DateScan, ServiceError> {
        let prefix = date_prefix(date);
        let entries = self
            .blocking(move |kv| kv.scan(&prefix).map_err(kv_err))
            .await?;

        let mut scan = DateScan {
            preferences: Vec::with_capacity(entries.len()),
            unreadable: 0,
        };
        for (key, bytes) in entries {
            match serde_json::from_slice::<Preference>(&bytes) {
                Ok(pref) if pref.date == date => {
                    scan.preferences.push(pref);
                    continue;
                }
                Ok(pref) => warn!("skipping {key}: stored date {} != {date}", pref.date),
                Err(e) => warn!("skipping undecodable preference {key}: {e}"),
            }
            scan.unreadable += 1;
        }
        Ok(scan)
    }

    async fn submissions_open(&self) -> Result<bool, ServiceError> {
        let flag = self.blocking(read_flag).await?;
        Ok(flag.map(|f| f.submissions_open).unwrap_or(true))
    }

    async fn set_submissions_open(&self, open: bool) -> Result<(), ServiceError> {
        let version = self
            .blocking(move |kv| {
                let next = read_flag(kv)?.map(|f| f.version + 1).unwrap_or(1);
                let flag = SubmissionFlag {
                    submissions_open: open,
                    version: next,
                    updated_at: now_rfc3339(),
                };
                let data = serde_json::to_vec(&flag)
                    .map_err(|e| ServiceError::Internal(format!("serialize: {e}")))?;
                kv.set(SUBMISSIONS_FLAG_KEY, &data).map_err(kv_err)?;
                Ok(next)
            })
            .await?;

        debug!("submissions flag set to {open} (version {version})");
        self.publish(StoreEvent::SubmissionsToggled { open });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
