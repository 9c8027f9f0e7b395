//! Live warden dashboard.
//!
//! The store pushes change events; the feed pulls a full recompute on each
//! relevant one and publishes the result through a `watch` channel.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use foodhub_core::ServiceError;

use crate::service::{Dashboard, MealService};

/// A dashboard for one date that keeps itself current.
///
/// Dropping the feed stops the background task and releases its store
/// subscription.
pub struct DashboardFeed {
    date: NaiveDate,
    rx: watch::Receiver<Dashboard>,
    cancel: CancellationToken,
}

impl DashboardFeed {
    /// Compute the first dashboard and start following changes.
    pub async fn start(service: Arc<MealService>, date: NaiveDate) -> Result<Self, ServiceError> {
        // Subscribe first so nothing written during the first compute is lost.
        let mut events = service.store().subscribe();
        let initial = service.dashboard(date).await?;
        let (tx, rx) = watch::channel(initial);
        let cancel = CancellationToken::new();

        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                info!("dashboard feed for {date} started");
                loop {
                    let refresh = tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tx.closed() => break,
                        event = events.recv() => match event {
                            Ok(event) => event.affects(date),
                            Err(RecvError::Lagged(n)) => {
                                debug!("dashboard feed for {date} lagged by {n} events");
                                true
                            }
                            Err(RecvError::Closed) => break,
                        },
                    };
                    if !refresh {
                        continue;
                    }

                    match service.dashboard(date).await {
                        Ok(dashboard) => {
                            if tx.send(dashboard).is_err() {
                                break;
                            }
                        }
                        // Keep showing the last good value.
                        Err(e) => error!("dashboard feed for {date} failed to refresh: {e}"),
                    }
                }
                info!("dashboard feed for {date} stopped");
            });
        }

        Ok(Self { date, rx, cancel })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The latest dashboard.
    pub fn current(&self) -> Dashboard {
        self.rx.borrow().clone()
    }

    /// Wait for the next published dashboard.
    pub async fn changed(&mut self) -> Result<Dashboard, ServiceError> {
        let date = self.date;
        self.rx.changed().await.map_err(|_| {
            ServiceError::Unavailable(format!("dashboard feed for {date} stopped"))
        })?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Another handle on the same stream of dashboards.
    pub fn receiver(&self) -> watch::Receiver<Dashboard> {
        self.rx.clone()
    }
}

impl Drop for DashboardFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use foodhub_kv::MemoryStore;

    use crate::gate::DEFAULT_GATE_TIMEOUT;
    use crate::model::{Departments, MealChoice};
    use crate::store::KvPreferenceStore;

    fn sun() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn service() -> Arc<MealService> {
        let store = Arc::new(KvPreferenceStore::new(Arc::new(MemoryStore::new())));
        Arc::new(MealService::new(
            store,
            Departments::hostel_default(),
            DEFAULT_GATE_TIMEOUT,
        ))
    }

    #[tokio::test]
    async fn follows_submissions_and_flag() {
        let svc = service();
        let mut feed = DashboardFeed::start(Arc::clone(&svc), sun()).await.unwrap();
        assert_eq!(feed.current().counts.grand_total.total, 0);

        let id = svc.identity("EEE", 3, Some("Vel")).unwrap();
        svc.submit(sun(), id, MealChoice::NonVeg).await.unwrap();

        let dash = tokio::time::timeout(Duration::from_secs(5), feed.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dash.counts.grand_total.non_veg, 1);

        svc.set_submissions_open(false).await.unwrap();
        let dash = tokio::time::timeout(Duration::from_secs(5), feed.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(!dash.submissions_open);
    }

    #[tokio::test]
    async fn other_dates_do_not_refresh() {
        let svc = service();
        let mut feed = DashboardFeed::start(Arc::clone(&svc), sun()).await.unwrap();

        let tue = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let id = svc.identity("CSE", 1, Some("A")).unwrap();
        svc.submit(tue, id, MealChoice::Egg).await.unwrap();

        let waited = tokio::time::timeout(Duration::from_millis(100), feed.changed()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn dropping_the_feed_releases_the_subscription() {
        let svc = service();
        let feed = DashboardFeed::start(Arc::clone(&svc), sun()).await.unwrap();
        let rx = feed.receiver();
        drop(feed);

        let mut rx = rx;
        // The task exits and drops its sender.
        let result = tokio::time::timeout(Duration::from_secs(5), rx.changed()).await;
        assert!(result.unwrap().is_err());
    }
}
