use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use foodhub_core::ServiceError;

use crate::aggregate::{aggregate, roster, Aggregation, DepartmentRoster};
use crate::gate::{GateDecision, SubmissionGate};
use crate::key::identity_key;
use crate::menu::{Menu, MenuView};
use crate::model::{day_index, Departments, Identity, MealChoice, Preference, Year};
use crate::store::PreferenceStore;

/// Longest a dashboard long-poll may wait.
pub const MAX_POLL_TIMEOUT: Duration = Duration::from_secs(120);

/// What a resident sees before submitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStatus {
    pub menu: MenuView,
    pub gate: GateDecision,
    pub can_submit: bool,
    pub message: &'static str,
}

/// Everything the warden screen shows for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub date: NaiveDate,
    pub day: u8,
    pub menu: Menu,
    pub submissions_open: bool,
    pub counts: Aggregation,
    pub roster: Vec<DepartmentRoster>,
}

/// Meal preference operations over a [`PreferenceStore`].
pub struct MealService {
    store: Arc<dyn PreferenceStore>,
    departments: Departments,
    gate: SubmissionGate,
}

impl MealService {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        departments: Departments,
        gate_timeout: Duration,
    ) -> Self {
        let gate = SubmissionGate::new(Arc::clone(&store), gate_timeout);
        Self {
            store,
            departments,
            gate,
        }
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    pub fn departments(&self) -> &Departments {
        &self.departments
    }

    pub fn menu(&self, date: NaiveDate) -> MenuView {
        MenuView::for_date(date)
    }

    /// Build a validated identity from raw request fields.
    pub fn identity(
        &self,
        department: &str,
        year: u8,
        name: Option<&str>,
    ) -> Result<Identity, ServiceError> {
        let department = department.trim();
        self.departments.require(department)?;
        let year = Year::try_from(year).map_err(ServiceError::Validation)?;
        Ok(Identity::new(department, year, name))
    }

    pub async fn status(&self, date: NaiveDate, identity: &Identity) -> SubmissionStatus {
        let gate = self.gate.check(date, identity).await;
        SubmissionStatus {
            menu: self.menu(date),
            can_submit: gate.allows(),
            message: gate.message(),
            gate,
        }
    }

    /// Record `choice` for `identity` on `date`.
    ///
    /// The choice must be on that day's menu and the gate must be open.
    pub async fn submit(
        &self,
        date: NaiveDate,
        identity: Identity,
        choice: MealChoice,
    ) -> Result<Preference, ServiceError> {
        self.departments.require(&identity.department)?;

        let menu = Menu::for_date(date);
        if !menu.is_actionable() {
            return Err(ServiceError::Validation(format!(
                "no menu options to select on {date}"
            )));
        }
        if !menu.allows(choice) {
            return Err(ServiceError::Validation(format!(
                "{choice} is not on the menu for {date}"
            )));
        }

        self.gate.check(date, &identity).await.into_result()?;

        let key = identity_key(date, &identity);
        let preference = Preference::new(identity, choice, date);
        self.store.upsert(&key, &preference).await?;

        info!(
            "recorded {choice} for {} year {} on {date}",
            preference.identity.department, preference.identity.year
        );
        Ok(preference)
    }

    pub async fn dashboard(&self, date: NaiveDate) -> Result<Dashboard, ServiceError> {
        let (scan, submissions_open) = tokio::try_join!(
            self.store.scan_date(date),
            self.store.submissions_open(),
        )?;

        let mut counts = aggregate(&scan.preferences, &self.departments);
        counts.ignored += scan.unreadable;

        Ok(Dashboard {
            date,
            day: day_index(date),
            menu: Menu::for_date(date),
            submissions_open,
            counts,
            roster: roster(&scan.preferences, &self.departments),
        })
    }

    /// Wait up to `timeout` for a change affecting `date`, then return a
    /// freshly computed dashboard either way.
    pub async fn poll_dashboard(
        &self,
        date: NaiveDate,
        timeout: Duration,
    ) -> Result<Dashboard, ServiceError> {
        let timeout = timeout.min(MAX_POLL_TIMEOUT);
        // Subscribe before waiting so no write slips between the two.
        let mut events = self.store.subscribe();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            match tokio::time::timeout_at(deadline, events.recv()).await {
                Ok(Ok(event)) if event.affects(date) => break,
                Ok(Ok(_)) => continue,
                Ok(Err(RecvError::Lagged(n))) => {
                    debug!("dashboard poll lagged by {n} events");
                    break;
                }
                Ok(Err(RecvError::Closed)) | Err(_) => break,
            }
        }

        self.dashboard(date).await
    }

    pub async fn submissions_open(&self) -> Result<bool, ServiceError> {
        self.store.submissions_open().await
    }

    pub async fn set_submissions_open(&self, open: bool) -> Result<bool, ServiceError> {
        self.store.set_submissions_open(open).await?;
        info!(
            "submissions {}",
            if open { "opened" } else { "closed" }
        );
        Ok(open)
    }

    /// Flip the flag and return the new value.
    pub async fn toggle_submissions(&self) -> Result<bool, ServiceError> {
        let current = self.store.submissions_open().await?;
        self.set_submissions_open(!current).await
    }
}
