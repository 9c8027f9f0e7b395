//! Submission gate.
//!
//! Decides whether a resident may submit. Both inputs come from storage and
//! either read may fail or stall; any doubt resolves to "no".

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use foodhub_core::ServiceError;

use crate::model::Identity;
use crate::store::PreferenceStore;

/// How long each gate read may take before it counts as unknown.
pub const DEFAULT_GATE_TIMEOUT: Duration = Duration::from_secs(2);

/// The bare rule: allowed only when nothing is recorded yet and the warden
/// has submissions open.
pub fn can_submit(has_submitted: bool, submissions_open: bool) -> bool {
    !has_submitted && submissions_open
}

/// Outcome of a gate check, with enough detail to tell the resident why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateDecision {
    Open,
    AlreadySubmitted,
    Closed,
    /// A read failed or timed out. Never allows a submission.
    Unknown { reason: String },
}

impl GateDecision {
    /// Combine the two reads.
    ///
    /// A failed read wins over everything. With both known, an existing
    /// record is reported before a closed gate.
    pub fn from_reads(
        has_submitted: Result<bool, ServiceError>,
        submissions_open: Result<bool, ServiceError>,
    ) -> Self {
        match (has_submitted, submissions_open) {
            (Err(e), _) | (_, Err(e)) => GateDecision::Unknown {
                reason: e.to_string(),
            },
            (Ok(has), Ok(open)) if can_submit(has, open) => GateDecision::Open,
            (Ok(true), Ok(_)) => GateDecision::AlreadySubmitted,
            (Ok(false), Ok(_)) => GateDecision::Closed,
        }
    }

    pub fn allows(&self) -> bool {
        matches!(self, GateDecision::Open)
    }

    pub fn message(&self) -> &'static str {
        match self {
            GateDecision::Open => "submissions are open",
            GateDecision::AlreadySubmitted => {
                "you have already submitted your preference for today"
            }
            GateDecision::Closed => "submissions are currently closed by the warden",
            GateDecision::Unknown { .. } => "cannot determine submission status, try again",
        }
    }

    /// `Ok(())` only for [`GateDecision::Open`].
    pub fn into_result(self) -> Result<(), ServiceError> {
        let message = self.message().to_string();
        match self {
            GateDecision::Open => Ok(()),
            GateDecision::AlreadySubmitted => Err(ServiceError::Conflict(message)),
            GateDecision::Closed => Err(ServiceError::SubmissionsClosed(message)),
            GateDecision::Unknown { .. } => Err(ServiceError::Unavailable(message)),
        }
    }
}

/// Runs the two gate reads against a store, each under its own deadline.
#[derive(Clone)]
pub struct SubmissionGate {
    store: Arc<dyn PreferenceStore>,
    timeout: Duration,
}

impl SubmissionGate {
    pub fn new(store: Arc<dyn PreferenceStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn check(&self, date: NaiveDate, identity: &Identity) -> GateDecision {
        let has_submitted = self.store.has_submitted(date, identity);
        let open = self.store.submissions_open();

        let (has_submitted, open) = tokio::join!(
            bounded(self.timeout, "existing preference", has_submitted),
            bounded(self.timeout, "submissions flag", open),
        );

        let decision = GateDecision::from_reads(has_submitted, open);
        if let GateDecision::Unknown { reason } = &decision {
            warn!(
                "gate undecided for {} year {} on {date}: {reason}",
                identity.department, identity.year
            );
        }
        decision
    }
}

async fn bounded<T>(
    timeout: Duration,
    what: &str,
    fut: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, ServiceError> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Unavailable(format!(
            "{what} read timed out after {timeout:?}"
        ))),
    }
}
