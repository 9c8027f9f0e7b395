use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use foodhub_core::ServiceError;

use super::menu::DateQuery;
use super::{action, ApiState};
use crate::service::Dashboard;

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/@poll", get(poll_dashboard))
}

#[derive(Debug, Deserialize)]
pub struct PollQuery {
    #[serde(default)]
    pub date: Option<String>,
    /// Seconds to wait, capped at [`crate::service::MAX_POLL_TIMEOUT`].
    #[serde(default = "default_poll_timeout")]
    pub timeout: u64,
}

fn default_poll_timeout() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// GET /dashboard
// ---------------------------------------------------------------------------

async fn get_dashboard(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<DateQuery>,
) -> Result<Json<Dashboard>, ServiceError> {
    state.require_warden(&headers, action::DASHBOARD_READ)?;
    let date = state.date(query.date.as_deref())?;
    Ok(Json(state.service.dashboard(date).await?))
}

// ---------------------------------------------------------------------------
// GET /dashboard/@poll
// ---------------------------------------------------------------------------

async fn poll_dashboard(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<PollQuery>,
) -> Result<Json<Dashboard>, ServiceError> {
    state.require_warden(&headers, action::DASHBOARD_READ)?;
    let date = state.date(query.date.as_deref())?;
    let timeout = Duration::from_secs(query.timeout);
    Ok(Json(state.service.poll_dashboard(date, timeout).await?))
}
