use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use foodhub_core::ServiceError;

use super::ApiState;
use crate::model::{MealChoice, Preference};
use crate::service::SubmissionStatus;

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/preferences", post(submit_preference))
        .route("/preferences/@status", get(submission_status))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub department: String,
    pub year: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub department: String,
    pub year: u8,
    #[serde(default)]
    pub name: Option<String>,
    pub choice: MealChoice,
    /// Only today is accepted; present for clients that echo the date back.
    #[serde(default)]
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /preferences/@status
// ---------------------------------------------------------------------------

async fn submission_status(
    State(state): State<ApiState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<SubmissionStatus>, ServiceError> {
    let date = state.date(query.date.as_deref())?;
    let identity = state
        .service
        .identity(&query.department, query.year, query.name.as_deref())?;
    Ok(Json(state.service.status(date, &identity).await))
}

// ---------------------------------------------------------------------------
// POST /preferences
// ---------------------------------------------------------------------------

async fn submit_preference(
    State(state): State<ApiState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<Preference>, ServiceError> {
    let today = state.clock.today();
    let date = state.date(req.date.as_deref())?;
    if date != today {
        return Err(ServiceError::Validation(format!(
            "preferences can only be submitted for today ({today}), not {date}"
        )));
    }
    let identity = state
        .service
        .identity(&req.department, req.year, req.name.as_deref())?;
    let preference = state.service.submit(date, identity, req.choice).await?;
    Ok(Json(preference))
}
