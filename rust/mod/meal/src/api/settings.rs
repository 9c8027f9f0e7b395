use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use foodhub_core::ServiceError;

use super::{action, ApiState};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route(
            "/settings/submissions",
            get(get_submissions).put(put_submissions),
        )
        .route("/settings/submissions/@toggle", post(toggle_submissions))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsSetting {
    pub submissions_open: bool,
}

async fn get_submissions(
    State(state): State<ApiState>,
) -> Result<Json<SubmissionsSetting>, ServiceError> {
    let submissions_open = state.service.submissions_open().await?;
    Ok(Json(SubmissionsSetting { submissions_open }))
}

async fn put_submissions(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(req): Json<SubmissionsSetting>,
) -> Result<Json<SubmissionsSetting>, ServiceError> {
    state.require_warden(&headers, action::SETTINGS_WRITE)?;
    let submissions_open = state.service.set_submissions_open(req.submissions_open).await?;
    Ok(Json(SubmissionsSetting { submissions_open }))
}

async fn toggle_submissions(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<SubmissionsSetting>, ServiceError> {
    state.require_warden(&headers, action::SETTINGS_WRITE)?;
    let submissions_open = state.service.toggle_submissions().await?;
    Ok(Json(SubmissionsSetting { submissions_open }))
}
