use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use foodhub_core::ServiceError;

use super::ApiState;
use crate::menu::MenuView;
use crate::model::Department;

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/menu", get(get_menu))
        .route("/departments", get(list_departments))
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /menu
// ---------------------------------------------------------------------------

async fn get_menu(
    State(state): State<ApiState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<MenuView>, ServiceError> {
    let date = state.date(query.date.as_deref())?;
    Ok(Json(state.service.menu(date)))
}

// ---------------------------------------------------------------------------
// GET /departments
// ---------------------------------------------------------------------------

async fn list_departments(State(state): State<ApiState>) -> Json<Vec<Department>> {
    Json(state.service.departments().as_slice().to_vec())
}
