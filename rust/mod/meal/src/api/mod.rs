mod dashboard;
mod menu;
mod preferences;
mod settings;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::Router;
use chrono::NaiveDate;

use foodhub_core::{parse_date, Authenticator, ServiceError};

use crate::clock::Clock;
use crate::service::MealService;

/// Action names passed to the authenticator.
pub mod action {
    pub const DASHBOARD_READ: &str = "meal:dashboard:read";
    pub const SETTINGS_WRITE: &str = "meal:settings:write";
}

/// Shared state of every meal handler.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<MealService>,
    pub auth: Arc<dyn Authenticator>,
    pub clock: Arc<dyn Clock>,
}

impl ApiState {
    /// The requested date, or today when absent or blank.
    fn date(&self, raw: Option<&str>) -> Result<NaiveDate, ServiceError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => parse_date(s),
            None => Ok(self.clock.today()),
        }
    }

    fn require_warden(&self, headers: &HeaderMap, action: &str) -> Result<(), ServiceError> {
        self.auth.check(headers, action)
    }
}

/// Build the complete meal module router.
///
/// Routes:
/// - `GET  /menu`                            menu for a date
/// - `GET  /departments`                     configured departments
/// - `GET  /preferences/@status`             gate decision for an identity
/// - `POST /preferences`                     submit a preference
/// - `GET  /dashboard`                       counts and roster (warden)
/// - `GET  /dashboard/@poll`                 long-poll the dashboard (warden)
/// - `GET  /settings/submissions`            read the open flag
/// - `PUT  /settings/submissions`            write the open flag (warden)
/// - `POST /settings/submissions/@toggle`    flip the open flag (warden)
pub fn router(state: ApiState) -> Router {
    Router::new()
        .merge(menu::router())
        .merge(preferences::router())
        .merge(dashboard::router())
        .merge(settings::router())
        .with_state(state)
}
