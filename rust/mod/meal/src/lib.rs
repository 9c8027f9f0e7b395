pub mod aggregate;
pub mod api;
pub mod clock;
pub mod feed;
pub mod gate;
pub mod key;
pub mod menu;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use foodhub_core::{Authenticator, Module};
use foodhub_kv::KVStore;

use api::ApiState;
use clock::{Clock, LocalClock};
use model::Departments;
use service::MealService;
use store::{KvPreferenceStore, PreferenceStore};

/// The Meal module: daily menu, preference submission and the warden
/// dashboard.
pub struct MealModule {
    service: Arc<MealService>,
    auth: Arc<dyn Authenticator>,
    clock: Arc<dyn Clock>,
}

impl MealModule {
    /// Create the module over a KV backend, using the local calendar date as
    /// "today".
    pub fn new(
        kv: Arc<dyn KVStore>,
        departments: Departments,
        auth: Arc<dyn Authenticator>,
        gate_timeout: Duration,
    ) -> Self {
        let store: Arc<dyn PreferenceStore> = Arc::new(KvPreferenceStore::new(kv));
        Self::with_store(store, departments, auth, gate_timeout, Arc::new(LocalClock))
    }

    /// Create with an explicit store and clock.
    pub fn with_store(
        store: Arc<dyn PreferenceStore>,
        departments: Departments,
        auth: Arc<dyn Authenticator>,
        gate_timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let service = Arc::new(MealService::new(store, departments, gate_timeout));
        Self {
            service,
            auth,
            clock,
        }
    }

    /// Get the service for programmatic use (feeds, background jobs).
    pub fn service(&self) -> &Arc<MealService> {
        &self.service
    }
}

impl Module for MealModule {
    fn name(&self) -> &str {
        "meal"
    }

    fn routes(&self) -> Router {
        api::router(ApiState {
            service: Arc::clone(&self.service),
            auth: Arc::clone(&self.auth),
            clock: Arc::clone(&self.clock),
        })
    }
}
