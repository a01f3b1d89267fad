use std::sync::Arc;

use digitalsky_core::{ApplicationService, ApplicationValidator, FieldValidator};

use crate::auth::JwtConfig;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub service: Arc<dyn ApplicationService>,
    /// Applied to update payloads flagged as submitted.
    pub validator: Arc<dyn ApplicationValidator>,
    pub jwt: JwtConfig,
}

impl AppState {
    /// State with the default field validator.
    pub fn new(service: Arc<dyn ApplicationService>, jwt: JwtConfig) -> Self {
        Self {
            service,
            validator: Arc::new(FieldValidator),
            jwt,
        }
    }
}
