//! Shared application state
//!
//! Estado compartido que se pasa a través del router de Axum. Los servicios
//! viven detrás de `Arc`; clonar el estado es barato.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::{AuthService, ConnectivityService, NotificationService, ParkingService};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub parking: Arc<ParkingService>,
    pub notifications: Arc<NotificationService>,
    pub connectivity: Arc<ConnectivityService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        parking: Arc<ParkingService>,
        notifications: Arc<NotificationService>,
        connectivity: Arc<ConnectivityService>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            config,
            parking,
            notifications,
            connectivity,
            auth,
        }
    }
}
