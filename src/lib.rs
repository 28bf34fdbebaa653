//! Parking Ledger
//!
//! Servicio de estacionamiento: dos ledgers (coches y motos) con tarifas
//! fijas, persistencia write-through en un almacén clave-valor local,
//! notificaciones efímeras y revisión periódica de pagos pendientes.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use config::environment::EnvironmentConfig;
use middleware::cors::cors_layer;
use repositories::LedgerRepository;
use services::{AuthService, ConnectivityService, NotificationService, ParkingService, SharedAuthGateway};
use state::AppState;
use storage::SharedStore;
use utils::clock::SharedClock;
use utils::errors::AppResult;
use utils::latency::SharedLatency;

/// Construir el estado compartido: restaura los ledgers del almacén
pub async fn build_state(
    config: EnvironmentConfig,
    store: SharedStore,
    gateway: SharedAuthGateway,
    clock: SharedClock,
    latency: SharedLatency,
) -> AppResult<AppState> {
    let notifications = Arc::new(NotificationService::new(clock.clone()));
    let parking = ParkingService::load(
        LedgerRepository::new(store.clone()),
        notifications.clone(),
        clock,
        latency,
        config.seed_demo_data,
    )
    .await?;
    let connectivity = Arc::new(ConnectivityService::new(notifications.clone()));
    let auth = Arc::new(AuthService::new(gateway, store));

    Ok(AppState::new(config, Arc::new(parking), notifications, connectivity, auth))
}

/// Router completo de la API
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(routes::status_routes::create_status_router())
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/auth", routes::auth_routes::auth_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
