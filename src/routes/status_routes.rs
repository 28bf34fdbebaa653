use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::dto::vehicle_dto::{ConnectivityRequest, ConnectivityResponse, StatusResponse};
use crate::models::notification::Notification;
use crate::state::AppState;

/// Rutas de estado: salud, notificaciones activas y conectividad
pub fn create_status_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/notifications", get(list_notifications))
        .route("/api/status", get(get_status))
        .route("/api/status/connectivity", put(report_connectivity))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "parking_ledger",
        "environment": state.config.environment,
        "storage": state.config.storage_backend.as_str(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn list_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    state.notifications.prune().await;
    Json(state.notifications.active().await)
}

async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        online: state.connectivity.is_online(),
        busy: state.parking.is_busy(),
    })
}

async fn report_connectivity(
    State(state): State<AppState>,
    Json(request): Json<ConnectivityRequest>,
) -> Json<ConnectivityResponse> {
    let notification = state.connectivity.set_online(request.online).await;
    Json(ConnectivityResponse {
        online: state.connectivity.is_online(),
        notification,
    })
}
