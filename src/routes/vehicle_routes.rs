use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{
    ClearAllRequest, ClearAllResponse, CreateVehicleRequest, SearchQuery, StaleCheckResponse, TariffsResponse,
    VehicleListResponse,
};
use crate::models::vehicle::{Totals, VehicleCategory, VehicleEntry};
use crate::services::parking_service::SearchResults;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).delete(clear_vehicles))
        .route("/search", get(search_vehicles))
        .route("/totals", get(get_totals))
        .route("/tariffs", get(get_tariffs))
        .route("/stale-check", post(run_stale_check))
        .route("/:category", get(list_category).post(create_vehicle))
        .route("/:category/:id/toggle", put(toggle_vehicle))
        .route("/:category/:id", delete(delete_vehicle))
}

fn controller(state: &AppState) -> VehicleController {
    VehicleController::new(state.parking.clone())
}

async fn list_vehicles(State(state): State<AppState>) -> Json<VehicleListResponse> {
    Json(controller(&state).list_all().await)
}

async fn list_category(
    State(state): State<AppState>,
    Path(category): Path<VehicleCategory>,
) -> Json<Vec<VehicleEntry>> {
    Json(controller(&state).list(category).await)
}

async fn search_vehicles(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Json<SearchResults> {
    Json(controller(&state).search(&query.term).await)
}

async fn get_totals(State(state): State<AppState>) -> Json<Totals> {
    Json(controller(&state).totals().await)
}

async fn get_tariffs() -> Json<TariffsResponse> {
    Json(TariffsResponse::current())
}

async fn create_vehicle(
    State(state): State<AppState>,
    Path(category): Path<VehicleCategory>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleEntry>>), AppError> {
    let response = controller(&state).create(category, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn toggle_vehicle(
    State(state): State<AppState>,
    Path((category, id)): Path<(VehicleCategory, i64)>,
) -> Result<Json<ApiResponse<VehicleEntry>>, AppError> {
    let response = controller(&state).toggle_status(category, id).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path((category, id)): Path<(VehicleCategory, i64)>,
) -> Result<Json<ApiResponse<VehicleEntry>>, AppError> {
    let response = controller(&state).remove(category, id).await?;
    Ok(Json(response))
}

async fn clear_vehicles(
    State(state): State<AppState>,
    Json(request): Json<ClearAllRequest>,
) -> Result<Json<ApiResponse<ClearAllResponse>>, AppError> {
    let response = controller(&state).clear_all(request).await?;
    Ok(Json(response))
}

async fn run_stale_check(State(state): State<AppState>) -> Json<StaleCheckResponse> {
    let threshold = state.config.stale_threshold();
    Json(controller(&state).stale_check(threshold).await)
}
