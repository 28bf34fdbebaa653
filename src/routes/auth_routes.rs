use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{CurrentUserResponse, LoginRequest, LoginResponse, LogoutResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de autenticación
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthController::new(state.auth.clone()).login(request).await?;
    Ok(Json(response))
}

async fn logout(State(state): State<AppState>) -> Result<Json<LogoutResponse>, AppError> {
    let response = AuthController::new(state.auth.clone()).logout().await?;
    Ok(Json(response))
}

async fn me(State(state): State<AppState>) -> Result<Json<CurrentUserResponse>, AppError> {
    let response = AuthController::new(state.auth.clone()).me().await?;
    Ok(Json(response))
}
