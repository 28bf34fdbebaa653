use std::sync::Arc;

use validator::Validate;

use crate::dto::auth_dto::{CurrentUserResponse, LoginRequest, LoginResponse, LogoutResponse};
use crate::services::auth_service::AuthService;
use crate::utils::errors::AppError;

pub struct AuthController {
    auth: Arc<AuthService>,
}

impl AuthController {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }

    /// Un login rechazado no es un error HTTP: se informa en el cuerpo
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        match self.auth.login(&request.email, &request.password).await? {
            Some(name) => Ok(LoginResponse::success(name)),
            None => Ok(LoginResponse::error()),
        }
    }

    pub async fn logout(&self) -> Result<LogoutResponse, AppError> {
        self.auth.logout().await?;
        Ok(LogoutResponse::home())
    }

    pub async fn me(&self) -> Result<CurrentUserResponse, AppError> {
        Ok(CurrentUserResponse {
            name: self.auth.current_user().await?,
        })
    }
}
