use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{validate_email, validate_not_blank};

/// Mensaje mostrado en línea cuando el login falla
pub const LOGIN_FAILED_MESSAGE: &str = "Login inválido";

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "validate_email")]
    pub email: String,
    #[validate(custom = "validate_not_blank")]
    pub password: String,
}

// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn success(name: String) -> Self {
        Self {
            success: true,
            name: Some(name),
            redirect: Some("/dashboard".to_string()),
            message: None,
        }
    }

    pub fn error() -> Self {
        Self {
            success: false,
            name: None,
            redirect: None,
            message: Some(LOGIN_FAILED_MESSAGE.to_string()),
        }
    }
}

// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub redirect: String,
}

impl LogoutResponse {
    pub fn home() -> Self {
        Self {
            success: true,
            redirect: "/".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub name: Option<String>,
}
