use serde::{Deserialize, Serialize};

/// Credenciales enviadas al endpoint de autenticación remoto
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Respuesta del endpoint de autenticación remoto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub name: Option<String>,
}

impl AuthOutcome {
    pub fn granted(name: impl Into<String>) -> Self {
        Self {
            success: true,
            name: Some(name.into()),
        }
    }

    pub fn denied() -> Self {
        Self {
            success: false,
            name: None,
        }
    }
}
