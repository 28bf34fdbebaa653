//! Autenticación contra el endpoint remoto
//!
//! No hay tokens ni sesiones: un login correcto sólo guarda el nombre del
//! usuario en el almacén local para el saludo del dashboard.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::models::auth::{AuthOutcome, Credentials};
use crate::storage::{session_user_key, SharedStore};
use crate::utils::errors::{AppError, AppResult};

/// Puerto hacia el servicio que valida credenciales
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> AppResult<AuthOutcome>;
}

pub type SharedAuthGateway = Arc<dyn AuthGateway>;

/// Cliente HTTP del endpoint de login
pub struct HttpAuthGateway {
    client: Client,
    endpoint: String,
}

impl HttpAuthGateway {
    pub fn new(endpoint: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn authenticate(&self, credentials: &Credentials) -> AppResult<AuthOutcome> {
        info!("📤 Enviando login de {} a {}", credentials.email, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Auth endpoint unreachable: {}", e)))?;

        let status = response.status();
        let outcome = response
            .json::<AuthOutcome>()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid auth response ({}): {}", status, e)))?;

        info!("📡 Auth response status: {}", status);
        Ok(outcome)
    }
}

pub struct AuthService {
    gateway: SharedAuthGateway,
    store: SharedStore,
}

impl AuthService {
    pub fn new(gateway: SharedAuthGateway, store: SharedStore) -> Self {
        Self { gateway, store }
    }

    /// `Some(nombre)` si el login fue aceptado. Un fallo de transporte
    /// cuenta como login rechazado.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Option<String>> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let outcome = match self.gateway.authenticate(&credentials).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("⚠️ Login de {} fallido: {}", credentials.email, e);
                return Ok(None);
            }
        };

        if !outcome.success {
            info!("🚫 Credenciales rechazadas para {}", credentials.email);
            return Ok(None);
        }

        let name = outcome.name.unwrap_or_default();
        self.store.set(&session_user_key(), name.clone()).await?;
        info!("🔐 Sesión iniciada: {}", name);
        Ok(Some(name))
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.store.delete(&session_user_key()).await?;
        info!("👋 Sesión cerrada");
        Ok(())
    }

    /// Nombre guardado del último login correcto
    pub async fn current_user(&self) -> AppResult<Option<String>> {
        Ok(self.store.get(&session_user_key()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    struct StubGateway(Option<AuthOutcome>);

    #[async_trait]
    impl AuthGateway for StubGateway {
        async fn authenticate(&self, _credentials: &Credentials) -> AppResult<AuthOutcome> {
            self.0
                .clone()
                .ok_or_else(|| AppError::ExternalApi("connection refused".to_string()))
        }
    }

    fn service(outcome: Option<AuthOutcome>) -> AuthService {
        AuthService::new(Arc::new(StubGateway(outcome)), Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_login_stores_name_and_logout_clears_it() {
        let auth = service(Some(AuthOutcome::granted("Maria")));

        assert_eq!(auth.login("maria@parking.test", "secret").await.unwrap(), Some("Maria".to_string()));
        assert_eq!(auth.current_user().await.unwrap(), Some("Maria".to_string()));

        auth.logout().await.unwrap();
        assert!(auth.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_login_stores_nothing() {
        let auth = service(Some(AuthOutcome::denied()));
        assert!(auth.login("maria@parking.test", "wrong").await.unwrap().is_none());
        assert!(auth.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transport_error_is_a_failed_login() {
        let auth = service(None);
        assert!(auth.login("maria@parking.test", "secret").await.unwrap().is_none());
        assert!(auth.current_user().await.unwrap().is_none());
    }
}
