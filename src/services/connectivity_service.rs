//! Vigilancia de conectividad
//!
//! Mantiene el indicador online/offline y notifica sólo en las
//! transiciones. Nunca bloquea mutaciones: sin red el ledger sigue
//! aplicando cambios en local.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::models::notification::{Notification, NotificationKind};
use crate::services::notification_service::NotificationService;

pub struct ConnectivityService {
    online: AtomicBool,
    notifications: Arc<NotificationService>,
}

impl ConnectivityService {
    pub fn new(notifications: Arc<NotificationService>) -> Self {
        Self {
            online: AtomicBool::new(true),
            notifications,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Actualizar el estado; devuelve la notificación si hubo transición
    pub async fn set_online(&self, online: bool) -> Option<Notification> {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous == online {
            return None;
        }

        let notification = if online {
            info!("🌐 Conexión restaurada");
            self.notifications.push("Conexión restaurada", NotificationKind::Success).await
        } else {
            info!("📴 Modo offline activado");
            self.notifications.push("Modo offline activado", NotificationKind::Warning).await
        };
        Some(notification)
    }
}

/// Sonda periódica: un GET que responde (cualquier estado HTTP) cuenta como online
pub fn spawn_connectivity_probe(
    service: Arc<ConnectivityService>,
    client: Client,
    probe_url: String,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("📡 Sonda de conectividad cada {}s contra {}", every.as_secs(), probe_url);
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let reachable = client
                .get(&probe_url)
                .timeout(Duration::from_secs(5))
                .send()
                .await
                .is_ok();
            debug!("📡 Sonda de conectividad: {}", if reachable { "online" } else { "offline" });
            service.set_online(reachable).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::SystemClock;

    #[tokio::test]
    async fn test_notifies_only_on_transition() {
        let notifications = Arc::new(NotificationService::new(Arc::new(SystemClock)));
        let service = ConnectivityService::new(notifications.clone());

        assert!(service.is_online());
        assert!(service.set_online(true).await.is_none());

        let offline = service.set_online(false).await.unwrap();
        assert_eq!(offline.kind, NotificationKind::Warning);
        assert!(!service.is_online());
        assert!(service.set_online(false).await.is_none());

        let online = service.set_online(true).await.unwrap();
        assert_eq!(online.kind, NotificationKind::Success);
        assert_eq!(notifications.active().await.len(), 2);
    }
}
