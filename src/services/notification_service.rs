use tokio::sync::RwLock;
use tracing::info;

use crate::models::notification::{Notification, NotificationKind};
use crate::utils::clock::SharedClock;

/// Centro de notificaciones efímeras
pub struct NotificationService {
    clock: SharedClock,
    notifications: RwLock<Vec<Notification>>,
}

impl NotificationService {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            notifications: RwLock::new(Vec::new()),
        }
    }

    /// Registrar una notificación nueva
    pub async fn push(&self, message: impl Into<String>, kind: NotificationKind) -> Notification {
        let now = self.clock.now();
        let notification = Notification::new(message, kind, now);
        info!("🔔 [{:?}] {}", notification.kind, notification.message);

        let mut notifications = self.notifications.write().await;
        notifications.retain(|n| !n.is_expired(now));
        notifications.push(notification.clone());
        notification
    }

    /// Notificaciones todavía visibles, de la más antigua a la más reciente
    pub async fn active(&self) -> Vec<Notification> {
        let now = self.clock.now();
        self.notifications
            .read()
            .await
            .iter()
            .filter(|n| !n.is_expired(now))
            .cloned()
            .collect()
    }

    /// Descartar las notificaciones caducadas; devuelve cuántas se eliminaron
    pub async fn prune(&self) -> usize {
        let now = self.clock.now();
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|n| !n.is_expired(now));
        before - notifications.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_notifications_expire_after_five_seconds() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 8, 18, 9, 0, 0).unwrap()));
        let service = NotificationService::new(clock.clone());

        service.push("Vehículo añadido con éxito", NotificationKind::Success).await;
        clock.advance(Duration::seconds(3));
        service.push("Vehículo eliminado", NotificationKind::Info).await;

        assert_eq!(service.active().await.len(), 2);

        clock.advance(Duration::seconds(2));
        let active = service.active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "Vehículo eliminado");

        assert_eq!(service.prune().await, 1);
        clock.advance(Duration::seconds(10));
        assert!(service.active().await.is_empty());
    }
}
