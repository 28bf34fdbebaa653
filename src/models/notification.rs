//! Modelo de Notification
//!
//! Avisos efímeros que el servicio emite tras cada mutación, en cambios
//! de conectividad y cuando un vehículo lleva demasiado tiempo pendiente.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tiempo durante el cual una notificación sigue visible
pub const NOTIFICATION_TTL_SECONDS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            created_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(NOTIFICATION_TTL_SECONDS)
    }
}
