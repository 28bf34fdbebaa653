use std::sync::Arc;

use chrono::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::services::parking_service::ParkingService;

/// Parámetros de la revisión periódica de pendientes
#[derive(Debug, Clone, Copy)]
pub struct StaleMonitorConfig {
    pub threshold: Duration,
    pub interval: std::time::Duration,
}

impl Default for StaleMonitorConfig {
    fn default() -> Self {
        Self {
            threshold: Duration::hours(2),
            interval: std::time::Duration::from_secs(30 * 60),
        }
    }
}

/// Lanza la revisión periódica. El primer tick es inmediato, así que
/// también se revisa una vez al arrancar.
pub fn spawn_stale_monitor(service: Arc<ParkingService>, config: StaleMonitorConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "⏰ Revisión de pendientes cada {} min (umbral {}h)",
            config.interval.as_secs() / 60,
            config.threshold.num_hours()
        );

        let mut interval = tokio::time::interval(config.interval);
        loop {
            interval.tick().await;
            let stale = service.check_stale_pending(config.threshold).await;
            if !stale.is_empty() {
                warn!("⚠️ {} vehículos pendientes de pago fuera de plazo", stale.len());
            }
        }
    })
}
