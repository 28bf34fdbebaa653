//! Services module
//!
//! Este módulo contiene la lógica de negocio del estacionamiento: las
//! transiciones puras del ledger, el servicio que las aplica y persiste, y
//! los servicios auxiliares (notificaciones, conectividad, login).

pub mod auth_service;
pub mod connectivity_service;
pub mod ledger;
pub mod notification_service;
pub mod parking_service;
pub mod stale_monitor;

pub use auth_service::{AuthGateway, AuthService, HttpAuthGateway, SharedAuthGateway};
pub use connectivity_service::ConnectivityService;
pub use ledger::{Ledger, Ledgers, NewVehicle, StalePending};
pub use notification_service::NotificationService;
pub use parking_service::{ParkingService, SearchResults};
pub use stale_monitor::{spawn_stale_monitor, StaleMonitorConfig};
