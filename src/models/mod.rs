//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del estacionamiento:
//! entradas de vehículo, notificaciones y la respuesta de autenticación.

pub mod auth;
pub mod notification;
pub mod vehicle;

pub use auth::*;
pub use notification::*;
pub use vehicle::*;
