//! Configuración del proyecto
//!
//! Variables de entorno del servidor y de los servicios del estacionamiento.

pub mod environment;

pub use environment::*;
