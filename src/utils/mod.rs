//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! el reloj inyectable y el puerto de latencia simulada.

pub mod clock;
pub mod errors;
pub mod latency;
pub mod validation;
