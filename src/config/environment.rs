//! Configuración de variables de entorno
//!
//! Todas las variables tienen un valor por defecto; un valor mal formado
//! es un error de configuración, nunca un panic.

use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use crate::storage::StorageBackend;
use crate::utils::errors::{config_error, AppResult};

/// Mayor umbral representable como `chrono::Duration` (milisegundos en i64)
const MAX_STALE_THRESHOLD_HOURS: i64 = i64::MAX / 3_600_000;

/// Mayor intervalo aceptado para las tareas periódicas (una semana)
const MAX_INTERVAL_SECS: u64 = 7 * 24 * 3600;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    pub storage_backend: StorageBackend,
    pub data_dir: String,
    pub redis_url: String,
    pub auth_endpoint_url: String,
    pub stale_threshold_hours: i64,
    pub stale_check_interval_minutes: u64,
    pub simulated_latency: bool,
    pub seed_demo_data: bool,
    pub connectivity_probe_url: Option<String>,
    pub connectivity_probe_secs: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            cors_origins: Vec::new(),
            storage_backend: StorageBackend::File,
            data_dir: "./data".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            auth_endpoint_url: "http://localhost:8080/api/login".to_string(),
            stale_threshold_hours: 2,
            stale_check_interval_minutes: 30,
            simulated_latency: false,
            seed_demo_data: false,
            connectivity_probe_url: None,
            connectivity_probe_secs: 30,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del proceso (después de `dotenvy::dotenv()`)
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración a partir de una fuente de variables
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => StorageBackend::from_str(&raw).ok_or_else(|| config_error("STORAGE_BACKEND", &raw))?,
            None => defaults.storage_backend,
        };

        let cors_origins = var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var(&var, "PORT", defaults.port)?,
            host: var("HOST").unwrap_or(defaults.host),
            log_level: var("LOG_LEVEL").unwrap_or(defaults.log_level),
            cors_origins,
            storage_backend,
            data_dir: var("DATA_DIR").unwrap_or(defaults.data_dir),
            redis_url: var("REDIS_URL").unwrap_or(defaults.redis_url),
            auth_endpoint_url: var("AUTH_ENDPOINT_URL").unwrap_or(defaults.auth_endpoint_url),
            stale_threshold_hours: parse_bounded(
                &var,
                "STALE_THRESHOLD_HOURS",
                defaults.stale_threshold_hours,
                1..=MAX_STALE_THRESHOLD_HOURS,
            )?,
            stale_check_interval_minutes: parse_bounded(
                &var,
                "STALE_CHECK_INTERVAL_MINUTES",
                defaults.stale_check_interval_minutes,
                1..=MAX_INTERVAL_SECS / 60,
            )?,
            simulated_latency: parse_flag(&var, "SIMULATED_LATENCY", defaults.simulated_latency)?,
            seed_demo_data: parse_flag(&var, "SEED_DEMO_DATA", defaults.seed_demo_data)?,
            connectivity_probe_url: var("CONNECTIVITY_PROBE_URL"),
            connectivity_probe_secs: parse_bounded(
                &var,
                "CONNECTIVITY_PROBE_SECS",
                defaults.connectivity_probe_secs,
                1..=MAX_INTERVAL_SECS,
            )?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn stale_threshold(&self) -> chrono::Duration {
        chrono::Duration::hours(self.stale_threshold_hours.clamp(1, MAX_STALE_THRESHOLD_HOURS))
    }

    pub fn stale_check_interval(&self) -> Duration {
        Duration::from_secs(self.stale_check_interval_minutes.saturating_mul(60).clamp(60, MAX_INTERVAL_SECS))
    }

    pub fn connectivity_probe_interval(&self) -> Duration {
        Duration::from_secs(self.connectivity_probe_secs.clamp(1, MAX_INTERVAL_SECS))
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.parse().map_err(|_| config_error(key, &raw)),
        None => Ok(default),
    }
}

/// Como `parse_var`, pero el valor debe caer dentro de `range`
fn parse_bounded<T, F>(var: &F, key: &str, default: T, range: RangeInclusive<T>) -> AppResult<T>
where
    T: FromStr + PartialOrd + ToString,
    F: Fn(&str) -> Option<String>,
{
    let value = parse_var(var, key, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(config_error(key, &value.to_string()))
    }
}

fn parse_flag<F>(var: &F, key: &str, default: bool) -> AppResult<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key).map(|v| v.to_lowercase()) {
        Some(raw) => match raw.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(config_error(key, &raw)),
        },
        None => Ok(default),
    }
}
