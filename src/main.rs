use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn, Level};

use parking_ledger::config::environment::EnvironmentConfig;
use parking_ledger::services::connectivity_service::spawn_connectivity_probe;
use parking_ledger::services::{spawn_stale_monitor, HttpAuthGateway, StaleMonitorConfig};
use parking_ledger::storage::open_store;
use parking_ledger::utils::clock::SystemClock;
use parking_ledger::utils::latency::latency_from_flag;
use parking_ledger::{build_app, build_state};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().map_err(|e| anyhow::anyhow!("Configuración inválida: {}", e))?;

    // Configurar logging
    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🅿️ Parking Ledger - API de estacionamiento");
    info!("==========================================");
    info!("🌍 Entorno: {} | almacén: {}", config.environment, config.storage_backend.as_str());

    let store = match open_store(&config.storage_backend, &config.data_dir, &config.redis_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("❌ Error abriendo el almacén: {}", e);
            return Err(anyhow::anyhow!("Error de almacenamiento: {}", e));
        }
    };

    let gateway = Arc::new(HttpAuthGateway::new(config.auth_endpoint_url.clone())?);
    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS permisivo en producción: configura CORS_ORIGINS");
    }
    if config.simulated_latency {
        warn!("🐢 Latencia simulada activada");
    }

    let state = build_state(
        config.clone(),
        store,
        gateway,
        Arc::new(SystemClock),
        latency_from_flag(config.simulated_latency),
    )
    .await?;

    // Tareas en segundo plano
    let stale_monitor = spawn_stale_monitor(
        state.parking.clone(),
        StaleMonitorConfig {
            threshold: config.stale_threshold(),
            interval: config.stale_check_interval(),
        },
    );
    let probe = config.connectivity_probe_url.clone().map(|url| {
        spawn_connectivity_probe(
            state.connectivity.clone(),
            reqwest::Client::new(),
            url,
            config.connectivity_probe_interval(),
        )
    });

    let app = build_app(state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Vehículos:");
    info!("   GET  /api/vehicles - Ambos ledgers");
    info!("   GET  /api/vehicles/search?term= - Buscar por placa o modelo");
    info!("   GET  /api/vehicles/totals - Totales recaudados");
    info!("   GET  /api/vehicles/tariffs - Tarifas fijas");
    info!("   GET  /api/vehicles/:category - Ledger de una categoría");
    info!("   POST /api/vehicles/:category - Registrar vehículo");
    info!("   PUT  /api/vehicles/:category/:id/toggle - Alternar pago");
    info!("   DELETE /api/vehicles/:category/:id - Eliminar vehículo");
    info!("   DELETE /api/vehicles - Vaciar ambos ledgers");
    info!("   POST /api/vehicles/stale-check - Revisar pendientes");
    info!("🔔 Estado:");
    info!("   GET  /api/notifications - Notificaciones activas");
    info!("   GET  /api/status - Online / ocupado");
    info!("   PUT  /api/status/connectivity - Reportar conectividad");
    info!("🔐 Autenticación:");
    info!("   POST /api/auth/login - Login");
    info!("   POST /api/auth/logout - Logout");
    info!("   GET  /api/auth/me - Usuario actual");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        error!("❌ Servidor terminó con error: {}", e);
    }

    stale_monitor.abort();
    if let Some(probe) = probe {
        probe.abort();
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
