//! Latencia simulada de backend
//!
//! Cada mutación del ledger pasa por este puerto antes de aplicarse.
//! En producción puede dormir un tiempo fijo o ser reemplazado por
//! una llamada real; en tests se usa `NoLatency`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Operación mutante del ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOperation {
    Add,
    TogglePayment,
    Remove,
    ClearAll,
}

impl LedgerOperation {
    pub fn default_delay(&self) -> Duration {
        match self {
            LedgerOperation::Add => Duration::from_millis(800),
            LedgerOperation::TogglePayment => Duration::from_millis(500),
            LedgerOperation::Remove => Duration::from_millis(300),
            LedgerOperation::ClearAll => Duration::from_millis(1000),
        }
    }
}

#[async_trait]
pub trait Latency: Send + Sync {
    async fn pause(&self, operation: LedgerOperation);
}

pub type SharedLatency = Arc<dyn Latency>;

/// Sin latencia: la mutación se aplica inmediatamente
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn pause(&self, _operation: LedgerOperation) {}
}

/// Latencia fija por operación usando `tokio::time::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedLatency;

#[async_trait]
impl Latency for SimulatedLatency {
    async fn pause(&self, operation: LedgerOperation) {
        let delay = operation.default_delay();
        tracing::debug!("⏳ Simulando latencia de {:?}: {}ms", operation, delay.as_millis());
        tokio::time::sleep(delay).await;
    }
}

/// Elegir el adaptador según configuración
pub fn latency_from_flag(simulated: bool) -> SharedLatency {
    if simulated {
        Arc::new(SimulatedLatency)
    } else {
        Arc::new(NoLatency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays() {
        assert_eq!(LedgerOperation::Add.default_delay(), Duration::from_millis(800));
        assert_eq!(LedgerOperation::TogglePayment.default_delay(), Duration::from_millis(500));
        assert_eq!(LedgerOperation::Remove.default_delay(), Duration::from_millis(300));
        assert_eq!(LedgerOperation::ClearAll.default_delay(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_simulated_latency_waits() {
        let started = tokio::time::Instant::now();
        SimulatedLatency.pause(LedgerOperation::Remove).await;
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_no_latency_returns_immediately() {
        let started = std::time::Instant::now();
        latency_from_flag(false).pause(LedgerOperation::ClearAll).await;
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
