use std::collections::HashSet;

use tracing::{debug, warn};

use crate::models::vehicle::{VehicleCategory, VehicleEntry};
use crate::storage::{make_key, SharedStore, StorageError};

/// Persistencia de los ledgers en el almacén clave-valor
#[derive(Clone)]
pub struct LedgerRepository {
    store: SharedStore,
}

impl LedgerRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn ledger_key(category: VehicleCategory) -> String {
        make_key("ledger", category.ledger_name())
    }

    /// Cargar un ledger.
    ///
    /// `None` si la clave no existe. Un documento ilegible se descarta y se
    /// devuelve un ledger vacío. Se descartan las entradas cuyo importe no
    /// corresponde al estado de pago y los ids repetidos (se conserva la
    /// primera aparición).
    pub async fn load(&self, category: VehicleCategory) -> Result<Option<Vec<VehicleEntry>>, StorageError> {
        let key = Self::ledger_key(category);
        let Some(raw) = self.store.get(&key).await? else {
            debug!("📭 Sin datos guardados para {}", key);
            return Ok(None);
        };

        let entries = match serde_json::from_str::<Vec<VehicleEntry>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("⚠️ Datos guardados en {} ilegibles, se descartan: {}", key, e);
                return Ok(Some(Vec::new()));
            }
        };

        let total = entries.len();
        let entries: Vec<VehicleEntry> = entries
            .into_iter()
            .filter(|e| {
                let consistent = e.is_consistent(category);
                if !consistent {
                    warn!("⚠️ Entrada {} en {} descartada: importe {} con pagado={}", e.id, key, e.amount, e.paid);
                }
                consistent
            })
            .collect();

        let mut seen = HashSet::new();
        let consistent = entries.len();
        let entries: Vec<VehicleEntry> = entries.into_iter().filter(|e| seen.insert(e.id)).collect();
        if entries.len() != consistent {
            warn!("⚠️ {} entradas con id repetido descartadas en {}", consistent - entries.len(), key);
        }
        if entries.len() != total {
            debug!("🧹 {} de {} entradas descartadas en {}", total - entries.len(), total, key);
        }

        debug!("📥 {} entradas cargadas de {}", entries.len(), key);
        Ok(Some(entries))
    }

    /// Guardar un ledger completo
    pub async fn save(&self, category: VehicleCategory, entries: &[VehicleEntry]) -> Result<(), StorageError> {
        let key = Self::ledger_key(category);
        let serialized = serde_json::to_string(entries)?;
        self.store.set(&key, serialized).await?;
        debug!("💾 {} entradas guardadas en {}", entries.len(), key);
        Ok(())
    }
}
