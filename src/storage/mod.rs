//! Almacén clave-valor local
//!
//! Puerto de persistencia del ledger. Cada ledger se guarda completo como
//! un documento JSON bajo su propia clave; la sesión guarda el nombre del
//! usuario autenticado.

pub mod file_store;
pub mod memory_store;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;

/// Prefijo común de todas las claves
pub const KEY_PREFIX: &str = "parking_ledger";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Generar clave con prefijo
pub fn make_key(prefix: &str, identifier: &str) -> String {
    format!("{}:{}:{}", KEY_PREFIX, prefix, identifier)
}

/// Clave del usuario autenticado
pub fn session_user_key() -> String {
    make_key("session", "user")
}

/// Backend de almacenamiento seleccionado por configuración
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Redis,
    Memory,
}

impl StorageBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Some(StorageBackend::File),
            "redis" => Some(StorageBackend::Redis),
            "memory" => Some(StorageBackend::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::File => "file",
            StorageBackend::Redis => "redis",
            StorageBackend::Memory => "memory",
        }
    }
}

/// Abrir el almacén configurado
pub async fn open_store(backend: &StorageBackend, data_dir: &str, redis_url: &str) -> Result<SharedStore, StorageError> {
    let store: SharedStore = match backend {
        StorageBackend::File => {
            let store = FileStore::open(data_dir).await?;
            info!("💾 Almacén de archivo en {}", store.path().display());
            Arc::new(store)
        }
        StorageBackend::Redis => {
            Arc::new(RedisStore::connect(redis_url).await?)
        }
        StorageBackend::Memory => {
            info!("🧠 Almacén en memoria (los datos no sobreviven al reinicio)");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        assert_eq!(make_key("ledger", "cars"), "parking_ledger:ledger:cars");
        assert_eq!(session_user_key(), "parking_ledger:session:user");
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!(StorageBackend::from_str("Redis"), Some(StorageBackend::Redis));
        assert_eq!(StorageBackend::from_str(" file "), Some(StorageBackend::File));
        assert_eq!(StorageBackend::from_str("memory"), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::from_str("postgres"), None);
    }
}
