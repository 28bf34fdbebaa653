use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use tracing::{debug, error, info, warn};

use super::{KeyValueStore, StorageError};

/// Almacén sobre Redis con `ConnectionManager` (reconexión automática)
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Crear nuevo almacén Redis
    pub async fn connect(redis_url: &str) -> Result<Self, StorageError> {
        info!("🔗 Conectando a Redis: {}", redis_url);

        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.manager.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!("📥 Clave encontrada: {}", key);
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("❌ Clave ausente: {}", key);
                Ok(None)
            }
            Err(e) => {
                error!("❌ Error leyendo clave {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut conn = self.manager.clone();

        let result: RedisResult<()> = conn.set(key, value).await;

        match result {
            Ok(()) => {
                debug!("💾 SET para clave: {}", key);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error guardando clave {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.manager.clone();

        let result: RedisResult<i64> = conn.del(key).await;

        match result {
            Ok(count) => {
                debug!("🗑️ DELETE para clave: {} (eliminados: {})", key, count);
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ Error eliminando clave {}: {}", key, e);
                Err(e.into())
            }
        }
    }
}
