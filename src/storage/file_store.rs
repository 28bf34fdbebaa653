//! Almacén en fichero
//!
//! Todas las claves viven en un único documento JSON dentro de `DATA_DIR`.
//! Cada escritura reescribe el documento completo (write-through) usando
//! un fichero temporal y `rename` para no dejar el documento a medias.
//! La copia en memoria solo cambia si la escritura en disco tuvo éxito.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{KeyValueStore, StorageError};

const STORE_FILE_NAME: &str = "parking_ledger.json";

pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Abre (o crea) el almacén en `data_dir`
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir).await?;
        let path = data_dir.join(STORE_FILE_NAME);

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("⚠️ Almacén {} ilegible, se empieza vacío: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!("📂 Almacén local abierto en {} ({} claves)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let serialized = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serialized).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("💾 Almacén escrito en {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.flush(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next).await?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("parking_ledger_test_{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = temp_dir();

        let store = FileStore::open(&dir).await.unwrap();
        store.set("a", "[1,2]".to_string()).await.unwrap();
        store.set("b", "x".to_string()).await.unwrap();
        store.delete("b").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&dir).await.unwrap();
        assert_eq!(reopened.get("a").await.unwrap(), Some("[1,2]".to_string()));
        assert_eq!(reopened.get("b").await.unwrap(), None);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_file_store_discards_corrupt_document() {
        let dir = temp_dir();
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join(STORE_FILE_NAME), "{not json").await.unwrap();

        let store = FileStore::open(&dir).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_value() {
        let dir = temp_dir();
        let store = FileStore::open(&dir).await.unwrap();
        store.set("a", "old".to_string()).await.unwrap();

        tokio::fs::remove_dir_all(&dir).await.unwrap();

        assert!(store.set("a", "new".to_string()).await.is_err());
        assert!(store.set("b", "x".to_string()).await.is_err());
        assert!(store.delete("a").await.is_err());

        assert_eq!(store.get("a").await.unwrap(), Some("old".to_string()));
        assert_eq!(store.get("b").await.unwrap(), None);
    }
}
