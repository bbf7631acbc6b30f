use nw_core::{Error, NewsStore, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

/// Build and initialize the store named by `kind` (`sqlite` or `memory`).
pub async fn create_storage(kind: &str, db_path: &Path) -> Result<Arc<dyn NewsStore>> {
    let storage: Arc<dyn NewsStore> = match kind {
        #[cfg(feature = "sqlite")]
        "sqlite" => Arc::new(SQLiteStorage::new_with_path(db_path)?) as Arc<dyn NewsStore>,
        "memory" => Arc::new(InMemoryStorage::new()) as Arc<dyn NewsStore>,
        other => {
            return Err(Error::Config(format!(
                "Unknown storage backend '{}' (available: {})",
                other,
                available_backends().join(", ")
            )))
        }
    };

    storage.init().await.map_err(|e| match kind {
        #[cfg(feature = "sqlite")]
        "sqlite" => Error::Storage(format!("{} ({})", e, SQLiteStorage::get_error_message())),
        _ => e,
    })?;
    info!(backend = kind, path = %db_path.display(), "🏦 Storage initialized");
    Ok(storage)
}

pub fn available_backends() -> Vec<&'static str> {
    let mut backends = vec!["memory"];
    if cfg!(feature = "sqlite") {
        backends.insert(0, "sqlite");
    }
    backends
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_storage() {
        let storage = create_storage("memory", Path::new("unused.db")).await.unwrap();
        assert!(storage.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_backend_is_rejected() {
        let result = create_storage("postgres", Path::new("unused.db")).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
