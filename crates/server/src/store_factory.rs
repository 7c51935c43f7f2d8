use std::sync::Arc;

use boxes_store::BoxStore;
use boxes_store_memory::MemoryBoxStore;
#[cfg(feature = "postgres")]
use boxes_store_postgres::{PostgresBoxStore, PostgresConfig};

use crate::config::StoreConfig;
use crate::error::ServerError;

/// Create a box store from the given configuration.
///
/// The PostgreSQL backend runs its migrations while connecting, so a store
/// returned from here is ready to accept inserts.
#[allow(clippy::unused_async)]
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn BoxStore>, ServerError> {
    let store: Arc<dyn BoxStore> = match config.backend.as_str() {
        "memory" => Arc::new(MemoryBoxStore::new()),
        #[cfg(feature = "postgres")]
        "postgres" => {
            let pg_config = postgres_config(config)?;
            let store = PostgresBoxStore::new(pg_config).await?;
            Arc::new(store)
        }
        other => {
            return Err(ServerError::Config(format!("unknown store backend: {other}")));
        }
    };

    Ok(store)
}

/// Drop the boxes table for backends that have one.
#[allow(clippy::unused_async)]
pub async fn revert_store(config: &StoreConfig) -> Result<(), ServerError> {
    match config.backend.as_str() {
        "memory" => {
            tracing::info!("memory backend has no schema to revert");
            Ok(())
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let pg_config = postgres_config(config)?;
            let pool = boxes_store_postgres::connect(&pg_config).await?;
            boxes_store_postgres::revert_migrations(&pool, &pg_config)
                .await
                .map_err(|e| ServerError::Store(boxes_store::StoreError::Query(e.to_string())))
        }
        other => Err(ServerError::Config(format!("unknown store backend: {other}"))),
    }
}

#[cfg(feature = "postgres")]
fn postgres_config(config: &StoreConfig) -> Result<PostgresConfig, ServerError> {
    let url = config.url.as_deref().ok_or_else(|| {
        ServerError::Config("postgres store backend requires [store] url or DATABASE_URL".into())
    })?;

    Ok(PostgresConfig {
        pool_size: config.pool_size,
        schema: config.schema.clone(),
        table_prefix: config.table_prefix.clone(),
        acquire_timeout: std::time::Duration::from_secs(config.acquire_timeout_seconds),
        ssl_mode: config.ssl_mode.clone(),
        ..PostgresConfig::new(url)
    })
}
