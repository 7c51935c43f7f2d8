use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::error::ErrorKind;

use boxes_core::{BoxRecord, NewBox};
use boxes_store::error::StoreError;
use boxes_store::store::BoxStore;

use crate::config::PostgresConfig;
use crate::migrations;

/// Build `PgConnectOptions` from a [`PostgresConfig`], applying the SSL mode
/// when configured.
pub(crate) fn build_connect_options(
    config: &PostgresConfig,
) -> Result<sqlx::postgres::PgConnectOptions, StoreError> {
    let mut options: sqlx::postgres::PgConnectOptions = config
        .url
        .parse()
        .map_err(|e: sqlx::Error| StoreError::Connection(e.to_string()))?;

    if let Some(ref mode) = config.ssl_mode {
        let ssl_mode = match mode.as_str() {
            "disable" => sqlx::postgres::PgSslMode::Disable,
            "prefer" => sqlx::postgres::PgSslMode::Prefer,
            "require" => sqlx::postgres::PgSslMode::Require,
            "verify-ca" => sqlx::postgres::PgSslMode::VerifyCa,
            "verify-full" => sqlx::postgres::PgSslMode::VerifyFull,
            other => {
                return Err(StoreError::Connection(format!("unknown ssl_mode: {other}")));
            }
        };
        options = options.ssl_mode(ssl_mode);
    }

    Ok(options)
}

/// Open a connection pool for `config` without touching the schema.
///
/// # Errors
///
/// Returns [`StoreError::Connection`] if the URL is invalid or the pool
/// cannot connect.
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, StoreError> {
    let connect_options = build_connect_options(config)?;
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(connect_options)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))
}

/// Map a `sqlx` error onto the store's error kinds.
fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db)
            if matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) =>
        {
            StoreError::Constraint(err.to_string())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Connection(err.to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => StoreError::Decode(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

/// PostgreSQL-backed implementation of [`BoxStore`].
///
/// Uses `sqlx::PgPool` for connection pooling. Ids come from the table's
/// `BIGSERIAL` sequence; timestamps come from a single `NOW()` evaluation so
/// `created_at` and `updated_at` are identical on insert.
pub struct PostgresBoxStore {
    pool: PgPool,
    config: Arc<PostgresConfig>,
}

impl PostgresBoxStore {
    /// Create a new `PostgresBoxStore` from the provided configuration.
    ///
    /// Connects to `PostgreSQL`, creates the connection pool, and runs
    /// migrations to ensure the boxes table exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if pool creation fails, or
    /// [`StoreError::Query`] if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StoreError> {
        let pool = connect(&config).await?;
        Self::from_pool(pool, config).await
    }

    /// Create a `PostgresBoxStore` from an existing pool and config.
    ///
    /// Runs migrations on creation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if migrations fail.
    pub async fn from_pool(pool: PgPool, config: PostgresConfig) -> Result<Self, StoreError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }
}

#[async_trait]
impl BoxStore for PostgresBoxStore {
    async fn insert(&self, new_box: NewBox) -> Result<BoxRecord, StoreError> {
        let table = self.config.boxes_table();

        let query = format!(
            "INSERT INTO {table} (height, width, color, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) \
             RETURNING id, height, width, color, created_at, updated_at"
        );

        let row: BoxRow = sqlx::query_as(&query)
            .bind(new_box.height)
            .bind(new_box.width)
            .bind(&new_box.color)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        Ok(row.into())
    }

    async fn get(&self, id: i64) -> Result<Option<BoxRecord>, StoreError> {
        let table = self.config.boxes_table();

        let query = format!(
            "SELECT id, height, width, color, created_at, updated_at \
             FROM {table} WHERE id = $1"
        );

        let row: Option<BoxRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        Ok(row.map(Into::into))
    }
}

/// Internal row type for mapping database rows to `BoxRecord`.
#[derive(sqlx::FromRow)]
struct BoxRow {
    id: i64,
    height: i32,
    width: i32,
    color: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<BoxRow> for BoxRecord {
    fn from(row: BoxRow) -> Self {
        Self {
            id: row.id,
            height: row.height,
            width: row.width,
            color: row.color,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_ssl_mode() {
        let config = PostgresConfig {
            ssl_mode: Some("sometimes".into()),
            ..PostgresConfig::default()
        };
        let err = build_connect_options(&config).unwrap_err();
        assert!(matches!(err, StoreError::Connection(msg) if msg.contains("sometimes")));
    }

    #[test]
    fn rejects_malformed_url() {
        let config = PostgresConfig::new("not a url");
        assert!(matches!(
            build_connect_options(&config),
            Err(StoreError::Connection(_))
        ));
    }

    #[test]
    fn pool_errors_are_connection_errors() {
        assert!(matches!(
            classify(sqlx::Error::PoolTimedOut),
            StoreError::Connection(_)
        ));
    }

    #[test]
    fn missing_column_is_a_decode_error() {
        assert!(matches!(
            classify(sqlx::Error::ColumnNotFound("color".into())),
            StoreError::Decode(_)
        ));
    }

    #[test]
    fn row_not_found_is_a_query_error() {
        assert!(matches!(
            classify(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
    }
}
