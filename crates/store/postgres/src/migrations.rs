use sqlx::PgPool;

use crate::config::PostgresConfig;

/// Create the boxes table if it does not exist.
///
/// `color` is `VARCHAR(50)` to match the validation limit. The `CHECK`
/// constraints keep dimensions positive even for writes that bypass
/// validation.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if the DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let table = config.boxes_table();

    let create_boxes = format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id          BIGSERIAL PRIMARY KEY,
            height      INTEGER NOT NULL CHECK (height >= 1),
            width       INTEGER NOT NULL CHECK (width >= 1),
            color       VARCHAR(50) NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    );

    sqlx::query(&create_boxes).execute(pool).await?;
    tracing::debug!(table = %table, "boxes table ready");

    Ok(())
}

/// Drop the boxes table, reversing [`run_migrations`].
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if the DDL statement fails.
pub async fn revert_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let table = config.boxes_table();
    sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(pool)
        .await?;
    tracing::debug!(table = %table, "boxes table dropped");

    Ok(())
}
