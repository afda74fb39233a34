use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

/// Builds a connection pool for the PostgreSQL database at [db_url]
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool, anyhow::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(2))
        .connect(db_url)
        .await
        .context("connecting to the database")
}

/// Creates the table backing to-do items if it isn't there yet. The primary key on `id`
/// is what rejects duplicate item IDs on insert.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), anyhow::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todo_item (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            is_completed BOOLEAN NOT NULL DEFAULT FALSE
        )",
    )
    .execute(pool)
    .await
    .context("creating the todo_item table")?;

    info!("Database schema is ready");
    Ok(())
}
