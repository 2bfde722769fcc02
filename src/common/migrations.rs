// src/common/migrations.rs
//! Database schema management

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Creates the recipe schema, dropping it first when `reset` is set.
pub async fn run_migrations(pool: &SqlitePool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        warn!("⚠️  RESET_DB=true - Dropping recipe tables and recreating schema...");
        sqlx::query("DROP TABLE IF EXISTS recipes")
            .execute(pool)
            .await?;
    }

    create_recipe_tables(pool).await?;

    info!("✅ Database migration completed successfully!");
    Ok(())
}

async fn create_recipe_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            details TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_created_at ON recipes(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}
