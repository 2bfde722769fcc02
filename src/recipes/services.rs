use super::models::{RecipePayload, RecipeRow};
use crate::common::{ApiError, Validator};
use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::{error, info};

pub struct RecipesService {
    db: SqlitePool,
}

impl RecipesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Validates and stores a submitted recipe, returning its new id
    pub async fn create_recipe(&self, payload: &RecipePayload) -> Result<i64, ApiError> {
        payload.validate().into_result()?;

        let title = payload.resolve_title();
        let details = serde_json::to_string(&payload.0)
            .map_err(|e| ApiError::InternalServer(format!("Failed to encode recipe: {}", e)))?;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let id = sqlx::query("INSERT INTO recipes (title, details, created_at) VALUES (?, ?, ?)")
            .bind(&title)
            .bind(&details)
            .bind(&now)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, title = %title, "Failed to store recipe");
                ApiError::DatabaseError(e)
            })?
            .last_insert_rowid();

        info!(recipe_id = id, title = %title, "Recipe stored");
        Ok(id)
    }

    /// All recipes, newest first
    pub async fn list_recipes(&self) -> Result<Vec<RecipeRow>, ApiError> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, title, details, created_at
            FROM recipes
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    pub async fn get_recipe(&self, id: i64) -> Result<RecipeRow, ApiError> {
        sqlx::query_as::<_, RecipeRow>(
            "SELECT id, title, details, created_at FROM recipes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))
    }
}
