use super::models::{
    CreateRecipeResponse, RecipeListResponse, RecipePayload, RecipeQuery,
};
use super::services::RecipesService;
use crate::common::{ApiError, AppState};
use axum::{
    extract::{Extension, Form, FromRequest, Query, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Reads a recipe from a JSON or URL-encoded body. Form fields arrive as
/// strings; a repeated key keeps its last value.
async fn read_payload(request: Request) -> Result<RecipePayload, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match content_type.as_str() {
        "application/json" => {
            let Json(value) = Json::<Value>::from_request(request, &())
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            match value {
                Value::Object(map) => Ok(RecipePayload(map)),
                _ => Err(ApiError::BadRequest(
                    "Recipe payload must be a JSON object".to_string(),
                )),
            }
        }
        "application/x-www-form-urlencoded" => {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            let map: Map<String, Value> = pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            Ok(RecipePayload(map))
        }
        _ => Err(ApiError::BadRequest("Unsupported content type".to_string())),
    }
}

fn parse_id(raw: Option<String>) -> Result<Option<i64>, ApiError> {
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest("Invalid recipe id".to_string())),
    }
}

async fn recipe_detail(state: &AppState, id: i64) -> Result<Response, ApiError> {
    let service = RecipesService::new(state.db.clone());
    let row = service.get_recipe(id).await?;
    Ok(Json(Value::Object(row.to_detail())).into_response())
}

/// POST /api/recipes - Submit a new recipe
pub async fn submit_recipe(
    Extension(state): Extension<Arc<AppState>>,
    request: Request,
) -> Result<impl IntoResponse, ApiError> {
    let payload = read_payload(request).await?;

    let service = RecipesService::new(state.db.clone());
    let id = service.create_recipe(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            success: true,
            id,
            message: "Recipe submitted successfully".to_string(),
        }),
    ))
}

/// GET /api/recipes - List recipes, or fetch one with `?id=`
pub async fn list_recipes(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<RecipeQuery>,
) -> Result<Response, ApiError> {
    if let Some(id) = parse_id(query.id)? {
        return recipe_detail(&state, id).await;
    }

    let service = RecipesService::new(state.db.clone());
    let recipes: Vec<_> = service
        .list_recipes()
        .await?
        .iter()
        .map(|row| row.to_summary())
        .collect();

    Ok(Json(RecipeListResponse {
        success: true,
        count: recipes.len(),
        recipes,
    })
    .into_response())
}

/// GET /api/recipe?id= - Fetch a single recipe
pub async fn get_recipe(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<RecipeQuery>,
) -> Result<Response, ApiError> {
    let id = parse_id(query.id)?
        .ok_or_else(|| ApiError::BadRequest("Recipe id is required".to_string()))?;
    recipe_detail(&state, id).await
}

/// OPTIONS /api/recipes - CORS preflight
pub async fn recipes_preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}
