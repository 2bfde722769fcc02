use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

pub const DEFAULT_TITLE: &str = "Untitled Recipe";
pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// Row of the `recipes` table. `details` holds the submitted payload as JSON.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub title: String,
    pub details: String,
    pub created_at: String,
}

/// Recipe fields exactly as the client submitted them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipePayload(pub Map<String, Value>);

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub success: bool,
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub success: bool,
    pub count: usize,
    pub recipes: Vec<RecipeSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub recipe_name: String,
    pub author: String,
    pub created_at: String,
    pub summary: SummaryDetails,
}

/// Card-sized preview fields; anything absent is `null`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetails {
    pub cuisine: Value,
    pub difficulty: Value,
    pub prep_time: Value,
    pub cook_time: Value,
    pub servings: Value,
    pub description: Value,
}

fn field(details: &Map<String, Value>, key: &str) -> Option<Value> {
    details.get(key).filter(|v| !v.is_null()).cloned()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

impl RecipeRow {
    /// The stored details blob. Rows with an unreadable blob are treated as
    /// having no extra fields.
    pub fn details_map(&self) -> Map<String, Value> {
        match serde_json::from_str::<Value>(&self.details) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            self.title.clone()
        }
    }

    pub fn to_summary(&self) -> RecipeSummary {
        let details = self.details_map();
        let title = self.display_title();

        let author = details
            .get("author")
            .and_then(Value::as_str)
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(DEFAULT_AUTHOR)
            .to_string();

        let description = match field(&details, "description") {
            Some(Value::String(text)) => {
                Value::String(truncate_chars(&text, DESCRIPTION_PREVIEW_CHARS))
            }
            Some(other) => other,
            None => Value::Null,
        };

        let summary = SummaryDetails {
            cuisine: field(&details, "cuisine").unwrap_or_default(),
            difficulty: field(&details, "difficulty").unwrap_or_default(),
            prep_time: field(&details, "prepTime")
                .or_else(|| field(&details, "prep_time"))
                .unwrap_or_default(),
            cook_time: field(&details, "cookTime")
                .or_else(|| field(&details, "cook_time"))
                .unwrap_or_default(),
            servings: field(&details, "servings").unwrap_or_default(),
            description,
        };

        RecipeSummary {
            id: self.id,
            name: title.clone(),
            title: title.clone(),
            recipe_name: title,
            author,
            created_at: self.created_at.clone(),
            summary,
        }
    }

    /// Full recipe view: id, the title under all three legacy keys, author
    /// and creation time, then every stored field on top. Stored fields
    /// win on key collisions, including `title`.
    pub fn to_detail(&self) -> Map<String, Value> {
        let title = self.display_title();

        let mut recipe = Map::new();
        recipe.insert("id".to_string(), Value::from(self.id));
        recipe.insert("name".to_string(), Value::String(title.clone()));
        recipe.insert("title".to_string(), Value::String(title.clone()));
        recipe.insert("recipeName".to_string(), Value::String(title));
        recipe.insert("author".to_string(), Value::from(DEFAULT_AUTHOR));
        recipe.insert(
            "createdAt".to_string(),
            Value::String(self.created_at.clone()),
        );

        recipe.extend(self.details_map());
        recipe
    }
}
