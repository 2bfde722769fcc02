use serde_json::Value;

use super::models::{RecipePayload, DEFAULT_TITLE};
use crate::common::{ValidationResult, Validator};

/// Title synonyms in resolution order
pub const TITLE_FIELDS: [&str; 3] = ["recipeName", "name", "title"];

impl RecipePayload {
    /// Text of the first title synonym holding a non-blank scalar. Numbers
    /// and booleans count, in their JSON text form.
    pub fn present_title(&self) -> Option<String> {
        TITLE_FIELDS.iter().find_map(|key| {
            let text = match self.0.get(*key)? {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            (!text.trim().is_empty()).then_some(text)
        })
    }

    pub fn resolve_title(&self) -> String {
        self.present_title()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }
}

impl Validator for RecipePayload {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.present_title().is_none() {
            result.add_error(
                "name",
                "Recipe name is required (name, title or recipeName)",
            );
        }

        result
    }
}
