//! Recipe generation prompt.

use crate::types::Language;

/// Prompt name used in logs.
pub const GENERATE_RECIPE_PROMPT_NAME: &str = "generate_recipe";

/// JSON shape the model must answer with.
pub const RECIPE_RESPONSE_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "recipeName": {"type": "string", "description": "The name of the recipe."},
    "totalTime": {"type": "string", "description": "Total estimated cooking time, e.g., \"30 minutes\"."},
    "ingredients": {
      "type": "array",
      "description": "List of all ingredients with quantities.",
      "items": {"type": "string"}
    },
    "steps": {
      "type": "array",
      "description": "The step-by-step cooking instructions.",
      "items": {
        "type": "object",
        "properties": {
          "action": {"type": "string", "description": "Clear, concise action for this step."},
          "duration": {"type": "integer", "description": "The waiting time in minutes for this step. Use 0 if no waiting is needed."},
          "alert": {"type": "string", "description": "A short message about the waiting period, e.g., \"Wait for 5 minutes\" or \"No waiting needed\"."}
        },
        "required": ["action", "duration", "alert"]
      }
    }
  },
  "required": ["recipeName", "totalTime", "ingredients", "steps"]
}"#;

/// System prompt describing the response format.
pub fn render_generate_recipe_system_prompt() -> String {
    format!(
        r#"You are a helpful cooking assistant. You always answer with a single JSON object and no other text.

The JSON object must match this schema:
{schema}"#,
        schema = RECIPE_RESPONSE_SCHEMA
    )
}

/// User prompt carrying the ingredients and target language.
pub fn render_generate_recipe_user_prompt(ingredients: &str, language: Language) -> String {
    format!(
        r#"Create one simple and easy-to-follow recipe.

RULES:
1. Use ONLY the following ingredients: {ingredients}.
2. You can assume the user has basic staples: salt, pepper, oil, and water. Do not use any other ingredients.
3. The recipe should be very simple and suitable for a beginner cook.
4. The output language MUST be {language}.
5. Provide the output strictly in the specified JSON format.

Generate the recipe now."#,
        ingredients = ingredients,
        language = language
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_user_prompt() {
        let prompt = render_generate_recipe_user_prompt("eggs, onion", Language::Assamese);
        assert!(prompt.contains("ONLY the following ingredients: eggs, onion."));
        assert!(prompt.contains("MUST be Assamese"));
    }

    #[test]
    fn test_system_prompt_embeds_schema() {
        let prompt = render_generate_recipe_system_prompt();
        assert!(prompt.contains("\"recipeName\""));
        assert!(prompt.contains("\"required\": [\"action\", \"duration\", \"alert\"]"));
    }

    #[test]
    fn test_schema_is_valid_json() {
        let schema: serde_json::Value = serde_json::from_str(RECIPE_RESPONSE_SCHEMA).unwrap();
        assert_eq!(schema["type"], "object");
    }
}
