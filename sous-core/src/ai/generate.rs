//! Recipe generation from a list of available ingredients.

use serde::Deserialize;

use crate::ai::prompts::generate_recipe::{
    render_generate_recipe_system_prompt, render_generate_recipe_user_prompt,
    GENERATE_RECIPE_PROMPT_NAME,
};
use crate::ai::{AiClient, ChatMessage, ChatRequest, Usage};
use crate::error::GenerateError;
use crate::types::{Language, Recipe, RecipeStep};

/// Response format from the AI. Every field is optional here so that a
/// missing field is reported as a validation error naming the field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedRecipeResponse {
    recipe_name: Option<String>,
    total_time: Option<String>,
    ingredients: Option<Vec<String>>,
    steps: Option<Vec<GeneratedStep>>,
}

#[derive(Debug, Deserialize)]
struct GeneratedStep {
    action: Option<String>,
    duration: Option<serde_json::Number>,
    alert: Option<String>,
}

/// Result of recipe generation.
#[derive(Debug, Clone)]
pub struct GeneratedRecipe {
    pub recipe: Recipe,
    pub usage: Usage,
}

/// Generate a recipe that only uses the given ingredients.
///
/// Blank input is rejected before the AI is called. The returned recipe has
/// a fresh identifier and at least one step.
pub async fn generate_recipe(
    ai_client: &dyn AiClient,
    ingredients: &str,
    language: Language,
) -> Result<GeneratedRecipe, GenerateError> {
    let ingredients = ingredients.trim();
    if ingredients.is_empty() {
        return Err(GenerateError::EmptyIngredients);
    }

    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(render_generate_recipe_system_prompt()),
            ChatMessage::user(render_generate_recipe_user_prompt(ingredients, language)),
        ],
        json_response: true,
        max_tokens: Some(4096),
        temperature: Some(0.7),
    };

    let response = ai_client
        .complete(GENERATE_RECIPE_PROMPT_NAME, request)
        .await?;

    let recipe = parse_recipe_response(&response.content)?;

    tracing::info!(
        recipe_id = %recipe.id,
        recipe_name = %recipe.recipe_name,
        steps = recipe.steps.len(),
        language = %language,
        "Generated recipe"
    );

    Ok(GeneratedRecipe {
        recipe,
        usage: response.usage,
    })
}

/// Parse and validate the model's JSON answer into a [`Recipe`].
pub fn parse_recipe_response(content: &str) -> Result<Recipe, GenerateError> {
    let json = strip_code_fence(content);

    let response: GeneratedRecipeResponse = serde_json::from_str(json).map_err(|e| {
        GenerateError::InvalidRecipe(format!("Failed to parse recipe response: {}", e))
    })?;

    let recipe_name = response
        .recipe_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| missing("recipeName"))?;
    let total_time = response.total_time.ok_or_else(|| missing("totalTime"))?;
    let ingredients = response.ingredients.ok_or_else(|| missing("ingredients"))?;
    let raw_steps = response.steps.ok_or_else(|| missing("steps"))?;

    if raw_steps.is_empty() {
        return Err(GenerateError::InvalidRecipe(
            "Recipe has no steps".to_string(),
        ));
    }

    let steps = raw_steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| validate_step(i, step))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Recipe::new(recipe_name, total_time, ingredients, steps))
}

fn validate_step(index: usize, step: GeneratedStep) -> Result<RecipeStep, GenerateError> {
    let field = |name: &str| format!("steps[{}].{}", index, name);

    let action = step
        .action
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| missing(&field("action")))?;
    let number = step.duration.ok_or_else(|| missing(&field("duration")))?;
    let duration = whole_minutes(&number).ok_or_else(|| {
        GenerateError::InvalidRecipe(format!(
            "{} must be a non-negative whole number, got {}",
            field("duration"),
            number
        ))
    })?;
    let alert = step.alert.ok_or_else(|| missing(&field("alert")))?;

    Ok(RecipeStep {
        action,
        duration,
        alert,
    })
}

/// Models occasionally send `5.0` for an integer field; accept whole floats.
fn whole_minutes(number: &serde_json::Number) -> Option<u32> {
    if let Some(n) = number.as_u64() {
        return u32::try_from(n).ok();
    }
    number
        .as_f64()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
        .map(|f| f as u32)
}

fn missing(field: &str) -> GenerateError {
    GenerateError::InvalidRecipe(format!("Missing required field: {}", field))
}

/// Remove a surrounding ```json fence if the model added one.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
