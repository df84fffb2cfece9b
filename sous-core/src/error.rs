use thiserror::Error;

use crate::ai::AiError;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("No ingredients given")]
    EmptyIngredients,

    #[error("AI request failed: {0}")]
    Ai(#[from] AiError),

    #[error("Invalid recipe from AI: {0}")]
    InvalidRecipe(String),
}
