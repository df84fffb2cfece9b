//! AI client module for recipe generation.
//!
//! This module provides:
//! - `AiClient` trait for abstracting AI providers
//! - `OpenAiCompatClient`, talking to Gemini's OpenAI-compatible endpoint by default
//! - `FakeAiClient` for tests
//! - Configuration via environment variables
//! - The recipe generation prompt and response validation
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `SOUS_AI_API_KEY` (required, `GEMINI_API_KEY` is also accepted): API key
//! - `SOUS_AI_MODEL` (optional): Model name, e.g., "gemini-2.5-flash"
//! - `SOUS_AI_BASE_URL` (optional): API base URL
//!
//! # Example
//!
//! ```ignore
//! use sous_core::ai::{generate_recipe, OpenAiCompatClient};
//! use sous_core::Language;
//!
//! let client = OpenAiCompatClient::from_env()?;
//! let generated = generate_recipe(&client, "eggs, onion, tomato", Language::Hinglish).await?;
//! println!("{}", generated.recipe.recipe_name);
//! ```

mod client;
mod config;
mod fake;
mod generate;
pub mod prompts;
mod types;

pub use client::{AiClient, AiError, OpenAiCompatClient};
pub use config::{AiConfig, ConfigError};
pub use fake::FakeAiClient;
pub use generate::{generate_recipe, parse_recipe_response, GeneratedRecipe};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Role, Usage};
