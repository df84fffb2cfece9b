//! Application state: which screen is showing and what it shows.
//!
//! All UI state lives in [`AppState`] and only changes through its transition
//! methods. Generation is split into [`AppState::begin_generation`] and
//! [`AppState::finish_generation`] so a front-end can await the AI call
//! however it likes while the `loading` flag blocks duplicate submissions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::ai::{generate_recipe, AiClient};
use crate::error::GenerateError;
use crate::favorites::Favorites;
use crate::types::{Language, Recipe, RecipeId, Screen};
use crate::voice::{Listener, VoiceError};

pub const EMPTY_INGREDIENTS_MESSAGE: &str = "Please enter some ingredients.";

pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate a recipe. The AI might be busy, or the ingredients are too unusual. Please try again.";

/// Inputs for one generation call, captured when it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub ingredients: String,
    pub language: Language,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    screen: Screen,
    language: Language,
    ingredients: String,
    recipe: Option<Arc<Recipe>>,
    loading: bool,
    error: Option<String>,
    /// The input belongs to a failed attempt; new text replaces it.
    stale_input: bool,
}

impl AppState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn ingredients(&self) -> &str {
        &self.ingredients
    }

    pub fn recipe(&self) -> Option<&Arc<Recipe>> {
        self.recipe.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The single user-visible error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_ingredients(&mut self, ingredients: impl Into<String>) {
        self.ingredients = ingredients.into();
        self.stale_input = false;
    }

    /// Whether the input is left over from a failed generation.
    ///
    /// Submitting it unchanged retries; any new text replaces it.
    pub fn is_retry_pending(&self) -> bool {
        self.stale_input && !self.ingredients.trim().is_empty()
    }

    /// Append typed text or a speech transcript to the ingredient text.
    pub fn append_transcript(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if self.stale_input || self.ingredients.trim().is_empty() {
            self.stale_input = false;
            self.ingredients = text.to_string();
        } else {
            self.ingredients = format!("{} {}", self.ingredients.trim_end(), text);
        }
    }

    /// Start a generation from the current ingredient text.
    ///
    /// Returns `None` without touching the AI when the input is blank (the
    /// validation message is shown) or a generation is already running.
    pub fn begin_generation(&mut self) -> Option<GenerationRequest> {
        if self.loading {
            tracing::debug!("Ignoring duplicate recipe submission");
            return None;
        }

        let ingredients = self.ingredients.trim();
        if ingredients.is_empty() {
            self.error = Some(EMPTY_INGREDIENTS_MESSAGE.to_string());
            return None;
        }

        let request = GenerationRequest {
            ingredients: ingredients.to_string(),
            language: self.language,
        };
        self.loading = true;
        self.error = None;
        Some(request)
    }

    /// Record the outcome of the generation started by `begin_generation`.
    pub fn finish_generation(&mut self, result: Result<Recipe, GenerateError>) {
        self.loading = false;
        match result {
            Ok(recipe) => {
                self.ingredients.clear();
                self.stale_input = false;
                self.recipe = Some(Arc::new(recipe));
                self.screen = Screen::Recipe;
            }
            Err(GenerateError::EmptyIngredients) => {
                self.error = Some(EMPTY_INGREDIENTS_MESSAGE.to_string());
            }
            Err(e) => {
                tracing::error!(error = %e, "Recipe generation failed");
                self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
                self.stale_input = true;
            }
        }
    }

    /// Run a whole generation against `client`.
    ///
    /// Returns true if a recipe is now showing.
    pub async fn request_recipe(&mut self, client: &dyn AiClient) -> bool {
        let Some(request) = self.begin_generation() else {
            return false;
        };

        let result = generate_recipe(client, &request.ingredients, request.language)
            .await
            .map(|generated| {
                tracing::debug!(
                    prompt_tokens = generated.usage.prompt_tokens,
                    completion_tokens = generated.usage.completion_tokens,
                    total_tokens = generated.usage.total_tokens,
                    "Recipe generation usage"
                );
                generated.recipe
            });
        self.finish_generation(result);
        self.screen == Screen::Recipe
    }

    /// Listen for one spoken phrase and append it to the ingredient text.
    ///
    /// Returns `Ok(true)` if a transcript was appended, `Ok(false)` if nothing
    /// was heard before `timeout` (listening is stopped in that case).
    pub async fn listen(
        &mut self,
        listener: &dyn Listener,
        timeout: Duration,
    ) -> Result<bool, VoiceError> {
        if !listener.is_supported() {
            return Err(VoiceError::RecognitionUnsupported);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        listener.start_listening(self.language, tx)?;

        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(transcript)) => {
                self.append_transcript(&transcript);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(_) => {
                listener.stop_listening();
                Ok(false)
            }
        }
    }

    /// Open the cooking screen for the current recipe.
    ///
    /// Refused without a recipe or when the recipe has no steps.
    pub fn start_cooking(&mut self) -> bool {
        match &self.recipe {
            Some(recipe) if !recipe.steps.is_empty() => {
                self.screen = Screen::Cooking;
                true
            }
            _ => false,
        }
    }

    /// Leave the cooking screen, back to the recipe.
    pub fn stop_cooking(&mut self) {
        self.screen = if self.recipe.is_some() {
            Screen::Recipe
        } else {
            Screen::Home
        };
    }

    /// Back to the start: the recipe and any error are cleared.
    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
        self.recipe = None;
        self.error = None;
    }

    pub fn open_favorites(&mut self) {
        self.screen = Screen::Favorites;
    }

    pub fn close_favorites(&mut self) {
        self.screen = Screen::Home;
    }

    /// Show a saved recipe. Returns false if `id` is not a favorite.
    pub fn open_favorite(&mut self, favorites: &Favorites, id: &RecipeId) -> bool {
        let Some(recipe) = favorites.get(id) else {
            return false;
        };
        self.recipe = Some(Arc::new(recipe.clone()));
        self.error = None;
        self.screen = Screen::Recipe;
        true
    }
}
