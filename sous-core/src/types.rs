use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier assigned to a recipe when it is generated.
///
/// Favorites are keyed by this, never by recipe name (names collide).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RecipeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// One cooking instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    /// Instruction to display and narrate
    pub action: String,
    /// Waiting time in minutes, 0 when the step has no wait
    pub duration: u32,
    /// Message shown during or after the wait
    pub alert: String,
}

impl RecipeStep {
    pub fn new(action: impl Into<String>, duration: u32, alert: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            duration,
            alert: alert.into(),
        }
    }

    pub fn wait_secs(&self) -> u32 {
        self.duration.saturating_mul(60)
    }
}

/// A generated recipe. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub recipe_name: String,
    /// Free-text label, e.g. "30 minutes"
    pub total_time: String,
    pub ingredients: Vec<String>,
    /// Always non-empty for recipes produced by the generator
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    /// Build a recipe with a fresh identifier.
    pub fn new(
        recipe_name: impl Into<String>,
        total_time: impl Into<String>,
        ingredients: Vec<String>,
        steps: Vec<RecipeStep>,
    ) -> Self {
        Self {
            id: RecipeId::new(),
            recipe_name: recipe_name.into(),
            total_time: total_time.into(),
            ingredients,
            steps,
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Output language for generated recipes and narration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Hinglish,
    Assamese,
}

impl Language {
    pub const ALL: &'static [Language] = &[Language::Hinglish, Language::Assamese];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hinglish => "Hinglish",
            Language::Assamese => "Assamese",
        }
    }

    /// BCP-47 tag handed to speech engines.
    ///
    /// Assamese voices are missing on many systems; engines fall back on their own.
    pub fn voice_hint(&self) -> &'static str {
        match self {
            Language::Hinglish => "hi-IN",
            Language::Assamese => "as-IN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown language '{}' (expected one of: hinglish, assamese)",
                    s
                )
            })
    }
}

/// Screens of the assistant, in the order a user normally visits them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Home,
    Recipe,
    Cooking,
    Favorites,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Recipe => "recipe",
            Screen::Cooking => "cooking",
            Screen::Favorites => "favorites",
        }
    }
}
