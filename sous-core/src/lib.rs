pub mod ai;
pub mod app;
pub mod error;
pub mod favorites;
pub mod player;
pub mod session;
pub mod types;
pub mod voice;

pub use app::{AppState, GenerationRequest};
pub use error::GenerateError;
pub use favorites::{Favorites, FavoritesStorage, JsonFileStorage, MemoryStorage, StorageError};
pub use player::{format_countdown, Advance, Countdown, PlayerError, PlayerState, StepPlayer, Tick};
pub use session::{run_session, CommandSource, SessionCommand, SessionEnd, SessionEvent};
pub use types::{Language, Recipe, RecipeId, RecipeStep, Screen};
pub use voice::{Listener, Narrator, VoiceError};
