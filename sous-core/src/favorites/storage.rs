//! Persistence backends for the favorites list.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Recipe;

/// Namespace the favorites are stored under.
pub const FAVORITES_STORAGE_KEY: &str = "ai-recipe-assistant-favorites";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt favorites data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Whole-set key-value persistence: read everything, write everything.
pub trait FavoritesStorage: Send + Sync {
    fn load_all(&self) -> Result<Vec<Recipe>, StorageError>;

    fn save_all(&self, recipes: &[Recipe]) -> Result<(), StorageError>;
}

/// On-disk layout of the favorites file.
#[derive(Debug, Serialize, Deserialize)]
struct FavoritesFile {
    saved_at: DateTime<Utc>,
    recipes: Vec<Recipe>,
}

/// Favorites stored as JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$SOUS_FAVORITES_FILE`, else `<data dir>/sous/ai-recipe-assistant-favorites.json`.
    pub fn from_env() -> Self {
        let path = std::env::var("SOUS_FAVORITES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        Self::new(path)
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("sous"))
            .unwrap_or_else(|| PathBuf::from("data"))
            .join(format!("{}.json", FAVORITES_STORAGE_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl FavoritesStorage for JsonFileStorage {
    fn load_all(&self) -> Result<Vec<Recipe>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let file: FavoritesFile = serde_json::from_str(&content)?;
        Ok(file.recipes)
    }

    fn save_all(&self, recipes: &[Recipe]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let file = FavoritesFile {
            saved_at: Utc::now(),
            recipes: recipes.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Write then rename so a crash never leaves half a file behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

/// In-memory storage for tests. Can be switched to fail every call.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    recipes: Mutex<Vec<Recipe>>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Mutex::new(recipes),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// What was last written.
    pub fn stored(&self) -> Vec<Recipe> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Recipe>> {
        self.recipes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        Ok(())
    }
}

impl FavoritesStorage for MemoryStorage {
    fn load_all(&self) -> Result<Vec<Recipe>, StorageError> {
        self.check()?;
        Ok(self.lock().clone())
    }

    fn save_all(&self, recipes: &[Recipe]) -> Result<(), StorageError> {
        self.check()?;
        *self.lock() = recipes.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeStep;
    use tempfile::TempDir;

    fn recipe(name: &str) -> Recipe {
        Recipe::new(
            name,
            "10 minutes",
            vec!["rice".to_string()],
            vec![RecipeStep::new("Cook rice", 10, "Wait 10 minutes")],
        )
    }

    #[test]
    fn test_json_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp_dir.path().join("nested/favorites.json"));
        let recipes = vec![recipe("Jeera Rice"), recipe("Khichdi")];

        storage.save_all(&recipes).unwrap();
        assert_eq!(storage.load_all().unwrap(), recipes);
        assert!(!storage.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp_dir.path().join("favorites.json"));
        assert!(storage.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favorites.json");
        fs::write(&path, "{not json").unwrap();

        let storage = JsonFileStorage::new(path);
        assert!(matches!(storage.load_all(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_default_path_uses_namespace() {
        let path = JsonFileStorage::default_path();
        assert!(path
            .to_string_lossy()
            .ends_with("ai-recipe-assistant-favorites.json"));
    }

    #[test]
    fn test_memory_storage_failing() {
        let storage = MemoryStorage::new();
        storage.set_failing(true);
        assert!(storage.save_all(&[recipe("Dal")]).is_err());
        assert!(storage.load_all().is_err());
        storage.set_failing(false);
        assert!(storage.load_all().unwrap().is_empty());
    }
}
