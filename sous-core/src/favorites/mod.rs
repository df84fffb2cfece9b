//! Saved recipes.
//!
//! [`Favorites`] keeps the set in memory and writes the whole set through a
//! [`FavoritesStorage`] after every change. Storage failures are logged and
//! otherwise ignored: the in-memory set stays authoritative for the session.

mod storage;

pub use storage::{
    FavoritesStorage, JsonFileStorage, MemoryStorage, StorageError, FAVORITES_STORAGE_KEY,
};

use std::sync::Arc;

use crate::types::{Recipe, RecipeId};

pub struct Favorites {
    recipes: Vec<Recipe>,
    storage: Arc<dyn FavoritesStorage>,
}

impl Favorites {
    /// Load the saved set. Unreadable storage starts an empty set.
    pub fn load(storage: Arc<dyn FavoritesStorage>) -> Self {
        let mut recipes = storage.load_all().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error loading favorites");
            Vec::new()
        });

        // Older files may hold the same recipe twice; keep the first.
        let mut seen = std::collections::HashSet::new();
        recipes.retain(|r| seen.insert(r.id));

        recipes.retain(|r| {
            if r.steps.is_empty() {
                tracing::warn!(
                    recipe_id = %r.id,
                    recipe_name = %r.recipe_name,
                    "Dropping saved recipe with no steps"
                );
                false
            } else {
                true
            }
        });

        tracing::debug!(count = recipes.len(), "Loaded favorites");
        Self { recipes, storage }
    }

    /// Add a recipe. Returns false if it was already saved.
    pub fn add(&mut self, recipe: Recipe) -> bool {
        if self.contains(&recipe.id) {
            return false;
        }
        self.recipes.push(recipe);
        self.persist();
        true
    }

    /// Remove a recipe. Returns the removed recipe, if it was saved.
    pub fn remove(&mut self, id: &RecipeId) -> Option<Recipe> {
        let pos = self.recipes.iter().position(|r| r.id == *id)?;
        let removed = self.recipes.remove(pos);
        self.persist();
        Some(removed)
    }

    pub fn contains(&self, id: &RecipeId) -> bool {
        self.recipes.iter().any(|r| r.id == *id)
    }

    /// Add the recipe if it is not saved, remove it otherwise.
    ///
    /// Returns whether the recipe is a favorite afterwards.
    pub fn toggle(&mut self, recipe: &Recipe) -> bool {
        if self.remove(&recipe.id).is_some() {
            false
        } else {
            self.add(recipe.clone())
        }
    }

    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == *id)
    }

    /// Saved recipes, oldest first.
    pub fn list(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save_all(&self.recipes) {
            tracing::error!(error = %e, "Error saving favorites");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeStep;

    fn recipe(name: &str) -> Recipe {
        Recipe::new(
            name,
            "15 minutes",
            vec!["potato".to_string()],
            vec![RecipeStep::new("Boil potatoes", 15, "Wait 15 minutes")],
        )
    }

    fn favorites() -> (Favorites, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (Favorites::load(storage.clone()), storage)
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let (mut favorites, storage) = favorites();
        let aloo = recipe("Aloo Pitika");

        assert!(favorites.toggle(&aloo));
        assert!(favorites.contains(&aloo.id));
        assert_eq!(favorites.len(), 1);
        assert_eq!(storage.stored(), vec![aloo.clone()]);

        assert!(!favorites.toggle(&aloo));
        assert!(!favorites.contains(&aloo.id));
        assert!(storage.stored().is_empty());
    }

    #[test]
    fn test_repeated_toggle_pairs_are_idempotent() {
        let (mut favorites, _) = favorites();
        let aloo = recipe("Aloo Pitika");

        for _ in 0..5 {
            favorites.toggle(&aloo);
            favorites.toggle(&aloo);
        }
        assert!(favorites.is_empty());

        favorites.toggle(&aloo);
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut favorites, _) = favorites();
        let aloo = recipe("Aloo Pitika");

        assert!(favorites.add(aloo.clone()));
        assert!(!favorites.add(aloo.clone()));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_identity_is_id_not_name() {
        let (mut favorites, _) = favorites();
        let first = recipe("Masoor Dal");
        let second = recipe("Masoor Dal");

        favorites.add(first.clone());
        favorites.add(second.clone());
        assert_eq!(favorites.len(), 2);

        favorites.remove(&first.id);
        assert!(favorites.contains(&second.id));
        assert_eq!(favorites.get(&second.id), Some(&second));
    }

    #[test]
    fn test_loads_existing_and_drops_duplicates() {
        let dal = recipe("Dal");
        let storage = Arc::new(MemoryStorage::with_recipes(vec![
            dal.clone(),
            recipe("Rice"),
            dal.clone(),
        ]));

        let favorites = Favorites::load(storage);
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites.list()[0], dal);
    }

    #[test]
    fn test_load_drops_recipes_without_steps() {
        let ghost = Recipe::new("Ghost", "0 minutes", vec![], vec![]);
        let dal = recipe("Dal");
        let storage = Arc::new(MemoryStorage::with_recipes(vec![
            ghost.clone(),
            dal.clone(),
        ]));

        let favorites = Favorites::load(storage);
        assert_eq!(favorites.len(), 1);
        assert!(!favorites.contains(&ghost.id));
        assert_eq!(favorites.list()[0], dal);
    }

    #[test]
    fn test_storage_failure_keeps_memory_authoritative() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_failing(true);

        let mut favorites = Favorites::load(storage.clone());
        assert!(favorites.is_empty());

        let dal = recipe("Dal");
        assert!(favorites.add(dal.clone()));
        assert!(favorites.contains(&dal.id));
        assert!(storage.stored().is_empty());

        assert_eq!(favorites.remove(&dal.id), Some(dal));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_none() {
        let (mut favorites, _) = favorites();
        assert_eq!(favorites.remove(&RecipeId::new()), None);
    }
}
