//! The interactive assistant: home, recipe, cooking and favorites screens.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sous_core::ai::AiClient;
use sous_core::{
    run_session, AppState, Favorites, Language, Listener, Narrator, Recipe, RecipeId, Screen,
    SessionEnd, StepPlayer,
};
use tokio::sync::mpsc;

use crate::input::{parse_menu_input, LineCommands, MenuInput};
use crate::render::{self, CookingView};

const LISTEN_TIMEOUT: Duration = Duration::from_secs(10);

enum Flow {
    Continue,
    Quit,
}

pub struct Assistant {
    pub app: AppState,
    pub favorites: Favorites,
    pub client: Arc<dyn AiClient>,
    pub narrator: Arc<dyn Narrator>,
    pub listener: Arc<dyn Listener>,
    pub lines: mpsc::UnboundedReceiver<String>,
}

impl Assistant {
    pub async fn run(mut self) -> Result<()> {
        loop {
            let flow = match self.app.screen() {
                Screen::Home => self.home().await,
                Screen::Recipe => self.recipe_screen().await,
                Screen::Cooking => self.cooking().await,
                Screen::Favorites => self.favorites_screen().await,
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        self.narrator.cancel();
        println!("Bye!");
        Ok(())
    }

    async fn home(&mut self) -> Flow {
        render::home(&self.app, self.favorites.len(), self.listener.is_supported());

        let Some(line) = self.lines.recv().await else {
            return Flow::Quit;
        };

        match parse_menu_input(&line) {
            MenuInput::Command { name, arg } => match name.as_str() {
                "q" | "quit" => return Flow::Quit,
                "lang" | "language" => match arg.parse::<Language>() {
                    Ok(language) => self.app.set_language(language),
                    Err(e) => println!("! {}", e),
                },
                "listen" => self.listen().await,
                "clear" => self.app.set_ingredients(""),
                "fav" | "favorites" => self.app.open_favorites(),
                other => println!("! Unknown command :{}", other),
            },
            MenuInput::Text(text) => {
                self.app.append_transcript(&text);
                if !self.app.ingredients().trim().is_empty() {
                    println!();
                    println!("Brewing up a tasty recipe for you...");
                }
                self.app.request_recipe(self.client.as_ref()).await;
            }
        }
        Flow::Continue
    }

    async fn listen(&mut self) {
        if !self.listener.is_supported() {
            println!("! {}", render::RECOGNITION_UNSUPPORTED_NOTICE);
            return;
        }

        println!("Listening...");
        match self.app.listen(self.listener.as_ref(), LISTEN_TIMEOUT).await {
            Ok(true) => {}
            Ok(false) => println!("Didn't catch that."),
            Err(e) => tracing::warn!(error = %e, "Speech recognition error"),
        }
    }

    async fn recipe_screen(&mut self) -> Flow {
        let Some(recipe) = self.app.recipe().cloned() else {
            self.app.go_home();
            return Flow::Continue;
        };

        render::recipe(&recipe, self.favorites.contains(&recipe.id));
        render::recipe_commands();

        let Some(line) = self.lines.recv().await else {
            return Flow::Quit;
        };

        match line.trim().to_lowercase().as_str() {
            "" | "c" | "cook" => {
                if !self.app.start_cooking() {
                    println!("! This recipe has no steps to cook.");
                }
            }
            "f" | "fav" | "favorite" => {
                if self.favorites.toggle(&recipe) {
                    println!("Saved to favorites.");
                } else {
                    println!("Removed from favorites.");
                }
            }
            "b" | "back" | "h" | "home" => self.app.go_home(),
            "q" | "quit" => return Flow::Quit,
            other => println!("! Unknown command '{}'", other),
        }
        Flow::Continue
    }

    async fn cooking(&mut self) -> Flow {
        let Some(recipe) = self.app.recipe().cloned() else {
            self.app.go_home();
            return Flow::Continue;
        };

        let end = match cook(
            recipe,
            self.narrator.clone(),
            self.app.language(),
            &mut self.lines,
        )
        .await
        {
            Ok(end) => end,
            Err(e) => {
                tracing::warn!(error = %e, "Could not start cooking");
                println!("! This recipe can't be cooked: {}", e);
                self.app.stop_cooking();
                return Flow::Continue;
            }
        };

        match end {
            SessionEnd::Finished | SessionEnd::Stopped => {
                self.app.stop_cooking();
                Flow::Continue
            }
            SessionEnd::Home => {
                self.app.go_home();
                Flow::Continue
            }
            SessionEnd::Disconnected => Flow::Quit,
        }
    }

    async fn favorites_screen(&mut self) -> Flow {
        render::favorites(&self.favorites);

        let Some(line) = self.lines.recv().await else {
            return Flow::Quit;
        };

        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("b" | "back"), _) => self.app.close_favorites(),
            (Some("q" | "quit"), _) => return Flow::Quit,
            (Some("rm" | "remove"), Some(n)) => match self.favorite_at(n) {
                Some(id) => {
                    if let Some(removed) = self.favorites.remove(&id) {
                        println!("Removed {}.", removed.recipe_name);
                    }
                }
                None => println!("! No favorite number {}", n),
            },
            (Some(n), None) => match self.favorite_at(n) {
                Some(id) => {
                    self.app.open_favorite(&self.favorites, &id);
                }
                None => println!("! No favorite number {}", n),
            },
            _ => {}
        }
        Flow::Continue
    }

    /// Id of the favorite shown as number `n` (1-based).
    fn favorite_at(&self, n: &str) -> Option<RecipeId> {
        let index = n.parse::<usize>().ok()?.checked_sub(1)?;
        self.favorites.list().get(index).map(|r| r.id)
    }
}

/// Play a recipe's steps, taking commands from terminal lines.
pub async fn cook(
    recipe: Arc<Recipe>,
    narrator: Arc<dyn Narrator>,
    language: Language,
    lines: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd> {
    let mut player = StepPlayer::start(recipe, narrator, language)?;
    let mut view = CookingView::default();
    let mut commands = LineCommands::new(lines);

    let end = run_session(&mut player, &mut commands, |p, event| view.render(p, event)).await;
    view.finish();

    if end == SessionEnd::Finished {
        println!();
        println!("All done. Enjoy your meal!");
    }
    Ok(end)
}
