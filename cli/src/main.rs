mod input;
mod interactive;
mod narrator;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sous_core::ai::{AiClient, OpenAiCompatClient};
use sous_core::voice::UnsupportedListener;
use sous_core::{AppState, Favorites, FavoritesStorage, JsonFileStorage, Language, RecipeId};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::interactive::Assistant;
use crate::narrator::{build_narrator, NarratorKind};

#[derive(Parser)]
#[command(name = "sous")]
#[command(about = "AI recipe assistant", long_about = None)]
struct Cli {
    /// Language for recipes and narration
    #[arg(long, global = true, default_value = "hinglish")]
    language: Language,

    /// How cooking steps are read out
    #[arg(long, global = true, value_enum, default_value_t = NarratorKind::Command)]
    narrator: NarratorKind,

    /// Text-to-speech program for the command narrator
    #[arg(long, global = true, default_value = "espeak-ng")]
    voice_command: String,

    /// Favorites file (default: $SOUS_FAVORITES_FILE or the user data directory)
    #[arg(long, global = true)]
    favorites_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive assistant (default)
    Interactive,
    /// Generate a recipe from ingredients and print it
    Generate {
        /// Available ingredients, e.g. "chicken, onion, tomatoes"
        #[arg(required = true)]
        ingredients: Vec<String>,
        /// Save the recipe to favorites
        #[arg(long)]
        save: bool,
        /// Start cooking right away
        #[arg(long)]
        cook: bool,
    },
    /// Manage saved recipes
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
    /// Cook a saved recipe step by step
    Cook {
        /// Recipe id (see `sous favorites list`)
        id: RecipeId,
    },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// List saved recipes
    List,
    /// Print a saved recipe
    Show { id: RecipeId },
    /// Remove a saved recipe
    Remove { id: RecipeId },
}

/// Log to stderr so output never lands in the middle of a screen.
/// RUST_LOG overrides the default of errors only.
fn init_telemetry() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn ai_client() -> Result<Arc<dyn AiClient>> {
    let client = OpenAiCompatClient::from_env()
        .context("AI is not configured; set SOUS_AI_API_KEY (or GEMINI_API_KEY)")?;
    tracing::debug!(model = client.model(), "AI client ready");
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry();

    let cli = Cli::parse();

    let storage: Arc<dyn FavoritesStorage> = Arc::new(match &cli.favorites_file {
        Some(path) => JsonFileStorage::new(path),
        None => JsonFileStorage::from_env(),
    });
    let mut favorites = Favorites::load(storage);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let assistant = Assistant {
                app: AppState::new(cli.language),
                favorites,
                client: ai_client()?,
                narrator: build_narrator(cli.narrator, &cli.voice_command),
                listener: Arc::new(UnsupportedListener),
                lines: input::spawn_stdin_lines(),
            };
            assistant.run().await?;
        }
        Commands::Generate {
            ingredients,
            save,
            cook,
        } => {
            let client = ai_client()?;
            let mut app = AppState::new(cli.language);
            app.set_ingredients(ingredients.join(" "));

            if !app.request_recipe(client.as_ref()).await {
                anyhow::bail!("{}", app.error().unwrap_or("Recipe generation failed"));
            }
            let recipe = app
                .recipe()
                .cloned()
                .context("Recipe missing after generation")?;

            render::recipe(&recipe, false);
            if save {
                favorites.add(recipe.as_ref().clone());
                println!();
                println!("Saved to favorites as {}", recipe.id);
            }
            if cook {
                let narrator = build_narrator(cli.narrator, &cli.voice_command);
                let mut lines = input::spawn_stdin_lines();
                interactive::cook(recipe, narrator, cli.language, &mut lines).await?;
            }
        }
        Commands::Favorites { command } => match command {
            FavoritesCommand::List => {
                if favorites.is_empty() {
                    println!("No favorites yet.");
                }
                for recipe in favorites.list() {
                    println!(
                        "{}  {} ({})",
                        recipe.id, recipe.recipe_name, recipe.total_time
                    );
                }
            }
            FavoritesCommand::Show { id } => {
                let recipe = favorites
                    .get(&id)
                    .with_context(|| format!("No favorite with id {}", id))?;
                render::recipe(recipe, true);
            }
            FavoritesCommand::Remove { id } => {
                let removed = favorites
                    .remove(&id)
                    .with_context(|| format!("No favorite with id {}", id))?;
                println!("Removed {}", removed.recipe_name);
            }
        },
        Commands::Cook { id } => {
            let recipe = favorites
                .get(&id)
                .cloned()
                .with_context(|| format!("No favorite with id {}", id))?;
            let narrator = build_narrator(cli.narrator, &cli.voice_command);
            let mut lines = input::spawn_stdin_lines();
            interactive::cook(Arc::new(recipe), narrator, cli.language, &mut lines).await?;
        }
    }

    Ok(())
}
