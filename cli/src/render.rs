//! Terminal rendering of the assistant's screens.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use sous_core::{format_countdown, AppState, Favorites, Language, Recipe, SessionEvent, StepPlayer};

pub const RECOGNITION_UNSUPPORTED_NOTICE: &str =
    "Speech recognition is not supported in this terminal.";

/// Set while the cursor sits at the end of a `\r`-redrawn countdown line.
static COUNTDOWN_LINE_OPEN: AtomicBool = AtomicBool::new(false);

/// Move past an open countdown line so the next output starts on its own line.
///
/// Returns true if a line was open.
pub fn end_countdown_line() -> bool {
    let was_open = COUNTDOWN_LINE_OPEN.swap(false, Ordering::SeqCst);
    if was_open {
        println!();
    }
    was_open
}

pub fn home(app: &AppState, favorites_count: usize, can_listen: bool) {
    println!();
    println!("AI Recipe Assistant");
    println!("===================");
    let languages: Vec<String> = Language::ALL
        .iter()
        .map(|lang| {
            if *lang == app.language() {
                format!("[{}]", lang)
            } else {
                lang.to_string()
            }
        })
        .collect();
    println!("Language: {}", languages.join("  "));
    println!("Favorites: {}", favorites_count);
    if app.is_retry_pending() {
        println!("Last attempt: {}", app.ingredients());
        println!("Press enter to try again, or type new ingredients to start over.");
    } else if !app.ingredients().is_empty() {
        println!("Ingredients so far: {}", app.ingredients());
    }
    if !can_listen {
        println!("{}", RECOGNITION_UNSUPPORTED_NOTICE);
    }
    if let Some(error) = app.error() {
        println!();
        println!("! {}", error);
    }
    println!();
    println!("Type your ingredients (e.g. chicken, onion, tomatoes, ginger) and press enter.");
    println!("Commands: :lang <hinglish|assamese>  :listen  :clear  :favorites  :quit");
}

pub fn recipe(recipe: &Recipe, is_favorite: bool) {
    println!();
    let marker = if is_favorite { " ♥" } else { "" };
    println!("{}{}", recipe.recipe_name, marker);
    println!("{}", "=".repeat(recipe.recipe_name.chars().count() + marker.chars().count()));
    println!("Total time: {}", recipe.total_time);
    println!("Id: {}", recipe.id);
    println!();
    println!("Ingredients");
    for ingredient in &recipe.ingredients {
        println!("  • {}", ingredient);
    }
    println!();
    println!("Steps");
    for (i, step) in recipe.steps.iter().enumerate() {
        if step.duration > 0 {
            println!("  {}. {} ({} min)", i + 1, step.action, step.duration);
        } else {
            println!("  {}. {}", i + 1, step.action);
        }
    }
}

pub fn recipe_commands() {
    println!();
    println!("Commands: [enter]/cook  fav  back  quit");
}

pub fn favorites(favorites: &Favorites) {
    println!();
    println!("Favorite Recipes");
    println!("================");
    if favorites.is_empty() {
        println!("No favorites yet. Save a recipe with 'fav' on the recipe screen.");
    }
    for (i, recipe) in favorites.list().iter().enumerate() {
        println!(
            "  {}. {} ({}, {} steps)",
            i + 1,
            recipe.recipe_name,
            recipe.total_time,
            recipe.step_count()
        );
    }
    println!();
    println!("Commands: <number> open  rm <number>  back  quit");
}

/// Renders cooking progress, redrawing the countdown in place.
#[derive(Default)]
pub struct CookingView;

impl CookingView {
    pub fn render(&mut self, player: &StepPlayer, event: SessionEvent) {
        match event {
            SessionEvent::StepEntered => {
                end_countdown_line();
                let step = player.current_step();
                println!();
                println!("{}: {}", player.progress_label(), player.recipe().recipe_name);
                println!("  {}", step.action);
                if player.is_countdown_running() {
                    countdown(player.seconds_remaining(), &step.alert);
                } else {
                    println!("  {}", step.alert);
                    prompt(player);
                }
            }
            SessionEvent::Repeated => {
                end_countdown_line();
                println!("  (repeating) {}", player.current_step().action);
                if player.is_countdown_running() {
                    countdown(player.seconds_remaining(), &player.current_step().alert);
                }
            }
            SessionEvent::Tick(remaining) => {
                countdown(remaining, &player.current_step().alert);
            }
            SessionEvent::CountdownElapsed => {
                end_countdown_line();
                println!("  ⏰ Time's up! {}", player.current_step().alert);
                prompt(player);
            }
        }
    }

    /// End the countdown line before anything else prints.
    pub fn finish(&mut self) {
        end_countdown_line();
    }
}

fn countdown(remaining: u32, alert: &str) {
    print!("\r  ⏱ {}  {}   ", format_countdown(remaining), alert);
    let _ = io::stdout().flush();
    COUNTDOWN_LINE_OPEN.store(true, Ordering::SeqCst);
}

fn prompt(player: &StepPlayer) {
    let next = if player.is_last_step() { "finish" } else { "next step" };
    println!("  [enter] {}, r repeat, b back, h home", next);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_line_is_ended_once() {
        countdown(90, "Wait 2 minutes");
        assert!(end_countdown_line());
        assert!(!end_countdown_line());
    }
}
