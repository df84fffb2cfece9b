//! Step player for the cooking screen.
//!
//! The player walks through a recipe's steps one at a time. Entering a step
//! narrates its action and, when the step has a wait, arms a countdown of
//! `duration * 60` seconds. The countdown is advanced by [`StepPlayer::tick`],
//! which the caller drives once per second (see [`crate::session`]).
//!
//! Reaching zero never advances on its own; the user moves on explicitly.

use std::sync::Arc;

use thiserror::Error;

use crate::types::{Language, Recipe, RecipeStep};
use crate::voice::Narrator;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("Recipe has no steps")]
    NoSteps,
}

/// Countdown state of the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// The step has no wait.
    Idle,
    Running { remaining_secs: u32 },
    /// The wait is over; the step stays on screen with its alert.
    Elapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Active,
    /// `advance` was called on the last step.
    Finished,
    Exited,
}

/// Outcome of [`StepPlayer::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the step with this index.
    Step(usize),
    /// The last step was done; the player has terminated.
    Completed,
    /// The player had already terminated.
    Inactive,
}

/// Outcome of [`StepPlayer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No countdown is running.
    Idle,
    Remaining(u32),
    /// The countdown reached zero on this tick.
    Elapsed,
}

pub struct StepPlayer {
    recipe: Arc<Recipe>,
    narrator: Arc<dyn Narrator>,
    language: Language,
    index: usize,
    countdown: Countdown,
    state: PlayerState,
}

impl StepPlayer {
    /// Start playing `recipe` from its first step.
    pub fn start(
        recipe: Arc<Recipe>,
        narrator: Arc<dyn Narrator>,
        language: Language,
    ) -> Result<Self, PlayerError> {
        if recipe.steps.is_empty() {
            return Err(PlayerError::NoSteps);
        }

        let mut player = Self {
            recipe,
            narrator,
            language,
            index: 0,
            countdown: Countdown::Idle,
            state: PlayerState::Active,
        };
        player.enter_step();
        Ok(player)
    }

    /// Move to the next step, or finish when on the last one.
    pub fn advance(&mut self) -> Advance {
        if self.state != PlayerState::Active {
            return Advance::Inactive;
        }

        if self.is_last_step() {
            self.stop(PlayerState::Finished);
            tracing::debug!(recipe_id = %self.recipe.id, "Cooking finished");
            return Advance::Completed;
        }

        self.index += 1;
        self.enter_step();
        Advance::Step(self.index)
    }

    /// Narrate the current step again. Index and countdown are untouched.
    pub fn repeat(&mut self) {
        if self.state == PlayerState::Active {
            self.narrate();
        }
    }

    /// Stop narration and countdown. The player accepts no further transitions.
    pub fn exit(&mut self) {
        if self.state == PlayerState::Active {
            self.stop(PlayerState::Exited);
        }
    }

    /// One second has passed.
    pub fn tick(&mut self) -> Tick {
        if self.state != PlayerState::Active {
            return Tick::Idle;
        }

        match self.countdown {
            Countdown::Running { remaining_secs } => {
                let remaining_secs = remaining_secs.saturating_sub(1);
                if remaining_secs == 0 {
                    self.countdown = Countdown::Elapsed;
                    tracing::debug!(step = self.index, "Step countdown elapsed");
                    Tick::Elapsed
                } else {
                    self.countdown = Countdown::Running { remaining_secs };
                    Tick::Remaining(remaining_secs)
                }
            }
            Countdown::Idle | Countdown::Elapsed => Tick::Idle,
        }
    }

    pub fn recipe(&self) -> &Arc<Recipe> {
        &self.recipe
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_step(&self) -> &RecipeStep {
        &self.recipe.steps[self.index]
    }

    pub fn step_count(&self) -> usize {
        self.recipe.steps.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.index + 1 == self.recipe.steps.len()
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    pub fn is_countdown_running(&self) -> bool {
        matches!(self.countdown, Countdown::Running { .. })
    }

    pub fn seconds_remaining(&self) -> u32 {
        match self.countdown {
            Countdown::Running { remaining_secs } => remaining_secs,
            Countdown::Idle | Countdown::Elapsed => 0,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// "Step 2 of 5"
    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.index + 1, self.recipe.steps.len())
    }

    fn enter_step(&mut self) {
        let wait_secs = self.current_step().wait_secs();
        self.countdown = if wait_secs > 0 {
            Countdown::Running {
                remaining_secs: wait_secs,
            }
        } else {
            Countdown::Idle
        };

        tracing::debug!(
            recipe_id = %self.recipe.id,
            step = self.index,
            wait_secs,
            "Entered step"
        );

        self.narrate();
    }

    /// Narration problems never affect sequencing.
    fn narrate(&self) {
        let action = &self.current_step().action;
        self.narrator.cancel();
        if let Err(e) = self.narrator.speak(action, self.language) {
            tracing::warn!(step = self.index, error = %e, "Narration failed");
        }
    }

    fn stop(&mut self, state: PlayerState) {
        self.narrator.cancel();
        if self.is_countdown_running() {
            self.countdown = Countdown::Idle;
        }
        self.state = state;
    }
}

/// Format seconds as `MM:SS`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::RecordingNarrator;

    fn pasta() -> Arc<Recipe> {
        Arc::new(Recipe::new(
            "Simple Pasta",
            "20 minutes",
            vec!["pasta".to_string()],
            vec![
                RecipeStep::new("Boil water", 5, "Wait 5 min"),
                RecipeStep::new("Add pasta", 0, "No wait"),
            ],
        ))
    }

    fn recipe_with_durations(durations: &[u32]) -> Arc<Recipe> {
        let steps = durations
            .iter()
            .enumerate()
            .map(|(i, d)| RecipeStep::new(format!("Step {}", i), *d, "alert"))
            .collect();
        Arc::new(Recipe::new("Test", "1 hour", vec![], steps))
    }

    fn start(recipe: Arc<Recipe>) -> (StepPlayer, Arc<RecordingNarrator>) {
        let narrator = Arc::new(RecordingNarrator::new());
        let player = StepPlayer::start(recipe, narrator.clone(), Language::Hinglish).unwrap();
        (player, narrator)
    }

    #[test]
    fn test_pasta_scenario() {
        let (mut player, narrator) = start(pasta());

        assert_eq!(narrator.spoken_texts(), vec!["Boil water"]);
        assert_eq!(player.index(), 0);
        assert_eq!(player.seconds_remaining(), 300);

        // A few seconds in, well before the countdown ends
        for _ in 0..10 {
            player.tick();
        }
        assert_eq!(player.seconds_remaining(), 290);

        assert_eq!(player.advance(), Advance::Step(1));
        assert_eq!(narrator.spoken_texts(), vec!["Boil water", "Add pasta"]);
        assert_eq!(player.countdown(), Countdown::Idle);
        assert_eq!(player.tick(), Tick::Idle);

        assert_eq!(player.advance(), Advance::Completed);
        assert_eq!(player.state(), PlayerState::Finished);
    }

    #[test]
    fn test_advance_walks_every_step_then_completes() {
        for n in 1..=6 {
            let (mut player, _) = start(recipe_with_durations(&vec![0; n]));
            for i in 1..n {
                assert_eq!(player.advance(), Advance::Step(i));
                assert_eq!(player.index(), i);
            }
            assert!(player.is_last_step());
            assert_eq!(player.advance(), Advance::Completed);
            assert_eq!(player.index(), n - 1);
            assert_eq!(player.advance(), Advance::Inactive);
        }
    }

    #[test]
    fn test_repeat_keeps_index_and_countdown() {
        let (mut player, narrator) = start(recipe_with_durations(&[2, 0]));
        player.tick();
        player.tick();
        assert_eq!(player.seconds_remaining(), 118);

        player.repeat();
        player.repeat();

        assert_eq!(player.index(), 0);
        assert_eq!(player.seconds_remaining(), 118);
        assert_eq!(narrator.spoken_texts(), vec!["Step 0", "Step 0", "Step 0"]);

        assert_eq!(player.tick(), Tick::Remaining(117));
    }

    #[test]
    fn test_zero_duration_never_counts_down() {
        let (mut player, _) = start(recipe_with_durations(&[0]));
        assert_eq!(player.countdown(), Countdown::Idle);
        for _ in 0..5 {
            assert_eq!(player.tick(), Tick::Idle);
        }
        assert_eq!(player.seconds_remaining(), 0);
    }

    #[test]
    fn test_countdown_stops_at_zero() {
        let (mut player, _) = start(recipe_with_durations(&[1, 0]));
        assert_eq!(player.seconds_remaining(), 60);

        for expected in (1..60).rev() {
            assert_eq!(player.tick(), Tick::Remaining(expected));
        }
        assert_eq!(player.tick(), Tick::Elapsed);
        assert_eq!(player.countdown(), Countdown::Elapsed);

        // Stays put: no negative values, no auto-advance
        assert_eq!(player.tick(), Tick::Idle);
        assert_eq!(player.seconds_remaining(), 0);
        assert_eq!(player.index(), 0);
    }

    #[test]
    fn test_advancing_restarts_countdown_for_next_step() {
        let (mut player, _) = start(recipe_with_durations(&[1, 3]));
        player.tick();
        assert_eq!(player.advance(), Advance::Step(1));
        assert_eq!(player.seconds_remaining(), 180);
    }

    #[test]
    fn test_narration_failure_does_not_block() {
        let narrator = Arc::new(RecordingNarrator::failing());
        let mut player =
            StepPlayer::start(pasta(), narrator.clone(), Language::Assamese).unwrap();

        assert_eq!(player.seconds_remaining(), 300);
        assert_eq!(player.tick(), Tick::Remaining(299));
        assert_eq!(player.advance(), Advance::Step(1));
        assert_eq!(narrator.spoken_texts(), vec!["Boil water", "Add pasta"]);
        assert_eq!(narrator.spoken()[0].language, Language::Assamese);
    }

    #[test]
    fn test_exit_cancels_everything() {
        let (mut player, narrator) = start(pasta());
        let cancels = narrator.cancel_count();

        player.exit();

        assert_eq!(player.state(), PlayerState::Exited);
        assert!(narrator.cancel_count() > cancels);
        assert!(!player.is_countdown_running());
        assert_eq!(player.tick(), Tick::Idle);
        assert_eq!(player.advance(), Advance::Inactive);

        player.repeat();
        assert_eq!(narrator.spoken_texts(), vec!["Boil water"]);
    }

    #[test]
    fn test_empty_recipe_is_rejected() {
        let narrator = Arc::new(RecordingNarrator::new());
        let result = StepPlayer::start(recipe_with_durations(&[]), narrator, Language::Hinglish);
        assert_eq!(result.err(), Some(PlayerError::NoSteps));
    }

    #[test]
    fn test_progress_label() {
        let (mut player, _) = start(pasta());
        assert_eq!(player.progress_label(), "Step 1 of 2");
        player.advance();
        assert_eq!(player.progress_label(), "Step 2 of 2");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(300), "05:00");
        assert_eq!(format_countdown(59), "00:59");
        assert_eq!(format_countdown(3725), "62:05");
    }
}
