//! Async driver for a [`StepPlayer`].
//!
//! A session owns the one-second ticker and feeds user commands into the
//! player. There is exactly one interval per session; it is reset on every
//! step change, so a new step's countdown starts a full second after the step
//! is entered and no stale timer keeps ticking.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::player::{Advance, StepPlayer, Tick};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What the user asked the cooking screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Next,
    Repeat,
    /// Leave cooking and return to the recipe.
    Back,
    /// Leave cooking and return to the home screen.
    Home,
}

/// Something the UI should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    StepEntered,
    Repeated,
    Tick(u32),
    CountdownElapsed,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Finished,
    Stopped,
    Home,
    /// The command source closed.
    Disconnected,
}

/// Source of cooking commands (a channel, stdin, ...).
///
/// `next_command` must be cancel-safe: the session drops it whenever a tick
/// arrives first.
#[async_trait]
pub trait CommandSource: Send {
    /// `None` once no more commands will arrive.
    async fn next_command(&mut self) -> Option<SessionCommand>;
}

#[async_trait]
impl CommandSource for mpsc::Receiver<SessionCommand> {
    async fn next_command(&mut self) -> Option<SessionCommand> {
        self.recv().await
    }
}

#[async_trait]
impl CommandSource for mpsc::UnboundedReceiver<SessionCommand> {
    async fn next_command(&mut self) -> Option<SessionCommand> {
        self.recv().await
    }
}

/// Run the player until the user finishes, leaves, or the source closes.
///
/// `on_event` is called after every state change, starting with the first
/// step's `StepEntered`.
pub async fn run_session<C, F>(
    player: &mut StepPlayer,
    commands: &mut C,
    mut on_event: F,
) -> SessionEnd
where
    C: CommandSource + ?Sized,
    F: FnMut(&StepPlayer, SessionEvent),
{
    let mut ticker = time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    on_event(player, SessionEvent::StepEntered);

    loop {
        tokio::select! {
            command = commands.next_command() => {
                let Some(command) = command else {
                    player.exit();
                    return SessionEnd::Disconnected;
                };

                match command {
                    SessionCommand::Next => match player.advance() {
                        Advance::Step(_) => {
                            ticker.reset();
                            on_event(player, SessionEvent::StepEntered);
                        }
                        Advance::Completed | Advance::Inactive => return SessionEnd::Finished,
                    },
                    SessionCommand::Repeat => {
                        player.repeat();
                        on_event(player, SessionEvent::Repeated);
                    }
                    SessionCommand::Back => {
                        player.exit();
                        return SessionEnd::Stopped;
                    }
                    SessionCommand::Home => {
                        player.exit();
                        return SessionEnd::Home;
                    }
                }
            }
            _ = ticker.tick(), if player.is_countdown_running() => {
                match player.tick() {
                    Tick::Remaining(secs) => on_event(player, SessionEvent::Tick(secs)),
                    Tick::Elapsed => on_event(player, SessionEvent::CountdownElapsed),
                    Tick::Idle => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Language, Recipe, RecipeStep};
    use crate::voice::RecordingNarrator;
    use std::sync::Arc;

    fn player(steps: Vec<RecipeStep>) -> (StepPlayer, Arc<RecordingNarrator>) {
        let narrator = Arc::new(RecordingNarrator::new());
        let recipe = Arc::new(Recipe::new("Test", "10 minutes", vec![], steps));
        let player = StepPlayer::start(recipe, narrator.clone(), Language::Hinglish).unwrap();
        (player, narrator)
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_ticks_once_per_second() {
        let (mut player, _) = player(vec![
            RecipeStep::new("Simmer", 1, "Wait 1 min"),
            RecipeStep::new("Serve", 0, "No wait"),
        ]);
        let (tx, mut rx) = mpsc::channel(4);

        tokio::spawn(async move {
            time::sleep(Duration::from_secs(61)).await;
            tx.send(SessionCommand::Next).await.unwrap();
            tx.send(SessionCommand::Next).await.unwrap();
        });

        let mut events = Vec::new();
        let end = run_session(&mut player, &mut rx, |_, event| events.push(event)).await;

        assert_eq!(end, SessionEnd::Finished);

        let ticks: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Tick(secs) => Some(*secs),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, (1..60).rev().collect::<Vec<_>>());

        assert_eq!(events.first(), Some(&SessionEvent::StepEntered));
        assert_eq!(
            events.iter().filter(|e| **e == SessionEvent::CountdownElapsed).count(),
            1
        );
        assert_eq!(
            events.iter().filter(|e| **e == SessionEvent::StepEntered).count(),
            2
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_advancing_mid_countdown_discards_old_timer() {
        let (mut player, narrator) = player(vec![
            RecipeStep::new("Boil water", 5, "Wait 5 min"),
            RecipeStep::new("Rest", 1, "Wait 1 min"),
        ]);
        let (tx, mut rx) = mpsc::channel(4);

        tokio::spawn(async move {
            time::sleep(Duration::from_millis(10_500)).await;
            tx.send(SessionCommand::Next).await.unwrap();
            time::sleep(Duration::from_millis(3_200)).await;
            tx.send(SessionCommand::Back).await.unwrap();
        });

        let mut remaining_at_end = 0;
        let end = run_session(&mut player, &mut rx, |p, _| {
            remaining_at_end = p.seconds_remaining()
        })
        .await;

        assert_eq!(end, SessionEnd::Stopped);
        assert_eq!(narrator.spoken_texts(), vec!["Boil water", "Rest"]);
        // Three whole seconds on the second step's 60 second countdown
        assert_eq!(remaining_at_end, 57);
        assert!(!player.is_countdown_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_does_not_reset_countdown() {
        let (mut player, narrator) = player(vec![RecipeStep::new("Knead", 2, "Wait")]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            time::sleep(Duration::from_millis(5_500)).await;
            tx.send(SessionCommand::Repeat).unwrap();
            time::sleep(Duration::from_secs(2)).await;
            tx.send(SessionCommand::Home).unwrap();
        });

        let mut last = 0;
        let end = run_session(&mut player, &mut rx, |p, _| last = p.seconds_remaining()).await;

        assert_eq!(end, SessionEnd::Home);
        assert_eq!(narrator.spoken_texts(), vec!["Knead", "Knead"]);
        assert_eq!(last, 113);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_source_disconnects() {
        let (mut player, _) = player(vec![RecipeStep::new("Stir", 0, "")]);
        let (tx, mut rx) = mpsc::channel::<SessionCommand>(1);
        drop(tx);

        let end = run_session(&mut player, &mut rx, |_, _| {}).await;
        assert_eq!(end, SessionEnd::Disconnected);
    }
}
