//! Narration through an external text-to-speech program (espeak-ng, say, ...).

use std::sync::Mutex;
use std::time::Duration;

use tokio::process::Command;
use tokio::task::JoinHandle;

use super::{Narrator, VoiceError};
use crate::types::Language;

/// Delay between cancelling an utterance and starting the next one.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Speaks by running a TTS program with the text as its last argument.
///
/// At most one utterance runs at a time: `speak` aborts the previous task,
/// which kills its child process.
#[derive(Debug)]
pub struct CommandNarrator {
    program: String,
    voice_flag: Option<String>,
    debounce: Duration,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl CommandNarrator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            voice_flag: None,
            debounce: DEFAULT_DEBOUNCE,
            current: Mutex::new(None),
        }
    }

    /// espeak-ng, selecting the voice from the language.
    pub fn espeak() -> Self {
        Self::new("espeak-ng").with_voice_flag("-v")
    }

    /// Pass the language's voice name after this flag (e.g. `-v hi`).
    pub fn with_voice_flag(mut self, flag: impl Into<String>) -> Self {
        self.voice_flag = Some(flag.into());
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn build_command(&self, text: &str, language: Language) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(flag) = &self.voice_flag {
            // TTS engines name voices by the primary language subtag
            let voice = language
                .voice_hint()
                .split('-')
                .next()
                .unwrap_or_default();
            cmd.arg(flag).arg(voice);
        }
        cmd.arg(text).kill_on_drop(true);
        cmd
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Narrator for CommandNarrator {
    fn speak(&self, text: &str, language: Language) -> Result<(), VoiceError> {
        self.cancel();

        if text.trim().is_empty() {
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| VoiceError::NoRuntime)?;
        let mut cmd = self.build_command(text, language);
        let program = self.program.clone();
        let debounce = self.debounce;

        let task = runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            match cmd.status().await {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    tracing::warn!(program = %program, %status, "TTS program exited with failure");
                }
                Err(e) => {
                    tracing::warn!(program = %program, error = %e, "Failed to run TTS program");
                }
            }
        });

        *self.lock_current() = Some(task);
        Ok(())
    }

    fn cancel(&self) {
        if let Some(task) = self.lock_current().take() {
            task.abort();
        }
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        self.cancel();
    }
}
