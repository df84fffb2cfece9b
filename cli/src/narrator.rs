//! Narrator selection for the terminal.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use sous_core::voice::{CommandNarrator, SilentNarrator};
use sous_core::{Language, Narrator, VoiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NarratorKind {
    /// Run a text-to-speech program
    Command,
    /// Print what would be spoken
    Print,
    /// No narration
    Silent,
}

/// Writes narration to the terminal instead of speaking it.
#[derive(Debug, Default)]
pub struct PrintNarrator;

impl Narrator for PrintNarrator {
    fn speak(&self, text: &str, language: Language) -> Result<(), VoiceError> {
        // Narration runs before the view redraws, possibly mid-countdown
        crate::render::end_countdown_line();
        println!("  🔊 [{}] {}", language.voice_hint(), text);
        Ok(())
    }

    fn cancel(&self) {}
}

pub fn build_narrator(kind: NarratorKind, voice_command: &str) -> Arc<dyn Narrator> {
    match kind {
        NarratorKind::Command => {
            let narrator = CommandNarrator::new(voice_command);
            let is_espeak = Path::new(voice_command)
                .file_name()
                .map(|name| name.to_string_lossy().starts_with("espeak"))
                .unwrap_or(false);
            if is_espeak {
                Arc::new(narrator.with_voice_flag("-v"))
            } else {
                Arc::new(narrator)
            }
        }
        NarratorKind::Print => Arc::new(PrintNarrator),
        NarratorKind::Silent => Arc::new(SilentNarrator),
    }
}
