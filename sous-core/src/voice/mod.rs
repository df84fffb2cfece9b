//! Speech capabilities used by the assistant.
//!
//! Narration and speech recognition are injected as traits so the step player
//! and the home screen can run without audio hardware:
//!
//! - [`Narrator`]: speak text, cancelling anything still being spoken
//! - [`Listener`]: capture one spoken phrase and deliver its transcript

mod command;
mod fake;

pub use command::CommandNarrator;
pub use fake::{FakeListener, RecordingNarrator, SpokenLine};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::types::Language;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Speech recognition is not supported")]
    RecognitionUnsupported,

    #[error("Already listening")]
    AlreadyListening,

    #[error("No async runtime available for speech")]
    NoRuntime,

    #[error("Speech engine failed: {0}")]
    Engine(String),
}

/// Text-to-speech capability.
pub trait Narrator: Send + Sync {
    /// Speak `text`, first cancelling any utterance still in progress.
    fn speak(&self, text: &str, language: Language) -> Result<(), VoiceError>;

    /// Stop any in-flight speech. Never fails.
    fn cancel(&self);
}

/// Speech-to-text capability.
///
/// Listening is one-shot: after a phrase is recognized the listener stops on
/// its own and sends the transcript to the channel given to `start_listening`.
pub trait Listener: Send + Sync {
    fn is_supported(&self) -> bool;

    fn is_listening(&self) -> bool;

    fn start_listening(
        &self,
        language: Language,
        transcripts: mpsc::UnboundedSender<String>,
    ) -> Result<(), VoiceError>;

    fn stop_listening(&self);
}

/// Narrator that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&self, _text: &str, _language: Language) -> Result<(), VoiceError> {
        Ok(())
    }

    fn cancel(&self) {}
}

/// Listener for platforms without speech recognition.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedListener;

impl Listener for UnsupportedListener {
    fn is_supported(&self) -> bool {
        false
    }

    fn is_listening(&self) -> bool {
        false
    }

    fn start_listening(
        &self,
        _language: Language,
        _transcripts: mpsc::UnboundedSender<String>,
    ) -> Result<(), VoiceError> {
        Err(VoiceError::RecognitionUnsupported)
    }

    fn stop_listening(&self) {}
}
