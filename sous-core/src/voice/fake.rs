//! In-memory speech capabilities for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;

use super::{Listener, Narrator, VoiceError};
use crate::types::Language;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenLine {
    pub text: String,
    pub language: Language,
}

/// Narrator that records every call instead of speaking.
#[derive(Debug, Default)]
pub struct RecordingNarrator {
    spoken: Mutex<Vec<SpokenLine>>,
    cancels: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A narrator whose every `speak` call fails (after being recorded).
    pub fn failing() -> Self {
        let narrator = Self::default();
        narrator.set_failing(true);
        narrator
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn spoken(&self) -> Vec<SpokenLine> {
        self.lock_spoken().clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.lock_spoken().iter().map(|l| l.text.clone()).collect()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    fn lock_spoken(&self) -> std::sync::MutexGuard<'_, Vec<SpokenLine>> {
        self.spoken.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Narrator for RecordingNarrator {
    fn speak(&self, text: &str, language: Language) -> Result<(), VoiceError> {
        self.cancel();
        self.lock_spoken().push(SpokenLine {
            text: text.to_string(),
            language,
        });
        if self.failing.load(Ordering::SeqCst) {
            return Err(VoiceError::Engine("voice unavailable".to_string()));
        }
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Listener that "hears" scripted phrases, one per `start_listening` call.
#[derive(Debug, Default)]
pub struct FakeListener {
    phrases: Mutex<VecDeque<String>>,
    listening: AtomicBool,
}

impl FakeListener {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: Mutex::new(phrases.into_iter().map(Into::into).collect()),
            listening: AtomicBool::new(false),
        }
    }
}

impl Listener for FakeListener {
    fn is_supported(&self) -> bool {
        true
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    fn start_listening(
        &self,
        _language: Language,
        transcripts: mpsc::UnboundedSender<String>,
    ) -> Result<(), VoiceError> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Err(VoiceError::AlreadyListening);
        }

        let phrase = self
            .phrases
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        // One-shot: recognition ends as soon as a phrase is delivered
        self.listening.store(false, Ordering::SeqCst);

        match phrase {
            Some(phrase) => transcripts
                .send(phrase)
                .map_err(|e| VoiceError::Engine(format!("transcript receiver dropped: {}", e))),
            None => Ok(()),
        }
    }

    fn stop_listening(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_narrator_cancels_before_speaking() {
        let narrator = RecordingNarrator::new();
        narrator.speak("one", Language::Hinglish).unwrap();
        narrator.speak("two", Language::Assamese).unwrap();

        assert_eq!(narrator.spoken_texts(), vec!["one", "two"]);
        assert_eq!(narrator.spoken()[1].language, Language::Assamese);
        assert_eq!(narrator.cancel_count(), 2);
    }

    #[test]
    fn test_failing_narrator_still_records() {
        let narrator = RecordingNarrator::failing();
        assert!(narrator.speak("one", Language::Hinglish).is_err());
        assert_eq!(narrator.spoken_texts(), vec!["one"]);
    }

    #[test]
    fn test_fake_listener_delivers_phrases_in_order() {
        let listener = FakeListener::new(["tomatoes", "onion"]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        listener.start_listening(Language::Hinglish, tx.clone()).unwrap();
        listener.start_listening(Language::Hinglish, tx.clone()).unwrap();
        listener.start_listening(Language::Hinglish, tx).unwrap();

        assert_eq!(rx.try_recv().unwrap(), "tomatoes");
        assert_eq!(rx.try_recv().unwrap(), "onion");
        assert!(rx.try_recv().is_err());
        assert!(!listener.is_listening());
    }
}
