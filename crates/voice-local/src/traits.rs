use crate::{RecognitionConfig, Result, SpeechEvent, UtteranceId, UtteranceOptions, Voice};
use std::sync::Arc;

/// Receives engine notifications. Implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SpeechEvent);
}

pub type SharedSink = Arc<dyn EventSink>;

/// A speech-to-text engine producing one transcript per session.
pub trait SpeechRecognizer {
    fn config(&self) -> &RecognitionConfig;

    /// Request a new session. Confirmation arrives later as
    /// [`SpeechEvent::SessionStarted`]; an error here means no session began.
    fn start(&mut self) -> Result<()>;

    /// Request the running session to end. The engine still emits
    /// [`SpeechEvent::SessionEnded`].
    fn stop(&mut self);
}

/// A text-to-speech engine that plays one utterance at a time.
pub trait SpeechSynthesizer {
    /// Voices currently installed.
    fn voices(&self) -> Vec<Voice>;

    /// Begin speaking. Completion arrives as [`SpeechEvent::SpeechComplete`].
    fn speak(&mut self, text: &str, options: &UtteranceOptions) -> Result<UtteranceId>;

    /// Abort the current utterance, if any.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}
