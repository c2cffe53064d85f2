use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub language: String,
    /// Deliver partial transcripts while the user is still speaking.
    pub interim_results: bool,
    pub max_alternatives: u32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "mr-IN".to_string(),
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtteranceOptions {
    pub language: String,
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
    /// Name of the voice to use; `None` leaves the choice to the engine.
    pub voice: Option<String>,
}

impl Default for UtteranceOptions {
    fn default() -> Self {
        Self {
            language: "mr-IN".to_string(),
            pitch: 1.0,
            rate: 0.9,
            volume: 1.0,
            voice: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub default: bool,
}

/// Pick the first voice whose language tag equals `language`.
pub fn select_voice(voices: &[Voice], language: &str) -> Option<Voice> {
    voices.iter().find(|v| v.language == language).cloned()
}

/// Why a recognition session failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognitionErrorKind {
    /// Microphone permission was refused.
    NotAllowed,
    LanguageNotSupported,
    /// The session ended without hearing any speech.
    NoSpeech,
    /// Any other engine error, with its raw code.
    Other(String),
}

impl RecognitionErrorKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" | "service-not-allowed" => RecognitionErrorKind::NotAllowed,
            "language-not-supported" => RecognitionErrorKind::LanguageNotSupported,
            "no-speech" => RecognitionErrorKind::NoSpeech,
            other => RecognitionErrorKind::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            RecognitionErrorKind::NotAllowed => "not-allowed",
            RecognitionErrorKind::LanguageNotSupported => "language-not-supported",
            RecognitionErrorKind::NoSpeech => "no-speech",
            RecognitionErrorKind::Other(code) => code,
        }
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identifies one utterance handed to a synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtteranceId(pub Uuid);

impl UtteranceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UtteranceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Asynchronous notifications from the speech engines.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    /// The recognizer confirmed a session is running.
    SessionStarted,
    /// Best transcript of the session.
    Result { transcript: String },
    Error(RecognitionErrorKind),
    /// The recognition session is over; always the last event of a session.
    SessionEnded,
    /// An utterance finished playing or was cancelled.
    SpeechComplete(UtteranceId),
    /// The synthesizer's voice list changed.
    VoicesChanged,
}
