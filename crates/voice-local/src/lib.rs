//! voice-local: speech-input and speech-output session traits with a mock backend
//!
//! Engines report progress asynchronously by emitting [`SpeechEvent`]s into an
//! [`EventSink`] supplied by their owner. Both engines are process-wide
//! singletons: at most one recognition session and one utterance may be
//! outstanding at a time.

mod types;
pub use types::{
    select_voice, RecognitionConfig, RecognitionErrorKind, SpeechEvent, UtteranceId,
    UtteranceOptions, Voice,
};

mod error;
pub use error::{Result, VoiceError};

mod traits;
pub use traits::{EventSink, SharedSink, SpeechRecognizer, SpeechSynthesizer};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{
    EventLog, MockOutcome, MockRecognizer, MockRecognizerHandle, MockSynthesizer,
    MockSynthesizerHandle, SpokenUtterance,
};

pub mod plugin;
