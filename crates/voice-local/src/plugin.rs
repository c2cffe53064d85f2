#[cfg(feature = "mock")]
use crate::{MockRecognizer, MockSynthesizer};
use crate::{
    RecognitionConfig, Result, SharedSink, SpeechRecognizer, SpeechSynthesizer, VoiceError,
};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechBackendKind {
    Mock,
    WebSpeech,
    Espeak,
}

pub fn new_recognizer(
    kind: SpeechBackendKind,
    cfg: RecognitionConfig,
    sink: SharedSink,
) -> Result<Box<dyn SpeechRecognizer + Send>> {
    match kind {
        SpeechBackendKind::Mock => {
            #[cfg(feature = "mock")]
            {
                Ok(Box::new(MockRecognizer::new(cfg, sink)))
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = (cfg, sink);
                Err(VoiceError::Unsupported("mock feature not enabled".into()))
            }
        }
        SpeechBackendKind::WebSpeech => {
            let _ = (cfg, sink);
            Err(VoiceError::Unsupported(
                "web speech recognition requires a browser host".into(),
            ))
        }
        SpeechBackendKind::Espeak => {
            let _ = (cfg, sink);
            Err(VoiceError::Unsupported(
                "espeak provides synthesis only".into(),
            ))
        }
    }
}

pub fn new_synthesizer(
    kind: SpeechBackendKind,
    sink: SharedSink,
) -> Result<Box<dyn SpeechSynthesizer + Send>> {
    match kind {
        SpeechBackendKind::Mock => {
            #[cfg(feature = "mock")]
            {
                Ok(Box::new(MockSynthesizer::new(sink)))
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = sink;
                Err(VoiceError::Unsupported("mock feature not enabled".into()))
            }
        }
        SpeechBackendKind::WebSpeech => {
            let _ = sink;
            Err(VoiceError::Unsupported(
                "web speech synthesis requires a browser host".into(),
            ))
        }
        SpeechBackendKind::Espeak => {
            let _ = sink;
            Err(VoiceError::Unsupported("espeak backend not yet integrated".into()))
        }
    }
}
