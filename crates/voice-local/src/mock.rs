use crate::{
    EventSink, RecognitionConfig, RecognitionErrorKind, Result, SharedSink, SpeechEvent,
    SpeechRecognizer, SpeechSynthesizer, UtteranceId, UtteranceOptions, Voice, VoiceError,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned mock is still inspectable.
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Sink that keeps every event, for tests and the demo CLI.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<SpeechEvent>>,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn drain(&self) -> Vec<SpeechEvent> {
        std::mem::take(&mut *lock(&self.events))
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: SpeechEvent) {
        lock(&self.events).push(event);
    }
}

/// What the mock recognizer does with its next session.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    /// Hear this transcript, then end.
    Transcript(String),
    /// Fail with this error, then end.
    Error(RecognitionErrorKind),
    /// Start, then wait for `stop()`.
    Hang,
    /// Refuse to start at all.
    RefuseStart,
}

#[derive(Default)]
struct RecognizerState {
    script: VecDeque<MockOutcome>,
    active: bool,
    starts: usize,
    stops: usize,
}

/// Scripted recognizer. Each `start()` consumes one [`MockOutcome`]; an empty
/// script behaves like a user who says nothing.
pub struct MockRecognizer {
    cfg: RecognitionConfig,
    sink: SharedSink,
    state: Arc<Mutex<RecognizerState>>,
}

/// Shared view into a [`MockRecognizer`] after it has been boxed.
#[derive(Clone)]
pub struct MockRecognizerHandle {
    state: Arc<Mutex<RecognizerState>>,
}

impl MockRecognizer {
    pub fn new(config: RecognitionConfig, sink: SharedSink) -> Self {
        Self {
            cfg: config,
            sink,
            state: Arc::new(Mutex::new(RecognizerState::default())),
        }
    }

    pub fn with_script(self, outcomes: impl IntoIterator<Item = MockOutcome>) -> Self {
        lock(&self.state).script.extend(outcomes);
        self
    }

    pub fn handle(&self) -> MockRecognizerHandle {
        MockRecognizerHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl MockRecognizerHandle {
    pub fn push(&self, outcome: MockOutcome) {
        lock(&self.state).script.push_back(outcome);
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).active
    }

    pub fn starts(&self) -> usize {
        lock(&self.state).starts
    }

    pub fn stops(&self) -> usize {
        lock(&self.state).stops
    }
}

impl SpeechRecognizer for MockRecognizer {
    fn config(&self) -> &RecognitionConfig {
        &self.cfg
    }

    fn start(&mut self) -> Result<()> {
        let mut st = lock(&self.state);
        if st.active {
            return Err(VoiceError::AlreadyActive("recognition"));
        }
        let outcome = st
            .script
            .pop_front()
            .unwrap_or(MockOutcome::Error(RecognitionErrorKind::NoSpeech));
        if outcome == MockOutcome::RefuseStart {
            return Err(VoiceError::Unavailable("mock microphone busy".to_string()));
        }

        st.starts += 1;
        st.active = true;
        self.sink.emit(SpeechEvent::SessionStarted);
        match outcome {
            MockOutcome::Transcript(transcript) => {
                self.sink.emit(SpeechEvent::Result { transcript });
            }
            MockOutcome::Error(kind) => {
                self.sink.emit(SpeechEvent::Error(kind));
            }
            MockOutcome::Hang | MockOutcome::RefuseStart => return Ok(()),
        }
        st.active = false;
        self.sink.emit(SpeechEvent::SessionEnded);
        Ok(())
    }

    fn stop(&mut self) {
        let mut st = lock(&self.state);
        st.stops += 1;
        if st.active {
            st.active = false;
            self.sink.emit(SpeechEvent::SessionEnded);
        }
    }
}

/// One `speak()` call as seen by the mock synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SpokenUtterance {
    pub id: UtteranceId,
    pub text: String,
    pub options: UtteranceOptions,
}

#[derive(Default)]
struct SynthesizerState {
    voices: Vec<Voice>,
    current: Option<UtteranceId>,
    spoken: Vec<SpokenUtterance>,
    cancelled: Vec<UtteranceId>,
    completed: Vec<UtteranceId>,
}

/// Synthesizer that records utterances instead of playing them. Utterances
/// stay active until [`MockSynthesizerHandle::finish`] or `cancel()`.
pub struct MockSynthesizer {
    sink: SharedSink,
    state: Arc<Mutex<SynthesizerState>>,
}

#[derive(Clone)]
pub struct MockSynthesizerHandle {
    sink: SharedSink,
    state: Arc<Mutex<SynthesizerState>>,
}

impl MockSynthesizer {
    pub fn new(sink: SharedSink) -> Self {
        let state = SynthesizerState {
            voices: vec![
                Voice {
                    name: "mock-english".to_string(),
                    language: "en-US".to_string(),
                    default: true,
                },
                Voice {
                    name: "mock-marathi".to_string(),
                    language: "mr-IN".to_string(),
                    default: false,
                },
            ],
            ..SynthesizerState::default()
        };
        Self {
            sink,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn handle(&self) -> MockSynthesizerHandle {
        MockSynthesizerHandle {
            sink: Arc::clone(&self.sink),
            state: Arc::clone(&self.state),
        }
    }
}

impl MockSynthesizerHandle {
    /// Finish the current utterance as if playback ended.
    pub fn finish(&self) -> Option<UtteranceId> {
        let id = {
            let mut st = lock(&self.state);
            let id = st.current.take()?;
            st.completed.push(id);
            id
        };
        self.sink.emit(SpeechEvent::SpeechComplete(id));
        Some(id)
    }

    /// Replace the installed voices and announce the change.
    pub fn set_voices(&self, voices: Vec<Voice>) {
        lock(&self.state).voices = voices;
        self.sink.emit(SpeechEvent::VoicesChanged);
    }

    pub fn voices(&self) -> Vec<Voice> {
        lock(&self.state).voices.clone()
    }

    pub fn spoken(&self) -> Vec<SpokenUtterance> {
        lock(&self.state).spoken.clone()
    }

    pub fn cancelled(&self) -> Vec<UtteranceId> {
        lock(&self.state).cancelled.clone()
    }

    /// Texts whose playback ran to the end.
    pub fn completed_texts(&self) -> Vec<String> {
        let st = lock(&self.state);
        st.completed
            .iter()
            .filter_map(|id| st.spoken.iter().find(|u| u.id == *id))
            .map(|u| u.text.clone())
            .collect()
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).current.is_some()
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn voices(&self) -> Vec<Voice> {
        lock(&self.state).voices.clone()
    }

    fn speak(&mut self, text: &str, options: &UtteranceOptions) -> Result<UtteranceId> {
        let mut st = lock(&self.state);
        if st.current.is_some() {
            return Err(VoiceError::AlreadyActive("speech"));
        }
        let id = UtteranceId::new();
        st.spoken.push(SpokenUtterance {
            id,
            text: text.to_string(),
            options: options.clone(),
        });
        st.current = Some(id);
        tracing::debug!(%id, chars = text.chars().count(), "mock speaking");
        Ok(id)
    }

    fn cancel(&mut self) {
        let cancelled = {
            let mut st = lock(&self.state);
            let id = st.current.take();
            if let Some(id) = id {
                st.cancelled.push(id);
            }
            id
        };
        if let Some(id) = cancelled {
            self.sink.emit(SpeechEvent::SpeechComplete(id));
        }
    }

    fn is_active(&self) -> bool {
        lock(&self.state).current.is_some()
    }
}
