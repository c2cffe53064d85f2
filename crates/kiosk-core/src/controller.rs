//! Interaction controller
//!
//! The controller owns the kiosk's only mutable state and is driven entirely
//! by [`KioskEvent`]s: user toggles arrive from the front end, engine
//! notifications arrive through an [`EventSink`] that forwards into the same
//! queue. Events are processed one at a time, so no locking is needed.
//!
//! Recording state changes only on confirmed `SessionStarted` /
//! `SessionEnded` notifications, never on the toggle itself.

use crate::composer::compose;
use crate::date::{DateSource, SystemDate};
use crate::messages;
use intent_parser::{normalize, Intent, IntentMatcher};
use price_catalog::PriceCatalog;
use std::sync::Arc;
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use voice_local::{
    select_voice, EventSink, RecognitionErrorKind, SharedSink, SpeechEvent, SpeechRecognizer,
    SpeechSynthesizer, UtteranceId, UtteranceOptions, Voice,
};

/// Whether a speech-input session is confirmed running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Listening,
}

/// Coarse interaction phase shown by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A speech engine is missing; the toggle is disabled for good.
    Disabled,
    Idle,
    Listening,
    Responding,
}

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum KioskEvent {
    /// The user pressed the microphone button.
    Toggle,
    Speech(SpeechEvent),
    Shutdown,
}

/// What the controller reports to an attached observer as it works.
#[derive(Debug, Clone, PartialEq)]
pub enum KioskUpdate {
    /// A new status text is shown.
    Status(String),
    /// The interaction phase after a step. Repeats are possible, e.g. a
    /// failed start reports `Idle` again.
    Phase(Phase),
    /// This text was handed to the synthesizer.
    Speaking(String),
}

/// Forwards engine notifications into the controller's queue.
pub struct ChannelSink {
    tx: UnboundedSender<KioskEvent>,
}

impl ChannelSink {
    pub fn shared(tx: UnboundedSender<KioskEvent>) -> SharedSink {
        Arc::new(Self { tx })
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: SpeechEvent) {
        if self.tx.send(KioskEvent::Speech(event)).is_err() {
            debug!("controller queue closed, dropping speech event");
        }
    }
}

pub struct KioskController {
    recognizer: Option<Box<dyn SpeechRecognizer + Send>>,
    synthesizer: Option<Box<dyn SpeechSynthesizer + Send>>,
    catalog: Box<dyn PriceCatalog + Send + Sync>,
    matcher: IntentMatcher,
    dates: Box<dyn DateSource + Send + Sync>,
    utterance: UtteranceOptions,
    selected_voice: Option<Voice>,
    recording: RecordingState,
    phase: Phase,
    start_pending: bool,
    session: Option<Uuid>,
    pending_transcript: Option<String>,
    current_utterance: Option<UtteranceId>,
    last_response: Option<String>,
    status: String,
    history: Vec<String>,
    observer: Option<UnboundedSender<KioskUpdate>>,
}

impl KioskController {
    /// Assemble a controller. A missing engine disables the kiosk.
    pub fn new(
        recognizer: Option<Box<dyn SpeechRecognizer + Send>>,
        synthesizer: Option<Box<dyn SpeechSynthesizer + Send>>,
        catalog: Box<dyn PriceCatalog + Send + Sync>,
    ) -> Self {
        let supported = recognizer.is_some() && synthesizer.is_some();
        let mut controller = Self {
            recognizer,
            synthesizer,
            catalog,
            matcher: IntentMatcher::default(),
            dates: Box::new(SystemDate),
            utterance: UtteranceOptions::default(),
            selected_voice: None,
            recording: RecordingState::Idle,
            phase: Phase::Idle,
            start_pending: false,
            session: None,
            pending_transcript: None,
            current_utterance: None,
            last_response: None,
            status: String::new(),
            history: Vec::new(),
            observer: None,
        };

        if supported {
            controller.set_status(messages::WELCOME);
            controller.load_voices();
        } else {
            warn!(
                recognizer = controller.recognizer.is_some(),
                synthesizer = controller.synthesizer.is_some(),
                "speech capability missing, kiosk disabled"
            );
            controller.phase = Phase::Disabled;
            controller.set_status(messages::UNSUPPORTED);
        }
        controller
    }

    pub fn with_matcher(mut self, matcher: IntentMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_date_source(mut self, dates: impl DateSource + Send + Sync + 'static) -> Self {
        self.dates = Box::new(dates);
        self
    }

    /// Report status, phase and speech updates to `tx` from now on.
    pub fn with_observer(mut self, tx: UnboundedSender<KioskUpdate>) -> Self {
        self.observer = Some(tx);
        self
    }

    pub fn with_utterance_options(mut self, options: UtteranceOptions) -> Self {
        self.utterance = options;
        self.load_voices();
        self
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Every status text shown so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn recording_state(&self) -> RecordingState {
        self.recording
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.phase != Phase::Disabled
    }

    pub fn selected_voice(&self) -> Option<&Voice> {
        self.selected_voice.as_ref()
    }

    /// Text most recently handed to the synthesizer.
    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    pub fn catalog(&self) -> &(dyn PriceCatalog + Send + Sync) {
        self.catalog.as_ref()
    }

    /// Process one event. Returns `false` once the controller should stop.
    pub fn handle(&mut self, event: KioskEvent) -> bool {
        match event {
            KioskEvent::Toggle => self.toggle(),
            KioskEvent::Speech(ev) => self.on_speech_event(ev),
            KioskEvent::Shutdown => {
                info!("controller shutting down");
                if let Some(synth) = self.synthesizer.as_mut() {
                    synth.cancel();
                }
                return false;
            }
        }
        true
    }

    /// Process every event already queued without waiting for more.
    /// Returns `false` if a shutdown was processed or the queue is closed.
    pub fn process_pending(&mut self, rx: &mut UnboundedReceiver<KioskEvent>) -> bool {
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    if !self.handle(event) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    /// Drive the controller until the queue closes or a shutdown arrives.
    pub async fn run(&mut self, mut rx: UnboundedReceiver<KioskEvent>) {
        info!("kiosk controller running");
        while let Some(event) = rx.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        info!("kiosk controller stopped");
    }

    /// Blocking twin of [`run`](Self::run) for a dedicated thread, so slow
    /// catalog lookups never stall an async runtime. Must not be called from
    /// within an async context.
    pub fn run_blocking(&mut self, mut rx: UnboundedReceiver<KioskEvent>) {
        info!("kiosk controller running on a blocking thread");
        while let Some(event) = rx.blocking_recv() {
            if !self.handle(event) {
                break;
            }
        }
        info!("kiosk controller stopped");
    }

    /// Speak `text`, cancelling whatever is currently playing.
    pub fn say(&mut self, text: String) {
        let Some(synth) = self.synthesizer.as_mut() else {
            warn!("no synthesizer, cannot speak");
            if self.phase != Phase::Disabled {
                self.set_phase(Phase::Idle);
            }
            return;
        };

        if synth.is_active() {
            debug!(previous = ?self.current_utterance, "cancelling active utterance");
            synth.cancel();
        }
        self.current_utterance = None;

        let mut options = self.utterance.clone();
        if let Some(voice) = &self.selected_voice {
            options.voice = Some(voice.name.clone());
        }

        match synth.speak(&text, &options) {
            Ok(id) => {
                info!(%id, voice = ?options.voice, "speaking response");
                self.current_utterance = Some(id);
                self.set_phase(Phase::Responding);
                self.notify(KioskUpdate::Speaking(text.clone()));
                self.last_response = Some(text);
            }
            Err(e) => {
                error!("speech output failed: {}", e);
                self.set_status(messages::SPEAK_FAILED);
                self.set_phase(Phase::Idle);
            }
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
        debug!(status = %self.status, "status updated");
        self.history.push(self.status.clone());
        self.notify(KioskUpdate::Status(self.status.clone()));
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.notify(KioskUpdate::Phase(phase));
    }

    fn notify(&mut self, update: KioskUpdate) {
        let Some(tx) = &self.observer else {
            return;
        };
        if tx.send(update).is_err() {
            debug!("observer gone, detaching");
            self.observer = None;
        }
    }

    fn toggle(&mut self) {
        if self.phase == Phase::Disabled {
            warn!("toggle ignored, kiosk disabled");
            return;
        }
        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };

        if self.recording == RecordingState::Listening || self.start_pending {
            info!(session = ?self.session, "stop requested");
            recognizer.stop();
            return;
        }

        let language = recognizer.config().language.clone();
        if self.phase == Phase::Responding {
            if let Some(synth) = self.synthesizer.as_mut() {
                synth.cancel();
            }
            self.current_utterance = None;
            self.set_phase(Phase::Idle);
        }

        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };
        match recognizer.start() {
            Ok(()) => {
                self.start_pending = true;
                debug!(%language, "start requested");
            }
            Err(e) => {
                warn!("error starting recognition: {}", e);
                self.set_status(messages::START_FAILED);
                self.set_phase(Phase::Idle);
            }
        }
    }

    fn on_speech_event(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::SessionStarted => {
                let session = Uuid::new_v4();
                info!(%session, "recognition session started");
                self.session = Some(session);
                self.start_pending = false;
                self.recording = RecordingState::Listening;
                self.pending_transcript = None;
                self.set_phase(Phase::Listening);
                self.set_status(messages::LISTENING);
            }
            SpeechEvent::Result { transcript } => {
                let transcript = normalize(&transcript);
                info!(session = ?self.session, %transcript, "transcript received");
                self.set_status(messages::heard(&transcript));
                self.pending_transcript = Some(transcript);
            }
            SpeechEvent::Error(kind) => {
                error!(session = ?self.session, "speech recognition error: {}", kind);
                self.pending_transcript = None;
                self.set_status(messages::recognition_error(&kind));
            }
            SpeechEvent::SessionEnded => {
                info!(session = ?self.session, "recognition session ended");
                self.session = None;
                self.start_pending = false;
                self.recording = RecordingState::Idle;
                match self.pending_transcript.take() {
                    Some(transcript) => self.respond_to(&transcript),
                    None if self.phase == Phase::Listening => self.set_phase(Phase::Idle),
                    None => {}
                }
            }
            SpeechEvent::SpeechComplete(id) => {
                if self.current_utterance == Some(id) {
                    debug!(%id, "utterance complete");
                    self.current_utterance = None;
                    self.set_status(messages::READY_AGAIN);
                    if self.phase == Phase::Responding {
                        self.set_phase(Phase::Idle);
                    }
                } else {
                    debug!(%id, "ignoring completion of superseded utterance");
                }
            }
            SpeechEvent::VoicesChanged => self.load_voices(),
        }
    }

    fn respond_to(&mut self, transcript: &str) {
        let text = match self.matcher.classify(transcript) {
            Intent::Unrecognized => {
                info!(%transcript, "no commodity recognised");
                messages::UNRECOGNIZED_PROMPT.to_string()
            }
            Intent::Commodity(commodity) => match self.catalog.lookup(commodity) {
                Ok(records) => {
                    info!(
                        %commodity,
                        catalog = self.catalog.name(),
                        records = records.len(),
                        "composing price report"
                    );
                    compose(commodity, self.dates.today(), &records)
                }
                Err(e) => {
                    warn!("price lookup failed: {}", e);
                    messages::data_unavailable(commodity)
                }
            },
        };
        self.say(text);
    }

    fn load_voices(&mut self) {
        let Some(synth) = self.synthesizer.as_ref() else {
            return;
        };
        let voices = synth.voices();
        self.selected_voice = select_voice(&voices, &self.utterance.language);
        match &self.selected_voice {
            Some(v) => info!("{} voice found: {}", self.utterance.language, v.name),
            None => info!(
                available = voices.len(),
                "{} voice not found, using engine default", self.utterance.language
            ),
        }
    }
}

/// Human-readable label for a recognition error, for logs and the CLI.
pub fn describe_error(kind: &RecognitionErrorKind) -> String {
    format!("{} ({})", messages::recognition_error(kind), kind.code())
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::composer::lead_in;
    use crate::date::{format_marathi_date, FixedDate};
    use intent_parser::Commodity;
    use price_catalog::{CatalogError, PriceRecord, StaticCatalog};
    use time::macros::date;
    use tokio::sync::mpsc;
    use voice_local::{
        MockOutcome, MockRecognizer, MockRecognizerHandle, MockSynthesizer,
        MockSynthesizerHandle, RecognitionConfig,
    };

    struct Harness {
        controller: KioskController,
        tx: UnboundedSender<KioskEvent>,
        rx: UnboundedReceiver<KioskEvent>,
        rec: MockRecognizerHandle,
        tts: MockSynthesizerHandle,
    }

    impl Harness {
        fn new(outcomes: Vec<MockOutcome>) -> Self {
            Self::with_catalog(outcomes, Box::new(StaticCatalog::builtin()))
        }

        fn with_catalog(
            outcomes: Vec<MockOutcome>,
            catalog: Box<dyn PriceCatalog + Send + Sync>,
        ) -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            let sink = ChannelSink::shared(tx.clone());
            let recognizer = MockRecognizer::new(RecognitionConfig::default(), sink.clone())
                .with_script(outcomes);
            let synthesizer = MockSynthesizer::new(sink);
            let rec = recognizer.handle();
            let tts = synthesizer.handle();
            let controller = KioskController::new(
                Some(Box::new(recognizer)),
                Some(Box::new(synthesizer)),
                catalog,
            )
            .with_date_source(FixedDate(date!(2026 - 10 - 16)));
            Self {
                controller,
                tx,
                rx,
                rec,
                tts,
            }
        }

        fn observed(mut self) -> (Self, UnboundedReceiver<KioskUpdate>) {
            let (tx, rx) = mpsc::unbounded_channel();
            self.controller = self.controller.with_observer(tx);
            (self, rx)
        }

        fn send(&mut self, event: KioskEvent) {
            self.tx.send(event).unwrap();
            self.controller.process_pending(&mut self.rx);
        }

        fn toggle(&mut self) {
            self.send(KioskEvent::Toggle);
        }

        fn finish_speech(&mut self) {
            self.tts.finish();
            self.controller.process_pending(&mut self.rx);
        }
    }

    struct DownCatalog;

    impl PriceCatalog for DownCatalog {
        fn name(&self) -> &str {
            "down"
        }

        fn lookup(&self, commodity: Commodity) -> price_catalog::Result<Vec<PriceRecord>> {
            Err(CatalogError::unavailable(commodity, "network unreachable"))
        }
    }

    #[test]
    fn test_onion_query_end_to_end() {
        let mut h = Harness::new(vec![MockOutcome::Transcript("आज कांदा भाव काय आहे".into())]);
        assert_eq!(h.controller.status(), messages::WELCOME);

        h.toggle();
        assert_eq!(h.controller.recording_state(), RecordingState::Idle);
        assert_eq!(h.controller.phase(), Phase::Responding);
        assert_eq!(
            h.controller.history()[1..],
            [
                messages::LISTENING.to_string(),
                messages::heard("आज कांदा भाव काय आहे"),
            ]
        );

        let spoken = h.tts.spoken();
        assert_eq!(spoken.len(), 1);
        let text = &spoken[0].text;
        assert!(text.contains(&format_marathi_date(date!(2026 - 10 - 16))));
        assert!(text.contains(lead_in(Commodity::Onion)));
        let a = text.find("संगमनेर, कमीत कमी 2200 रुपये, जास्तीत जास्त 2800 रुपये").unwrap();
        let b = text.find("नाशिक, कमीत कमी 2400 रुपये, जास्तीत जास्त 3000 रुपये").unwrap();
        let c = text.find("सिन्नर, कमीत कमी 2300 रुपये, जास्तीत जास्त 2950 रुपये").unwrap();
        assert!(a < b && b < c);

        h.finish_speech();
        assert_eq!(h.controller.phase(), Phase::Idle);
        assert_eq!(h.controller.status(), messages::READY_AGAIN);
    }

    #[test]
    fn test_pea_query_uses_pea_lead_in() {
        let mut h = Harness::new(vec![MockOutcome::Transcript("वाटाणा".into())]);
        h.toggle();
        let text = h.controller.last_response().unwrap().to_string();
        assert!(text.contains(lead_in(Commodity::Pea)));
        assert!(!text.contains(lead_in(Commodity::Onion)));
        assert!(text.contains("पुणे"));
    }

    #[test]
    fn test_unrecognized_speaks_prompt() {
        let mut h = Harness::new(vec![MockOutcome::Transcript("हॅलो".into())]);
        h.toggle();
        assert_eq!(
            h.controller.last_response(),
            Some(messages::UNRECOGNIZED_PROMPT)
        );
        assert_eq!(h.controller.phase(), Phase::Responding);
        h.finish_speech();
        assert_eq!(h.controller.status(), messages::READY_AGAIN);
    }

    #[test]
    fn test_transcript_is_normalized() {
        let mut h = Harness::new(vec![MockOutcome::Transcript("  KANDA Bhav ".into())]);
        h.toggle();
        assert!(h.controller.history().contains(&messages::heard("kanda bhav")));
        assert!(h
            .controller
            .last_response()
            .unwrap()
            .contains(lead_in(Commodity::Onion)));
    }

    #[test]
    fn test_permission_denied_returns_to_idle() {
        let mut h = Harness::new(vec![MockOutcome::Error(RecognitionErrorKind::NotAllowed)]);
        h.toggle();
        assert_eq!(h.controller.status(), messages::PERMISSION_DENIED);
        assert_eq!(h.controller.recording_state(), RecordingState::Idle);
        assert_eq!(h.controller.phase(), Phase::Idle);
        assert!(h.tts.spoken().is_empty());
    }

    #[test]
    fn test_each_error_kind_has_its_status() {
        for (code, expected) in [
            ("language-not-supported", messages::LANGUAGE_UNSUPPORTED.to_string()),
            ("no-speech", messages::NO_SPEECH.to_string()),
            ("audio-capture", "एक त्रुटी आली: audio-capture".to_string()),
        ] {
            let kind = RecognitionErrorKind::from_code(code);
            let mut h = Harness::new(vec![MockOutcome::Error(kind)]);
            h.toggle();
            assert_eq!(h.controller.status(), expected);
            assert_eq!(h.controller.recording_state(), RecordingState::Idle);
        }
    }

    #[test]
    fn test_speak_while_active_cancels_previous() {
        let mut h = Harness::new(vec![]);
        h.controller.say("पहिला संदेश".to_string());
        assert!(h.tts.is_active());

        h.controller.say("दुसरा संदेश".to_string());
        let spoken = h.tts.spoken();
        assert_eq!(spoken.len(), 2);
        assert_eq!(h.tts.cancelled(), vec![spoken[0].id]);

        // The cancelled utterance's completion must not reset the status.
        h.controller.process_pending(&mut h.rx);
        assert_eq!(h.controller.phase(), Phase::Responding);

        h.finish_speech();
        assert_eq!(h.tts.completed_texts(), vec!["दुसरा संदेश".to_string()]);
        assert_eq!(h.controller.status(), messages::READY_AGAIN);
    }

    #[test]
    fn test_toggle_while_listening_requests_stop() {
        let mut h = Harness::new(vec![MockOutcome::Hang]);
        h.toggle();
        assert_eq!(h.controller.recording_state(), RecordingState::Listening);
        assert_eq!(h.controller.status(), messages::LISTENING);

        h.toggle();
        assert_eq!(h.rec.starts(), 1);
        assert_eq!(h.rec.stops(), 1);
        assert_eq!(h.controller.recording_state(), RecordingState::Idle);
        assert!(h.tts.spoken().is_empty());
    }

    #[test]
    fn test_toggle_before_start_confirmed_routes_to_stop() {
        let mut h = Harness::new(vec![MockOutcome::Hang]);
        // Two toggles queued before the controller sees SessionStarted.
        h.tx.send(KioskEvent::Toggle).unwrap();
        h.tx.send(KioskEvent::Toggle).unwrap();
        h.controller.process_pending(&mut h.rx);

        assert_eq!(h.rec.starts(), 1);
        assert_eq!(h.rec.stops(), 1);
        assert_eq!(h.controller.recording_state(), RecordingState::Idle);
        assert!(!h.controller.history().contains(&messages::START_FAILED.to_string()));
    }

    #[test]
    fn test_start_failure_is_recoverable() {
        let mut h = Harness::new(vec![
            MockOutcome::RefuseStart,
            MockOutcome::Transcript("vatana".into()),
        ]);
        h.toggle();
        assert_eq!(h.controller.status(), messages::START_FAILED);
        assert_eq!(h.controller.recording_state(), RecordingState::Idle);

        h.toggle();
        assert!(h
            .controller
            .last_response()
            .unwrap()
            .contains(lead_in(Commodity::Pea)));
    }

    #[test]
    fn test_never_listening_after_session_end() {
        let mut h = Harness::new(vec![
            MockOutcome::Hang,
            MockOutcome::Transcript("कांदा".into()),
            MockOutcome::Hang,
            MockOutcome::Error(RecognitionErrorKind::NoSpeech),
        ]);
        for _ in 0..8 {
            h.toggle();
            if !h.rec.is_active() {
                assert_eq!(h.controller.recording_state(), RecordingState::Idle);
            }
        }
        assert_eq!(h.controller.recording_state(), RecordingState::Idle);
    }

    #[test]
    fn test_toggle_during_response_cancels_speech() {
        let mut h = Harness::new(vec![
            MockOutcome::Transcript("कांदा".into()),
            MockOutcome::Hang,
        ]);
        h.toggle();
        assert!(h.tts.is_active());

        h.toggle();
        assert!(!h.tts.is_active());
        assert_eq!(h.tts.cancelled().len(), 1);
        assert_eq!(h.controller.phase(), Phase::Listening);
    }

    #[test]
    fn test_catalog_failure_is_spoken() {
        let mut h = Harness::with_catalog(
            vec![MockOutcome::Transcript("कांदा".into())],
            Box::new(DownCatalog),
        );
        h.toggle();
        assert_eq!(
            h.controller.last_response(),
            Some(messages::data_unavailable(Commodity::Onion).as_str())
        );
    }

    #[test]
    fn test_marathi_voice_selected_and_used() {
        let mut h = Harness::new(vec![MockOutcome::Transcript("कांदा".into())]);
        assert_eq!(
            h.controller.selected_voice().map(|v| v.name.as_str()),
            Some("mock-marathi")
        );
        h.toggle();
        let spoken = h.tts.spoken();
        assert_eq!(spoken[0].options.voice.as_deref(), Some("mock-marathi"));
        assert_eq!(spoken[0].options.language, "mr-IN");
        assert_eq!(spoken[0].options.rate, 0.9);
    }

    #[test]
    fn test_voices_changed_reselects() {
        let mut h = Harness::new(vec![MockOutcome::Transcript("कांदा".into())]);
        h.tts.set_voices(vec![Voice {
            name: "system".to_string(),
            language: "en-GB".to_string(),
            default: true,
        }]);
        h.controller.process_pending(&mut h.rx);
        assert!(h.controller.selected_voice().is_none());

        h.toggle();
        let spoken = h.tts.spoken();
        assert_eq!(spoken[0].options.voice, None);
        assert_eq!(spoken[0].options.language, "mr-IN");
    }

    #[test]
    fn test_missing_engine_disables_kiosk() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::shared(tx.clone());
        let recognizer = MockRecognizer::new(RecognitionConfig::default(), sink);
        let rec = recognizer.handle();
        let mut controller = KioskController::new(
            Some(Box::new(recognizer)),
            None,
            Box::new(StaticCatalog::builtin()),
        );

        assert!(!controller.is_enabled());
        assert_eq!(controller.status(), messages::UNSUPPORTED);

        tx.send(KioskEvent::Toggle).unwrap();
        controller.process_pending(&mut rx);
        assert_eq!(rec.starts(), 0);
        assert_eq!(controller.history(), [messages::UNSUPPORTED.to_string()]);
    }

    #[tokio::test]
    async fn test_run_loop_until_shutdown() {
        let Harness {
            mut controller,
            tx,
            rx,
            tts,
            ..
        } = Harness::new(vec![MockOutcome::Transcript("वाटाणा भाव".into())]);

        tx.send(KioskEvent::Toggle).unwrap();
        let stopper = async {
            tokio::task::yield_now().await;
            tx.send(KioskEvent::Shutdown).unwrap();
        };
        tokio::join!(controller.run(rx), stopper);

        assert_eq!(tts.spoken().len(), 1);
        assert_eq!(tts.cancelled().len(), 1);
        assert!(!tts.is_active());
    }

    #[test]
    fn test_describe_error_includes_code() {
        assert_eq!(
            describe_error(&RecognitionErrorKind::NoSpeech),
            format!("{} (no-speech)", messages::NO_SPEECH)
        );
    }

    fn drain(rx: &mut UnboundedReceiver<KioskUpdate>) -> Vec<KioskUpdate> {
        let mut out = Vec::new();
        while let Ok(update) = rx.try_recv() {
            out.push(update);
        }
        out
    }

    #[test]
    fn test_observer_sees_full_cycle() {
        let (mut h, mut updates) =
            Harness::new(vec![MockOutcome::Transcript("कांदा".into())]).observed();
        h.toggle();
        let answer = h.controller.last_response().unwrap().to_string();
        assert_eq!(
            drain(&mut updates),
            vec![
                KioskUpdate::Phase(Phase::Listening),
                KioskUpdate::Status(messages::LISTENING.to_string()),
                KioskUpdate::Status(messages::heard("कांदा")),
                KioskUpdate::Phase(Phase::Responding),
                KioskUpdate::Speaking(answer),
            ]
        );

        h.finish_speech();
        assert_eq!(
            drain(&mut updates),
            vec![
                KioskUpdate::Status(messages::READY_AGAIN.to_string()),
                KioskUpdate::Phase(Phase::Idle),
            ]
        );
    }

    #[test]
    fn test_observer_sees_idle_after_failed_start() {
        let (mut h, mut updates) = Harness::new(vec![MockOutcome::RefuseStart]).observed();
        h.toggle();
        assert_eq!(
            drain(&mut updates),
            vec![
                KioskUpdate::Status(messages::START_FAILED.to_string()),
                KioskUpdate::Phase(Phase::Idle),
            ]
        );
    }

    #[test]
    fn test_blocking_loop_on_own_thread() {
        let (h, mut updates) =
            Harness::new(vec![MockOutcome::Transcript("वाटाणा".into())]).observed();
        let Harness {
            mut controller,
            tx,
            rx,
            tts,
            ..
        } = h;
        let worker = std::thread::spawn(move || {
            controller.run_blocking(rx);
            controller
        });

        tx.send(KioskEvent::Toggle).unwrap();
        let answer = loop {
            if let KioskUpdate::Speaking(text) = updates.blocking_recv().unwrap() {
                break text;
            }
        };
        assert!(answer.contains(lead_in(Commodity::Pea)));

        tts.finish();
        while updates.blocking_recv().unwrap() != KioskUpdate::Phase(Phase::Idle) {}

        tx.send(KioskEvent::Shutdown).unwrap();
        let controller = worker.join().unwrap();
        assert_eq!(controller.status(), messages::READY_AGAIN);
        assert_eq!(tts.completed_texts(), vec![answer]);
    }
}
