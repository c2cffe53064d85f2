//! kiosk-core: the voice price kiosk's decision logic
//!
//! This crate ties the pieces together:
//! - response composition from catalog records and a Marathi calendar date
//! - user-facing status texts and error mapping
//! - the event-driven interaction controller
//! - kiosk configuration and assembly from that configuration

pub mod composer;
pub mod config;
pub mod controller;
pub mod date;
pub mod messages;

mod error;
pub use error::{KioskError, Result};

pub use composer::compose;
pub use config::KioskConfig;
pub use controller::{
    ChannelSink, KioskController, KioskEvent, KioskUpdate, Phase, RecordingState,
};
pub use date::{format_marathi_date, DateSource, FixedDate, SystemDate};

use anyhow::Context;
use intent_parser::IntentMatcher;
use price_catalog::{load_catalog_file, PriceCatalog, StaticCatalog};
use tracing::{info, warn};
use voice_local::plugin::{new_recognizer, new_synthesizer};
use voice_local::{SharedSink, SpeechRecognizer, SpeechSynthesizer};

/// Initialize the kiosk and the crates it drives
pub fn init() {
    tracing::info!("Initializing Kiosk Core system");
    intent_parser::init();
    price_catalog::init();
}

/// Pick the price source named by the configuration.
pub fn build_catalog(config: &KioskConfig) -> anyhow::Result<Box<dyn PriceCatalog + Send + Sync>> {
    #[cfg(feature = "http")]
    {
        if let Some(remote) = &config.remote_catalog {
            info!(base_url = %remote.base_url, "using remote price catalog");
            return Ok(Box::new(price_catalog::HttpCatalog::new(remote.clone())));
        }
    }

    if let Some(path) = &config.catalog_file {
        let catalog = load_catalog_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?;
        info!("using price catalog from {}", path.display());
        return Ok(Box::new(catalog));
    }

    Ok(Box::new(StaticCatalog::builtin()))
}

/// Assemble a controller whose engines come from the configured backend and
/// report into `sink`.
///
/// An engine that cannot be created leaves the controller disabled rather
/// than failing; bad keyword, catalog or date configuration is an error.
pub fn build_controller(config: &KioskConfig, sink: SharedSink) -> anyhow::Result<KioskController> {
    info!(backend = ?config.backend, "creating speech engines");
    let recognizer = new_recognizer(config.backend, config.recognition.clone(), sink.clone())
        .map_err(|e| warn!("speech input unavailable: {}", e))
        .ok();
    let synthesizer = new_synthesizer(config.backend, sink)
        .map_err(|e| warn!("speech output unavailable: {}", e))
        .ok();
    assemble_controller(config, recognizer, synthesizer)
}

/// Assemble a controller around engines the caller already built.
///
/// The recognizer must listen in the language the intent keywords are
/// written for.
pub fn assemble_controller(
    config: &KioskConfig,
    recognizer: Option<Box<dyn SpeechRecognizer + Send>>,
    synthesizer: Option<Box<dyn SpeechSynthesizer + Send>>,
) -> anyhow::Result<KioskController> {
    if let Some(rec) = &recognizer {
        let listening = &rec.config().language;
        if *listening != config.intent.language {
            return Err(KioskError::Config(format!(
                "keywords are written for {} but recognition listens for {}",
                config.intent.language, listening
            ))
            .into());
        }
    }
    let matcher = IntentMatcher::new(&config.intent).map_err(KioskError::from)?;
    let catalog = build_catalog(config)?;

    let controller = KioskController::new(recognizer, synthesizer, catalog)
        .with_matcher(matcher)
        .with_utterance_options(config.utterance.clone());

    Ok(match config.fixed_date()? {
        Some(date) => controller.with_date_source(FixedDate(date)),
        None => controller,
    })
}
