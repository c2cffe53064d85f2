//! Intent Parser for spoken price queries
//!
//! This crate maps a lower-cased speech transcript to one of a small closed set
//! of commodity intents by keyword containment, in native script and in
//! transliterated form.

mod commodity;
mod parser;

pub use commodity::{Commodity, Intent};
pub use parser::{normalize, IntentMatcher};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub type Result<T, E = IntentError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("unknown commodity: {0}")]
    UnknownCommodity(String),
    #[error("empty keyword configured for {0}")]
    EmptyKeyword(Commodity),
}

/// Configuration for intent matching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Recognition language tag the keywords are written for
    pub language: String,
    /// Additional aliases per commodity name, appended after the built-in ones
    pub extra_keywords: BTreeMap<String, Vec<String>>,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            language: "mr-IN".to_string(),
            extra_keywords: BTreeMap::new(),
        }
    }
}

/// Initialize the intent parser system
pub fn init() {
    tracing::info!("Initializing Intent Parser system");
}

/// Create a new matcher with default configuration
pub fn create_matcher() -> IntentMatcher {
    IntentMatcher::default()
}

/// Normalize and classify a raw transcript with the built-in keywords.
pub fn classify(text: &str) -> Intent {
    create_matcher().classify(&normalize(text))
}
