use crate::{KioskError, Result};
use anyhow::Context;
use intent_parser::IntentConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::Date;
use voice_local::plugin::SpeechBackendKind;
use voice_local::{RecognitionConfig, UtteranceOptions};

/// Everything needed to assemble a kiosk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub backend: SpeechBackendKind,
    pub intent: IntentConfig,
    pub recognition: RecognitionConfig,
    pub utterance: UtteranceOptions,
    /// YAML catalog replacing the built-in prices.
    pub catalog_file: Option<PathBuf>,
    /// Remote market report service; takes precedence over `catalog_file`.
    #[cfg(feature = "http")]
    pub remote_catalog: Option<price_catalog::HttpCatalogConfig>,
    /// Pin "today" to this `YYYY-MM-DD` date instead of the system clock.
    pub date: Option<String>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            backend: SpeechBackendKind::Mock,
            intent: IntentConfig::default(),
            recognition: RecognitionConfig::default(),
            utterance: UtteranceOptions::default(),
            catalog_file: None,
            #[cfg(feature = "http")]
            remote_catalog: None,
            date: None,
        }
    }
}

impl KioskConfig {
    /// Load from a YAML or JSON file, chosen by extension. A missing file
    /// yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&raw)
                .with_context(|| format!("parsing json: {}", path.display()))?,
            _ => serde_yaml::from_str(&raw)
                .with_context(|| format!("parsing yaml: {}", path.display()))?,
        };
        Ok(config)
    }

    /// The pinned date, if one is configured.
    pub fn fixed_date(&self) -> Result<Option<Date>> {
        self.date.as_deref().map(parse_date).transpose()
    }
}

pub fn parse_date(s: &str) -> Result<Date> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map_err(|e| KioskError::Config(format!("bad date '{s}': {e}")))
}
