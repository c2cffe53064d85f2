//! Keyword matcher turning transcripts into intents

use crate::{Commodity, Intent, IntentConfig, IntentError, Result};
use tracing::debug;

/// Lower-case and trim a raw transcript before matching.
pub fn normalize(transcript: &str) -> String {
    transcript.trim().to_lowercase()
}

/// Main intent matcher
///
/// Holds one keyword list per commodity, in [`Commodity::ALL`] order. A
/// transcript matches a commodity when it contains any of its keywords as a
/// substring; the first commodity with a hit wins.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    keywords: Vec<(Commodity, Vec<String>)>,
}

impl IntentMatcher {
    /// Build a matcher from the built-in keywords plus configured aliases.
    pub fn new(config: &IntentConfig) -> Result<Self> {
        let mut keywords = builtin_table();

        for (name, aliases) in &config.extra_keywords {
            let commodity = name.parse::<Commodity>()?;
            let Some((_, list)) = keywords.iter_mut().find(|(c, _)| *c == commodity) else {
                return Err(IntentError::UnknownCommodity(name.clone()));
            };
            for alias in aliases {
                let alias = normalize(alias);
                if alias.is_empty() {
                    return Err(IntentError::EmptyKeyword(commodity));
                }
                if !list.contains(&alias) {
                    list.push(alias);
                }
            }
        }

        Ok(Self { keywords })
    }

    /// Classify an already lower-cased transcript.
    pub fn classify(&self, transcript: &str) -> Intent {
        for (commodity, list) in &self.keywords {
            if let Some(kw) = list.iter().find(|kw| transcript.contains(kw.as_str())) {
                debug!(%commodity, keyword = %kw, "transcript matched");
                return Intent::Commodity(*commodity);
            }
        }
        debug!(transcript, "no keyword matched");
        Intent::Unrecognized
    }

    /// Keywords currently recognised for a commodity.
    pub fn keywords(&self, commodity: Commodity) -> &[String] {
        self.keywords
            .iter()
            .find(|(c, _)| *c == commodity)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self {
            keywords: builtin_table(),
        }
    }
}

fn builtin_table() -> Vec<(Commodity, Vec<String>)> {
    Commodity::ALL
        .iter()
        .map(|c| {
            let builtin = c.builtin_keywords().iter().map(|k| k.to_string()).collect();
            (*c, builtin)
        })
        .collect()
}
