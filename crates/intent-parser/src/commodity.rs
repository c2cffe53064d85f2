//! Commodities the kiosk can answer for

use crate::{IntentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tradeable good whose market price can be requested.
///
/// Declaration order is match priority: when a transcript names more than one
/// commodity, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commodity {
    /// कांदा
    Onion,
    /// वाटाणा (green peas)
    Pea,
}

impl Commodity {
    /// Every commodity, in match priority order.
    pub const ALL: [Commodity; 2] = [Commodity::Onion, Commodity::Pea];

    /// Marathi name in Devanagari script.
    pub fn native_name(&self) -> &'static str {
        match self {
            Commodity::Onion => "कांदा",
            Commodity::Pea => "वाटाणा",
        }
    }

    /// Transliterated name, also used as the market-report slug.
    pub fn slug(&self) -> &'static str {
        match self {
            Commodity::Onion => "kanda",
            Commodity::Pea => "vatana",
        }
    }

    /// Keywords recognised without any configuration.
    pub fn builtin_keywords(&self) -> &'static [&'static str] {
        match self {
            Commodity::Onion => &["कांदा", "kanda"],
            Commodity::Pea => &["वाटाणा", "vatana"],
        }
    }

    /// Resolve an English, transliterated or native name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "onion" | "kanda" | "कांदा" => Some(Commodity::Onion),
            "pea" | "peas" | "green_peas" | "vatana" | "वाटाणा" => Some(Commodity::Pea),
            _ => None,
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commodity::Onion => f.write_str("onion"),
            Commodity::Pea => f.write_str("pea"),
        }
    }
}

impl FromStr for Commodity {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self> {
        Commodity::from_name(s).ok_or_else(|| IntentError::UnknownCommodity(s.to_string()))
    }
}

/// Classified meaning of one transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// The user asked for this commodity's prices.
    Commodity(Commodity),
    /// No known keyword was heard.
    Unrecognized,
}

impl Intent {
    pub fn commodity(&self) -> Option<Commodity> {
        match self {
            Intent::Commodity(c) => Some(*c),
            Intent::Unrecognized => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Intent::Commodity(_))
    }
}

impl From<Commodity> for Intent {
    fn from(c: Commodity) -> Self {
        Intent::Commodity(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_resolve() {
        assert_eq!(Commodity::from_name("Onion"), Some(Commodity::Onion));
        assert_eq!(Commodity::from_name("kanda"), Some(Commodity::Onion));
        assert_eq!(Commodity::from_name("वाटाणा"), Some(Commodity::Pea));
        assert_eq!(Commodity::from_name(" vatana "), Some(Commodity::Pea));
        assert_eq!(Commodity::from_name("tomato"), None);
    }

    #[test]
    fn test_from_str_reports_unknown() {
        let err = "tomato".parse::<Commodity>().unwrap_err();
        assert!(err.to_string().contains("tomato"));
    }

    #[test]
    fn test_every_commodity_has_native_and_ascii_keyword() {
        for c in Commodity::ALL {
            let kws = c.builtin_keywords();
            assert!(kws.iter().any(|k| !k.is_ascii()), "{c} lacks native keyword");
            assert!(kws.iter().any(|k| k.is_ascii()), "{c} lacks ascii alias");
        }
    }

    #[test]
    fn test_intent_accessors() {
        assert_eq!(Intent::from(Commodity::Pea).commodity(), Some(Commodity::Pea));
        assert!(!Intent::Unrecognized.is_recognized());
    }
}
