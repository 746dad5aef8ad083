//! Source locales

use serde::{Deserialize, Serialize};

/// Language a source directory was exported for.
///
/// `Zh` is the canonical language every table is written in; the other
/// locales only contribute translations through their `lau.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Zh,
    En,
    Ko,
}

impl Default for Locale {
    fn default() -> Self {
        Self::En
    }
}

impl Locale {
    /// Field suffix used in output records (`nameEN`, `descriptionKO`)
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Zh => "CN",
            Self::En => "EN",
            Self::Ko => "KO",
        }
    }

    /// Whether this locale carries translations at all
    pub fn is_translated(self) -> bool {
        !matches!(self, Self::Zh)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zh => write!(f, "zh"),
            Self::En => write!(f, "en"),
            Self::Ko => write!(f, "ko"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zh" | "cn" => Ok(Self::Zh),
            "en" => Ok(Self::En),
            "ko" | "kr" | "kor" => Ok(Self::Ko),
            _ => Err(format!("unknown locale '{}' (expected zh, en or ko)", s)),
        }
    }
}
