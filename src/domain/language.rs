//! Supported languages and language detection
//!
//! The triage layer only ever works with a closed set of language codes.
//! Anything outside this set falls back to the configured default language,
//! which the orchestrator records in its diagnostics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TriageError;

/// Script class of a language, used for strategy dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Latin,
    NonLatin,
}

/// Languages the triage layer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
    Es,
    De,
    It,
    Pt,
    Nl,
    Pl,
    Ru,
    Zh,
    Hi,
    Th,
    Ar,
}

impl Language {
    /// All supported languages, in a stable order
    pub fn all() -> &'static [Language] {
        &[
            Language::En,
            Language::Fr,
            Language::Es,
            Language::De,
            Language::It,
            Language::Pt,
            Language::Nl,
            Language::Pl,
            Language::Ru,
            Language::Zh,
            Language::Hi,
            Language::Th,
            Language::Ar,
        ]
    }

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::De => "de",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Nl => "nl",
            Language::Pl => "pl",
            Language::Ru => "ru",
            Language::Zh => "zh",
            Language::Hi => "hi",
            Language::Th => "th",
            Language::Ar => "ar",
        }
    }

    pub fn script(&self) -> Script {
        match self {
            Language::En
            | Language::Fr
            | Language::Es
            | Language::De
            | Language::It
            | Language::Pt
            | Language::Nl
            | Language::Pl => Script::Latin,
            Language::Ru | Language::Zh | Language::Hi | Language::Th | Language::Ar => {
                Script::NonLatin
            }
        }
    }

    /// Pivot languages carry a curated vocabulary and are scored directly
    pub fn is_pivot(&self) -> bool {
        matches!(self, Language::En | Language::Fr)
    }

    /// Latin-script, non-pivot languages are translated to a pivot before scoring
    pub fn is_translatable(&self) -> bool {
        self.script() == Script::Latin && !self.is_pivot()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        // Accept region-qualified codes like "fr-CA"
        let base = code.split(['-', '_']).next().unwrap_or(&code);

        Language::all()
            .iter()
            .find(|lang| lang.code() == base)
            .copied()
            .ok_or_else(|| TriageError::configuration(format!("Unsupported language code: {s}")))
    }
}

/// Result of language detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDetection {
    pub language: Language,
    /// Detector confidence (0.0 - 1.0)
    pub confidence: f32,
}

impl LanguageDetection {
    pub fn new(language: Language, confidence: f32) -> Self {
        Self {
            language,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Trait for language detection
///
/// Detection is a fast local heuristic, so unlike translation and
/// classification it is not modeled as an awaitable call.
pub trait LanguageDetector: Send + Sync + std::fmt::Debug {
    /// Detect the language of a text, or `None` when undecidable
    fn detect(&self, text: &str) -> Option<LanguageDetection>;

    /// Get the detector name
    fn detector_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Mock language detector for testing
    #[derive(Debug, Default)]
    pub struct MockLanguageDetector {
        detection: Option<LanguageDetection>,
    }

    impl MockLanguageDetector {
        pub fn new() -> Self {
            Self::default()
        }

        /// Always detect the given language
        pub fn with_detection(mut self, language: Language, confidence: f32) -> Self {
            self.detection = Some(LanguageDetection::new(language, confidence));
            self
        }
    }

    impl LanguageDetector for MockLanguageDetector {
        fn detect(&self, _text: &str) -> Option<LanguageDetection> {
            self.detection.clone()
        }

        fn detector_name(&self) -> &'static str {
            "mock"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_codes() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("FR".parse::<Language>().unwrap(), Language::Fr);
        assert_eq!("es ".parse::<Language>().unwrap(), Language::Es);
        assert_eq!("fr-CA".parse::<Language>().unwrap(), Language::Fr);
        assert_eq!("zh_CN".parse::<Language>().unwrap(), Language::Zh);
    }

    #[test]
    fn test_parse_unsupported_code() {
        assert!("xx".parse::<Language>().is_err());
        assert!("".parse::<Language>().is_err());
    }

    #[test]
    fn test_script_classes() {
        assert_eq!(Language::En.script(), Script::Latin);
        assert_eq!(Language::Pl.script(), Script::Latin);
        assert_eq!(Language::Zh.script(), Script::NonLatin);
        assert_eq!(Language::Ar.script(), Script::NonLatin);
    }

    #[test]
    fn test_pivot_and_translatable_sets() {
        assert!(Language::En.is_pivot());
        assert!(Language::Fr.is_pivot());
        assert!(!Language::Es.is_pivot());

        assert!(Language::Es.is_translatable());
        assert!(Language::De.is_translatable());
        assert!(!Language::En.is_translatable());
        // Non-Latin scripts are neither pivot nor translatable
        assert!(!Language::Th.is_translatable());
    }

    #[test]
    fn test_detection_confidence_clamped() {
        let detection = LanguageDetection::new(Language::En, 1.5);
        assert_eq!(detection.confidence, 1.0);
    }
}
