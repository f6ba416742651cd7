//! Translation capability trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::error::TriageError;
use super::language::Language;

/// Result of a translation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Translated text
    pub text: String,
    /// Source language, when the backend reports one
    pub source_lang: Option<Language>,
    /// Target language of the translation
    pub target_lang: Language,
    /// Backend confidence in the translation (0.0 - 1.0)
    pub confidence: f32,
    /// Which backend produced the translation
    pub provenance: String,
}

impl TranslationResult {
    pub fn new(
        text: impl Into<String>,
        target_lang: Language,
        confidence: f32,
        provenance: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: None,
            target_lang,
            confidence: confidence.clamp(0.0, 1.0),
            provenance: provenance.into(),
        }
    }

    pub fn with_source_lang(mut self, source: Language) -> Self {
        self.source_lang = Some(source);
        self
    }
}

/// Trait for translation backends
///
/// The triage layer feature-detects this capability at bootstrap: when no
/// service is wired in, every translate-dependent path degrades to the
/// dependency-free fallback strategy.
#[async_trait]
pub trait TranslationService: Send + Sync + Debug {
    /// Translate a text to the target language
    async fn translate(
        &self,
        text: &str,
        target_lang: Language,
        source_lang: Option<Language>,
        domain_hint: Option<&str>,
    ) -> Result<TranslationResult, TriageError>;

    /// Get the service name
    fn service_name(&self) -> &'static str;
}
