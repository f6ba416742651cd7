//! Triage tuning configuration
//!
//! Every constant here is an empirically tuned value carried over from the
//! production heuristics. They are exposed as named, overridable fields so
//! product review can adjust them without a code change; the defaults are
//! the values in use today.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Language, RelevanceLevel, Script, Specificity};

/// Configuration for domain-relevance scoring and query-type routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Language used when detection fails or a code is unsupported
    #[serde(default = "default_language")]
    pub default_language: Language,
    /// Per-language threshold multipliers; applied multiplicatively
    #[serde(default = "default_language_adjustments")]
    pub language_adjustments: HashMap<Language, f32>,
    /// Weight per 1-based vocabulary tier; the last entry covers deeper tiers
    #[serde(default = "default_tier_weights")]
    pub tier_weights: Vec<f32>,
    /// Minimum effective token count, so very short queries are not penalized
    #[serde(default = "default_smoothing_floor")]
    pub smoothing_floor: usize,
    /// Score at or above which relevance is High
    #[serde(default = "default_band_high")]
    pub band_high: f32,
    /// Score at or above which relevance is Medium
    #[serde(default = "default_band_medium")]
    pub band_medium: f32,
    /// Additive bonus for technical-context queries
    #[serde(default = "default_technical_boost")]
    pub technical_boost: f32,
    /// Additive bonus scale applied to the upstream intent confidence
    #[serde(default = "default_intent_boost_scale")]
    pub intent_boost_scale: f32,
    /// Ceiling on the combined booster bonus
    #[serde(default = "default_boost_ceiling")]
    pub boost_ceiling: f32,
    /// Base threshold for very-high-specificity queries
    #[serde(default = "default_threshold_very_high")]
    pub threshold_very_high: f32,
    /// Base threshold for high-specificity (or clearly relevant) queries
    #[serde(default = "default_threshold_high")]
    pub threshold_high: f32,
    /// Base threshold for ordinary queries
    #[serde(default = "default_threshold_standard")]
    pub threshold_standard: f32,
    /// Base threshold for low-specificity queries
    #[serde(default = "default_threshold_strict")]
    pub threshold_strict: f32,
    /// Translation-confidence penalty factor k in
    /// `threshold * (1 - k * (1 - confidence))`
    #[serde(default = "default_translation_penalty_factor")]
    pub translation_penalty_factor: f32,
    /// Score increment per universal-pattern category (non-Latin scripts)
    #[serde(default = "default_universal_pattern_increment")]
    pub universal_pattern_increment: f32,
    /// Acceptance bar for universal-pattern scores
    #[serde(default = "default_universal_pattern_bar")]
    pub universal_pattern_bar: f32,
    /// Score increment per matched category in the terminal fallback
    #[serde(default = "default_fallback_increment")]
    pub fallback_increment: f32,
    /// Fallback base threshold for Latin-script languages
    #[serde(default = "default_fallback_base_latin")]
    pub fallback_base_latin: f32,
    /// Fallback base threshold for non-Latin scripts
    #[serde(default = "default_fallback_base_non_latin")]
    pub fallback_base_non_latin: f32,
    /// Knowledge-score bonus when an interrogative cue is present
    #[serde(default = "default_interrogative_bonus")]
    pub interrogative_bonus: u32,
    /// Knowledge-score bonus when a health/treatment cue is present
    #[serde(default = "default_health_bonus")]
    pub health_bonus: u32,
    /// Keyword evidence required before skipping the LLM fallback
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: u32,
    /// Margin one keyword score must exceed the other by to win outright
    #[serde(default = "default_routing_margin")]
    pub routing_margin: u32,
    /// Custom classification prompt template
    /// Available variables: ${query}
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier_prompt: Option<String>,
}

fn default_language() -> Language {
    Language::En
}

fn default_language_adjustments() -> HashMap<Language, f32> {
    HashMap::from([
        (Language::En, 1.0),
        (Language::Fr, 1.0),
        (Language::Es, 0.95),
        (Language::De, 1.05),
        (Language::It, 0.95),
        (Language::Pt, 0.95),
        (Language::Nl, 1.05),
        (Language::Pl, 1.1),
        (Language::Ru, 1.1),
        (Language::Zh, 1.2),
        (Language::Hi, 1.15),
        (Language::Th, 1.2),
        (Language::Ar, 1.15),
    ])
}

fn default_tier_weights() -> Vec<f32> {
    vec![3.0, 2.0, 1.5, 1.0]
}

fn default_smoothing_floor() -> usize {
    4
}

fn default_band_high() -> f32 {
    0.6
}

fn default_band_medium() -> f32 {
    0.25
}

fn default_technical_boost() -> f32 {
    0.15
}

fn default_intent_boost_scale() -> f32 {
    0.2
}

fn default_boost_ceiling() -> f32 {
    0.4
}

fn default_threshold_very_high() -> f32 {
    0.08
}

fn default_threshold_high() -> f32 {
    0.12
}

fn default_threshold_standard() -> f32 {
    0.18
}

fn default_threshold_strict() -> f32 {
    0.3
}

fn default_translation_penalty_factor() -> f32 {
    0.3
}

fn default_universal_pattern_increment() -> f32 {
    0.3
}

fn default_universal_pattern_bar() -> f32 {
    0.3
}

fn default_fallback_increment() -> f32 {
    0.3
}

fn default_fallback_base_latin() -> f32 {
    0.15
}

fn default_fallback_base_non_latin() -> f32 {
    0.22
}

fn default_interrogative_bonus() -> u32 {
    3
}

fn default_health_bonus() -> u32 {
    2
}

fn default_confidence_floor() -> u32 {
    2
}

fn default_routing_margin() -> u32 {
    1
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            language_adjustments: default_language_adjustments(),
            tier_weights: default_tier_weights(),
            smoothing_floor: default_smoothing_floor(),
            band_high: default_band_high(),
            band_medium: default_band_medium(),
            technical_boost: default_technical_boost(),
            intent_boost_scale: default_intent_boost_scale(),
            boost_ceiling: default_boost_ceiling(),
            threshold_very_high: default_threshold_very_high(),
            threshold_high: default_threshold_high(),
            threshold_standard: default_threshold_standard(),
            threshold_strict: default_threshold_strict(),
            translation_penalty_factor: default_translation_penalty_factor(),
            universal_pattern_increment: default_universal_pattern_increment(),
            universal_pattern_bar: default_universal_pattern_bar(),
            fallback_increment: default_fallback_increment(),
            fallback_base_latin: default_fallback_base_latin(),
            fallback_base_non_latin: default_fallback_base_non_latin(),
            interrogative_bonus: default_interrogative_bonus(),
            health_bonus: default_health_bonus(),
            confidence_floor: default_confidence_floor(),
            routing_margin: default_routing_margin(),
            classifier_prompt: None,
        }
    }
}

impl TriageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default language
    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    /// Set the technical-context boost
    pub fn with_technical_boost(mut self, boost: f32) -> Self {
        self.technical_boost = boost.clamp(0.0, 1.0);
        self
    }

    /// Set the translation penalty factor
    pub fn with_translation_penalty_factor(mut self, factor: f32) -> Self {
        self.translation_penalty_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Set the keyword confidence floor
    pub fn with_confidence_floor(mut self, floor: u32) -> Self {
        self.confidence_floor = floor;
        self
    }

    /// Set a custom classification prompt
    pub fn with_classifier_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.classifier_prompt = Some(prompt.into());
        self
    }

    /// Weight for a 1-based tier; tiers past the configured list reuse the
    /// last weight
    pub fn tier_weight(&self, tier: usize) -> f32 {
        let index = tier.saturating_sub(1);
        self.tier_weights
            .get(index)
            .or_else(|| self.tier_weights.last())
            .copied()
            .unwrap_or(1.0)
    }

    /// Threshold multiplier for a language; unknown languages get 1.0
    pub fn language_adjustment(&self, language: Language) -> f32 {
        self.language_adjustments
            .get(&language)
            .copied()
            .unwrap_or(1.0)
    }

    /// Map a normalized score to its qualitative band
    pub fn relevance_level(&self, score: f32) -> RelevanceLevel {
        if score >= self.band_high {
            RelevanceLevel::High
        } else if score >= self.band_medium {
            RelevanceLevel::Medium
        } else if score > 0.0 {
            RelevanceLevel::Low
        } else {
            RelevanceLevel::None
        }
    }

    /// Base acceptance threshold from the specificity x relevance table;
    /// higher specificity lowers the bar
    pub fn base_threshold(&self, specificity: Specificity, level: RelevanceLevel) -> f32 {
        match (specificity, level) {
            (Specificity::VeryHigh, _) => self.threshold_very_high,
            (Specificity::High, RelevanceLevel::High | RelevanceLevel::Medium) => {
                self.threshold_high
            }
            (Specificity::High, _) => self.threshold_standard,
            (Specificity::Medium, RelevanceLevel::High) => self.threshold_high,
            (Specificity::Medium, _) => self.threshold_standard,
            (Specificity::Low, _) => self.threshold_strict,
        }
    }

    /// Fallback base threshold for a script class
    pub fn fallback_base(&self, script: Script) -> f32 {
        match script {
            Script::Latin => self.fallback_base_latin,
            Script::NonLatin => self.fallback_base_non_latin,
        }
    }

    /// Get the default classification prompt
    pub fn default_classifier_prompt() -> &'static str {
        r#"You are routing a poultry-farming question to a retrieval backend.

Question: ${query}

Categories:
- METRICS: the question asks for numeric performance data (weights, feed conversion, mortality rates, production targets by age or breed)
- KNOWLEDGE: the question asks for explanations, health guidance, treatments, or management practices
- HYBRID: the question needs both numeric data and explanatory knowledge

Respond with ONLY the category name."#
    }

    /// Get the classification prompt to use
    pub fn get_classifier_prompt(&self) -> &str {
        match &self.classifier_prompt {
            Some(prompt) => prompt.as_str(),
            None => Self::default_classifier_prompt(),
        }
    }
}
