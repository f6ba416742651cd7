//! Domain relevance scoring
//!
//! Tier-weighted vocabulary scoring with context boosters, blocked-term
//! vetoes, adaptive thresholds, and script-agnostic universal patterns.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::TriageConfig;
use crate::domain::{
    BlockedTerms, ContextAnalysis, DomainScore, DomainVocabulary, IntentResult, Language,
    MatchedTerm,
};

/// Age-in-days pattern spanning several scripts' unit words
///
/// Alphabetic-script units end on a word boundary so an abbreviation
/// cannot match as a prefix of an unrelated word ("день" inside "деньги").
/// Han and Thai run without spaces, where `\b` never matches between
/// adjacent letters, so those alternatives stay boundary-free.
static UNIVERSAL_AGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d+\s*(?:(?:days?|d[ií]as?|jours?|tage?n?|дней|дня|день|दिन|يوم|أيام)\b|天|日|วัน)",
    )
    .unwrap()
});

/// Weight-with-unit pattern spanning several scripts' unit words
static UNIVERSAL_WEIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d+(?:[.,]\d+)?\s*(?:(?:grams?|kilograms?|kilos?|kg|gr|g|lbs?|кг|г|جرام|كجم|غرام|ग्राम|किलो)\b|克|公斤|斤|กรัม|กก|กิโล)",
    )
    .unwrap()
});

/// Calculator for domain-relevance scores and thresholds
#[derive(Debug, Clone)]
pub struct DomainRelevanceCalculator {
    config: Arc<TriageConfig>,
    vocabulary: Arc<DomainVocabulary>,
    blocked: Arc<BlockedTerms>,
}

impl DomainRelevanceCalculator {
    pub fn new(
        config: Arc<TriageConfig>,
        vocabulary: Arc<DomainVocabulary>,
        blocked: Arc<BlockedTerms>,
    ) -> Self {
        Self {
            config,
            vocabulary,
            blocked,
        }
    }

    /// Score tokens against the vocabulary for a language
    ///
    /// Hits are tier-weighted and normalized by the count of tokens not
    /// covered by any matched term (matched terms, multi-word included, do
    /// not dilute their own evidence), with a smoothing floor so very short
    /// queries are not penalized. An empty token list scores zero, never
    /// errors.
    pub fn calculate_domain_relevance(
        &self,
        tokens: &[String],
        context: &ContextAnalysis,
        language: Language,
    ) -> DomainScore {
        if tokens.is_empty() {
            return DomainScore::empty("no tokens to score");
        }

        let text = tokens.join(" ");
        let matches = self.vocabulary.match_terms(language, &text, tokens);

        let weighted_sum: f32 = matches
            .iter()
            .map(|(_, tier)| self.config.tier_weight(*tier))
            .sum();

        let covered_tokens: HashSet<&str> = matches
            .iter()
            .flat_map(|(term, _)| term.split(' '))
            .collect();
        let unmatched_count = tokens
            .iter()
            .filter(|token| !covered_tokens.contains(token.as_str()))
            .count();

        let denominator = unmatched_count.max(self.config.smoothing_floor) as f32;
        let final_score = weighted_sum / denominator;

        let reasoning = format!(
            "{} vocabulary hits (weighted {:.2}) against {} tokens in {} ({:?} context)",
            matches.len(),
            weighted_sum,
            tokens.len(),
            language,
            context.context_type,
        );

        DomainScore {
            final_score,
            matched_terms: matches
                .into_iter()
                .map(|(term, tier)| MatchedTerm::new(term, tier))
                .collect(),
            blocked_terms: Vec::new(),
            relevance_level: self.config.relevance_level(final_score),
            reasoning,
        }
    }

    /// Detect blocked terms in a normalized query; one match is a veto
    pub fn detect_blocked_terms(&self, normalized_query: &str) -> (bool, Vec<String>) {
        let matched = self.blocked.find_matches(normalized_query);
        (!matched.is_empty(), matched)
    }

    /// Apply context boosters to a raw score
    ///
    /// Additive technical-context bonus plus an additive bonus scaled by
    /// the upstream intent confidence, clamped to the configured ceiling.
    /// The result is never negative.
    pub fn apply_context_boosters(
        &self,
        score: f32,
        context: &ContextAnalysis,
        intent: Option<&IntentResult>,
    ) -> f32 {
        let mut bonus = 0.0;

        if context.is_technical() {
            bonus += self.config.technical_boost;
        }
        if let Some(intent) = intent {
            bonus += self.config.intent_boost_scale * intent.sanitized_confidence();
        }

        (score + bonus.min(self.config.boost_ceiling)).max(0.0)
    }

    /// Select the base acceptance threshold for a query
    ///
    /// Per-language multipliers are applied by the caller, multiplicatively.
    pub fn select_adaptive_threshold(
        &self,
        context: &ContextAnalysis,
        score: &DomainScore,
    ) -> f32 {
        self.config
            .base_threshold(context.specificity, score.relevance_level)
    }

    /// Universal-pattern categories matched in a raw query
    ///
    /// Language-agnostic numeric patterns that allow accepting non-Latin
    /// queries without translation.
    pub fn universal_pattern_categories(&self, query: &str) -> Vec<&'static str> {
        let mut categories = Vec::new();
        if UNIVERSAL_AGE.is_match(query) {
            categories.push("age_in_days");
        }
        if UNIVERSAL_WEIGHT.is_match(query) {
            categories.push("weight_with_unit");
        }
        categories
    }

    /// Universal-pattern score: a fixed increment per matched category
    pub fn detect_universal_patterns(&self, query: &str) -> f32 {
        self.universal_pattern_categories(query).len() as f32
            * self.config.universal_pattern_increment
    }
}
