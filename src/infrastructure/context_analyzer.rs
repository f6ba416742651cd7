//! Query context analysis
//!
//! Classifies a query as technical/standard/generic from an ordered set of
//! technical patterns run against the raw query, optionally reinforced by an
//! upstream intent result.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::domain::{
    ContextAnalysis, IntentResult, QueryContextType, Specificity, TechnicalIndicator,
};

/// Ordered technical patterns; each entry is (kind, pattern)
static TECHNICAL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "genetic_line",
            Regex::new(
                r"(?i)\b(ross|cobb|hubbard|aviagen|lohmann)\s*-?\s*\d{2,4}\b|\b(ross|cobb|hubbard|isa\s+brown|lohmann)\b",
            )
            .unwrap(),
        ),
        (
            "age",
            Regex::new(r"(?i)\b\d{1,3}\s*(days?|day-old|jours?|weeks?|wks?|semaines?|sem|d|j)\b")
                .unwrap(),
        ),
        (
            "weight",
            Regex::new(r"(?i)\b\d+(?:[.,]\d+)?\s*(grams?|kilograms?|kilos?|kg|gr|g|lbs?)\b")
                .unwrap(),
        ),
        (
            "percentage",
            Regex::new(r"\d+(?:[.,]\d+)?\s*%|(?i)\bpercent(?:age)?\b|\bpour\s?cent\b").unwrap(),
        ),
        (
            "feed_conversion",
            Regex::new(
                r"(?i)\b(fcr|feed\s+conversion|conversion\s+ratio|indice\s+de\s+conversion)\b",
            )
            .unwrap(),
        ),
    ]
});

/// Analyzer for query context classification
#[derive(Debug, Clone, Default)]
pub struct ContextAnalyzer;

impl ContextAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a raw query
    ///
    /// Two or more distinct indicator kinds make the query technical with
    /// high specificity; very short queries with no indicators are generic
    /// with low specificity, which holds them to the strict threshold. An
    /// intent result with two or more extracted entities escalates to
    /// technical/very-high, overriding the pattern-only result. Malformed
    /// intent data is sanitized, never fatal.
    pub fn analyze(
        &self,
        query: &str,
        tokens: &[String],
        intent: Option<&IntentResult>,
    ) -> ContextAnalysis {
        let technical_indicators: Vec<TechnicalIndicator> = TECHNICAL_PATTERNS
            .iter()
            .filter_map(|(kind, pattern)| {
                let matches: Vec<String> = pattern
                    .find_iter(query)
                    .map(|found| found.as_str().to_string())
                    .collect();
                if matches.is_empty() {
                    None
                } else {
                    Some(TechnicalIndicator {
                        kind: kind.to_string(),
                        count: matches.len(),
                        matches,
                    })
                }
            })
            .collect();

        let (context_type, specificity) = if technical_indicators.len() >= 2 {
            (QueryContextType::Technical, Specificity::High)
        } else if technical_indicators.is_empty() && tokens.len() <= 2 {
            // Very short queries with nothing technical in them
            (QueryContextType::Generic, Specificity::Low)
        } else {
            (QueryContextType::Standard, Specificity::Medium)
        };

        let mut analysis = ContextAnalysis {
            context_type,
            technical_indicators,
            specificity,
            intent_confidence: 0.0,
        };

        if let Some(intent) = intent {
            if !intent.confidence.is_finite() {
                warn!(
                    confidence = intent.confidence,
                    "Malformed intent confidence, treating as zero"
                );
            }
            analysis.intent_confidence = intent.sanitized_confidence();

            if intent.entity_count() >= 2 {
                analysis.context_type = QueryContextType::Technical;
                analysis.specificity = Specificity::VeryHigh;
            }
        }

        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;
    use crate::infrastructure::normalizer::{normalize, tokenize};
    use serde_json::json;

    fn analyze(query: &str, intent: Option<&IntentResult>) -> ContextAnalysis {
        let tokens = tokenize(&normalize(query, Language::En));
        ContextAnalyzer::new().analyze(query, &tokens, intent)
    }

    #[test]
    fn test_multiple_indicators_are_technical_high() {
        let analysis = analyze("Ross 308 weight at 35 days", None);

        let kinds: Vec<&str> = analysis
            .technical_indicators
            .iter()
            .map(|indicator| indicator.kind.as_str())
            .collect();
        assert!(kinds.contains(&"genetic_line"));
        assert!(kinds.contains(&"age"));

        assert_eq!(analysis.context_type, QueryContextType::Technical);
        assert_eq!(analysis.specificity, Specificity::High);
    }

    #[test]
    fn test_single_indicator_is_standard_medium() {
        let analysis = analyze("mortality at 2.5%", None);

        assert_eq!(analysis.indicator_kind_count(), 1);
        assert_eq!(analysis.context_type, QueryContextType::Standard);
        assert_eq!(analysis.specificity, Specificity::Medium);
    }

    #[test]
    fn test_no_indicators_is_standard_medium() {
        let analysis = analyze("What is the capital of France?", None);

        assert!(analysis.technical_indicators.is_empty());
        assert_eq!(analysis.context_type, QueryContextType::Standard);
        assert_eq!(analysis.specificity, Specificity::Medium);
    }

    #[test]
    fn test_short_vague_query_is_generic_low() {
        let analysis = analyze("hello there", None);
        assert_eq!(analysis.context_type, QueryContextType::Generic);
        assert_eq!(analysis.specificity, Specificity::Low);
    }

    #[test]
    fn test_intent_confidence_copied() {
        let intent = IntentResult::new(0.85);
        let analysis = analyze("broiler feed", Some(&intent));

        assert_eq!(analysis.intent_confidence, 0.85);
        // One entity is not enough to escalate
        assert_ne!(analysis.specificity, Specificity::VeryHigh);
    }

    #[test]
    fn test_intent_entities_escalate_to_very_high() {
        let intent = IntentResult::new(0.9)
            .with_entity("breed", json!("ross 308"))
            .with_entity("age_days", json!(35));
        let analysis = analyze("what about the weight", Some(&intent));

        assert_eq!(analysis.context_type, QueryContextType::Technical);
        assert_eq!(analysis.specificity, Specificity::VeryHigh);
        assert_eq!(analysis.intent_confidence, 0.9);
    }

    #[test]
    fn test_malformed_intent_confidence_does_not_panic() {
        let intent = IntentResult::new(f32::NAN);
        let analysis = analyze("broiler weight", Some(&intent));
        assert_eq!(analysis.intent_confidence, 0.0);
    }

    #[test]
    fn test_feed_conversion_indicator() {
        let analysis = analyze("what is a good FCR for cobb 500", None);
        let kinds: Vec<&str> = analysis
            .technical_indicators
            .iter()
            .map(|indicator| indicator.kind.as_str())
            .collect();
        assert!(kinds.contains(&"feed_conversion"));
        assert!(kinds.contains(&"genetic_line"));
        assert_eq!(analysis.context_type, QueryContextType::Technical);
    }
}
