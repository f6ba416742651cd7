//! Scoring and decision value types

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::language::Language;

/// Qualitative relevance band for a domain score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceLevel {
    None,
    Low,
    Medium,
    High,
}

impl RelevanceLevel {
    pub fn is_relevant(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A vocabulary term matched in a query, with its 1-based tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedTerm {
    pub term: String,
    pub tier: usize,
}

impl MatchedTerm {
    pub fn new(term: impl Into<String>, tier: usize) -> Self {
        Self {
            term: term.into(),
            tier,
        }
    }
}

/// Result of domain-relevance scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainScore {
    /// Normalized, non-negative score
    pub final_score: f32,
    /// Vocabulary terms found in the query
    pub matched_terms: Vec<MatchedTerm>,
    /// Blocked terms found in the query; non-empty means hard veto
    pub blocked_terms: Vec<String>,
    /// Qualitative band of the score
    pub relevance_level: RelevanceLevel,
    /// Human-readable account of how the score was produced
    pub reasoning: String,
}

impl DomainScore {
    /// A zero score with the given reasoning
    pub fn empty(reasoning: impl Into<String>) -> Self {
        Self {
            final_score: 0.0,
            matched_terms: Vec::new(),
            blocked_terms: Vec::new(),
            relevance_level: RelevanceLevel::None,
            reasoning: reasoning.into(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        !self.blocked_terms.is_empty()
    }
}

/// Classification of a query's context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryContextType {
    Technical,
    Standard,
    Generic,
}

/// How specific a query is, which drives the acceptance threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specificity {
    VeryHigh,
    High,
    Medium,
    Low,
}

/// A technical pattern found in the raw query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalIndicator {
    /// Indicator kind (genetic_line, age, weight, percentage, feed_conversion)
    pub kind: String,
    /// Text fragments that matched
    pub matches: Vec<String>,
    /// Number of matches
    pub count: usize,
}

/// Result of context analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextAnalysis {
    pub context_type: QueryContextType,
    pub technical_indicators: Vec<TechnicalIndicator>,
    pub specificity: Specificity,
    /// Upstream intent confidence, 0.0 when no intent result was supplied
    pub intent_confidence: f32,
}

impl ContextAnalysis {
    /// Neutral analysis for queries with nothing notable in them
    pub fn standard() -> Self {
        Self {
            context_type: QueryContextType::Standard,
            technical_indicators: Vec::new(),
            specificity: Specificity::Medium,
            intent_confidence: 0.0,
        }
    }

    pub fn is_technical(&self) -> bool {
        matches!(self.context_type, QueryContextType::Technical)
    }

    /// Number of distinct indicator kinds
    pub fn indicator_kind_count(&self) -> usize {
        self.technical_indicators.len()
    }
}

/// Final accept/reject decision with diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDecision {
    pub is_in_domain: bool,
    pub score: f32,
    /// Diagnostic map; keys depend on the strategy that decided
    pub details: Map<String, Value>,
}

impl DomainDecision {
    pub fn new(is_in_domain: bool, score: f32) -> Self {
        Self {
            is_in_domain,
            score,
            details: Map::new(),
        }
    }

    /// An immediate rejection with a reason in the diagnostics
    pub fn rejected(reason: impl Into<String>) -> Self {
        let mut decision = Self::new(false, 0.0);
        decision
            .details
            .insert("reason".to_string(), Value::String(reason.into()));
        decision
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Fetch a diagnostic value as a string, if present
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }
}

/// Read-only introspection snapshot of the triage layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageStats {
    /// Tier sizes per language
    pub vocabulary_sizes: HashMap<Language, Vec<usize>>,
    /// Blocked-term counts per category
    pub blocked_term_counts: BTreeMap<String, usize>,
    /// Named base thresholds in effect
    pub thresholds: BTreeMap<String, f32>,
    /// Per-language threshold multipliers
    pub language_adjustments: HashMap<Language, f32>,
    /// Languages the layer accepts
    pub supported_languages: Vec<Language>,
}
