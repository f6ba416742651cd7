//! Out-of-domain guard
//!
//! The orchestrator resolves the query language, applies the blocked-term
//! veto, and then tries an ordered list of detection strategies until one
//! decides. The terminal fallback strategy always decides, so the guard
//! never raises to its caller.

mod strategies;

pub use strategies::{
    DirectScorer, DirectStrategy, FallbackStrategy, TranslateStrategy, UniversalPatternStrategy,
};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::config::TriageConfig;
use crate::domain::{
    DomainDecision, IntentResult, Language, LanguageDetector, TriageError,
};
use crate::infrastructure::normalizer::normalize;
use crate::infrastructure::relevance::DomainRelevanceCalculator;

/// Per-request input shared by all strategies
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub query: String,
    pub language: Language,
    pub intent: Option<IntentResult>,
}

/// A strategy's decision, with its own diagnostics
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub is_in_domain: bool,
    pub score: f32,
    pub details: Map<String, Value>,
}

impl StrategyOutcome {
    pub fn new(is_in_domain: bool, score: f32) -> Self {
        Self {
            is_in_domain,
            score,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

/// A single detection strategy
///
/// `attempt` returns `Ok(None)` when the strategy does not apply to the
/// query (wrong language class, missing dependency, inconclusive evidence);
/// the orchestrator then moves on to the next strategy in its list.
#[async_trait]
pub trait DetectionStrategy: Send + Sync + std::fmt::Debug {
    fn strategy_name(&self) -> &'static str;

    async fn attempt(&self, context: &QueryContext)
        -> Result<Option<StrategyOutcome>, TriageError>;
}

/// The out-of-domain guard
#[derive(Debug)]
pub struct DomainGuard {
    config: Arc<TriageConfig>,
    detector: Option<Arc<dyn LanguageDetector>>,
    calculator: Arc<DomainRelevanceCalculator>,
    strategies: Vec<Arc<dyn DetectionStrategy>>,
}

impl DomainGuard {
    pub fn new(
        config: Arc<TriageConfig>,
        detector: Option<Arc<dyn LanguageDetector>>,
        calculator: Arc<DomainRelevanceCalculator>,
        strategies: Vec<Arc<dyn DetectionStrategy>>,
    ) -> Self {
        Self {
            config,
            detector,
            calculator,
            strategies,
        }
    }

    /// Decide whether a query is in-domain
    ///
    /// Never returns an error: malformed input gets a documented safe
    /// default and failing strategies are demoted to the next one in line.
    pub async fn check(
        &self,
        query: &str,
        intent: Option<&IntentResult>,
        language: Option<&str>,
    ) -> DomainDecision {
        if query.trim().is_empty() {
            return DomainDecision::rejected("empty_query");
        }

        let (language, language_note) = self.resolve_language(query, language);

        // Hard veto before any scoring; a blocked term dominates everything
        let normalized = normalize(query, language);
        let (blocked, blocked_terms) = self.calculator.detect_blocked_terms(&normalized);
        if blocked {
            return DomainDecision::rejected("blocked_terms")
                .with_detail("language", json!(language.code()))
                .with_detail("blocked_terms", json!(blocked_terms));
        }

        let context = QueryContext {
            query: query.to_string(),
            language,
            intent: intent.cloned(),
        };

        for strategy in &self.strategies {
            match strategy.attempt(&context).await {
                Ok(Some(outcome)) => {
                    debug!(
                        strategy = strategy.strategy_name(),
                        %language,
                        in_domain = outcome.is_in_domain,
                        score = outcome.score,
                        "Domain decision"
                    );
                    let mut decision = DomainDecision::new(outcome.is_in_domain, outcome.score);
                    decision.details = outcome.details;
                    decision.details.insert(
                        "strategy".to_string(),
                        json!(strategy.strategy_name()),
                    );
                    decision
                        .details
                        .insert("language".to_string(), json!(language.code()));
                    if let Some(note) = &language_note {
                        decision
                            .details
                            .insert("language_fallback".to_string(), json!(note));
                    }
                    return decision;
                }
                Ok(None) => continue,
                Err(error) => {
                    warn!(
                        strategy = strategy.strategy_name(),
                        %error,
                        "Strategy failed, demoting to next"
                    );
                    continue;
                }
            }
        }

        // Unreachable while the terminal fallback strategy is registered
        DomainDecision::rejected("no_strategy_decided")
            .with_detail("language", json!(language.code()))
    }

    /// Resolve the query language from the caller, the detector, or the
    /// configured default; the second element notes any fallback applied
    fn resolve_language(
        &self,
        query: &str,
        supplied: Option<&str>,
    ) -> (Language, Option<String>) {
        if let Some(code) = supplied {
            return match code.parse::<Language>() {
                Ok(language) => (language, None),
                Err(_) => (
                    self.config.default_language,
                    Some(format!("unsupported_code:{code}")),
                ),
            };
        }

        match self.detector.as_ref().and_then(|d| d.detect(query)) {
            Some(detection) => (detection.language, None),
            None => (
                self.config.default_language,
                Some("detection_unavailable".to_string()),
            ),
        }
    }
}
