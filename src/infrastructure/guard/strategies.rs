//! Detection strategies
//!
//! Each strategy is independently testable and decides only for the
//! language class it covers. The fallback strategy is terminal: it always
//! produces an outcome and depends on nothing external.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::json;
use tracing::warn;

use super::{DetectionStrategy, QueryContext, StrategyOutcome};
use crate::config::TriageConfig;
use crate::domain::{IntentResult, Language, Script, TranslationService, TriageError};
use crate::infrastructure::context_analyzer::ContextAnalyzer;
use crate::infrastructure::normalizer::{normalize, tokenize};
use crate::infrastructure::relevance::DomainRelevanceCalculator;

/// Multilingual universal terms for the dependency-free fallback
static UNIVERSAL_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "chicken", "poultry", "broiler", "poulet", "volaille", "poule", "pollo", "gallina",
        "frango", "huhn", "geflugel", "geflügel", "kip", "pluimvee", "kurczak", "drob", "курица",
        "бройлер", "птица", "鸡", "肉鸡", "家禽", "मुर्गी", "चूजा", "ไก่", "دجاج", "فروج", "دواجن",
    ]
});

/// Shared direct-scoring pipeline: normalize, analyze, score, boost,
/// veto-check, threshold
#[derive(Debug)]
pub struct DirectScorer {
    config: Arc<TriageConfig>,
    analyzer: ContextAnalyzer,
    calculator: Arc<DomainRelevanceCalculator>,
}

impl DirectScorer {
    pub fn new(
        config: Arc<TriageConfig>,
        analyzer: ContextAnalyzer,
        calculator: Arc<DomainRelevanceCalculator>,
    ) -> Self {
        Self {
            config,
            analyzer,
            calculator,
        }
    }

    /// Score a query in `scoring_language`, applying the threshold
    /// multiplier of `adjustment_language` and an extra threshold factor
    /// (1.0 for direct scoring, below 1.0 under a translation penalty)
    pub fn evaluate(
        &self,
        query: &str,
        scoring_language: Language,
        adjustment_language: Language,
        intent: Option<&IntentResult>,
        threshold_factor: f32,
    ) -> StrategyOutcome {
        let normalized = normalize(query, scoring_language);
        let tokens = tokenize(&normalized);

        let context = self.analyzer.analyze(query, &tokens, intent);
        let score = self
            .calculator
            .calculate_domain_relevance(&tokens, &context, scoring_language);
        let boosted = self
            .calculator
            .apply_context_boosters(score.final_score, &context, intent);
        let (blocked, blocked_terms) = self.calculator.detect_blocked_terms(&normalized);

        let base_threshold = self.calculator.select_adaptive_threshold(&context, &score);
        let language_adjustment = self.config.language_adjustment(adjustment_language);
        let threshold = base_threshold * language_adjustment * threshold_factor;

        let accepted = boosted > threshold && !blocked;

        StrategyOutcome::new(accepted, boosted)
            .with_detail("raw_score", json!(score.final_score))
            .with_detail("boosted_score", json!(boosted))
            .with_detail("base_threshold", json!(base_threshold))
            .with_detail("language_adjustment", json!(language_adjustment))
            .with_detail("threshold_factor", json!(threshold_factor))
            .with_detail("threshold", json!(threshold))
            .with_detail("context_type", json!(context.context_type))
            .with_detail("specificity", json!(context.specificity))
            .with_detail("relevance_level", json!(score.relevance_level))
            .with_detail("matched_terms", json!(score.matched_terms))
            .with_detail("blocked_terms", json!(blocked_terms))
            .with_detail("reasoning", json!(score.reasoning))
    }
}

/// Direct scoring for pivot languages
#[derive(Debug)]
pub struct DirectStrategy {
    scorer: Arc<DirectScorer>,
}

impl DirectStrategy {
    pub fn new(scorer: Arc<DirectScorer>) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl DetectionStrategy for DirectStrategy {
    fn strategy_name(&self) -> &'static str {
        "direct"
    }

    async fn attempt(
        &self,
        context: &QueryContext,
    ) -> Result<Option<StrategyOutcome>, TriageError> {
        if !context.language.is_pivot() {
            return Ok(None);
        }

        Ok(Some(self.scorer.evaluate(
            &context.query,
            context.language,
            context.language,
            context.intent.as_ref(),
            1.0,
        )))
    }
}

/// Universal numeric patterns for non-Latin scripts
///
/// Accepts immediately when the pattern score clears the configured bar;
/// otherwise passes to the next strategy.
#[derive(Debug)]
pub struct UniversalPatternStrategy {
    config: Arc<TriageConfig>,
    calculator: Arc<DomainRelevanceCalculator>,
}

impl UniversalPatternStrategy {
    pub fn new(config: Arc<TriageConfig>, calculator: Arc<DomainRelevanceCalculator>) -> Self {
        Self { config, calculator }
    }
}

#[async_trait]
impl DetectionStrategy for UniversalPatternStrategy {
    fn strategy_name(&self) -> &'static str {
        "universal_pattern"
    }

    async fn attempt(
        &self,
        context: &QueryContext,
    ) -> Result<Option<StrategyOutcome>, TriageError> {
        if context.language.script() != Script::NonLatin {
            return Ok(None);
        }

        let categories = self.calculator.universal_pattern_categories(&context.query);
        let score = self.calculator.detect_universal_patterns(&context.query);

        if score >= self.config.universal_pattern_bar {
            Ok(Some(
                StrategyOutcome::new(true, score)
                    .with_detail("pattern_categories", json!(categories))
                    .with_detail("pattern_bar", json!(self.config.universal_pattern_bar)),
            ))
        } else {
            Ok(None)
        }
    }
}

/// Translate to a pivot language, then score directly
///
/// The acceptance threshold is relaxed in proportion to how unsure the
/// translation backend is: `threshold * (1 - k * (1 - confidence))`.
/// A failed translation passes to the next strategy, never fails the
/// request.
#[derive(Debug)]
pub struct TranslateStrategy {
    translation: Arc<dyn TranslationService>,
    scorer: Arc<DirectScorer>,
    config: Arc<TriageConfig>,
}

impl TranslateStrategy {
    pub fn new(
        translation: Arc<dyn TranslationService>,
        scorer: Arc<DirectScorer>,
        config: Arc<TriageConfig>,
    ) -> Self {
        Self {
            translation,
            scorer,
            config,
        }
    }
}

#[async_trait]
impl DetectionStrategy for TranslateStrategy {
    fn strategy_name(&self) -> &'static str {
        "translate"
    }

    async fn attempt(
        &self,
        context: &QueryContext,
    ) -> Result<Option<StrategyOutcome>, TriageError> {
        if context.language.is_pivot() {
            return Ok(None);
        }

        let translated = match self
            .translation
            .translate(
                &context.query,
                Language::En,
                Some(context.language),
                Some("poultry farming"),
            )
            .await
        {
            Ok(result) => result,
            Err(error) => {
                warn!(%error, language = %context.language, "Translation failed, passing to fallback");
                return Ok(None);
            }
        };

        let penalty = self.config.translation_penalty_factor;
        let threshold_factor = 1.0 - penalty * (1.0 - translated.confidence);

        let outcome = self
            .scorer
            .evaluate(
                &translated.text,
                Language::En,
                context.language,
                context.intent.as_ref(),
                threshold_factor,
            )
            .with_detail("translated_text", json!(translated.text))
            .with_detail("translation_confidence", json!(translated.confidence))
            .with_detail("translation_provenance", json!(translated.provenance));

        Ok(Some(outcome))
    }
}

/// Terminal, dependency-free fallback
///
/// Substring match against a small multilingual term list plus the two
/// script-agnostic numeric patterns. Always produces an outcome.
#[derive(Debug)]
pub struct FallbackStrategy {
    config: Arc<TriageConfig>,
    calculator: Arc<DomainRelevanceCalculator>,
}

impl FallbackStrategy {
    pub fn new(config: Arc<TriageConfig>, calculator: Arc<DomainRelevanceCalculator>) -> Self {
        Self { config, calculator }
    }
}

#[async_trait]
impl DetectionStrategy for FallbackStrategy {
    fn strategy_name(&self) -> &'static str {
        "fallback"
    }

    async fn attempt(
        &self,
        context: &QueryContext,
    ) -> Result<Option<StrategyOutcome>, TriageError> {
        let lowered = context.query.to_lowercase();

        let matched_terms: Vec<&str> = UNIVERSAL_TERMS
            .iter()
            .filter(|term| lowered.contains(**term))
            .copied()
            .collect();

        let mut categories: Vec<&str> = Vec::new();
        if !matched_terms.is_empty() {
            categories.push("universal_term");
        }
        categories.extend(self.calculator.universal_pattern_categories(&context.query));

        let score = categories.len() as f32 * self.config.fallback_increment;
        let threshold = self.config.fallback_base(context.language.script())
            * self.config.language_adjustment(context.language);

        Ok(Some(
            StrategyOutcome::new(score > threshold, score)
                .with_detail("matched_terms", json!(matched_terms))
                .with_detail("categories", json!(categories))
                .with_detail("threshold", json!(threshold)),
        ))
    }
}
