//! Query Triage
//!
//! The triage layer of a poultry-farming question-answering system:
//! - Domain relevance ("out-of-domain") detection with multilingual
//!   scoring, adaptive thresholds, hard vetoes, and layered fallbacks
//! - Query type routing (METRICS / KNOWLEDGE / HYBRID) with a
//!   confidence-gated escalation to an LLM classifier
//!
//! The layer never answers questions and persists nothing; external
//! capabilities (language detection, translation, classification,
//! conversation memory) are injected at bootstrap and feature-detected.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, TriageConfig};
pub use domain::{
    ConversationContext, DomainDecision, IntentResult, Language, LanguageDetector, QueryType,
    TextClassifier, TranslationService, TriageError, TriageStats,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use domain::{BlockedTerms, DomainVocabulary};
use infrastructure::{
    ContextAnalyzer, DetectionStrategy, DirectScorer, DirectStrategy, DomainGuard,
    DomainRelevanceCalculator, FallbackStrategy, QueryTypeRouter, TranslateStrategy,
    UniversalPatternStrategy, VocabularyBuilder,
};

/// External capabilities injected into the triage layer
///
/// Every dependency is optional; missing ones degrade the corresponding
/// feature to its documented fallback.
#[derive(Debug, Default)]
pub struct TriageDeps {
    pub language_detector: Option<Arc<dyn LanguageDetector>>,
    pub translation: Option<Arc<dyn TranslationService>>,
    pub classifier: Option<Arc<dyn TextClassifier>>,
    pub conversation: Option<Arc<dyn ConversationContext>>,
}

impl TriageDeps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.language_detector = Some(detector);
        self
    }

    pub fn with_translation(mut self, translation: Arc<dyn TranslationService>) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn TextClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_conversation(mut self, conversation: Arc<dyn ConversationContext>) -> Self {
        self.conversation = Some(conversation);
        self
    }
}

/// The assembled triage layer
#[derive(Debug)]
pub struct Triage {
    config: Arc<TriageConfig>,
    vocabulary: Arc<DomainVocabulary>,
    blocked: Arc<BlockedTerms>,
    guard: DomainGuard,
    router: QueryTypeRouter,
}

impl Triage {
    /// Build the triage layer: one-time vocabulary construction, startup
    /// invariant checks, and strategy assembly
    ///
    /// This is the only place a `TriageError` can surface; after a
    /// successful bootstrap, every request path returns a decision value.
    pub async fn bootstrap(config: TriageConfig, deps: TriageDeps) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let builder = VocabularyBuilder::new();

        let (vocabulary, blocked) = match deps.translation.as_deref() {
            Some(translation) => builder.build(translation).await,
            None => {
                warn!("Translation service unavailable; using embedded vocabulary only");
                builder.build_fallback()
            }
        };

        // Fail fast before serving traffic
        if vocabulary.is_empty_for(config.default_language) {
            return Err(TriageError::configuration(format!(
                "Vocabulary is empty for the default language {}",
                config.default_language
            ))
            .into());
        }

        let vocabulary = Arc::new(vocabulary);
        let blocked = Arc::new(blocked);
        let calculator = Arc::new(DomainRelevanceCalculator::new(
            config.clone(),
            vocabulary.clone(),
            blocked.clone(),
        ));
        let scorer = Arc::new(DirectScorer::new(
            config.clone(),
            ContextAnalyzer::new(),
            calculator.clone(),
        ));

        let mut strategies: Vec<Arc<dyn DetectionStrategy>> = vec![
            Arc::new(DirectStrategy::new(scorer.clone())),
            Arc::new(UniversalPatternStrategy::new(
                config.clone(),
                calculator.clone(),
            )),
        ];
        if let Some(translation) = deps.translation.clone() {
            strategies.push(Arc::new(TranslateStrategy::new(
                translation,
                scorer.clone(),
                config.clone(),
            )));
        }
        strategies.push(Arc::new(FallbackStrategy::new(
            config.clone(),
            calculator.clone(),
        )));

        let guard = DomainGuard::new(
            config.clone(),
            deps.language_detector.clone(),
            calculator,
            strategies,
        );
        let router = QueryTypeRouter::new(
            config.clone(),
            deps.classifier.clone(),
            deps.conversation.clone(),
        );

        info!(
            languages = vocabulary.languages().len(),
            translation = deps.translation.is_some(),
            classifier = deps.classifier.is_some(),
            "Triage layer ready"
        );

        Ok(Self {
            config,
            vocabulary,
            blocked,
            guard,
            router,
        })
    }

    /// Decide whether a query is in-domain
    pub async fn check_domain(
        &self,
        query: &str,
        intent: Option<&IntentResult>,
        language: Option<&str>,
    ) -> DomainDecision {
        self.guard.check(query, intent, language).await
    }

    /// Select the downstream retrieval path for an accepted query
    pub async fn route_query_type(
        &self,
        query: &str,
        intent: Option<&IntentResult>,
    ) -> QueryType {
        self.router.route(query, intent).await
    }

    /// Read-only introspection of the assembled layer
    pub fn stats(&self) -> TriageStats {
        let thresholds = BTreeMap::from([
            ("very_high".to_string(), self.config.threshold_very_high),
            ("high".to_string(), self.config.threshold_high),
            ("standard".to_string(), self.config.threshold_standard),
            ("strict".to_string(), self.config.threshold_strict),
            (
                "fallback_latin".to_string(),
                self.config.fallback_base_latin,
            ),
            (
                "fallback_non_latin".to_string(),
                self.config.fallback_base_non_latin,
            ),
            (
                "universal_pattern_bar".to_string(),
                self.config.universal_pattern_bar,
            ),
        ]);

        TriageStats {
            vocabulary_sizes: self.vocabulary.sizes(),
            blocked_term_counts: self.blocked.counts(),
            thresholds,
            language_adjustments: self.config.language_adjustments.clone(),
            supported_languages: Language::all().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::classifier::mock::MockTextClassifier;
    use domain::translation::mock::MockTranslationService;
    use serde_json::json;

    async fn triage() -> Triage {
        Triage::bootstrap(TriageConfig::default(), TriageDeps::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_technical_metrics_scenario() {
        let triage = triage().await;

        let decision = triage
            .check_domain("Ross 308 weight at 35 days", None, Some("en"))
            .await;
        assert!(decision.is_in_domain);
        assert_eq!(decision.detail_str("context_type"), Some("technical"));

        let routed = triage
            .route_query_type("Ross 308 weight at 35 days", None)
            .await;
        assert_eq!(routed, QueryType::Metrics);
    }

    #[tokio::test]
    async fn test_disease_knowledge_scenario() {
        let triage = triage().await;

        let decision = triage
            .check_domain("How do I treat Newcastle disease in broilers?", None, Some("en"))
            .await;
        assert!(decision.is_in_domain);

        let routed = triage
            .route_query_type("How do I treat Newcastle disease in broilers?", None)
            .await;
        assert_eq!(routed, QueryType::Knowledge);
    }

    #[tokio::test]
    async fn test_off_topic_scenario() {
        let triage = triage().await;

        let decision = triage
            .check_domain("What is the capital of France?", None, Some("en"))
            .await;
        assert!(!decision.is_in_domain);
    }

    #[tokio::test]
    async fn test_empty_query_scenario() {
        let triage = triage().await;

        let decision = triage.check_domain("", None, None).await;
        assert!(!decision.is_in_domain);
        assert_eq!(decision.score, 0.0);
        assert_eq!(decision.detail_str("reason"), Some("empty_query"));

        assert_eq!(triage.route_query_type("", None).await, QueryType::Hybrid);
    }

    #[tokio::test]
    async fn test_non_latin_universal_acceptance_without_translation() {
        let triage = triage().await;

        let decision = triage.check_domain("肉鸡 42 days 的体重", None, Some("zh")).await;
        assert!(decision.is_in_domain);
        assert_eq!(decision.detail_str("strategy"), Some("universal_pattern"));
    }

    #[tokio::test]
    async fn test_translated_scenario() {
        let translation = Arc::new(
            MockTranslationService::new()
                .with_translation("peso del pollo a los 35 dias", "chicken weight at 35 days")
                .with_confidence(0.9),
        );
        let triage = Triage::bootstrap(
            TriageConfig::default(),
            TriageDeps::new().with_translation(translation),
        )
        .await
        .unwrap();

        let decision = triage
            .check_domain("peso del pollo a los 35 dias", None, Some("es"))
            .await;
        assert!(decision.is_in_domain);
        assert_eq!(decision.detail_str("strategy"), Some("translate"));
    }

    #[tokio::test]
    async fn test_intent_escalation_boosts_acceptance() {
        let triage = triage().await;
        let intent = IntentResult::new(0.9)
            .with_entity("breed", json!("ross 308"))
            .with_entity("age_days", json!(21));

        let decision = triage
            .check_domain("and the target for day 21?", Some(&intent), Some("en"))
            .await;
        assert!(decision.is_in_domain);
        assert_eq!(decision.detail_str("specificity"), Some("very_high"));
    }

    #[tokio::test]
    async fn test_router_never_throws_with_failing_classifier() {
        let classifier = Arc::new(MockTextClassifier::new().with_error("unavailable"));
        let triage = Triage::bootstrap(
            TriageConfig::default(),
            TriageDeps::new().with_classifier(classifier),
        )
        .await
        .unwrap();

        let routed = triage.route_query_type("something vague", None).await;
        assert_eq!(routed, QueryType::Hybrid);
    }

    #[tokio::test]
    async fn test_stats_shape() {
        let triage = triage().await;
        let stats = triage.stats();

        assert!(!stats.vocabulary_sizes[&Language::En].is_empty());
        assert!(stats.blocked_term_counts.contains_key("cooking"));
        assert!(stats.thresholds.contains_key("standard"));
        assert_eq!(stats.language_adjustments[&Language::En], 1.0);
        assert!(stats.supported_languages.contains(&Language::Th));
    }
}
