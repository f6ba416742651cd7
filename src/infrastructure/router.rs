//! Query type routing
//!
//! A lightweight keyword classifier run only on accepted queries. When the
//! keyword evidence is below the confidence floor, routing escalates to an
//! injected LLM classifier; every failure path defaults to `Hybrid`.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::config::TriageConfig;
use crate::domain::{ConversationContext, IntentResult, QueryType, TextClassifier};

/// Keywords indicating the structured performance-metrics store
static METRIC_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "weight", "poids", "peso", "gain", "fcr", "feed conversion", "indice de conversion",
        "mortality", "mortalite", "production", "ponte", "laying", "hatchability", "eclosabilite",
        "target", "objectif", "average", "moyenne", "standard", "performance", "yield", "density",
        "densite", "consumption", "consommation", "intake", "ross", "cobb", "hubbard", "308",
        "500", "day", "days", "jour", "week", "semaine", "kg", "gram",
    ]
});

/// Keywords indicating the free-text knowledge corpus
static KNOWLEDGE_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "disease", "maladie", "treatment", "traitement", "treat", "symptom", "symptome",
        "vaccine", "vaccin", "prevention", "biosecurity", "biosecurite", "cause", "diagnos",
        "infection", "virus", "bacteria", "newcastle", "coccidiosis", "gumboro", "influenza",
        "ventilation", "litter", "litiere", "welfare", "bien-etre", "management", "recommend",
        "conseil", "best practice", "protocol",
    ]
});

/// Interrogative cues; evidence that the user asked a "how/why" question
static INTERROGATIVE_CUES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "how", "why", "what should", "when should", "comment", "pourquoi", "que faire",
    ]
});

/// Health and treatment cues
static HEALTH_CUES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "treat", "disease", "sick", "vaccin", "symptom", "medic", "antibiot", "infection",
        "maladie", "traite", "malade",
    ]
});

/// Router selecting the downstream retrieval path for a query
#[derive(Debug)]
pub struct QueryTypeRouter {
    config: Arc<TriageConfig>,
    classifier: Option<Arc<dyn TextClassifier>>,
    conversation: Option<Arc<dyn ConversationContext>>,
}

impl QueryTypeRouter {
    pub fn new(
        config: Arc<TriageConfig>,
        classifier: Option<Arc<dyn TextClassifier>>,
        conversation: Option<Arc<dyn ConversationContext>>,
    ) -> Self {
        Self {
            config,
            classifier,
            conversation,
        }
    }

    /// Route a query to METRICS, KNOWLEDGE, or both
    ///
    /// Keyword scores and cue bonuses always use the original, unexpanded
    /// query so coreference expansion cannot dilute interrogative evidence.
    /// The expanded query only feeds the LLM fallback prompt. This method
    /// never errors; ambiguity resolves to `Hybrid`.
    pub async fn route(&self, query: &str, intent: Option<&IntentResult>) -> QueryType {
        if query.trim().is_empty() {
            return QueryType::Hybrid;
        }

        let expanded = self.expand_query(query).await;
        self.push_update(query, intent).await;

        let lowered = query.to_lowercase();
        let metric_score = count_hits(&lowered, &METRIC_KEYWORDS);
        let mut knowledge_score = count_hits(&lowered, &KNOWLEDGE_KEYWORDS);

        if contains_any(&lowered, &INTERROGATIVE_CUES) {
            knowledge_score += self.config.interrogative_bonus;
        }
        if contains_any(&lowered, &HEALTH_CUES) {
            knowledge_score += self.config.health_bonus;
        }

        debug!(metric_score, knowledge_score, "Keyword routing scores");

        let margin = self.config.routing_margin;
        if metric_score > knowledge_score + margin {
            QueryType::Metrics
        } else if knowledge_score > metric_score + margin {
            QueryType::Knowledge
        } else if metric_score.max(knowledge_score) >= self.config.confidence_floor {
            QueryType::Hybrid
        } else {
            self.classify_fallback(expanded.as_deref().unwrap_or(query))
                .await
        }
    }

    /// Best-effort coreference expansion; unavailability disables the
    /// feature silently
    async fn expand_query(&self, query: &str) -> Option<String> {
        let conversation = self.conversation.as_ref()?;
        match conversation.expand(query).await {
            Ok(expanded) => Some(expanded),
            Err(error) => {
                debug!(%error, "Conversation expansion unavailable");
                None
            }
        }
    }

    /// Best-effort push of the current query to the conversation store
    async fn push_update(&self, query: &str, intent: Option<&IntentResult>) {
        if let Some(conversation) = self.conversation.as_ref() {
            if let Err(error) = conversation.update(query, intent).await {
                debug!(%error, "Conversation update failed");
            }
        }
    }

    /// LLM fallback classification, defaulting to `Hybrid` on any failure
    async fn classify_fallback(&self, query: &str) -> QueryType {
        let Some(classifier) = self.classifier.as_ref() else {
            return QueryType::Hybrid;
        };

        let prompt = self
            .config
            .get_classifier_prompt()
            .replace("${query}", query);

        match classifier.classify(&prompt).await {
            Ok(label) => match QueryType::parse_label(&label) {
                Some(query_type) => query_type,
                None => {
                    warn!(label, "Unparseable classification label, defaulting to hybrid");
                    QueryType::Hybrid
                }
            },
            Err(error) => {
                warn!(%error, "Classification failed, defaulting to hybrid");
                QueryType::Hybrid
            }
        }
    }
}

fn count_hits(lowered_query: &str, keywords: &[&str]) -> u32 {
    keywords
        .iter()
        .filter(|keyword| lowered_query.contains(**keyword))
        .count() as u32
}

fn contains_any(lowered_query: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| lowered_query.contains(*cue))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classifier::mock::MockTextClassifier;
    use crate::domain::conversation::mock::MockConversationContext;

    fn router(
        classifier: Option<Arc<dyn TextClassifier>>,
        conversation: Option<Arc<dyn ConversationContext>>,
    ) -> QueryTypeRouter {
        QueryTypeRouter::new(Arc::new(TriageConfig::default()), classifier, conversation)
    }

    #[tokio::test]
    async fn test_empty_query_is_hybrid() {
        assert_eq!(router(None, None).route("", None).await, QueryType::Hybrid);
        assert_eq!(
            router(None, None).route("   ", None).await,
            QueryType::Hybrid
        );
    }

    #[tokio::test]
    async fn test_metrics_dominant_query() {
        let routed = router(None, None)
            .route("Ross 308 weight at 35 days", None)
            .await;
        assert_eq!(routed, QueryType::Metrics);
    }

    #[tokio::test]
    async fn test_knowledge_dominant_query() {
        let routed = router(None, None)
            .route("How do I treat Newcastle disease in broilers?", None)
            .await;
        assert_eq!(routed, QueryType::Knowledge);
    }

    #[tokio::test]
    async fn test_interrogative_cue_beats_single_metric_keyword() {
        let routed = router(None, None)
            .route("how do I treat the disease at day 21", None)
            .await;
        assert_eq!(routed, QueryType::Knowledge);
    }

    #[tokio::test]
    async fn test_balanced_evidence_is_hybrid() {
        // Metric and knowledge evidence within the margin of each other
        let routed = router(None, None)
            .route("average mortality with ventilation and litter quality", None)
            .await;
        assert_eq!(routed, QueryType::Hybrid);
    }

    #[tokio::test]
    async fn test_low_evidence_without_classifier_is_hybrid() {
        let routed = router(None, None).route("tell me about the farm", None).await;
        assert_eq!(routed, QueryType::Hybrid);
    }

    #[tokio::test]
    async fn test_low_evidence_escalates_to_classifier() {
        let classifier = Arc::new(MockTextClassifier::new().with_label("METRICS"));
        let routed = router(Some(classifier.clone()), None)
            .route("numbers for my flock please", None)
            .await;

        assert_eq!(routed, QueryType::Metrics);
        assert_eq!(classifier.seen_prompts().len(), 1);
        assert!(classifier.seen_prompts()[0].contains("numbers for my flock please"));
    }

    #[tokio::test]
    async fn test_classifier_failure_defaults_to_hybrid() {
        let classifier = Arc::new(MockTextClassifier::new().with_error("timeout"));
        let routed = router(Some(classifier), None)
            .route("something vague", None)
            .await;
        assert_eq!(routed, QueryType::Hybrid);
    }

    #[tokio::test]
    async fn test_unparseable_label_defaults_to_hybrid() {
        let classifier = Arc::new(MockTextClassifier::new().with_label("no idea"));
        let routed = router(Some(classifier), None)
            .route("something vague", None)
            .await;
        assert_eq!(routed, QueryType::Hybrid);
    }

    #[tokio::test]
    async fn test_expansion_feeds_classifier_but_not_keyword_scores() {
        // The expansion adds metric keywords; the keyword decision must
        // still come from the original query, which escalates, and the
        // classifier must see the expanded text.
        let conversation = Arc::new(
            MockConversationContext::new().with_expansion("weight of ross 308 at day 21"),
        );
        let classifier = Arc::new(MockTextClassifier::new().with_label("METRICS"));

        let routed = router(Some(classifier.clone()), Some(conversation.clone()))
            .route("and what about it?", None)
            .await;

        assert_eq!(routed, QueryType::Metrics);
        assert!(classifier.seen_prompts()[0].contains("weight of ross 308 at day 21"));
        assert_eq!(
            conversation.recorded_updates(),
            vec!["and what about it?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_conversation_failure_is_silent() {
        let conversation = Arc::new(MockConversationContext::new().with_error("store down"));
        let routed = router(None, Some(conversation))
            .route("Ross 308 weight at 35 days", None)
            .await;
        assert_eq!(routed, QueryType::Metrics);
    }
}
