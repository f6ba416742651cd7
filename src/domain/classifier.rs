//! Text classification capability trait
//!
//! The query-type router escalates to an LLM classifier only when its
//! keyword evidence is below the confidence floor. The classifier is a
//! small injected capability so the router's control flow stays testable
//! with a fake substituted in.

use async_trait::async_trait;
use std::fmt::Debug;

use super::error::TriageError;

/// Trait for single-label text classification
#[async_trait]
pub trait TextClassifier: Send + Sync + Debug {
    /// Classify a prompt, returning the raw label text
    async fn classify(&self, prompt: &str) -> Result<String, TriageError>;

    /// Get the classifier name
    fn classifier_name(&self) -> &'static str;
}


#[cfg(test)]
mod tests {
    use super::mock::MockTextClassifier;
    use super::*;

    #[tokio::test]
    async fn test_mock_fixed_label() {
        let classifier = MockTextClassifier::new().with_label("METRICS");

        let label = classifier.classify("prompt").await.unwrap();
        assert_eq!(label, "METRICS");
        assert_eq!(classifier.seen_prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_error() {
        let classifier = MockTextClassifier::new().with_error("timeout");
        assert!(classifier.classify("prompt").await.is_err());
    }
}
