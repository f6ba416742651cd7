//! Conversation context capability trait
//!
//! The triage layer does not own conversation memory. When a collaborator
//! is wired in, the router issues best-effort `expand`/`update` calls; the
//! collaborator manages its own concurrency and keying by conversation id.

use async_trait::async_trait;
use std::fmt::Debug;

use super::error::TriageError;
use super::intent::IntentResult;

/// Trait for an external coreference/conversation store
#[async_trait]
pub trait ConversationContext: Send + Sync + Debug {
    /// Expand a query with referents from the conversation
    async fn expand(&self, query: &str) -> Result<String, TriageError>;

    /// Push the current query (and intent, when present) into the store
    async fn update(&self, query: &str, intent: Option<&IntentResult>)
        -> Result<(), TriageError>;
}


#[cfg(test)]
mod tests {
    use super::mock::MockConversationContext;
    use super::*;

    #[tokio::test]
    async fn test_mock_expansion_and_update() {
        let context = MockConversationContext::new().with_expansion("weight of ross 308 at day 21");

        let expanded = context.expand("and at day 21?").await.unwrap();
        assert_eq!(expanded, "weight of ross 308 at day 21");

        context.update("and at day 21?", None).await.unwrap();
        assert_eq!(context.recorded_updates().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_error() {
        let context = MockConversationContext::new().with_error("store down");
        assert!(context.expand("query").await.is_err());
        assert!(context.update("query", None).await.is_err());
    }
}
