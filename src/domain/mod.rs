//! Domain layer - Core triage types and capability traits

pub mod classifier;
pub mod conversation;
pub mod error;
pub mod intent;
pub mod language;
pub mod routing;
pub mod score;
pub mod translation;
pub mod vocabulary;

pub use classifier::TextClassifier;
pub use conversation::ConversationContext;
pub use error::TriageError;
pub use intent::IntentResult;
pub use language::{Language, LanguageDetection, LanguageDetector, Script};
pub use routing::QueryType;
pub use score::{
    ContextAnalysis, DomainDecision, DomainScore, MatchedTerm, QueryContextType, RelevanceLevel,
    Specificity, TechnicalIndicator, TriageStats,
};
pub use translation::{TranslationResult, TranslationService};
pub use vocabulary::{BlockedTerms, DomainVocabulary};

#[cfg(test)]
pub use classifier::mock::MockTextClassifier;
#[cfg(test)]
pub use conversation::mock::MockConversationContext;
#[cfg(test)]
pub use language::mock::MockLanguageDetector;
#[cfg(test)]
pub use translation::mock::MockTranslationService;
