//! Infrastructure layer - Working implementations of the triage pipeline

pub mod context_analyzer;
pub mod guard;
pub mod logging;
pub mod normalizer;
pub mod relevance;
pub mod router;
pub mod vocabulary_builder;

pub use context_analyzer::ContextAnalyzer;
pub use guard::{
    DetectionStrategy, DirectScorer, DirectStrategy, DomainGuard, FallbackStrategy, QueryContext,
    StrategyOutcome, TranslateStrategy, UniversalPatternStrategy,
};
pub use relevance::DomainRelevanceCalculator;
pub use router::QueryTypeRouter;
pub use vocabulary_builder::VocabularyBuilder;
