//! Query type routing enum

use serde::{Deserialize, Serialize};

/// Downstream retrieval path for an in-domain query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Structured performance-metrics store
    Metrics,
    /// Free-text knowledge corpus
    Knowledge,
    /// Both stores
    Hybrid,
}

impl QueryType {
    /// Canonical uppercase label, as used in classification prompts
    pub fn as_label(&self) -> &'static str {
        match self {
            QueryType::Metrics => "METRICS",
            QueryType::Knowledge => "KNOWLEDGE",
            QueryType::Hybrid => "HYBRID",
        }
    }

    /// Parse the first matching label out of free-form classifier output,
    /// case-insensitively
    pub fn parse_label(text: &str) -> Option<QueryType> {
        let lowered = text.to_lowercase();

        [QueryType::Metrics, QueryType::Knowledge, QueryType::Hybrid]
            .into_iter()
            .filter_map(|query_type| {
                lowered
                    .find(&query_type.as_label().to_lowercase())
                    .map(|position| (position, query_type))
            })
            .min_by_key(|(position, _)| *position)
            .map(|(_, query_type)| query_type)
    }

    pub fn is_metrics(&self) -> bool {
        matches!(self, Self::Metrics)
    }

    pub fn is_knowledge(&self) -> bool {
        matches!(self, Self::Knowledge)
    }

    pub fn is_hybrid(&self) -> bool {
        matches!(self, Self::Hybrid)
    }
}
