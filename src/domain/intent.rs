//! Intent analysis result supplied by upstream callers

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Result of upstream intent analysis, supplied by the caller when available
///
/// This is a defined struct rather than an opaque map: the triage layer only
/// ever reads the confidence and the extracted entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentResult {
    /// Confidence of the intent analysis (0.0 - 1.0)
    #[serde(default)]
    pub confidence: f32,
    /// Entities extracted upstream (e.g. breed, age, metric)
    #[serde(default)]
    pub detected_entities: HashMap<String, serde_json::Value>,
}

impl IntentResult {
    pub fn new(confidence: f32) -> Self {
        Self {
            confidence,
            detected_entities: HashMap::new(),
        }
    }

    /// Add an extracted entity
    pub fn with_entity(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.detected_entities.insert(name.into(), value);
        self
    }

    /// Number of distinct extracted entities
    pub fn entity_count(&self) -> usize {
        self.detected_entities.len()
    }

    /// Confidence clamped to [0, 1]; NaN and infinities collapse to 0
    pub fn sanitized_confidence(&self) -> f32 {
        if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_count() {
        let intent = IntentResult::new(0.8)
            .with_entity("breed", json!("ross 308"))
            .with_entity("age_days", json!(35));

        assert_eq!(intent.entity_count(), 2);
        assert_eq!(intent.sanitized_confidence(), 0.8);
    }

    #[test]
    fn test_sanitized_confidence_guards_malformed_values() {
        assert_eq!(IntentResult::new(f32::NAN).sanitized_confidence(), 0.0);
        assert_eq!(IntentResult::new(f32::INFINITY).sanitized_confidence(), 0.0);
        assert_eq!(IntentResult::new(-0.5).sanitized_confidence(), 0.0);
        assert_eq!(IntentResult::new(7.0).sanitized_confidence(), 1.0);
    }

    #[test]
    fn test_deserializes_with_missing_fields() {
        let intent: IntentResult = serde_json::from_str("{}").unwrap();
        assert_eq!(intent.confidence, 0.0);
        assert_eq!(intent.entity_count(), 0);
    }
}
