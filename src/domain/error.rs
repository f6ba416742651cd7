use thiserror::Error;

/// Core triage errors
///
/// Only `Configuration` errors may surface to callers, and only during
/// bootstrap. Everything else is caught inside the subsystem and downgraded
/// to a documented fallback path.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Translation error: {service} - {message}")]
    Translation { service: String, message: String },

    #[error("Classification error: {message}")]
    Classification { message: String },

    #[error("Conversation context error: {message}")]
    Conversation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TriageError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn translation(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Translation {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification {
            message: message.into(),
        }
    }

    pub fn conversation(message: impl Into<String>) -> Self {
        Self::Conversation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error is safe to downgrade at runtime
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TriageError::configuration("vocabulary is empty");
        assert_eq!(error.to_string(), "Configuration error: vocabulary is empty");

        let error = TriageError::translation("deepl", "timeout");
        assert_eq!(error.to_string(), "Translation error: deepl - timeout");
    }

    #[test]
    fn test_transient_classification() {
        assert!(!TriageError::configuration("bad").is_transient());
        assert!(TriageError::translation("svc", "down").is_transient());
        assert!(TriageError::classification("unparseable").is_transient());
    }
}
