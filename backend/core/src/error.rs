use thiserror::Error;

/// Errors raised along the report-generation path.
///
/// None of these are retried. The orchestrator collapses every variant into a
/// single [`ReportFailure`](crate::ReportFailure) before anything reaches a user.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// A required evidence field was missing or not a string.
    #[error("invalid evidence: {0}")]
    Validation(String),

    /// The backend answered, but with nothing that satisfies the output schema.
    #[error("model returned no usable output: {0}")]
    Generation(String),

    /// The backend call itself could not complete.
    #[error("LLM provider error ({provider}): {message}")]
    Transport { provider: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl VerifyError {
    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Generation(_) => "generation",
            Self::Transport { .. } => "transport",
            Self::Config(_) => "config",
        }
    }
}

/// Message shown to users whenever a report could not be produced.
pub const REPORT_FAILURE_MESSAGE: &str =
    "Failed to generate verification report. The AI service may be temporarily unavailable.";

/// The only failure a caller of the orchestrator ever sees.
///
/// Carries no detail about the underlying [`VerifyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to generate verification report. The AI service may be temporarily unavailable.")]
pub struct ReportFailure;

impl ReportFailure {
    pub fn message(&self) -> &'static str {
        REPORT_FAILURE_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_failure_display_matches_constant() {
        assert_eq!(ReportFailure.to_string(), REPORT_FAILURE_MESSAGE);
        assert_eq!(ReportFailure.message(), REPORT_FAILURE_MESSAGE);
    }

    #[test]
    fn transport_error_names_provider() {
        let err = VerifyError::transport("openrouter", "connection refused");
        assert_eq!(err.kind(), "transport");
        assert!(err.to_string().contains("openrouter"));
        assert!(err.to_string().contains("connection refused"));
    }
}
