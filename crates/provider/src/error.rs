use thiserror::Error;

/// Errors surfaced by a [`CompletionProvider`](crate::CompletionProvider) call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No credential was configured.
    #[error("completion provider API key is not configured")]
    MissingApiKey,
    /// Settings are unusable (bad URL, empty model name, ...).
    #[error("invalid provider config: {0}")]
    InvalidConfig(String),
    /// Network-level failure: DNS, connect, TLS, timeout.
    #[error("completion request failed: {0}")]
    Request(String),
    /// The provider answered with a non-success status (auth, rate limit, ...).
    #[error("completion provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body did not have the expected shape.
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::MissingApiKey => "missing_api_key",
            ProviderError::InvalidConfig(_) => "invalid_config",
            ProviderError::Request(_) => "request",
            ProviderError::Status { .. } => "status",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code_and_body() {
        let err = ProviderError::Status {
            status: 429,
            body: "Rate limit reached".into(),
        };
        assert_eq!(
            err.to_string(),
            "completion provider returned HTTP 429: Rate limit reached"
        );
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn missing_key_message() {
        assert!(ProviderError::MissingApiKey
            .to_string()
            .contains("API key is not configured"));
    }
}
