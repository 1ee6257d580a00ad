use thiserror::Error;

/// Reasons a completion could not be turned into a usable object.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("completion text is empty after stripping code fences")]
    Empty,
    #[error("completion text contains no JSON object")]
    NoObject,
    #[error("completion text is not valid JSON: {0}")]
    Malformed(String),
    #[error("completion parsed as JSON but is not an object")]
    NotAnObject,
    #[error("recovered object is missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<&'static str>),
}

impl RecoveryError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RecoveryError::Empty => "empty",
            RecoveryError::NoObject => "no_object",
            RecoveryError::Malformed(_) => "malformed",
            RecoveryError::NotAnObject => "not_an_object",
            RecoveryError::MissingKeys(_) => "missing_keys",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_lists_every_key() {
        let err = RecoveryError::MissingKeys(vec!["confidence_score", "reasoning_summary"]);
        assert_eq!(
            err.to_string(),
            "recovered object is missing required keys: confidence_score, reasoning_summary"
        );
        assert_eq!(err.kind(), "missing_keys");
    }

    #[test]
    fn malformed_carries_parser_message() {
        let err = RecoveryError::Malformed("expected value at line 1 column 1".into());
        assert!(err.to_string().contains("line 1 column 1"));
    }
}
