use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ProviderError;

/// Connection and sampling settings for the hosted completion endpoint.
///
/// # Example
/// ```no_run
/// use provider::{OpenAiProvider, ProviderConfig};
///
/// let cfg = ProviderConfig {
///     api_key: Some("sk-...".into()),
///     ..Default::default()
/// };
/// let provider = OpenAiProvider::new(cfg).unwrap();
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Bearer credential. Required by [`OpenAiProvider`](crate::OpenAiProvider).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API root; `/chat/completions` is appended.
    pub base_url: String,
    /// Model for text-only prompts (appeal assessment).
    pub model: String,
    /// Model for prompts carrying an image (fine extraction).
    pub vision_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Overall request timeout in seconds.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            vision_model: "gpt-4o".into(),
            max_tokens: 500,
            temperature: 0.3,
            timeout_secs: 60,
            connect_timeout_secs: 10,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Check everything except the credential.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProviderError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.model.trim().is_empty() || self.vision_model.trim().is_empty() {
            return Err(ProviderError::InvalidConfig(
                "model and vision_model must be set".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ProviderError::InvalidConfig(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ProviderError::InvalidConfig("max_tokens must be >= 1".into()));
        }
        Ok(())
    }
}

// Hand-written so the credential never lands in logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("vision_model", &self.vision_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}
