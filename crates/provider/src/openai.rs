//! OpenAI-compatible chat completions client.
//!
//! Any endpoint that speaks the `/chat/completions` dialect works: OpenAI
//! itself, Azure deployments behind a proxy, or local gateways.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

use crate::{CompletionProvider, CompletionRequest, ProviderConfig, ProviderError};

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Completion provider backed by an OpenAI-compatible HTTP API.
///
/// Owns its HTTP client; construct one per process and share it behind an
/// `Arc<dyn CompletionProvider>`.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    cfg: ProviderConfig,
}

impl OpenAiProvider {
    pub fn new(cfg: ProviderConfig) -> Result<Self, ProviderError> {
        cfg.validate()?;
        let api_key = cfg
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .connect_timeout(cfg.connect_timeout())
            .pool_max_idle_per_host(16)
            .build()
            .map_err(|e| ProviderError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            cfg,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.cfg
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let payload = build_payload(&self.cfg, &request);
        let url = self.cfg.completions_url();
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "completion provider rejected request"
            );
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: error_message(&body),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("body is not JSON: {e}")))?;

        let content = parse_completion(&body)?;
        debug!(
            model = payload["model"].as_str().unwrap_or_default(),
            with_image = request.image.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            completion_chars = content.len(),
            "completion received"
        );
        Ok(content)
    }
}

/// Request body for `request`. Image requests use the vision model and a
/// content array; text requests send the prompt as a plain string.
pub fn build_payload(cfg: &ProviderConfig, request: &CompletionRequest) -> Value {
    match &request.image {
        None => json!({
            "model": cfg.model,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
            "max_tokens": cfg.max_tokens,
            "temperature": cfg.temperature,
        }),
        Some(image) => json!({
            "model": cfg.vision_model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": request.prompt },
                        { "type": "image_url", "image_url": { "url": image.data_url() } }
                    ]
                }
            ],
            "max_tokens": cfg.max_tokens,
            "temperature": cfg.temperature,
        }),
    }
}

/// Pull the assistant text out of a chat completions response.
///
/// `content` may be a string or an array of typed parts; text parts are
/// concatenated. A `null` or blank `content` is returned as-is; deciding what
/// an empty completion means is left to the caller.
pub fn parse_completion(body: &Value) -> Result<String, ProviderError> {
    let content = body
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .ok_or_else(|| {
            ProviderError::InvalidResponse("missing choices[0].message.content".into())
        })?;

    let text = match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
        Value::Null => String::new(),
        other => {
            return Err(ProviderError::InvalidResponse(format!(
                "unexpected content type: {other}"
            )))
        }
    };

    Ok(text)
}

/// Prefer the provider's `error.message`; otherwise a truncated raw body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
    }
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
