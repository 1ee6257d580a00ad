//! Finecheck completion provider
//!
//! Both request types end in one call to a hosted generative model: a text
//! prompt for appeal assessment, a prompt plus inline image for fine-notice
//! extraction. This crate hides that call behind [`CompletionProvider`] so
//! handlers receive a provider instead of reaching for a global client, and
//! tests can swap in [`StubProvider`].
//!
//! The provider is trusted to answer, not to answer well: it returns the raw
//! completion text, and callers run it through the `recover` crate.
//!
//! No retry or backoff is performed. A failed call is reported once.
//!
//! ## Example
//!
//! ```no_run
//! use provider::{CompletionProvider, CompletionRequest, OpenAiProvider, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cfg = ProviderConfig {
//!         api_key: std::env::var("OPENAI_API_KEY").ok(),
//!         ..Default::default()
//!     };
//!     let provider = OpenAiProvider::new(cfg).unwrap();
//!     let text = provider
//!         .complete(CompletionRequest::text("Reply with {\"ok\": true}"))
//!         .await
//!         .unwrap();
//!     println!("{text}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod openai;
pub mod stub;
pub mod types;

pub use crate::config::ProviderConfig;
pub use crate::error::ProviderError;
pub use crate::openai::OpenAiProvider;
pub use crate::stub::StubProvider;
pub use crate::types::{CompletionRequest, InlineImage};

use async_trait::async_trait;

/// A hosted text/vision completion endpoint.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Send one request and return the raw completion text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}
