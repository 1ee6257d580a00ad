//! Workspace umbrella crate for Finecheck.
//!
//! This crate stitches together request normalization, the completion call and
//! response recovery so callers can run either request type with a single
//! function:
//!
//! ```text
//! assess_appeal:  intake::normalize ─► appeal_prompt ─► provider ─► recover_assessment
//! extract_fine:   extraction_prompt + image ─────────► provider ─► recover_extraction
//! ```
//!
//! Requests share no state. The only suspend point is the provider call.

pub use intake::{
    appeal_prompt, extraction_prompt, normalize, normalize_appeal_reason, normalize_fine_details,
    AppealPromptInput, AppealReason, FineDetails, NormalizedAppeal, NormalizedFine,
};
pub use provider::{
    CompletionProvider, CompletionRequest, InlineImage, OpenAiProvider, ProviderConfig,
    ProviderError, StubProvider,
};
pub use recover::{
    recover_assessment, recover_extraction, recover_json, AppealAssessment, AppealStrength,
    AssessmentOutcome, ExtractedFineData, ExtractionOutcome, RecoveryError, RecoveryStatus,
    Strategy,
};

use std::error::Error;
use std::fmt;
use std::time::Instant;
use tracing::{error, info, warn};

/// Errors that can occur while running a request through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The completion call itself failed.
    Provider(ProviderError),
    /// The completion could not be turned into any object. Only the
    /// extraction path produces this; the appeal path falls back instead.
    Recovery { source: RecoveryError, raw: String },
}

impl PipelineError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Provider(_) => "upstream",
            PipelineError::Recovery { .. } => "recovery",
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Provider(err) => write!(f, "completion provider failure: {err}"),
            PipelineError::Recovery { source, .. } => {
                write!(f, "could not recover structured data: {source}")
            }
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Provider(err) => Some(err),
            PipelineError::Recovery { source, .. } => Some(source),
        }
    }
}

impl From<ProviderError> for PipelineError {
    fn from(value: ProviderError) -> Self {
        PipelineError::Provider(value)
    }
}

/// Assess how strong an appeal is.
///
/// Only a provider failure is an error. Malformed completions are absorbed
/// into the fallback assessment and reported through
/// [`AssessmentOutcome::status`].
pub async fn assess_appeal(
    provider: &dyn CompletionProvider,
    details: &FineDetails,
    reason: &AppealReason,
) -> Result<AssessmentOutcome, PipelineError> {
    let start = Instant::now();
    let input = normalize(details, reason);
    let prompt = appeal_prompt(&input);

    let raw = match provider.complete(CompletionRequest::text(prompt)).await {
        Ok(raw) => raw,
        Err(err) => {
            error!(
                provider = provider.name(),
                error = %err,
                reason_shape = reason.shape(),
                fine_keys = ?details.keys().collect::<Vec<_>>(),
                "appeal assessment completion failed"
            );
            return Err(PipelineError::Provider(err));
        }
    };

    let outcome = recover_assessment(&raw);
    match &outcome.status {
        RecoveryStatus::Fallback(err) => warn!(
            provider = provider.name(),
            error = %err,
            error_kind = err.kind(),
            raw_completion = %raw,
            reason_shape = reason.shape(),
            "appeal assessment fell back to default"
        ),
        RecoveryStatus::Parsed(strategy) => info!(
            provider = provider.name(),
            strategy = strategy.as_str(),
            strength = outcome.assessment.strength().map(|s| s.as_str()),
            confidence = outcome.assessment.confidence_score(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "appeal assessed"
        ),
    }
    Ok(outcome)
}

/// Read the fields of a photographed fine notice.
///
/// Missing fields are defaulted to empty strings; a completion with no JSON
/// object at all is a [`PipelineError::Recovery`].
pub async fn extract_fine(
    provider: &dyn CompletionProvider,
    image: InlineImage,
) -> Result<ExtractionOutcome, PipelineError> {
    let start = Instant::now();
    let mime_type = image.mime_type.clone();
    let image_bytes = image.len();
    let request = CompletionRequest::with_image(extraction_prompt(), image);

    let raw = match provider.complete(request).await {
        Ok(raw) => raw,
        Err(err) => {
            error!(
                provider = provider.name(),
                error = %err,
                mime_type = %mime_type,
                image_bytes,
                "fine extraction completion failed"
            );
            return Err(PipelineError::Provider(err));
        }
    };

    match recover_extraction(&raw) {
        Ok(outcome) => {
            if !outcome.defaulted.is_empty() {
                warn!(
                    provider = provider.name(),
                    defaulted = ?outcome.defaulted,
                    raw_completion = %raw,
                    "fine extraction missing fields"
                );
            }
            info!(
                provider = provider.name(),
                strategy = outcome.strategy.as_str(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "fine extracted"
            );
            Ok(outcome)
        }
        Err(source) => {
            error!(
                provider = provider.name(),
                error = %source,
                raw_completion = %raw,
                mime_type = %mime_type,
                image_bytes,
                "fine extraction returned no usable JSON"
            );
            Err(PipelineError::Recovery { source, raw })
        }
    }
}
