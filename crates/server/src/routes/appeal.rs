use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use finecheck::{AppealReason, FineDetails};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Body of `POST /api/appeal-check`.
///
/// Both fields are kept as raw JSON so that any shape the client sends reaches
/// the normalizer; only absence is rejected here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealCheckRequest {
    #[serde(default)]
    pub fine_details: Option<Value>,
    #[serde(default)]
    pub appeal_reason: Option<Value>,
}

impl AppealCheckRequest {
    /// Split into typed inputs, or name the fields that are missing.
    pub fn into_inputs(self) -> ServerResult<(FineDetails, AppealReason)> {
        let details = self.fine_details.map(FineDetails::from);
        let reason = self
            .appeal_reason
            .map(AppealReason::from)
            .filter(|reason| !reason.is_blank());

        match (details, reason) {
            (Some(details), Some(reason)) => Ok((details, reason)),
            (details, reason) => {
                let missing: Vec<&str> = [
                    details.is_none().then_some("fineDetails"),
                    reason.is_none().then_some("appealReason"),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(ServerError::BadRequest(format!(
                    "Missing required fields: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

/// Assess an appeal against a parking fine
///
/// Always answers with an assessment object once the provider has replied;
/// unusable replies are replaced by the fallback assessment.
pub async fn appeal_check(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<AppealCheckRequest>, JsonRejection>,
) -> ServerResult<Json<Value>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "appeal check rejected: invalid body");
        ServerError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let (details, reason) = request.into_inputs().inspect_err(|err| {
        tracing::warn!(error = %err, "appeal check rejected");
    })?;

    match finecheck::assess_appeal(state.provider.as_ref(), &details, &reason).await {
        Ok(outcome) => {
            metrics::counter!("finecheck_appeal_checks_total", "outcome" => outcome.status.label())
                .increment(1);
            Ok(Json(outcome.assessment.into_value()))
        }
        Err(err) => {
            metrics::counter!("finecheck_upstream_failures_total", "route" => "appeal_check")
                .increment(1);
            Err(ServerError::from_pipeline(
                &err,
                "Failed to analyze appeal",
                state.expose_error_details(),
            ))
        }
    }
}
