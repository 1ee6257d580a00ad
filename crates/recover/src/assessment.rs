//! Appeal-assessment recovery policy.
//!
//! This path never fails. A completion that cannot be recovered, or that lacks
//! one of the three required keys, is replaced by [`AppealAssessment::fallback`].
//! The [`RecoveryStatus`] tag on the outcome records which of the two happened
//! so callers can report it without changing the response body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::RecoveryError;
use crate::strategy::{recover_json, Strategy};

pub const APPEAL_STRENGTH_KEY: &str = "appeal_strength";
pub const CONFIDENCE_SCORE_KEY: &str = "confidence_score";
pub const REASONING_SUMMARY_KEY: &str = "reasoning_summary";

pub const REQUIRED_ASSESSMENT_KEYS: [&str; 3] = [
    APPEAL_STRENGTH_KEY,
    CONFIDENCE_SCORE_KEY,
    REASONING_SUMMARY_KEY,
];

pub const FALLBACK_CONFIDENCE: i64 = 50;
pub const FALLBACK_REASONING: &str = "We could not complete a detailed analysis of this appeal. \
Based on the information provided it has a moderate chance of success, so gather any supporting evidence before you submit it.";

/// Strength classes the prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppealStrength {
    Strong,
    Medium,
    Weak,
}

impl AppealStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppealStrength::Strong => "strong",
            AppealStrength::Medium => "medium",
            AppealStrength::Weak => "weak",
        }
    }

    /// Case-insensitive match on the three labels.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "strong" => Some(AppealStrength::Strong),
            "medium" => Some(AppealStrength::Medium),
            "weak" => Some(AppealStrength::Weak),
            _ => None,
        }
    }
}

/// Something odd about an otherwise valid assessment. Reported, never corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    UnknownStrength(String),
    NonIntegerScore(String),
    ScoreOutOfRange(i64),
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anomaly::UnknownStrength(raw) => write!(f, "appeal_strength {raw} is not strong/medium/weak"),
            Anomaly::NonIntegerScore(raw) => write!(f, "confidence_score {raw} is not an integer"),
            Anomaly::ScoreOutOfRange(score) => write!(f, "confidence_score {score} is outside 0-100"),
        }
    }
}

/// The object returned to the client for an appeal check.
///
/// Holds the recovered object verbatim: presence of the three keys is the only
/// thing validated, so extra keys, unexpected strength labels and scores
/// outside 0-100 reach the client unchanged. See [`AppealAssessment::anomalies`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AppealAssessment {
    object: Map<String, Value>,
}

impl AppealAssessment {
    /// Accept `object` if every required key is present, non-null and not an
    /// empty string.
    pub fn from_object(object: Map<String, Value>) -> Result<Self, RecoveryError> {
        let missing: Vec<&'static str> = REQUIRED_ASSESSMENT_KEYS
            .iter()
            .copied()
            .filter(|key| !is_filled(object.get(*key)))
            .collect();

        if missing.is_empty() {
            Ok(Self { object })
        } else {
            Err(RecoveryError::MissingKeys(missing))
        }
    }

    /// The fixed substitute used when recovery fails.
    pub fn fallback() -> Self {
        let mut object = Map::new();
        object.insert(
            APPEAL_STRENGTH_KEY.into(),
            Value::from(AppealStrength::Medium.as_str()),
        );
        object.insert(CONFIDENCE_SCORE_KEY.into(), Value::from(FALLBACK_CONFIDENCE));
        object.insert(REASONING_SUMMARY_KEY.into(), Value::from(FALLBACK_REASONING));
        Self { object }
    }

    pub fn strength(&self) -> Option<AppealStrength> {
        self.object
            .get(APPEAL_STRENGTH_KEY)
            .and_then(Value::as_str)
            .and_then(AppealStrength::parse)
    }

    /// Integer score if the value is a whole number, even when written as `80.0`.
    pub fn confidence_score(&self) -> Option<i64> {
        let Value::Number(number) = self.object.get(CONFIDENCE_SCORE_KEY)? else {
            return None;
        };
        number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    pub fn reasoning_summary(&self) -> Option<&str> {
        self.object.get(REASONING_SUMMARY_KEY).and_then(Value::as_str)
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.object
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.object)
    }

    /// Contract deviations that validation lets through.
    pub fn anomalies(&self) -> Vec<Anomaly> {
        let mut found = Vec::new();

        if self.strength().is_none() {
            let raw = self
                .object
                .get(APPEAL_STRENGTH_KEY)
                .map(Value::to_string)
                .unwrap_or_default();
            found.push(Anomaly::UnknownStrength(raw));
        }

        match self.confidence_score() {
            Some(score) if !(0..=100).contains(&score) => {
                found.push(Anomaly::ScoreOutOfRange(score));
            }
            Some(_) => {}
            None => {
                let raw = self
                    .object
                    .get(CONFIDENCE_SCORE_KEY)
                    .map(Value::to_string)
                    .unwrap_or_default();
                found.push(Anomaly::NonIntegerScore(raw));
            }
        }

        found
    }
}

fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// How the assessment was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryStatus {
    /// The completion yielded a valid assessment.
    Parsed(Strategy),
    /// The fallback object was substituted.
    Fallback(RecoveryError),
}

impl RecoveryStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RecoveryStatus::Fallback(_))
    }

    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RecoveryStatus::Parsed(Strategy::Direct) => "parsed_direct",
            RecoveryStatus::Parsed(Strategy::BraceSpan) => "parsed_brace_span",
            RecoveryStatus::Fallback(_) => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub assessment: AppealAssessment,
    pub status: RecoveryStatus,
}

/// Turn completion text into an assessment, substituting the fallback on any
/// recovery or validation failure.
pub fn recover_assessment(text: &str) -> AssessmentOutcome {
    let recovered = recover_json(text).and_then(|recovered| {
        AppealAssessment::from_object(recovered.object).map(|a| (a, recovered.strategy))
    });

    match recovered {
        Ok((assessment, strategy)) => {
            for anomaly in assessment.anomalies() {
                warn!(%anomaly, "appeal assessment passed validation with unexpected value");
            }
            debug!(strategy = strategy.as_str(), "recovered appeal assessment");
            AssessmentOutcome {
                assessment,
                status: RecoveryStatus::Parsed(strategy),
            }
        }
        Err(err) => {
            debug!(error = %err, "substituting fallback appeal assessment");
            AssessmentOutcome {
                assessment: AppealAssessment::fallback(),
                status: RecoveryStatus::Fallback(err),
            }
        }
    }
}
