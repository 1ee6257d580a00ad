//! Finecheck recovery layer
//!
//! The completion provider is asked for pure JSON and frequently does not
//! deliver it: replies arrive wrapped in markdown fences, prefixed with
//! "Sure! Here's the analysis:", or followed by a polite sign-off. This crate
//! gets a JSON object out of that text without asking the provider again.
//!
//! Recovery is layered, not best-effort. The strategies in [`strategy`] run in
//! a fixed order (fence strip, direct parse, outermost brace span) and each is
//! exposed on its own. On top of them sit two policies with different
//! granularity:
//!
//! - **Appeal assessment** ([`recover_assessment`]) - all-or-nothing. Any
//!   failure, including a missing required key, yields the fixed fallback
//!   object. Never errors.
//! - **Fine extraction** ([`recover_extraction`]) - per field. Missing keys
//!   become `""`; only a completion with no object at all is an error.
//!
//! ## Example
//!
//! ```
//! use recover::{recover_assessment, RecoveryStatus, Strategy};
//!
//! let text = "```json\n{\"appeal_strength\":\"strong\",\"confidence_score\":80,\
//!             \"reasoning_summary\":\"Medical emergencies are commonly accepted.\"}\n```";
//! let outcome = recover_assessment(text);
//! assert_eq!(outcome.status, RecoveryStatus::Parsed(Strategy::Direct));
//! assert_eq!(outcome.assessment.confidence_score(), Some(80));
//! ```

pub mod assessment;
pub mod error;
pub mod extraction;
pub mod strategy;

pub use crate::assessment::{
    recover_assessment, Anomaly, AppealAssessment, AppealStrength, AssessmentOutcome,
    RecoveryStatus, FALLBACK_CONFIDENCE, FALLBACK_REASONING, REQUIRED_ASSESSMENT_KEYS,
};
pub use crate::error::RecoveryError;
pub use crate::extraction::{recover_extraction, ExtractedFineData, ExtractionOutcome};
pub use crate::strategy::{
    brace_span, parse_object, recover_json, strip_code_fences, Recovered, Strategy,
};
