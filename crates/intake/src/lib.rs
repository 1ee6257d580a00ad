//! Finecheck intake layer
//!
//! This is where appeal requests enter the system. Mobile and web clients have
//! sent fine metadata and appeal reasons in a few different shapes over time,
//! so we accept all of them and flatten them into one record of display
//! strings that the prompt can embed.
//!
//! ## What we do here
//!
//! - **Accept any shape** - `fineDetails` is an open mapping; `appealReason` is
//!   either a bare string or a form object. Anything else still deserializes.
//! - **Resolve synonyms** - `date` or `time`, `reason` or `description` or
//!   `type`, and so on. First usable key wins.
//! - **Fill placeholders** - `"Unknown"`, `"General"`, `"None provided"`.
//!   Normalization never fails.
//! - **Build prompts** - the appeal instruction and the fine-notice extraction
//!   instruction.
//!
//! ## Example
//!
//! ```
//! use intake::{normalize, appeal_prompt, AppealReason, FineDetails};
//! use serde_json::json;
//!
//! let details = FineDetails::from(json!({ "location": "Main St", "amount": 60 }));
//! let reason = AppealReason::from("Medical emergency");
//!
//! let input = normalize(&details, &reason);
//! assert_eq!(input.fine.amount, "60");
//! assert_eq!(input.fine.date, "Unknown");
//! assert_eq!(input.appeal.category, "General");
//!
//! let prompt = appeal_prompt(&input);
//! assert!(prompt.contains("Medical emergency"));
//! ```

mod normalize;
mod prompt;
mod types;

pub use crate::normalize::{
    normalize_appeal_reason, normalize_fine_details, AMOUNT_KEYS, CONTRAVENTION_CODE_KEYS,
    DATE_KEYS, GENERAL_CATEGORY, LOCATION_KEYS, NOT_SPECIFIED, NO_NOTES, REASON_KEYS, UNKNOWN,
};
pub use crate::prompt::{appeal_prompt, extraction_prompt};
pub use crate::types::{
    AppealPromptInput, AppealReason, FineDetails, NormalizedAppeal, NormalizedFine,
};

use tracing::debug;

/// Normalize a request's fine details and appeal reason into prompt input.
pub fn normalize(details: &FineDetails, reason: &AppealReason) -> AppealPromptInput {
    let input = normalize::normalize(details, reason);
    debug!(
        fine_keys = details.keys().count(),
        reason_shape = reason.shape(),
        location_known = input.fine.location != UNKNOWN,
        date_known = input.fine.date != UNKNOWN,
        "normalized appeal request"
    );
    input
}
