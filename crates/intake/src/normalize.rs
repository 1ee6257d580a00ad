//! Field resolution for fine metadata and appeal reasons.
//!
//! Each canonical field is resolved by walking an ordered synonym list and
//! taking the first key that carries a usable value. When nothing matches, a
//! fixed placeholder is used instead. Resolution is total: there is no error
//! path in this module.

use crate::types::{
    AppealPromptInput, AppealReason, FineDetails, NormalizedAppeal, NormalizedFine,
};

/// Placeholder for any fine field the client did not send.
pub const UNKNOWN: &str = "Unknown";
/// Category used for bare-string reasons and structured reasons without one.
pub const GENERAL_CATEGORY: &str = "General";
/// Placeholder for a structured reason with no picked reason.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Placeholder for a reason without a free-text note.
pub const NO_NOTES: &str = "None provided";

pub const CONTRAVENTION_CODE_KEYS: &[&str] = &["contravention_code", "contraventionCode", "code"];
pub const LOCATION_KEYS: &[&str] = &["location", "locationAddress", "address"];
pub const DATE_KEYS: &[&str] = &["date", "time", "infractionDate"];
pub const AMOUNT_KEYS: &[&str] = &["amount", "fineAmount"];
pub const REASON_KEYS: &[&str] = &["reason", "description", "type", "allegedContravention"];

/// Resolve the five canonical fine fields.
pub fn normalize_fine_details(details: &FineDetails) -> NormalizedFine {
    let resolve = |keys: &[&str]| details.first_present(keys).unwrap_or_else(|| UNKNOWN.into());

    NormalizedFine {
        contravention_code: resolve(CONTRAVENTION_CODE_KEYS),
        location: resolve(LOCATION_KEYS),
        date: resolve(DATE_KEYS),
        amount: resolve(AMOUNT_KEYS),
        reason: resolve(REASON_KEYS),
    }
}

/// Resolve an appeal reason into category, picked reason and notes.
pub fn normalize_appeal_reason(reason: &AppealReason) -> NormalizedAppeal {
    match reason {
        AppealReason::Text(text) => NormalizedAppeal {
            category: GENERAL_CATEGORY.into(),
            selected_reason: text.clone(),
            notes: NO_NOTES.into(),
        },
        AppealReason::Structured {
            category,
            selected_reason,
            note,
        } => NormalizedAppeal {
            category: non_blank(category).unwrap_or(GENERAL_CATEGORY).into(),
            selected_reason: non_blank(selected_reason).unwrap_or(NOT_SPECIFIED).into(),
            notes: non_blank(note).unwrap_or(NO_NOTES).into(),
        },
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Build the full prompt input from a request's two payload fields.
pub fn normalize(details: &FineDetails, reason: &AppealReason) -> AppealPromptInput {
    AppealPromptInput {
        fine: normalize_fine_details(details),
        appeal: normalize_appeal_reason(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_details_resolve_to_unknown() {
        let fine = normalize_fine_details(&FineDetails::default());
        assert_eq!(fine.contravention_code, UNKNOWN);
        assert_eq!(fine.location, UNKNOWN);
        assert_eq!(fine.date, UNKNOWN);
        assert_eq!(fine.amount, UNKNOWN);
        assert_eq!(fine.reason, UNKNOWN);
    }

    #[test]
    fn synonyms_are_tried_in_order() {
        let details = FineDetails::from(json!({
            "time": "09:15 2024-01-01",
            "description": "Parked on double yellow lines",
            "type": "ignored",
            "fineAmount": 70,
            "address": "High Street",
            "code": "01"
        }));
        let fine = normalize_fine_details(&details);
        assert_eq!(fine.date, "09:15 2024-01-01");
        assert_eq!(fine.reason, "Parked on double yellow lines");
        assert_eq!(fine.amount, "70");
        assert_eq!(fine.location, "High Street");
        assert_eq!(fine.contravention_code, "01");
    }

    #[test]
    fn primary_key_wins_over_synonym() {
        let details = FineDetails::from(json!({ "date": "2024-01-01", "time": "later" }));
        assert_eq!(normalize_fine_details(&details).date, "2024-01-01");
    }

    #[test]
    fn text_reason_defaults_category_and_notes() {
        let appeal = normalize_appeal_reason(&AppealReason::from("Some text"));
        assert_eq!(appeal.category, GENERAL_CATEGORY);
        assert_eq!(appeal.selected_reason, "Some text");
        assert_eq!(appeal.notes, NO_NOTES);
    }

    #[test]
    fn structured_reason_without_selected_reason_uses_reason() {
        let appeal = normalize_appeal_reason(&AppealReason::from(json!({
            "category": "X",
            "reason": "Y"
        })));
        assert_eq!(appeal.category, "X");
        assert_eq!(appeal.selected_reason, "Y");
        assert_eq!(appeal.notes, NO_NOTES);
    }

    #[test]
    fn structured_reason_defaults_each_field_independently() {
        let appeal = normalize_appeal_reason(&AppealReason::from(json!({
            "personal_note": "I was inside for two minutes"
        })));
        assert_eq!(appeal.category, GENERAL_CATEGORY);
        assert_eq!(appeal.selected_reason, NOT_SPECIFIED);
        assert_eq!(appeal.notes, "I was inside for two minutes");
    }

    #[test]
    fn normalize_is_total_over_odd_shapes() {
        let details = FineDetails::from(json!(42));
        let reason = AppealReason::from(json!([1, 2]));
        let input = normalize(&details, &reason);
        assert_eq!(input.fine.amount, UNKNOWN);
        assert_eq!(input.appeal.selected_reason, NOT_SPECIFIED);
    }
}
