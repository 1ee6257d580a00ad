//! Request-side data model for the intake crate.
//!
//! Clients send fine metadata and appeal reasons in several shapes. The types
//! here accept any JSON value so that normalization never has to fail:
//!
//! ```text
//! fineDetails  (any JSON)  ──► FineDetails   (open key/value mapping)
//! appealReason (any JSON)  ──► AppealReason  ├── Text(String)
//!                                            └── Structured { category, selected_reason, note }
//!
//!         ↓ normalize()
//!
//! AppealPromptInput
//! ├── fine:   NormalizedFine   (five display strings)
//! └── appeal: NormalizedAppeal (three display strings)
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attributes describing a parking fine, exactly as the client sent them.
///
/// No schema is enforced. A payload that is not a JSON object becomes an empty
/// mapping, so every canonical field later resolves to its placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct FineDetails {
    fields: Map<String, Value>,
}

impl FineDetails {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// First synonym whose value renders to a usable display string.
    pub fn first_present(&self, synonyms: &[&str]) -> Option<String> {
        synonyms
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(display_value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Value> for FineDetails {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

impl From<FineDetails> for Value {
    fn from(details: FineDetails) -> Self {
        Value::Object(details.fields)
    }
}

/// The reason a driver gives for appealing, in either of the two shapes
/// clients send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AppealReason {
    /// A bare string: the reason text itself.
    Text(String),
    /// A form submission with a category, a picked reason and an optional note.
    Structured {
        category: Option<String>,
        selected_reason: Option<String>,
        note: Option<String>,
    },
}

impl AppealReason {
    /// Short label for logs. Never includes the reason text.
    pub fn shape(&self) -> &'static str {
        match self {
            AppealReason::Text(_) => "text",
            AppealReason::Structured { .. } => "structured",
        }
    }

    /// `true` only for text that is empty after trimming. A structured reason
    /// is never blank, even with every field absent; normalization fills it.
    pub fn is_blank(&self) -> bool {
        match self {
            AppealReason::Text(text) => text.trim().is_empty(),
            AppealReason::Structured { .. } => false,
        }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let pick = |keys: &[&str]| keys.iter().find_map(|k| object.get(*k).and_then(display_value));
        AppealReason::Structured {
            category: pick(&["category"]),
            selected_reason: pick(&["selected_reason", "reason"]),
            note: pick(&["user_note", "personal_note"]),
        }
    }
}

impl From<Value> for AppealReason {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => AppealReason::Text(text),
            Value::Object(object) => AppealReason::from_object(&object),
            Value::Number(n) => AppealReason::Text(n.to_string()),
            Value::Bool(b) => AppealReason::Text(b.to_string()),
            Value::Null | Value::Array(_) => AppealReason::Structured {
                category: None,
                selected_reason: None,
                note: None,
            },
        }
    }
}

impl From<&str> for AppealReason {
    fn from(text: &str) -> Self {
        AppealReason::Text(text.to_string())
    }
}

impl From<AppealReason> for Value {
    fn from(reason: AppealReason) -> Self {
        match reason {
            AppealReason::Text(text) => Value::String(text),
            AppealReason::Structured {
                category,
                selected_reason,
                note,
            } => {
                let mut object = Map::new();
                if let Some(category) = category {
                    object.insert("category".into(), Value::String(category));
                }
                if let Some(reason) = selected_reason {
                    object.insert("selected_reason".into(), Value::String(reason));
                }
                if let Some(note) = note {
                    object.insert("user_note".into(), Value::String(note));
                }
                Value::Object(object)
            }
        }
    }
}

/// Canonical fine fields as display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedFine {
    pub contravention_code: String,
    pub location: String,
    pub date: String,
    pub amount: String,
    pub reason: String,
}

/// Canonical appeal fields as display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedAppeal {
    pub category: String,
    pub selected_reason: String,
    pub notes: String,
}

/// Everything the appeal prompt embeds. Never returned to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppealPromptInput {
    pub fine: NormalizedFine,
    pub appeal: NormalizedAppeal,
}

/// Render a JSON scalar as prompt text. Blank strings, null, arrays and
/// objects count as absent.
pub(crate) fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fine_details_from_non_object_is_empty() {
        let details: FineDetails = serde_json::from_value(json!("not an object")).unwrap();
        assert!(details.is_empty());

        let details: FineDetails = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert!(details.is_empty());
    }

    #[test]
    fn first_present_skips_blank_and_null() {
        let details = FineDetails::from(json!({
            "date": "   ",
            "time": null,
            "infractionDate": "2024-03-02"
        }));
        assert_eq!(
            details.first_present(&["date", "time", "infractionDate"]),
            Some("2024-03-02".to_string())
        );
    }

    #[test]
    fn numbers_render_as_text() {
        let details = FineDetails::from(json!({ "amount": 60 }));
        assert_eq!(details.first_present(&["amount"]), Some("60".to_string()));
    }

    #[test]
    fn appeal_reason_string_is_text_variant() {
        let reason: AppealReason = serde_json::from_value(json!("Medical emergency")).unwrap();
        assert_eq!(reason, AppealReason::Text("Medical emergency".into()));
        assert_eq!(reason.shape(), "text");
    }

    #[test]
    fn appeal_reason_object_prefers_selected_reason_and_user_note() {
        let reason = AppealReason::from(json!({
            "category": "Signage",
            "selected_reason": "Sign obscured",
            "reason": "ignored",
            "user_note": "Photo attached",
            "personal_note": "ignored too"
        }));
        assert_eq!(
            reason,
            AppealReason::Structured {
                category: Some("Signage".into()),
                selected_reason: Some("Sign obscured".into()),
                note: Some("Photo attached".into()),
            }
        );
    }

    #[test]
    fn appeal_reason_object_falls_back_to_secondary_keys() {
        let reason = AppealReason::from(json!({
            "category": "X",
            "reason": "Y",
            "personal_note": "Z"
        }));
        assert_eq!(
            reason,
            AppealReason::Structured {
                category: Some("X".into()),
                selected_reason: Some("Y".into()),
                note: Some("Z".into()),
            }
        );
    }

    #[test]
    fn blank_detection() {
        assert!(AppealReason::from("  ").is_blank());
        assert!(AppealReason::from("").is_blank());
        assert!(!AppealReason::from("Broken meter").is_blank());
        assert!(!AppealReason::from(json!({})).is_blank());
        assert!(!AppealReason::from(json!({ "category": "Signage" })).is_blank());
    }

    #[test]
    fn structured_reason_serializes_with_canonical_keys() {
        let reason = AppealReason::Structured {
            category: Some("Signage".into()),
            selected_reason: None,
            note: Some("n".into()),
        };
        assert_eq!(
            serde_json::to_value(reason).unwrap(),
            json!({ "category": "Signage", "user_note": "n" })
        );
    }
}
