//! Fine-notice extraction recovery policy.
//!
//! Unlike the appeal path there is no single safe substitute here: without an
//! object to read keys from there is nothing to return, so total recovery
//! failure is an error. Once an object is found, each missing key is filled
//! with an empty string on its own.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecoveryError;
use crate::strategy::{recover_json, Strategy};

pub const FINE_AMOUNT_KEY: &str = "fineAmount";
pub const INFRACTION_DATE_KEY: &str = "infractionDate";
pub const LOCATION_ADDRESS_KEY: &str = "locationAddress";
pub const CAR_REGISTRATION_KEY: &str = "carRegistration";
pub const FINE_REFERENCE_NUMBER_KEY: &str = "fineReferenceNumber";
pub const ALLEGED_CONTRAVENTION_KEY: &str = "allegedContravention";

/// Fields read off a photographed fine notice. Never null on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFineData {
    pub fine_amount: String,
    pub infraction_date: String,
    pub location_address: String,
    pub car_registration: String,
    pub fine_reference_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alleged_contravention: Option<String>,
}

impl ExtractedFineData {
    /// Read every field from `object`. Returns the data and the required keys
    /// that had to be defaulted to `""`.
    pub fn from_object(object: &Map<String, Value>) -> (Self, Vec<&'static str>) {
        let mut defaulted = Vec::new();
        let mut required = |key: &'static str| match object.get(key).and_then(text_value) {
            Some(text) => text,
            None => {
                defaulted.push(key);
                String::new()
            }
        };

        let data = ExtractedFineData {
            fine_amount: required(FINE_AMOUNT_KEY),
            infraction_date: required(INFRACTION_DATE_KEY),
            location_address: required(LOCATION_ADDRESS_KEY),
            car_registration: required(CAR_REGISTRATION_KEY),
            fine_reference_number: required(FINE_REFERENCE_NUMBER_KEY),
            alleged_contravention: object.get(ALLEGED_CONTRAVENTION_KEY).and_then(text_value),
        };

        (data, defaulted)
    }
}

/// Strings pass through untouched, other scalars are rendered, null is absent.
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub data: ExtractedFineData,
    pub strategy: Strategy,
    /// Required keys the completion did not supply.
    pub defaulted: Vec<&'static str>,
}

impl ExtractionOutcome {
    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match (self.strategy, self.defaulted.is_empty()) {
            (Strategy::Direct, true) => "parsed_direct",
            (Strategy::BraceSpan, true) => "parsed_brace_span",
            (_, false) => "partial",
        }
    }
}

/// Recover extracted fine fields from completion text.
pub fn recover_extraction(text: &str) -> Result<ExtractionOutcome, RecoveryError> {
    let recovered = recover_json(text)?;
    let (data, defaulted) = ExtractedFineData::from_object(&recovered.object);
    Ok(ExtractionOutcome {
        data,
        strategy: recovered.strategy,
        defaulted,
    })
}
