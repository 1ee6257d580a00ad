//! Ordered recovery strategies.
//!
//! ```text
//! raw completion text
//!        │
//!        ▼
//! 1. strip_code_fences   ```json ... ``` and bare ``` markers removed
//!        │
//!        ▼
//! 2. parse_object        whole text as a JSON object      ──► Strategy::Direct
//!        │ (fails)
//!        ▼
//! 3. brace_span          first '{' .. last '}' inclusive   ──► Strategy::BraceSpan
//!        │ (fails)
//!        ▼
//!    RecoveryError
//! ```
//!
//! Each step is a plain function so it can be tested on its own. Callers
//! decide what a failure means; see `assessment` and `extraction`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RecoveryError;

const FENCE: &str = "```";

/// Which step produced the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The fence-stripped text parsed as-is.
    Direct,
    /// Only the outermost brace span parsed; prose was discarded.
    BraceSpan,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::BraceSpan => "brace_span",
        }
    }
}

/// A JSON object pulled out of completion text.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    pub object: Map<String, Value>,
    pub strategy: Strategy,
}

/// Remove markdown code-fence markers anywhere in `text`.
///
/// Fences alternate between opening and closing. An opening fence may carry a
/// language tag (```json, ```JSON, ```js) which is dropped with it. Runs of
/// more than three backticks count as one fence. The result is trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut opening = true;

    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = rest[pos..].trim_start_matches('`');
        if opening {
            let tag_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
                .unwrap_or(rest.len());
            rest = &rest[tag_len..];
        }
        opening = !opening;
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Parse `text` directly. Anything other than a JSON object is rejected.
pub fn parse_object(text: &str) -> Result<Map<String, Value>, RecoveryError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(RecoveryError::NotAnObject),
        Err(err) => Err(RecoveryError::Malformed(err.to_string())),
    }
}

/// Slice from the first `{` to the last `}`, both inclusive.
///
/// Greedy on purpose: with several objects in the text the span covers all of
/// them, not the first complete pair.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Run the strategies in order and return the first object found.
pub fn recover_json(text: &str) -> Result<Recovered, RecoveryError> {
    let stripped = strip_code_fences(text);
    if stripped.is_empty() {
        return Err(RecoveryError::Empty);
    }

    let direct_err = match parse_object(&stripped) {
        Ok(object) => {
            return Ok(Recovered {
                object,
                strategy: Strategy::Direct,
            })
        }
        Err(err) => err,
    };

    let span = match brace_span(&stripped) {
        Some(span) => span,
        None if direct_err == RecoveryError::NotAnObject => return Err(direct_err),
        None => return Err(RecoveryError::NoObject),
    };

    // Same text as the direct attempt; parsing it again cannot help.
    if span.len() == stripped.len() {
        return Err(direct_err);
    }

    parse_object(span).map(|object| Recovered {
        object,
        strategy: Strategy::BraceSpan,
    })
}
