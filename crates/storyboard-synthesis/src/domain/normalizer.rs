//! Decoding and normalization of completion output.
//!
//! The completion model is asked for `{background, panels: [{n, title,
//! prompt}]}` but nothing guarantees it complies. Individual fields are
//! defaulted leniently; only a payload that is not an object, or a `panels`
//! value that is not a list, fails the request.

use serde::Deserialize;
use serde_json::{Map, Value};
use storyboard_core::error::DomainError;
use storyboard_core::panel::{MAX_PANEL_NUMBER, PANEL_COUNT, PLACEHOLDER_PROMPT, Panel, PanelSet};
use tracing::warn;

/// Top-level completion payload with every field optional.
#[derive(Debug, Default, Deserialize)]
pub struct RawPanelSet {
    /// Background, any JSON value.
    #[serde(default)]
    pub background: Option<Value>,
    /// Expected to be a list of panel objects.
    #[serde(default)]
    pub panels: Option<Value>,
}

/// One panel entry with every field optional.
#[derive(Debug, Default)]
pub struct RawPanel {
    /// Panel number; integer, integral text, or absent.
    pub n: Option<Value>,
    /// Panel title.
    pub title: Option<Value>,
    /// Panel prompt.
    pub prompt: Option<Value>,
}

impl From<&Map<String, Value>> for RawPanel {
    fn from(map: &Map<String, Value>) -> Self {
        Self {
            n: map.get("n").cloned(),
            title: map.get("title").cloned(),
            prompt: map.get("prompt").cloned(),
        }
    }
}

fn coerce_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() < 9.0e15)
                .map(|f| {
                    #[allow(clippy::cast_possible_truncation)]
                    let truncated = f.trunc() as i64;
                    truncated
                })
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Strips a surrounding Markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    match rest.find('\n') {
        Some(idx) => rest[idx + 1..].trim(),
        None => rest.trim(),
    }
}

/// Normalizes a raw payload into exactly [`PANEL_COUNT`] panels.
///
/// Output panel `i` always corresponds to input entry `i` (or a synthesized
/// default); nothing is sorted or deduplicated.
///
/// # Errors
///
/// Returns `DomainError::InvalidUpstreamOutput` if `panels` is present but is
/// not a list.
pub fn normalize(raw: RawPanelSet) -> Result<PanelSet, DomainError> {
    let background = coerce_text(raw.background.as_ref())
        .unwrap_or_default()
        .trim()
        .to_owned();

    let entries = match raw.panels {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(DomainError::InvalidUpstreamOutput(format!(
                "expected `panels` to be a list, got {}",
                json_kind(&other)
            )));
        }
    };

    if entries.len() != PANEL_COUNT {
        warn!(
            received = entries.len(),
            expected = PANEL_COUNT,
            "completion returned an unexpected panel count"
        );
    }

    let panels = (0..PANEL_COUNT)
        .map(|i| {
            let raw_panel = match entries.get(i) {
                Some(Value::Object(map)) => RawPanel::from(map),
                _ => RawPanel::default(),
            };
            normalize_panel(i, &raw_panel)
        })
        .collect();

    Ok(PanelSet::new(background, panels))
}

fn normalize_panel(index: usize, raw: &RawPanel) -> Panel {
    let fallback = i64::try_from(index + 1).unwrap_or(i64::MAX);
    // Numbers the block grammar cannot express fall back to the slot number.
    let n = coerce_int(raw.n.as_ref())
        .filter(|n| (1..=MAX_PANEL_NUMBER).contains(n))
        .unwrap_or(fallback);
    let title = coerce_text(raw.title.as_ref()).unwrap_or_default();
    let prompt = coerce_text(raw.prompt.as_ref())
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_PROMPT.to_owned());
    Panel::new(n, &title, prompt)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Decodes raw completion content and normalizes it.
///
/// # Errors
///
/// Returns `DomainError::InvalidUpstreamOutput` if the content is not a JSON
/// object or its `panels` value is not a list.
pub fn decode_completion(content: &str) -> Result<PanelSet, DomainError> {
    let value: Value = serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        DomainError::InvalidUpstreamOutput(format!("completion content is not valid JSON: {e}"))
    })?;

    if !value.is_object() {
        return Err(DomainError::InvalidUpstreamOutput(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    let raw: RawPanelSet = serde_json::from_value(value).map_err(|e| {
        DomainError::InvalidUpstreamOutput(format!("completion payload has wrong shape: {e}"))
    })?;

    normalize(raw)
}
