use shared::types::MaintenanceRecord;
use crate::error::PipelineError;

/// Strip a Markdown code fence wrapped around the model's answer.
///
/// Compatibility shim: some backends ignore the JSON-only response format and
/// fence their output anyway. Not part of any contract; unfenced text passes
/// through trimmed.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("json", "JSON", ...) up to the end of the fence line
        text = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse the completion text into maintenance records. All-or-nothing: any
/// malformed element fails the whole set, and the error keeps `raw` verbatim.
pub fn parse_records(raw: &str) -> Result<Vec<MaintenanceRecord>, PipelineError> {
    serde_json::from_str(strip_fences(raw)).map_err(|source| PipelineError::ResponseParse {
        source,
        raw: raw.to_string(),
    })
}
