//! JSON extraction from free-text model output.
//!
//! Models wrap structured output in markdown fences or prose often enough
//! that every response goes through this before serde parsing.

/// Extracts the JSON payload (object or array) from a raw model response.
///
/// Returns `None` when no JSON-looking payload can be located; the caller
/// treats that as a capability response error.
pub fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    if let Some(start_idx) = trimmed.find("```json") {
        let after_fence = &trimmed[start_idx + 7..];
        if let Some(end_idx) = after_fence.find("```") {
            return Some(after_fence[..end_idx].trim());
        }
    }

    if let Some(start_idx) = trimmed.find("```") {
        let after_fence = &trimmed[start_idx + 3..];
        if let Some(end_idx) = after_fence.find("```") {
            return Some(after_fence[..end_idx].trim());
        }
    }

    // Bare payload, possibly surrounded by prose.
    let object = span(trimmed, '{', '}');
    let array = span(trimmed, '[', ']');
    match (object, array) {
        (Some(o), Some(a)) => {
            // Whichever opens first is the payload.
            if trimmed.find('{') < trimmed.find('[') {
                Some(o)
            } else {
                Some(a)
            }
        }
        (Some(o), None) => Some(o),
        (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

fn span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}
