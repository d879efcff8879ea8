//! JSON Payload Extraction
//!
//! Models asked for JSON frequently wrap it in markdown code fences or
//! surround it with prose. This is a narrow preprocessing step, not a
//! parser: strip known fence markers, otherwise cut out the outermost
//! object or array, and let the caller's serde parse decide validity.

/// Extract the JSON payload from an LLM response string.
///
/// Resolution order: fenced block content, outermost `{...}`, outermost
/// `[...]`, then the trimmed text as-is.
pub fn extract_json_payload(response_text: &str) -> String {
    let trimmed = response_text.trim();

    // Fenced block (``` or ```json)
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let content_start = match after_fence.find('\n') {
            Some(nl) => nl + 1,
            None => 0,
        };
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim().to_string();
        }
    }

    // Outermost JSON object
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return trimmed[start..=end].to_string();
        }
    }

    // Outermost JSON array
    if let (Some(start), Some(end)) = (trimmed.find('['), trimmed.rfind(']')) {
        if start <= end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}
