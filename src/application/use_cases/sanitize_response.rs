const FENCE: &str = "```";

/// Strip formatting the model may wrap around its answer.
///
/// A leading code fence (with or without a language tag) and the matching
/// closing fence are removed; otherwise the text is only trimmed. Returns
/// `None` when nothing usable is left, so callers can tell "no answer" apart
/// from "answer that is not JSON".
pub fn sanitize_response(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();

    let candidate = match trimmed.strip_prefix(FENCE) {
        Some(rest) => strip_fence_body(rest),
        None => trimmed,
    };

    if candidate.is_empty() {
        None
    } else {
        Some(candidate)
    }
}

fn strip_fence_body(rest: &str) -> &str {
    // Language tag, e.g. ```json or ``` json
    let rest = rest.trim_start_matches([' ', '\t']);
    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+'))
        .unwrap_or(rest.len());
    let body = &rest[tag_len..];

    // A truncated answer may lack the closing fence.
    let body = body.trim_end();
    let body = body.strip_suffix(FENCE).unwrap_or(body);

    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"color\":\"red\"}\n```";
        assert_eq!(sanitize_response(raw), Some("{\"color\":\"red\"}"));
    }

    #[test]
    fn strips_bare_fence_and_surrounding_whitespace() {
        let raw = "  \n```\n{\"brand\": \"Acme\"}\n```\n ";
        assert_eq!(sanitize_response(raw), Some("{\"brand\": \"Acme\"}"));
    }

    #[test]
    fn strips_single_line_fence() {
        assert_eq!(sanitize_response("```json{\"a\":1}```"), Some("{\"a\":1}"));
    }

    #[test]
    fn skips_blanks_before_the_language_tag() {
        let raw = "``` json\n{\"color\":\"red\"}\n```";
        assert_eq!(sanitize_response(raw), Some("{\"color\":\"red\"}"));
        assert_eq!(sanitize_response("```\tjson\n{\"a\":1}\n```"), Some("{\"a\":1}"));
    }

    #[test]
    fn tolerates_missing_closing_fence() {
        assert_eq!(sanitize_response("```json\n{\"a\":"), Some("{\"a\":"));
    }

    #[test]
    fn plain_text_is_only_trimmed() {
        assert_eq!(sanitize_response("  {\"a\":1}\n"), Some("{\"a\":1}"));
        assert_eq!(sanitize_response("Sure! {\"a\":1}"), Some("Sure! {\"a\":1}"));
    }

    #[test]
    fn empty_answers_are_none() {
        assert_eq!(sanitize_response(""), None);
        assert_eq!(sanitize_response("   \n"), None);
        assert_eq!(sanitize_response("```json\n```"), None);
        assert_eq!(sanitize_response("``````"), None);
    }
}
