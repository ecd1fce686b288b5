use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::services::gateway_client::CompletionReply;

/// Greedy span from the first `{` to the last `}`; the cheap middle tier
/// between direct parsing and character-level salvage.
static BRACE_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("BRACE_SPAN_RE is a valid regex pattern"));

/// Result of the tiered recovery ladder. `Salvaged` means a valid JSON
/// prefix was cut out of truncated output; callers treat it like `Parsed`
/// but the distinction is kept for logging.
#[derive(Clone, Debug, PartialEq)]
pub enum Normalized {
    Parsed(Value),
    Salvaged(Value),
    Unparseable,
}

impl Normalized {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Normalized::Parsed(v) | Normalized::Salvaged(v) => Some(v),
            Normalized::Unparseable => None,
        }
    }
}

/// Recover a JSON object from a completion, trying the cheapest and most
/// trustworthy source first:
///
/// 1. tool-call arguments, parsed directly (provider-validated JSON);
/// 2. the text with surrounding code fences stripped, parsed directly;
/// 3. the first `{...}` span in the text;
/// 4. brace-balance salvage of a valid leading object from truncated text.
///
/// Anything that survives none of these is `Unparseable`; the raw text is
/// the caller's to keep, never to fabricate structure from.
pub fn normalize(reply: &CompletionReply) -> Normalized {
    if let Some(args) = reply.tool_args.as_deref() {
        if let Ok(value) = serde_json::from_str::<Value>(args) {
            if value.is_object() {
                return Normalized::Parsed(value);
            }
        }
        log::debug!("tool-call arguments were not a clean JSON object, trying text recovery");
    }

    // A malformed tool-call blob is still raw material for the lower
    // tiers when no text came back alongside it.
    let raw = match reply.text.as_deref().or(reply.tool_args.as_deref()) {
        Some(raw) => raw,
        None => return Normalized::Unparseable,
    };

    let stripped = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        if value.is_object() {
            return Normalized::Parsed(value);
        }
    }

    if let Some(found) = BRACE_SPAN_RE.find(stripped) {
        if let Ok(value) = serde_json::from_str::<Value>(found.as_str()) {
            if value.is_object() {
                return Normalized::Parsed(value);
            }
        }
    }

    if let Some(prefix) = salvage_balanced(stripped) {
        if let Ok(value) = serde_json::from_str::<Value>(prefix) {
            if value.is_object() {
                log::debug!("salvaged a {}-byte JSON prefix from a truncated reply", prefix.len());
                return Normalized::Salvaged(value);
            }
        }
    }

    Normalized::Unparseable
}

/// Strip a leading and trailing Markdown code fence (```` ``` ```` or
/// ```` ```json ````) without touching anything else.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the language tag line ("json", "JSON", or empty)
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };

    let body = body.trim_end();
    body.strip_suffix("```").map(str::trim_end).unwrap_or(body).trim()
}

/// Scan for the longest leading balanced `{...}` span, tracking string
/// and escape state so braces inside JSON strings do not confuse the
/// depth counter. Returns the span from the first `{` to the character
/// where depth first returns to zero.
fn salvage_balanced(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::text_reply;

    #[test]
    fn test_tool_args_take_priority_over_text() {
        let reply = CompletionReply {
            text: Some("ignore this".to_string()),
            tool_args: Some(r#"{"variations":[]}"#.to_string()),
        };

        let normalized = normalize(&reply);
        assert_eq!(
            normalized,
            Normalized::Parsed(serde_json::json!({ "variations": [] }))
        );
    }

    #[test]
    fn test_clean_json_is_returned_unchanged() {
        let raw = r#"{"a":1,"b":{"c":2}}"#;
        let normalized = normalize(&text_reply(raw));

        // Idempotence: same object as a direct parse
        let direct: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(normalized, Normalized::Parsed(direct));
    }

    #[test]
    fn test_code_fences_are_stripped() {
        let raw = "```json\n{\"a\": 1}\n```";
        let normalized = normalize(&text_reply(raw));

        assert_eq!(normalized, Normalized::Parsed(serde_json::json!({ "a": 1 })));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(
            normalize(&text_reply(raw)),
            Normalized::Parsed(serde_json::json!({ "a": 1 }))
        );
    }

    #[test]
    fn test_object_embedded_in_prose_is_extracted() {
        let raw = "Here is your document:\n{\"a\": 1}\nHope that helps!";
        assert_eq!(
            normalize(&text_reply(raw)),
            Normalized::Parsed(serde_json::json!({ "a": 1 }))
        );
    }

    #[test]
    fn test_truncated_output_is_salvaged() {
        let raw = r#"{"a":1,"b":{"c":2}}GARBAGE"#;
        let normalized = normalize(&text_reply(raw));

        // The greedy span fails (trailing garbage after the last `}` is
        // absent here, but `{...}GARBAGE` has no later brace), so the
        // balanced scan recovers exactly the leading object.
        assert_eq!(
            normalized.value().cloned(),
            Some(serde_json::json!({ "a": 1, "b": { "c": 2 } }))
        );
    }

    #[test]
    fn test_over_closed_output_recovers_whole_leading_object() {
        // A stray closing brace after the object defeats the greedy span,
        // so this lands in the balanced-scan tier.
        let raw = r#"{"variations":[{"theme":"x","results":[]}]}]}"#;
        let normalized = normalize(&text_reply(raw));

        assert_eq!(
            normalized,
            Normalized::Salvaged(
                serde_json::json!({ "variations": [{ "theme": "x", "results": [] }] })
            )
        );
    }

    #[test]
    fn test_braces_inside_strings_do_not_break_salvage() {
        let raw = r#"{"a":"open { brace","b":1} }"#;
        assert_eq!(
            normalize(&text_reply(raw)).value().cloned(),
            Some(serde_json::json!({ "a": "open { brace", "b": 1 }))
        );
    }

    #[test]
    fn test_salvage_balanced_recovers_exact_leading_object() {
        assert_eq!(
            salvage_balanced(r#"{"a":1,"b":{"c":2}}GARBAGE"#),
            Some(r#"{"a":1,"b":{"c":2}}"#)
        );
    }

    #[test]
    fn test_salvage_balanced_gives_up_on_unclosed_objects() {
        assert_eq!(salvage_balanced(r#"{"a":{"b":1},"c":{"d":"#), None);
        assert_eq!(salvage_balanced("no braces here"), None);
    }

    #[test]
    fn test_plain_prose_is_unparseable() {
        let raw = "I could not produce the document you asked for.";
        assert_eq!(normalize(&text_reply(raw)), Normalized::Unparseable);
    }

    #[test]
    fn test_empty_reply_is_unparseable() {
        assert_eq!(normalize(&CompletionReply::default()), Normalized::Unparseable);
    }

    #[test]
    fn test_malformed_tool_args_fall_back_to_salvage() {
        let reply = CompletionReply {
            text: None,
            tool_args: Some(r#"{"variations":[]}{{"#.to_string()),
        };

        assert_eq!(
            normalize(&reply).value().cloned(),
            Some(serde_json::json!({ "variations": [] }))
        );
    }

    #[test]
    fn test_top_level_array_is_not_accepted_as_object() {
        assert_eq!(normalize(&text_reply("[1,2,3]")), Normalized::Unparseable);
    }
}
