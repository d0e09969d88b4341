//! Intent extraction from model text.
//!
//! The inference backend is not schema-constrained, so tool invocations
//! arrive embedded in prose, markdown fences, or apologetic preambles.
//! [`extract_intents`] recovers the structured form with a string-aware,
//! brace-balanced scan followed by opportunistic JSON parsing:
//!
//! 1. Any top-level object carrying an `actions` array becomes an ordered
//!    batch.
//! 2. Otherwise the first object carrying a non-empty `tool` field becomes a
//!    single intent — tried first against flat (single-level) objects, then
//!    against every balanced candidate, since nested parameter objects are
//!    common.
//!
//! The extractor never fails the caller: unparseable text is simply "no
//! intent found".

use crate::tool::entities::ToolCall;
use serde_json::Value;
use std::collections::HashMap;

/// Structured intents recovered from one model reply
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedIntents {
    /// A single `{"tool": ...}` invocation
    Single(ToolCall),
    /// An ordered `{"actions": [...]}` batch
    Batch(Vec<ToolCall>),
}

impl ExtractedIntents {
    /// Flatten into the ordered list the executor consumes.
    pub fn into_calls(self) -> Vec<ToolCall> {
        match self {
            ExtractedIntents::Single(call) => vec![call],
            ExtractedIntents::Batch(calls) => calls,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ExtractedIntents::Single(_) => 1,
            ExtractedIntents::Batch(calls) => calls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Recover structured tool intents from free-form model text.
pub fn extract_intents(text: &str) -> Option<ExtractedIntents> {
    let candidates = balanced_objects(text);

    // Pass 1: a batch wins over any single intent.
    for candidate in &candidates {
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            if let Some(actions) = value.get("actions").and_then(|v| v.as_array()) {
                let calls: Vec<ToolCall> =
                    actions.iter().filter_map(call_from_value).collect();
                if !calls.is_empty() {
                    return Some(ExtractedIntents::Batch(calls));
                }
            }
        }
    }

    // Pass 2: narrow single-level objects first, then every candidate.
    let flat = candidates.iter().filter(|c| is_single_level(c));
    let nested = candidates.iter().filter(|c| !is_single_level(c));
    for candidate in flat.chain(nested) {
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            if let Some(call) = call_from_value(&value) {
                return Some(ExtractedIntents::Single(call));
            }
        }
    }

    None
}

/// Build a [`ToolCall`] from a parsed JSON object.
///
/// Requires a non-empty `tool` string. The arguments object is accepted
/// under `parameters`, `args`, or `arguments`; a missing or non-object value
/// yields an empty parameter map rather than a rejection.
fn call_from_value(value: &Value) -> Option<ToolCall> {
    let tool = value.get("tool").and_then(|v| v.as_str())?;
    if tool.trim().is_empty() {
        return None;
    }

    let parameters: HashMap<String, Value> = ["parameters", "args", "arguments"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_object()))
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    Some(ToolCall {
        tool_name: tool.to_string(),
        parameters,
    })
}

/// Collect every top-level balanced `{...}` slice in `text`.
///
/// The scan is string-aware: braces inside JSON string literals (and their
/// escape sequences) do not affect the depth count, so prose like
/// `{"content": "use {braces} freely"}` is captured whole.
fn balanced_objects(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        objects.push(&text[start..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    objects
}

/// True when the object slice contains no nested braces.
fn is_single_level(candidate: &str) -> bool {
    candidate.matches('{').count() == 1
}

/// Fixed keyword list for the "did the user ask for an action?" heuristic.
///
/// Substring matching over- and under-triggers by design; this drives only
/// the one-shot retry branch, never execution itself.
const ACTION_KEYWORDS: &[&str] = &[
    "create", "make", "write", "delete", "remove", "move", "rename", "copy",
    "run", "execute", "launch", "list", "search", "find", "read", "open",
    "append", "replace", "mkdir", "directory", "folder", "file",
];

/// Heuristic: does this user message look like a request to act?
pub fn looks_like_action_request(message: &str) -> bool {
    let lower = message.to_lowercase();
    ACTION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Does the reply already carry recognizable intent markers?
///
/// Used to suppress the stricter retry when the model clearly tried to emit
/// an invocation and produced something malformed instead.
pub fn has_intent_markers(reply: &str) -> bool {
    reply.contains("\"tool\"") || reply.contains("\"actions\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_intent_from_prose() {
        let text = r#"Sure, I can do that!

{"tool": "create_file", "parameters": {"filepath": "a.txt", "content": "hi"}}

Let me know if you need anything else."#;

        let intents = extract_intents(text).unwrap();
        match intents {
            ExtractedIntents::Single(call) => {
                assert_eq!(call.tool_name, "create_file");
                assert_eq!(call.get_string("filepath"), Some("a.txt"));
                assert_eq!(call.get_string("content"), Some("hi"));
            }
            other => panic!("expected single intent, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_batch() {
        let text = r#"I'll do this in three steps:
{"actions": [
  {"tool": "create_directory", "parameters": {"path": "out"}},
  {"tool": "create_file", "parameters": {"filepath": "out/a.txt", "content": "1"}},
  {"tool": "read_file", "parameters": {"filepath": "out/a.txt"}}
]}"#;

        let intents = extract_intents(text).unwrap();
        match intents {
            ExtractedIntents::Batch(calls) => {
                assert_eq!(calls.len(), 3);
                assert_eq!(calls[0].tool_name, "create_directory");
                assert_eq!(calls[2].tool_name, "read_file");
            }
            other => panic!("expected batch, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_wins_over_earlier_single() {
        let text = r#"
{"tool": "read_file", "parameters": {"filepath": "a.txt"}}
{"actions": [{"tool": "create_file", "parameters": {"filepath": "b.txt"}}]}
"#;
        let intents = extract_intents(text).unwrap();
        assert!(matches!(intents, ExtractedIntents::Batch(_)));
    }

    #[test]
    fn test_malformed_batch_elements_are_dropped() {
        let text = r#"{"actions": [
  {"tool": "create_file", "parameters": {"filepath": "a.txt"}},
  {"no_tool_here": true},
  {"tool": ""}
]}"#;
        let intents = extract_intents(text).unwrap();
        assert_eq!(intents.len(), 1);
    }

    #[test]
    fn test_all_malformed_batch_is_no_intent() {
        let text = r#"{"actions": [{"bogus": 1}, {"tool": ""}]}"#;
        assert_eq!(extract_intents(text), None);
    }

    #[test]
    fn test_braces_inside_strings_do_not_split_objects() {
        let text = r#"{"tool": "create_file", "parameters": {"filepath": "a.rs", "content": "fn main() { println!(\"{}\", 1); }"}}"#;

        let intents = extract_intents(text).unwrap();
        match intents {
            ExtractedIntents::Single(call) => {
                assert_eq!(
                    call.get_string("content"),
                    Some("fn main() { println!(\"{}\", 1); }")
                );
            }
            other => panic!("expected single intent, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_parameters_survive_balanced_scan() {
        // A naive first-"}"-match would truncate the nested object.
        let text = r#"{"tool": "find_replace", "parameters": {"filepath": "x.txt", "options": {"regex": true}}}"#;
        let intents = extract_intents(text).unwrap();
        match intents {
            ExtractedIntents::Single(call) => {
                assert_eq!(call.tool_name, "find_replace");
                assert!(call.parameters.contains_key("options"));
            }
            other => panic!("expected single intent, got {:?}", other),
        }
    }

    #[test]
    fn test_args_and_arguments_aliases() {
        for key in ["args", "arguments"] {
            let text = format!(r#"{{"tool": "read_file", "{}": {{"filepath": "a"}}}}"#, key);
            let intents = extract_intents(&text).unwrap();
            match intents {
                ExtractedIntents::Single(call) => {
                    assert_eq!(call.get_string("filepath"), Some("a"))
                }
                other => panic!("expected single intent, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_plain_prose_returns_none() {
        assert_eq!(extract_intents("The weather is nice today."), None);
        assert_eq!(
            extract_intents("Here is some JSON-ish prose: use {braces} carefully."),
            None
        );
    }

    #[test]
    fn test_json_without_tool_key_returns_none() {
        assert_eq!(extract_intents(r#"{"status": "ok", "count": 3}"#), None);
    }

    #[test]
    fn test_empty_tool_name_is_rejected() {
        assert_eq!(extract_intents(r#"{"tool": "", "parameters": {}}"#), None);
    }

    #[test]
    fn test_missing_parameters_yield_empty_map() {
        let intents = extract_intents(r#"{"tool": "list_directory"}"#).unwrap();
        match intents {
            ExtractedIntents::Single(call) => assert!(call.parameters.is_empty()),
            other => panic!("expected single intent, got {:?}", other),
        }
    }

    #[test]
    fn test_extraction_is_idempotent_on_well_formed_input() {
        let text = r#"prose {"tool": "create_file", "parameters": {"filepath": "a.txt", "content": "hi"}} prose"#;
        let a = extract_intents(text).unwrap();
        let b = extract_intents(text).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_first_parseable_tool_object_wins() {
        let text = r#"
{"broken": }
{"tool": "read_file", "parameters": {"filepath": "first.txt"}}
{"tool": "read_file", "parameters": {"filepath": "second.txt"}}
"#;
        let intents = extract_intents(text).unwrap();
        match intents {
            ExtractedIntents::Single(call) => {
                assert_eq!(call.get_string("filepath"), Some("first.txt"))
            }
            other => panic!("expected single intent, got {:?}", other),
        }
    }

    #[test]
    fn test_looks_like_action_request() {
        assert!(looks_like_action_request("please create a file called a.txt"));
        assert!(looks_like_action_request("DELETE the temp folder"));
        assert!(!looks_like_action_request("how are you today?"));
    }

    #[test]
    fn test_has_intent_markers() {
        assert!(has_intent_markers(r#"{"tool": "oops", incomplete"#));
        assert!(has_intent_markers(r#"{"actions": [broken"#));
        assert!(!has_intent_markers("no structured content here"));
    }

    #[test]
    fn test_into_calls_flattens() {
        let single = ExtractedIntents::Single(ToolCall::new("read_file"));
        assert_eq!(single.into_calls().len(), 1);

        let batch = ExtractedIntents::Batch(vec![
            ToolCall::new("read_file"),
            ToolCall::new("create_file"),
        ]);
        assert_eq!(batch.into_calls().len(), 2);
    }
}
