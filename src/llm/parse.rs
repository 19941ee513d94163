// ABOUTME: Tolerant parsing of free-form model replies into step lists.
// ABOUTME: An ordered chain of strategies; the first one that yields a result wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Fenced code block, optionally tagged json/javascript/typescript.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json|javascript|typescript)?\r?\n((?s:.*?))\r?\n```")
        .expect("code fence pattern is valid")
});

/// A single parsing strategy. `None` means "not applicable, try the next one".
pub type StepStrategy = fn(&str) -> Option<Vec<String>>;

/// Strategies in precedence order.
pub const STEP_STRATEGIES: &[StepStrategy] = &[parse_json_reply, parse_code_fence, split_lines];

/// Parse a reply into an ordered list of steps. Never fails: the last strategy
/// always applies, so the worst case is the non-blank lines of the reply.
pub fn parse_step_list(reply: &str) -> Vec<String> {
    STEP_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(reply))
        .unwrap_or_default()
}

/// Whole reply as JSON. An array yields its elements; any other JSON value
/// yields the raw reply as a single step.
pub fn parse_json_reply(reply: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(reply).ok()? {
        Value::Array(items) => Some(items.into_iter().map(value_to_step).collect()),
        _ => Some(vec![reply.to_string()]),
    }
}

/// First fenced code block. Its body is parsed as a JSON array, or split into
/// non-blank lines when it is not one.
pub fn parse_code_fence(reply: &str) -> Option<Vec<String>> {
    let body = CODE_FENCE.captures(reply)?.get(1)?.as_str();

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => Some(items.into_iter().map(value_to_step).collect()),
        _ => Some(non_blank_lines(body)),
    }
}

/// Non-blank lines of the reply, in order. Always applies.
pub fn split_lines(reply: &str) -> Option<Vec<String>> {
    Some(non_blank_lines(reply))
}

fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn value_to_step(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array_returned_exactly() {
        let reply = r##"["await page.click(\"#go\");"]"##;
        assert_eq!(parse_step_list(reply), vec![r##"await page.click("#go");"##]);
    }

    #[test]
    fn test_empty_json_array() {
        assert!(parse_step_list("[]").is_empty());
    }

    #[test]
    fn test_non_string_array_items_are_stringified() {
        let steps = parse_step_list(r#"["a", 2, {"k": true}]"#);
        assert_eq!(steps, vec!["a", "2", r#"{"k":true}"#]);
    }

    #[test]
    fn test_json_object_wraps_raw_reply() {
        let reply = "{\"step\": \"click\"}";
        assert_eq!(parse_step_list(reply), vec![reply]);
    }

    #[test]
    fn test_json_scalar_wraps_raw_reply() {
        assert_eq!(parse_step_list(" 42 "), vec![" 42 "]);
    }

    #[test]
    fn test_fenced_json_array_with_prose() {
        let reply = "Here are your steps:\n```json\n[\"await page.goto('/')\", \"await page.click('#go')\"]\n```\nGood luck!";
        assert_eq!(
            parse_step_list(reply),
            vec!["await page.goto('/')", "await page.click('#go')"]
        );
    }

    #[test]
    fn test_untagged_fence() {
        let reply = "Steps:\n```\n[\"one\"]\n```";
        assert_eq!(parse_step_list(reply), vec!["one"]);
    }

    #[test]
    fn test_fence_with_code_falls_back_to_lines() {
        let reply = "Try this:\n```typescript\nawait page.goto('/');\n\nawait page.click('#go');\n```";
        assert_eq!(
            parse_step_list(reply),
            vec!["await page.goto('/');", "await page.click('#go');"]
        );
    }

    #[test]
    fn test_only_first_fence_is_used() {
        let reply = "```json\n[\"first\"]\n```\nand\n```json\n[\"second\"]\n```";
        assert_eq!(parse_step_list(reply), vec!["first"]);
    }

    #[test]
    fn test_plain_text_splits_non_blank_lines() {
        let reply = "1. Open the page\n\n   \n2. Click go\n3. Check result\n";
        assert_eq!(
            parse_step_list(reply),
            vec!["1. Open the page", "2. Click go", "3. Check result"]
        );
    }

    #[test]
    fn test_lines_keep_their_indentation() {
        assert_eq!(parse_step_list("  a\nb"), vec!["  a", "b"]);
    }

    #[test]
    fn test_empty_and_blank_replies() {
        assert!(parse_step_list("").is_empty());
        assert!(parse_step_list("  \n\t\n").is_empty());
    }

    #[test]
    fn test_strategies_are_independent() {
        assert!(parse_json_reply("not json").is_none());
        assert!(parse_code_fence("no fence here").is_none());
        assert_eq!(split_lines("x\n\ny"), Some(vec!["x".into(), "y".into()]));
    }

    #[test]
    fn test_crlf_fence() {
        let reply = "```json\r\n[\"a\"]\r\n```";
        assert_eq!(parse_code_fence(reply), Some(vec!["a".to_string()]));
    }
}
