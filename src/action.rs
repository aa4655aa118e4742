//! Action grammar parser
//!
//! The model is instructed to propose tool calls as single lines of the form
//! `Action: tool_name(param1="value1", param2="value2")`. This module turns
//! that semi-structured text into a [`ToolInvocation`].

use crate::models::ToolInvocation;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    /// One `Action:` line ending in a parenthesized argument list. The first
    /// match in the response wins; additional Action lines are ignored.
    static ref ACTION_RE: Regex =
        Regex::new(r#"(?m)Action:\s*(\w+)\((.*?)\)\s*$"#).expect("action pattern is valid");

    /// Named arguments: `name="value"` where the value may contain escaped
    /// quotes and escaped newlines.
    static ref PARAM_RE: Regex =
        Regex::new(r#"(\w+)="((?:[^"\\]|\\.)*)""#).expect("param pattern is valid");
}

/// Extract the first proposed action from a model response.
///
/// Returns `None` when no `Action:` line matches or when the named tool is
/// not one of `known_tools` - both are handled by the orchestrator's
/// corrective-prompt path, not as errors. A malformed argument list yields an
/// invocation with an empty argument map rather than a parse failure.
pub fn parse_action(text: &str, known_tools: &[&str]) -> Option<ToolInvocation> {
    let captures = ACTION_RE.captures(text)?;

    let name = captures.get(1)?.as_str();
    if !known_tools.contains(&name) {
        return None;
    }

    let params_str = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    let mut arguments = HashMap::new();
    for param in PARAM_RE.captures_iter(params_str) {
        let key = param[1].to_string();
        let value = unescape(&param[2]);
        arguments.insert(key, value);
    }

    Some(ToolInvocation {
        name: name.to_string(),
        arguments,
    })
}

fn unescape(value: &str) -> String {
    value.replace("\\\"", "\"").replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOLS: &[&str] = &[
        "parse_transaction",
        "get_client_by_iban",
        "score_transaction",
        "create_alert",
    ];

    #[test]
    fn parses_simple_action() {
        let text = "Thought: time to score\nAction: score_transaction(tx_json=\"{}\", client_json=\"{}\")";
        let invocation = parse_action(text, TOOLS).unwrap();
        assert_eq!(invocation.name, "score_transaction");
        assert_eq!(invocation.arguments["tx_json"], "{}");
        assert_eq!(invocation.arguments["client_json"], "{}");
    }

    #[test]
    fn unescapes_quotes_and_newlines() {
        let text = r#"Action: create_alert(tx_json="{\"amount\": 500}", reason="line one\nline two")"#;
        let invocation = parse_action(text, TOOLS).unwrap();
        assert_eq!(invocation.arguments["tx_json"], r#"{"amount": 500}"#);
        assert_eq!(invocation.arguments["reason"], "line one\nline two");
    }

    #[test]
    fn unknown_tool_yields_none() {
        let text = "Action: delete_everything(target=\"all\")";
        assert!(parse_action(text, TOOLS).is_none());
    }

    #[test]
    fn no_action_line_yields_none() {
        let text = "Thought: I am still thinking about what to do.";
        assert!(parse_action(text, TOOLS).is_none());
    }

    #[test]
    fn first_action_wins() {
        let text = "Action: parse_transaction(xml_string=\"<a/>\")\nAction: create_alert(reason=\"x\")";
        let invocation = parse_action(text, TOOLS).unwrap();
        assert_eq!(invocation.name, "parse_transaction");
    }

    #[test]
    fn malformed_arguments_yield_empty_map() {
        let text = "Action: parse_transaction(xml_string=unquoted)";
        let invocation = parse_action(text, TOOLS).unwrap();
        assert_eq!(invocation.name, "parse_transaction");
        assert!(invocation.arguments.is_empty());
    }

    #[test]
    fn empty_argument_list() {
        let text = "Action: parse_transaction()";
        let invocation = parse_action(text, TOOLS).unwrap();
        assert!(invocation.arguments.is_empty());
    }

    #[test]
    fn action_must_end_at_line_end() {
        let text = "Action: parse_transaction(xml_string=\"<a/>\") trailing words";
        assert!(parse_action(text, TOOLS).is_none());
    }
}
