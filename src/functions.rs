//! Script function analysis
//!
//! Function bodies are delimited by brace-depth matching, which handles
//! nested blocks that no regular expression can. Braces inside string
//! literals and comments are counted like any other brace.
//!
//! Case labels are recognized in the single-quoted form `case 'label'`
//! only; double-quoted or computed labels are skipped.

use crate::locator::find_line_from;
use crate::resolver::LineResolver;
use crate::scanner::is_entry_point;
use crate::types::{ElementKind, NodeKind, OutlineNode};
use regex::Regex;
use std::sync::LazyLock;

static CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"case\s+'([^']+)'").expect("valid case pattern"));

/// A function found in script text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFunction<'a> {
    pub name: &'a str,
    /// Text between the opening brace and its matching closing brace
    pub body: &'a str,
    pub entry_point: bool,
}

/// Byte index of the `}` matching the `{` at `open`, or `text.len()` when
/// the body is never closed.
pub fn matching_brace(text: &str, open: usize) -> usize {
    let mut depth = 0usize;

    for (idx, byte) in text.bytes().enumerate().skip(open + 1) {
        match byte {
            b'{' => depth += 1,
            b'}' if depth == 0 => return idx,
            b'}' => depth -= 1,
            _ => {}
        }
    }

    text.len()
}

/// Byte index of the `{` opening a body, which must follow the parameter
/// list's `)` with only whitespace in between. `params` is the index just
/// past the opening `(`.
fn body_open(script: &str, params: usize) -> Option<usize> {
    let close = params + script[params..].find(')')?;
    let after = &script[close + 1..];
    let gap = after.len() - after.trim_start().len();

    after[gap..].starts_with('{').then_some(close + 1 + gap)
}

/// Find function declarations and their bodies, in order of appearance
pub fn find_functions(script: &str) -> Vec<ScriptFunction<'_>> {
    ElementKind::Function
        .scan_regex()
        .captures_iter(script)
        .filter_map(|caps| {
            let signature = caps.get(0)?;
            let name = caps.get(1)?.as_str();

            let body = body_open(script, signature.end())
                .map(|open| {
                    let close = matching_brace(script, open);
                    &script[open + 1..close]
                })
                .unwrap_or("");

            Some(ScriptFunction {
                name,
                body,
                entry_point: is_entry_point(name),
            })
        })
        .collect()
}

/// Single-quoted case labels in a function body, in order of appearance
pub fn case_labels(body: &str) -> Vec<&str> {
    CASE_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Build function nodes with their case labels as children.
///
/// Each case label is located independently in the main document, searching
/// from the function's own line so that a label reused by several functions
/// maps to the right one. Labels of a function that lives in an entity file
/// have no line of their own.
pub fn extract_functions(script: &str, resolver: &LineResolver) -> Vec<OutlineNode> {
    find_functions(script)
        .into_iter()
        .map(|function| {
            let inline = resolver.resolve_inline(function.name, ElementKind::Function);
            let line = inline.or_else(|| resolver.resolve_line(function.name, ElementKind::Function));

            let cases = case_labels(function.body).into_iter().map(move |label| {
                let text = format!("case '{}'", label);
                let case_line =
                    inline.and_then(|start| find_line_from(resolver.lines(), start, &text, None));
                OutlineNode::builder(text, NodeKind::CaseLabel)
                    .line(case_line)
                    .build()
            });

            OutlineNode::builder(function.name, ElementKind::Function)
                .line(line)
                .entry_point(function.entry_point)
                .children(cases)
                .build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityTable;

    fn split(text: &str) -> Vec<String> {
        text.split('\n').map(String::from).collect()
    }

    #[test]
    fn test_matching_brace_flat() {
        let text = "{ a }";
        assert_eq!(matching_brace(text, 0), 4);
    }

    #[test]
    fn test_matching_brace_nested() {
        let text = "{ if (x) { y(); } else { z(); } }";
        assert_eq!(matching_brace(text, 0), text.len() - 1);
    }

    #[test]
    fn test_matching_brace_unclosed() {
        let text = "{ if (x) { y(); }";
        assert_eq!(matching_brace(text, 0), text.len());
    }

    #[test]
    fn test_body_with_nested_blocks() {
        let script = "function f(a) {\n  if (a) {\n    go();\n  }\n  done();\n}\nfunction g() { other(); }";
        let functions = find_functions(script);

        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].name, "f");
        assert_eq!(functions[0].body, "\n  if (a) {\n    go();\n  }\n  done();\n");
        assert_eq!(functions[1].name, "g");
        assert_eq!(functions[1].body, " other(); ");
    }

    #[test]
    fn test_function_without_body() {
        let functions = find_functions("function declared(a);");
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].body, "");
    }

    #[test]
    fn test_declaration_does_not_take_next_body() {
        let functions = find_functions("function a(x);\nfunction b() { case 'q': }");

        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].name, "a");
        assert_eq!(functions[0].body, "");
        assert_eq!(functions[1].name, "b");
        assert_eq!(functions[1].body, " case 'q': ");
    }

    #[test]
    fn test_body_after_multiline_parameters() {
        let functions = find_functions("function f(a,\n  b)\n{ go(); }");
        assert_eq!(functions[0].body, " go(); ");
    }

    #[test]
    fn test_declared_function_has_no_cases() {
        let text = "function a(x);\nfunction b() {\n  case 'q':\n}";
        let lines = split(text);
        let table = EntityTable::default();
        let resolver = LineResolver::new(&lines, &table);

        let nodes = extract_functions(text, &resolver);
        assert!(nodes[0].children().is_empty());
        assert_eq!(nodes[1].children()[0].line(), Some(2));
    }

    #[test]
    fn test_entity_function_cases_not_matched_inline() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("lib.xml"),
            "function shared(cmd) {\n  case 'go':\n}",
        )
        .unwrap();

        let text = "<!ENTITY lib SYSTEM \"lib.xml\">\n<script>\n&lib;\nfunction local(cmd) {\n  case 'go':\n}\n</script>";
        let lines = split(text);
        let table = EntityTable::load(text, temp.path());
        let resolver = LineResolver::new(&lines, &table);

        let expanded = table.expand(text, &crate::entity::EntityOptions::default());
        let script = crate::section::extract_section(&expanded, "script");
        let nodes = extract_functions(script, &resolver);

        assert_eq!(nodes[0].label(), "shared");
        assert_eq!(nodes[0].line(), Some(2));
        assert_eq!(nodes[0].children()[0].line(), None);
        assert_eq!(nodes[1].label(), "local");
        assert_eq!(nodes[1].children()[0].line(), Some(4));
    }

    #[test]
    fn test_entry_point_flag() {
        let functions = find_functions("function on$FooExecuteCommand() {}\nfunction on$Bar() {}");
        assert!(functions[0].entry_point);
        assert!(!functions[1].entry_point);
    }

    #[test]
    fn test_case_labels() {
        let body = "switch (cmd) {\n case 'x':\n break;\n case \"skipped\":\n case 'y': break;\n}";
        assert_eq!(case_labels(body), vec!["x", "y"]);
    }

    #[test]
    fn test_extract_functions_with_cases() {
        let text = "<script>\nfunction on$SaveExecuteCommand(cmd) {\n  switch (cmd) {\n    case 'x':\n      break;\n    case 'y':\n      break;\n  }\n}\n</script>";
        let lines = split(text);
        let table = EntityTable::default();
        let resolver = LineResolver::new(&lines, &table);

        let script = crate::section::extract_section(text, "script");
        let nodes = extract_functions(script, &resolver);

        assert_eq!(nodes.len(), 1);
        let function = &nodes[0];
        assert_eq!(function.label(), "on$SaveExecuteCommand");
        assert_eq!(function.line(), Some(1));
        assert!(function.is_entry_point());

        let cases: Vec<(&str, Option<usize>)> = function
            .children()
            .iter()
            .map(|c| (c.label(), c.line()))
            .collect();
        assert_eq!(cases, vec![("case 'x'", Some(3)), ("case 'y'", Some(5))]);
    }

    #[test]
    fn test_repeated_case_label_resolves_per_function() {
        let text = "function a() {\n  case 'go':\n}\nfunction b() {\n  case 'go':\n}";
        let lines = split(text);
        let table = EntityTable::default();
        let resolver = LineResolver::new(&lines, &table);

        let nodes = extract_functions(text, &resolver);
        assert_eq!(nodes[0].children()[0].line(), Some(1));
        assert_eq!(nodes[1].children()[0].line(), Some(4));
    }

    #[test]
    fn test_function_without_cases_is_leaf() {
        let text = "function on$Bar() { run(); }";
        let lines = split(text);
        let table = EntityTable::default();
        let resolver = LineResolver::new(&lines, &table);

        let nodes = extract_functions(text, &resolver);
        assert_eq!(nodes.len(), 1);
        assert!(!nodes[0].is_entry_point());
        assert!(nodes[0].children().is_empty());
        assert_eq!(nodes[0].line(), Some(0));
    }
}
