//! Element scanning within section text
//!
//! Each element kind has a fixed pair of patterns: one that captures element
//! names while scanning a section, and one that recognizes the definition of
//! a specific name (used by the cross-file resolver).

use crate::resolver::LineResolver;
use crate::types::{ElementKind, OutlineNode};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Substrings marking a script function as a command-dispatch entry point
pub const ENTRY_POINT_MARKERS: [&str; 2] = ["ExecuteCommand", "ResponseComplete"];

/// Placeholder for the element name in definition templates
const NAME_PLACEHOLDER: &str = "{name}";

struct PatternSpec {
    kind: ElementKind,
    /// Literal every defining line contains
    tag: &'static str,
    /// Captures the element name in group 1
    scan: &'static str,
    /// Matches the definition of `{name}`
    definition: &'static str,
}

const PATTERNS: [PatternSpec; 5] = [
    PatternSpec {
        kind: ElementKind::Field,
        tag: "<field",
        scan: r#"<field\s+(?:[^>]*?\s)?name\s*=\s*"([^"]+)""#,
        definition: r#"<field\s+(?:[^>]*?\s)?name\s*=\s*"{name}""#,
    },
    PatternSpec {
        kind: ElementKind::View,
        tag: "<view",
        scan: r#"<view\s+(?:[^>]*?\s)?id\s*=\s*"([^"]+)""#,
        definition: r#"<view\s+(?:[^>]*?\s)?id\s*=\s*"{name}""#,
    },
    PatternSpec {
        kind: ElementKind::Command,
        tag: "<command",
        scan: r#"<command\s+(?:[^>]*?\s)?event\s*=\s*"([^"]+)""#,
        definition: r#"<command\s+(?:[^>]*?\s)?event\s*=\s*"{name}""#,
    },
    PatternSpec {
        kind: ElementKind::Action,
        tag: "<action",
        scan: r#"<action\s+(?:[^>]*?\s)?id\s*=\s*"([^"]+)""#,
        definition: r#"<action\s+(?:[^>]*?\s)?id\s*=\s*"{name}""#,
    },
    PatternSpec {
        kind: ElementKind::Function,
        tag: "function",
        scan: r"function\s+([^\s(]+)\s*\(",
        definition: r"function\s+{name}\s*\(",
    },
];

static SCAN_REGEXES: LazyLock<HashMap<ElementKind, Regex>> = LazyLock::new(|| {
    PATTERNS
        .iter()
        .map(|spec| (spec.kind, Regex::new(spec.scan).expect("valid scan pattern")))
        .collect()
});

static VIEW_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<view\s+(?:[^>]*?\s)?id\s*=\s*"([^"]+)"[^>]*>"#).expect("valid view pattern")
});

fn spec(kind: ElementKind) -> &'static PatternSpec {
    PATTERNS
        .iter()
        .find(|spec| spec.kind == kind)
        .unwrap_or(&PATTERNS[0])
}

impl ElementKind {
    /// Literal found on every line defining an element of this kind
    pub fn tag(&self) -> &'static str {
        spec(*self).tag
    }

    /// Pattern capturing element names in group 1
    pub fn scan_regex(&self) -> &'static Regex {
        &SCAN_REGEXES[self]
    }

    /// Definition template with a `{name}` placeholder
    pub fn definition_template(&self) -> &'static str {
        spec(*self).definition
    }
}

/// Build a definition pattern by substituting `name` (escaped) into `template`
pub fn definition_pattern(template: &str, name: &str) -> Option<Regex> {
    Regex::new(&template.replace(NAME_PLACEHOLDER, &regex::escape(name))).ok()
}

/// Whether a function name follows the command-dispatch naming convention
pub fn is_entry_point(name: &str) -> bool {
    ENTRY_POINT_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Names of all elements of `kind` in `text`, in order of appearance
pub fn scan_names(text: &str, kind: ElementKind) -> Vec<&str> {
    kind.scan_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Scan `text` for elements of `kind` and resolve each to a navigable line.
///
/// Order of output is order of appearance; names are not sorted or
/// de-duplicated.
pub fn scan_elements(text: &str, kind: ElementKind, resolver: &LineResolver) -> Vec<OutlineNode> {
    scan_names(text, kind)
        .into_iter()
        .map(|name| {
            OutlineNode::builder(name, kind)
                .line(resolver.resolve_line(name, kind))
                .entry_point(kind == ElementKind::Function && is_entry_point(name))
                .build()
        })
        .collect()
}

/// A `<view id="...">` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewBlock<'a> {
    pub id: &'a str,
    /// Text between the opening tag and `</view>`, empty when self-closing
    pub body: &'a str,
}

/// Find view blocks in order of appearance. Nested views are not supported:
/// each body runs to the next `</view>`.
pub fn scan_views(text: &str) -> Vec<ViewBlock<'_>> {
    VIEW_OPEN_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let open = caps.get(0)?;
            let id = caps.get(1)?.as_str();

            let body = if open.as_str().ends_with("/>") {
                ""
            } else {
                let rest = &text[open.end()..];
                rest.find("</view>").map(|end| &rest[..end]).unwrap_or("")
            };

            Some(ViewBlock { id, body })
        })
        .collect()
}

/// View containers with their fields; falls back to listing fields directly
/// when the section holds no `<view>` elements.
pub fn scan_view_section(text: &str, resolver: &LineResolver) -> Vec<OutlineNode> {
    let views = scan_views(text);
    if views.is_empty() {
        return scan_elements(text, ElementKind::Field, resolver);
    }

    views
        .into_iter()
        .map(|view| {
            let inline = resolver.resolve_inline(view.id, ElementKind::View);
            let line = inline.or_else(|| resolver.resolve_line(view.id, ElementKind::View));

            let fields = scan_names(view.body, ElementKind::Field)
                .into_iter()
                .map(|name| {
                    // fields of an inline view are looked up from the view's own line
                    let field_line = match inline {
                        Some(start) => resolver.resolve_line_from(name, ElementKind::Field, start),
                        None => resolver.resolve_line(name, ElementKind::Field),
                    };
                    OutlineNode::builder(name, ElementKind::Field)
                        .line(field_line)
                        .build()
                });

            OutlineNode::builder(view.id, ElementKind::View)
                .line(line)
                .children(fields)
                .build()
        })
        .collect()
}
