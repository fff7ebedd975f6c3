//! Section extraction
//!
//! Sections are top-level named regions such as `<fields>` or `<script>`.
//! Only the first occurrence of a tag is considered and same-named tags are
//! not nested: the first opening tag is paired with the first closing tag.

use regex::{Regex, RegexBuilder};

/// Strip angle brackets, so both `fields` and `<fields>` name the same tag
pub fn bare_tag(tag: &str) -> &str {
    tag.trim().trim_start_matches('<').trim_end_matches('>').trim()
}

/// Return the inner text of the first `<tag ...>...</tag>` in `text`.
///
/// Empty when the tag is absent, self-closing or never closed.
pub fn extract_section<'a>(text: &'a str, tag: &str) -> &'a str {
    let name = bare_tag(tag);
    if name.is_empty() {
        return "";
    }

    let pattern = format!(
        r"(?s)<{name}(?:\s(?:[^>]*[^/>])?)?>(.*?)</{name}\s*>",
        name = regex::escape(name)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return "";
    };

    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// Find the line holding the opening tag of a section (case-insensitive)
pub fn find_section_line(lines: &[String], tag: &str) -> Option<usize> {
    let name = bare_tag(tag);
    if name.is_empty() {
        return None;
    }

    let re = RegexBuilder::new(&format!(r"<{}(\s|>|$)", regex::escape(name)))
        .case_insensitive(true)
        .build()
        .ok()?;

    lines.iter().position(|line| re.is_match(line))
}
