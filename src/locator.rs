//! Line lookup by substring
//!
//! All lookups return `Option<usize>`: `None` means not found, so a match on
//! the first line (`Some(0)`) stays distinguishable from a miss.

/// Index of the first line containing `keyword` (and `contains`, if given)
pub fn find_line(lines: &[String], keyword: &str, contains: Option<&str>) -> Option<usize> {
    find_line_from(lines, 0, keyword, contains)
}

/// Like [`find_line`], starting the search at line `start`
pub fn find_line_from(
    lines: &[String],
    start: usize,
    keyword: &str,
    contains: Option<&str>,
) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, line)| line.contains(keyword) && contains.map_or(true, |c| line.contains(c)))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<String> {
        [
            "<fields>",
            "  <field name=\"customer\"/>",
            "  <field name=\"order\"/>",
            "</fields>",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_match_on_first_line() {
        assert_eq!(find_line(&lines(), "<fields>", None), Some(0));
    }

    #[test]
    fn test_keyword_and_filter() {
        assert_eq!(find_line(&lines(), "<field", Some("name=\"order\"")), Some(2));
    }

    #[test]
    fn test_not_found() {
        assert_eq!(find_line(&lines(), "<command", None), None);
        assert_eq!(find_line(&lines(), "<field", Some("name=\"missing\"")), None);
        assert_eq!(find_line(&[], "<field", None), None);
    }

    #[test]
    fn test_find_from_offset() {
        assert_eq!(find_line_from(&lines(), 2, "<field", None), Some(2));
        assert_eq!(find_line_from(&lines(), 3, "<field ", None), None);
        assert_eq!(find_line_from(&lines(), 10, "<field", None), None);
    }
}
