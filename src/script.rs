use once_cell::sync::Lazy;
use regex::Regex;

// @module: Heading markers in generated scripts

// @const: `:Heading Text::` marker, single line, non-greedy
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r":(.*?)::").unwrap());

/// Extract heading texts in document order.
///
/// Headings are written as `:Heading Text::`. Surrounding whitespace is trimmed
/// and empty markers are ignored.
pub fn extract_headings(script: &str) -> Vec<String> {
    HEADING_REGEX
        .captures_iter(script)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|heading| !heading.is_empty())
        .collect()
}

/// The script as it should be narrated: each marker replaced by its text
pub fn narration_text(script: &str) -> String {
    HEADING_REGEX
        .replace_all(script, |caps: &regex::Captures| {
            caps.get(1).map_or(String::new(), |m| m.as_str().trim().to_string())
        })
        .into_owned()
}
