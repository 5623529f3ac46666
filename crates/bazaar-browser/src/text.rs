//! Pure text utilities for parser implementations.
//!
//! No network dependency: these operate on HTML snippets already fetched
//! by the engine.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d\s\u{00a0}]*").expect("valid regex"));

/// Turn an HTML snippet into normalized plain text.
///
/// Tags are stripped, entities decoded, and every line is trimmed of
/// leading and trailing whitespace. Leading and trailing blank lines are
/// dropped.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let raw: String = fragment.root_element().text().collect();

    let trimmed: Vec<&str> = raw.lines().map(str::trim).collect();
    let start = trimmed.iter().position(|l| !l.is_empty()).unwrap_or(0);
    let end = trimmed.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);
    trimmed[start..end].join("\n")
}

/// Extract the first embedded integer from an HTML snippet.
///
/// Thousands separators (regular and non-breaking spaces) inside the
/// number are ignored, so `"1 234 kr"` yields `1234`. Returns `None` when
/// the snippet contains no digits.
#[must_use]
pub fn find_number(html: &str) -> Option<i64> {
    let text = html_to_text(html).replace(['\r', '\n'], " ");
    let matched = NUMBER_RE.find(&text)?;
    let digits: String = matched
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
