//! HTML to plain text reduction

use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<]+?>").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip markup from an HTML body
///
/// Tags are removed and every whitespace run, newlines included, becomes a
/// single space. Malformed markup is tolerated: an unclosed `<` is kept as
/// text instead of swallowing the rest of the document.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let stripped = TAG_REGEX.replace_all(html, "");
    WHITESPACE_REGEX
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<html><body>\n  <h1>Hello</h1>\n\n<p>big   wide\tworld</p></body></html>";
        assert_eq!(html_to_text(html), "Hello big wide world");
    }

    #[test]
    fn tolerates_unclosed_tags() {
        assert_eq!(html_to_text("<p>one <b two"), "one <b two");
        assert_eq!(html_to_text("a < b <i>c</i>"), "a < b c");
    }

    #[test]
    fn empty_input() {
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_text("<br/>\n<hr>"), "");
    }
}
