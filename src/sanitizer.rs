//! HTML-to-plain-text conversion for note bodies.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Note;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid script regex"));
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid style regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Converts HTML markup into single-spaced plain text.
///
/// Script and style elements are removed with their contents, remaining tags
/// are stripped, entities are decoded and whitespace runs collapse to one
/// space. Each step runs once; decoded `&lt;` and `&gt;` stay as literal
/// characters.
///
/// # Examples
///
/// ```
/// use noteqa::sanitizer::sanitize;
///
/// assert_eq!(sanitize("<p>A &amp; B</p>"), "A & B");
/// assert_eq!(sanitize("<p>Hi</p><script>alert(1)</script>"), "Hi");
/// ```
pub fn sanitize(raw_html: &str) -> String {
    if raw_html.is_empty() {
        return String::new();
    }

    let text = SCRIPT_RE.replace_all(raw_html, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, "");
    let text = html_escape::decode_html_entities(&text);
    let text = WHITESPACE_RE.replace_all(&text, " ");

    text.trim().to_string()
}

/// Regenerates `clean_content` from `raw_content` for every note.
pub fn sanitize_notes(notes: Vec<Note>) -> Vec<Note> {
    notes
        .into_iter()
        .map(|mut note| {
            note.clean_content = sanitize(&note.raw_content);
            note
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteBuilder;

    #[test]
    fn decodes_entities_inside_markup() {
        assert_eq!(sanitize("<p>A &amp; B</p>"), "A & B");
    }

    #[test]
    fn removes_script_elements_with_contents() {
        assert_eq!(sanitize("<p>Hi</p><script>alert(1)</script>"), "Hi");
    }

    #[test]
    fn removes_multiline_mixed_case_style_and_script() {
        let html = "<STYLE type=\"text/css\">\np { color: red; }\n</Style><p>Body</p>\
                    <Script>\nvar x = 1;\n</SCRIPT>";
        assert_eq!(sanitize(html), "Body");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let html = "<h2>Meeting\n\tDetails</h2>   <ul><li>Budget</li><li>Timeline</li></ul>";
        assert_eq!(sanitize(html), "Meeting Details BudgetTimeline");
        assert_eq!(sanitize("  a \n\n b\t\tc  "), "a b c");
    }

    #[test]
    fn total_on_degenerate_inputs() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("plain text"), "plain text");
        assert_eq!(sanitize("<p>unterminated <b"), "unterminated <b");
        assert_eq!(sanitize("<script>never closed"), "never closed");
        assert_eq!(sanitize("   \n  "), "");
    }

    #[test]
    fn escaped_comparison_operators_survive() {
        assert_eq!(sanitize("<p>5 &lt; 6 and 7 &gt; 3</p>"), "5 < 6 and 7 > 3");
        assert_eq!(
            sanitize("<p>Latency 5 &lt; 6 seconds and 7 &gt; 3 users</p>"),
            "Latency 5 < 6 seconds and 7 > 3 users"
        );
    }

    #[test]
    fn escaped_markup_is_decoded_not_stripped() {
        assert_eq!(
            sanitize("<p>&lt;b&gt;escaped markup&lt;/b&gt;</p>"),
            "<b>escaped markup</b>"
        );
        assert_eq!(sanitize("A &amp;amp; B"), "A &amp; B");
    }

    #[test]
    fn idempotent_on_samples() {
        let samples = [
            "<p><b>TLDR:</b> Nike expressed strong interest in our <em>pilot program</em>.</p>",
            "<div>Response times &gt; 10 seconds</div>",
            "<p>unterminated <b",
            "&nbsp;&nbsp;padded&nbsp;",
        ];

        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn sanitize_notes_regenerates_clean_content() {
        let note = NoteBuilder::new()
            .id("n1")
            .raw_content("<p>Fresh</p>")
            .clean_content("stale text")
            .build();

        let notes = sanitize_notes(vec![note]);
        assert_eq!(notes[0].clean_content, "Fresh");
    }
}
