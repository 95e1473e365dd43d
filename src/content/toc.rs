//! Table of contents extraction from raw post bodies

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::markdown::escape_html;

lazy_static! {
    /// `## text` or `### text`, one line at a time; any non-newline whitespace
    /// separates the marker, full-width spaces included
    static ref HEADING: Regex =
        Regex::new(r"(?m)^(#{2,3})[^\S\r\n]+(.+)$").expect("heading pattern");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern");
    /// Anything that is not ASCII alphanumeric, `_`, `-`, hiragana, katakana or a CJK ideograph
    static ref NON_ID_CHAR: Regex = Regex::new(
        r"[^A-Za-z0-9_\-\x{3040}-\x{309F}\x{30A0}-\x{30FF}\x{4E00}-\x{9FAF}]"
    )
    .expect("id character pattern");
}

/// A heading entry in the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Extract `##` and `###` headings in document order
pub fn extract_toc(content: &str) -> Vec<TocItem> {
    HEADING
        .captures_iter(content)
        .filter_map(|caps| {
            let text = caps[2].trim();
            if text.is_empty() {
                return None;
            }
            Some(TocItem {
                id: heading_id(text),
                text: text.to_string(),
                level: caps[1].len() as u8,
            })
        })
        .collect()
}

/// Anchor id for a heading text
pub fn heading_id(text: &str) -> String {
    let lower = text.to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lower, "-");
    NON_ID_CHAR.replace_all(&hyphenated, "").into_owned()
}

/// Render the table of contents as nested ordered lists.
/// Level-3 entries nest under the preceding level-2 entry.
pub fn render_toc(items: &[TocItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<ol class="toc">"#);
    let mut parent_open = false;
    let mut child_open = false;

    for item in items {
        if item.level == 3 && parent_open {
            if !child_open {
                html.push_str(r#"<ol class="toc-child">"#);
                child_open = true;
            }
            push_entry(&mut html, item);
            html.push_str("</li>");
            continue;
        }

        if child_open {
            html.push_str("</ol>");
            child_open = false;
        }
        if parent_open {
            html.push_str("</li>");
        }

        push_entry(&mut html, item);
        parent_open = item.level == 2;
        if !parent_open {
            html.push_str("</li>");
        }
    }

    if child_open {
        html.push_str("</ol>");
    }
    if parent_open {
        html.push_str("</li>");
    }
    html.push_str("</ol>");
    html
}

fn push_entry(html: &mut String, item: &TocItem) {
    html.push_str(&format!(
        r##"<li class="toc-item toc-level-{}"><a class="toc-link" href="#{}"><span class="toc-text">{}</span></a>"##,
        item.level,
        item.id,
        escape_html(&item.text)
    ));
}
