//! MDX body rendering with syntax highlighting

use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::toc::heading_id;

/// Default syntect theme
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Markdown renderer with syntax highlighting.
///
/// Embedded JSX is left as raw HTML; `h2`/`h3` headings get the same ids the
/// table of contents links to.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    keep_background: bool,
}

/// Heading being collected until its end tag
struct PendingHeading<'a> {
    level: HeadingLevel,
    id: CowStr<'a>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    events: Vec<Event<'a>>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(DEFAULT_THEME, true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, keep_background: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            keep_background,
        }
    }

    /// Render an MDX body to HTML
    pub fn render(&self, markdown: &str) -> String {
        // No heading attributes or smart punctuation: rendered heading text
        // must produce the same id as the raw heading line.
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options).into_offset_iter();

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut heading: Option<PendingHeading> = None;

        for (event, range) in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) if matches!(level, HeadingLevel::H2 | HeadingLevel::H3) => {
                    // Id from the source line, the same text the table of contents reads
                    let id = id.unwrap_or_else(|| {
                        CowStr::from(heading_id(heading_source_text(&markdown[range])))
                    });
                    heading = Some(PendingHeading {
                        level,
                        id,
                        classes,
                        attrs,
                        events: Vec::new(),
                    });
                }
                Event::End(TagEnd::Heading(_)) if heading.is_some() => {
                    if let Some(pending) = heading.take() {
                        push_heading(&mut events, pending);
                    }
                }
                other => match heading.as_mut() {
                    Some(pending) => pending.events.push(other),
                    None => events.push(other),
                },
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.get(DEFAULT_THEME));

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        let block = match highlighted {
            Some(html) if self.keep_background => html,
            Some(html) => strip_pre_style(&html),
            None => format!("<pre><code>{}</code></pre>", escape_html(code)),
        };

        format!(
            r#"<figure class="highlight" data-language="{}">{}</figure>"#,
            escape_html(lang),
            block
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Heading text as written: the first source line without its `#` marker
fn heading_source_text(source: &str) -> &str {
    source
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('#')
        .trim()
}

fn push_heading<'a>(events: &mut Vec<Event<'a>>, pending: PendingHeading<'a>) {
    events.push(Event::Start(Tag::Heading {
        level: pending.level,
        id: Some(pending.id),
        classes: pending.classes,
        attrs: pending.attrs,
    }));
    events.extend(pending.events);
    events.push(Event::End(TagEnd::Heading(pending.level)));
}

/// Replace syntect's `<pre style="...">` with a bare `<pre>`
fn strip_pre_style(html: &str) -> String {
    match (html.strip_prefix("<pre"), html.find('>')) {
        (Some(_), Some(end)) => format!("<pre>{}", &html[end + 1..]),
        _ => html.to_string(),
    }
}

/// Simple HTML escaping
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
