//! Built-in blog templates using the Tera template engine
//!
//! Templates are embedded in the binary; pages are rendered from the view
//! models defined here.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;
use tera::{Context, Tera};

use crate::config::MenuItem;

pub const HOME: &str = "home.html";
pub const BLOG_INDEX: &str = "blog_index.html";
pub const POST: &str = "post.html";
pub const TAG: &str = "tag.html";
pub const NOT_FOUND: &str = "not_found.html";

/// Template renderer with the embedded blog templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("macros.html", include_str!("blog/macros.html")),
            (HOME, include_str!("blog/home.html")),
            (BLOG_INDEX, include_str!("blog/blog_index.html")),
            (POST, include_str!("blog/post.html")),
            (TAG, include_str!("blog/tag.html")),
            (NOT_FOUND, include_str!("blog/not_found.html")),
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("blog/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: reformat a `YYYY-MM-DD` date string with a strftime pattern.
/// Values that are not such dates are returned unchanged.
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => return Ok(tera::Value::String(s)),
    };

    let Ok(date) = chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") else {
        return Ok(tera::Value::String(s));
    };

    let mut formatted = String::new();
    if write!(formatted, "{}", date.format(&format)).is_err() {
        return Err(tera::Error::msg(format!(
            "date_format: invalid format `{}`",
            format
        )));
    }
    Ok(tera::Value::String(formatted))
}

// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub date_format: String,
    pub menu: Vec<NavLink>,
    pub footer_links: Vec<NavLink>,
    pub year: i32,
}

/// A header or footer link
#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub name: String,
    pub path: String,
    /// Opened in a new tab
    pub external: bool,
}

impl From<&MenuItem> for NavLink {
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            path: item.path.clone(),
            external: item.is_external(),
        }
    }
}

/// `<head>` metadata for a page
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub url: String,
    pub og_type: &'static str,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagLink {
    pub name: String,
    pub path: String,
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub slug: String,
    pub path: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub updated_at: Option<String>,
    pub tags: Vec<TagLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub card: PostCard,
    pub content_html: String,
    pub toc_html: String,
}
