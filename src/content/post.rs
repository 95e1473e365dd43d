//! Post model

use serde::Serialize;

use super::{ParseError, PostFrontmatter};

/// A blog post: validated front-matter plus its slug and raw body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// File name without the content extension
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short summary shown on cards and in page metadata
    pub description: String,

    /// Publication date
    pub published_at: String,

    /// Last updated date
    pub updated_at: Option<String>,

    /// Post tags, in the order they were written
    pub tags: Vec<String>,

    /// Whether the post appears in listings
    pub published: bool,

    /// Raw MDX body, unrendered
    pub content: String,
}

impl Post {
    /// Build a post from validated front-matter
    pub fn new(slug: impl Into<String>, frontmatter: PostFrontmatter, content: String) -> Self {
        let PostFrontmatter {
            title,
            description,
            published_at,
            updated_at,
            tags,
            published,
        } = frontmatter;

        Self {
            slug: slug.into(),
            title,
            description,
            published_at,
            updated_at,
            tags,
            published,
            content,
        }
    }

    /// Parse a full content file
    pub fn from_source(slug: impl Into<String>, source: &str) -> Result<Self, ParseError> {
        let (frontmatter, body) = PostFrontmatter::parse(source)?;
        Ok(Self::new(slug, frontmatter, body.to_string()))
    }

    /// Whether the post carries the given tag (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_source() {
        let source = "---\ntitle: Hello\ndescription: D\npublishedAt: '2025-01-15'\ntags: [React]\npublished: true\n---\nBody";
        let post = Post::from_source("hello", source).unwrap();
        assert_eq!(post.slug, "hello");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "Body");
        assert!(post.has_tag("React"));
        assert!(!post.has_tag("react"));
    }
}
