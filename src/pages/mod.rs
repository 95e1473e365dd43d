//! Page rendering - turns repository reads into HTML pages
//!
//! Used by both the server (one page per request) and the static generator.

use anyhow::Result;
use chrono::Datelike;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{
    extract_toc, render_toc, ContentRepository, MarkdownRenderer, Post, TagCounts,
};
use crate::templates::{
    self, NavLink, PageMeta, PostCard, PostDetail, SiteData, TagLink, TemplateRenderer,
};
use crate::Blog;

/// Characters kept as-is in a URL path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URL path of a post detail page
pub fn post_path(slug: &str) -> String {
    format!("/blog/{}", utf8_percent_encode(slug, PATH_SEGMENT))
}

/// URL path of a tag page
pub fn tag_path(tag: &str) -> String {
    format!("/blog/tags/{}", utf8_percent_encode(tag, PATH_SEGMENT))
}

/// Renders every page of the blog
pub struct SiteRenderer {
    config: SiteConfig,
    repository: ContentRepository,
    markdown: MarkdownRenderer,
    templates: TemplateRenderer,
}

impl SiteRenderer {
    /// Create a renderer for a blog
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            config: blog.config.clone(),
            repository: blog.repository(),
            markdown: MarkdownRenderer::with_options(
                &blog.config.highlight.theme,
                blog.config.highlight.keep_background,
            ),
            templates: TemplateRenderer::new()?,
        })
    }

    pub fn repository(&self) -> &ContentRepository {
        &self.repository
    }

    /// Home page with the most recent posts
    pub fn home(&self) -> Result<String> {
        let posts = self.repository.all_posts()?;
        self.render_home(&posts)
    }

    /// Listing of every published post
    pub fn blog_index(&self) -> Result<String> {
        let posts = self.repository.all_posts()?;
        let tags = crate::content::repository::count_tags(&posts);
        self.render_blog_index(&posts, &tags)
    }

    /// Article page; `None` when the slug has no file
    pub fn post(&self, slug: &str) -> Result<Option<String>> {
        match self.repository.post_by_slug(slug)? {
            Some(post) => Ok(Some(self.render_post(&post)?)),
            None => Ok(None),
        }
    }

    /// Tag listing; `None` when no published post carries the tag
    pub fn tag(&self, tag: &str) -> Result<Option<String>> {
        let posts = self.repository.posts_by_tag(tag)?;
        if posts.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.render_tag(tag, &posts)?))
    }

    /// The 404 page
    pub fn not_found(&self) -> Result<String> {
        let context = self.base_context(self.page_meta("404", "/404"));
        self.templates.render(templates::NOT_FOUND, &context)
    }

    pub fn render_home(&self, posts: &[Post]) -> Result<String> {
        let recent: Vec<PostCard> = posts
            .iter()
            .take(self.config.recent_posts)
            .map(post_card)
            .collect();

        let mut context = self.base_context(self.page_meta(&self.config.title, "/"));
        context.insert("posts", &recent);
        self.templates.render(templates::HOME, &context)
    }

    pub fn render_blog_index(&self, posts: &[Post], tags: &TagCounts) -> Result<String> {
        let cards: Vec<PostCard> = posts.iter().map(post_card).collect();
        let tag_links: Vec<TagLink> = tags
            .iter()
            .map(|(name, count)| TagLink {
                name: name.clone(),
                path: tag_path(name),
                count: Some(*count),
            })
            .collect();

        let mut context = self.base_context(self.page_meta("Blog", "/blog"));
        context.insert("posts", &cards);
        context.insert("tags", &tag_links);
        self.templates.render(templates::BLOG_INDEX, &context)
    }

    pub fn render_post(&self, post: &Post) -> Result<String> {
        let toc = extract_toc(&post.content);
        let detail = PostDetail {
            card: post_card(post),
            content_html: self.markdown.render(&post.content),
            toc_html: render_toc(&toc),
        };

        let meta = PageMeta {
            title: post.title.clone(),
            description: post.description.clone(),
            url: self.absolute_url(&post_path(&post.slug)),
            og_type: "article",
            published_time: Some(post.published_at.clone()),
            modified_time: post.updated_at.clone(),
            tags: post.tags.clone(),
        };

        let mut context = self.base_context(meta);
        context.insert("post", &detail);
        self.templates.render(templates::POST, &context)
    }

    pub fn render_tag(&self, tag: &str, posts: &[Post]) -> Result<String> {
        let cards: Vec<PostCard> = posts.iter().map(post_card).collect();
        let title = format!("タグ: {}", tag);

        let mut context = self.base_context(self.page_meta(&title, &tag_path(tag)));
        context.insert("tag", tag);
        context.insert("posts", &cards);
        self.templates.render(templates::TAG, &context)
    }

    fn base_context(&self, meta: PageMeta) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context.insert("meta", &meta);
        context
    }

    fn site_data(&self) -> SiteData {
        SiteData {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            author: self.config.author.clone(),
            language: self.config.language.clone(),
            url: self.config.url.clone(),
            date_format: self.config.date_format.clone(),
            menu: self.config.menu.iter().map(NavLink::from).collect(),
            footer_links: self.config.footer_links.iter().map(NavLink::from).collect(),
            year: chrono::Local::now().year(),
        }
    }

    fn page_meta(&self, title: &str, path: &str) -> PageMeta {
        PageMeta {
            title: title.to_string(),
            description: self.config.description.clone(),
            url: self.absolute_url(path),
            og_type: "website",
            published_time: None,
            modified_time: None,
            tags: Vec::new(),
        }
    }

    fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }
}

fn post_card(post: &Post) -> PostCard {
    PostCard {
        slug: post.slug.clone(),
        path: post_path(&post.slug),
        title: post.title.clone(),
        description: post.description.clone(),
        published_at: post.published_at.clone(),
        updated_at: post.updated_at.clone(),
        tags: post
            .tags
            .iter()
            .map(|tag| TagLink {
                name: tag.clone(),
                path: tag_path(tag),
                count: None,
            })
            .collect(),
    }
}
