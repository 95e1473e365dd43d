//! List site content

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::content::Post;
use crate::Blog;

/// Post fields worth printing; the body is left out
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostSummary<'a> {
    slug: &'a str,
    title: &'a str,
    published_at: &'a str,
    tags: &'a [String],
}

impl<'a> From<&'a Post> for PostSummary<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            slug: &post.slug,
            title: &post.title,
            published_at: &post.published_at,
            tags: &post.tags,
        }
    }
}

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, json: bool) -> Result<()> {
    print!("{}", render(blog, content_type, json)?);
    Ok(())
}

fn render(blog: &Blog, content_type: &str, json: bool) -> Result<String> {
    let repository = blog.repository();
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = repository.all_posts()?;
            if json {
                let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&summaries)?)?;
            } else {
                writeln!(out, "Posts ({}):", posts.len())?;
                for post in &posts {
                    writeln!(
                        out,
                        "  {} - {} [{}]",
                        post.published_at, post.title, post.slug
                    )?;
                }
            }
        }
        "tag" | "tags" => {
            let tags = repository.all_tags()?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&tags)?)?;
            } else {
                writeln!(out, "Tags ({}):", tags.len())?;
                for (tag, count) in &tags {
                    writeln!(out, "  {} ({})", tag, count)?;
                }
            }
        }
        "slug" | "slugs" => {
            let slugs = repository.slugs()?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&slugs)?)?;
            } else {
                writeln!(out, "Slugs ({}):", slugs.len())?;
                for slug in &slugs {
                    writeln!(out, "  {}", slug)?;
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown content type: {}. Use: post, tag, slug",
                content_type
            );
        }
    }

    Ok(out)
}
