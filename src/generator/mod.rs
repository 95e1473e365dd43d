//! Generator module - writes the blog out as static HTML files

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::repository::{count_tags, filter_by_tag};
use crate::pages::SiteRenderer;
use crate::Blog;

/// What a generation run wrote
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerateStats {
    /// Article pages, unpublished posts included
    pub posts: usize,
    /// Tag pages
    pub tags: usize,
    /// Every HTML file written
    pub files: usize,
}

/// Static site generator
pub struct Generator {
    public_dir: PathBuf,
    site: SiteRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            public_dir: blog.public_dir.clone(),
            site: SiteRenderer::new(blog)?,
        })
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<GenerateStats> {
        fs::create_dir_all(&self.public_dir)?;

        let repository = self.site.repository();
        let posts = repository.all_posts()?;
        let tags = count_tags(&posts);
        let mut stats = GenerateStats::default();

        self.write_page(Path::new("index.html"), &self.site.render_home(&posts)?)?;
        self.write_page(
            Path::new("blog/index.html"),
            &self.site.render_blog_index(&posts, &tags)?,
        )?;
        stats.files += 2;

        // Article pages exist for every file on disk, published or not
        for name in repository.slugs()? {
            let Some(post) = repository.post_by_slug(&name)? else {
                continue;
            };
            let path = Path::new("blog").join(&post.slug).join("index.html");
            self.write_page(&path, &self.site.render_post(&post)?)?;
            stats.posts += 1;
            stats.files += 1;
        }

        for tag in tags.keys() {
            if !is_safe_dir_name(tag) {
                tracing::warn!("Skipping tag page for {:?}: not usable as a directory name", tag);
                continue;
            }
            let tagged = filter_by_tag(posts.clone(), tag);
            let path = Path::new("blog/tags").join(tag).join("index.html");
            self.write_page(&path, &self.site.render_tag(tag, &tagged)?)?;
            stats.tags += 1;
            stats.files += 1;
        }

        self.write_page(Path::new("404.html"), &self.site.not_found()?)?;
        stats.files += 1;

        Ok(stats)
    }

    fn write_page(&self, relative: &Path, html: &str) -> Result<()> {
        let output_path = self.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

/// Tag labels become directory names under `blog/tags`
fn is_safe_dir_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_post(blog: &Blog, slug: &str, date: &str, tags: &str, published: bool) {
        let source = format!(
            "---\ntitle: \"{slug}\"\ndescription: \"d\"\npublishedAt: \"{date}\"\ntags: {tags}\npublished: {published}\n---\n## Intro\n"
        );
        fs::create_dir_all(&blog.content_dir).unwrap();
        fs::write(blog.content_dir.join(format!("{slug}.mdx")), source).unwrap();
    }

    #[test]
    fn test_generate_layout() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        write_post(&blog, "a", "2025-01-01", "[\"x\"]", true);
        write_post(&blog, "b", "2025-01-30", "[\"x\", \"y\"]", true);
        write_post(&blog, "c", "2025-02-01", "[\"z\"]", false);

        let stats = Generator::new(&blog).unwrap().generate().unwrap();
        assert_eq!(stats.posts, 3);
        assert_eq!(stats.tags, 2);
        assert_eq!(stats.files, 8);

        let public = &blog.public_dir;
        assert!(public.join("index.html").exists());
        assert!(public.join("blog/index.html").exists());
        assert!(public.join("blog/a/index.html").exists());
        assert!(public.join("blog/c/index.html").exists());
        assert!(public.join("blog/tags/x/index.html").exists());
        assert!(public.join("blog/tags/y/index.html").exists());
        assert!(!public.join("blog/tags/z").exists());
        assert!(public.join("404.html").exists());

        let tag_y = fs::read_to_string(public.join("blog/tags/y/index.html")).unwrap();
        assert!(tag_y.contains(r#"href="/blog/b""#));
        assert!(!tag_y.contains(r#"href="/blog/a""#));
    }

    #[test]
    fn test_generate_without_content() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let stats = Generator::new(&blog).unwrap().generate().unwrap();
        assert_eq!(stats, GenerateStats { posts: 0, tags: 0, files: 3 });
    }

    #[test]
    fn test_tag_dirs_use_raw_label() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        write_post(&blog, "a", "2025-01-01", "[\"C++\", \"日本語\"]", true);

        Generator::new(&blog).unwrap().generate().unwrap();
        let public = &blog.public_dir;
        assert!(public.join("blog/tags/C++/index.html").exists());
        assert!(public.join("blog/tags/日本語/index.html").exists());

        let index = fs::read_to_string(public.join("blog/index.html")).unwrap();
        assert!(index.contains(r#"href="/blog/tags/C%2B%2B""#));
    }

    #[test]
    fn test_unsafe_tag_is_skipped() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        write_post(&blog, "a", "2025-01-01", "[\"a/b\", \"..\", \"ok\"]", true);

        let stats = Generator::new(&blog).unwrap().generate().unwrap();
        assert_eq!(stats.tags, 1);
        assert!(blog.public_dir.join("blog/tags/ok/index.html").exists());
    }
}
