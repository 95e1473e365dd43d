//! Content repository - reads posts from the content directory

use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, Post};

/// Default content file extension
pub const DEFAULT_EXTENSION: &str = "mdx";

/// Tag label to number of occurrences across published posts
pub type TagCounts = IndexMap<String, usize>;

/// Reads posts from a single content directory.
///
/// Nothing is cached: every call lists the directory and reads the files again.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    root: PathBuf,
    extension: String,
}

impl ContentRepository {
    /// Create a repository over `root` using the default extension
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Use a different content file extension (without the leading dot)
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File names in the content directory carrying the content extension,
    /// in directory-listing order. A missing directory has no posts.
    pub fn slugs(&self) -> Result<Vec<String>, ContentError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let suffix = self.suffix();
        let mut names = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = entry.map_err(|e| ContentError::Io {
                path: e.path().unwrap_or(&self.root).to_path_buf(),
                source: io::Error::from(e),
            })?;

            // Symlinks count when they resolve to a file; dangling ones are skipped
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(&suffix) {
                    names.push(name.to_string());
                }
            }
        }

        Ok(names)
    }

    /// Fetch a post by slug. A trailing content extension on `slug` is ignored.
    /// Returns `None` when no such file exists.
    pub fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        let slug = slug.strip_suffix(self.suffix().as_str()).unwrap_or(slug);
        if !is_file_slug(slug) {
            return Ok(None);
        }

        let path = self.path_for(slug);
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ContentError::Io { path, source }),
        };

        let post = Post::from_source(slug, &source)
            .map_err(|source| ContentError::Parse { path, source })?;
        tracing::debug!("Loaded post: {}", post.slug);

        Ok(Some(post))
    }

    /// All published posts, newest first
    pub fn all_posts(&self) -> Result<Vec<Post>, ContentError> {
        let mut posts = Vec::new();
        for name in self.slugs()? {
            match self.post_by_slug(&name)? {
                Some(post) if post.published => posts.push(post),
                Some(_) => {}
                // Removed between listing and reading
                None => tracing::warn!("Skipping {:?}: file is no longer readable", name),
            }
        }

        sort_newest_first(&mut posts);
        Ok(posts)
    }

    /// Tag occurrence counts over all published posts
    pub fn all_tags(&self) -> Result<TagCounts, ContentError> {
        Ok(count_tags(&self.all_posts()?))
    }

    /// Published posts carrying `tag`, newest first
    pub fn posts_by_tag(&self, tag: &str) -> Result<Vec<Post>, ContentError> {
        Ok(filter_by_tag(self.all_posts()?, tag))
    }

    /// Canonical file path for a slug
    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{}{}", slug, self.suffix()))
    }

    fn suffix(&self) -> String {
        format!(".{}", self.extension)
    }
}

/// Stable sort by `published_at` descending, compared as strings.
/// Posts with equal dates keep their relative order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Count every tag occurrence, duplicates within one post included
pub fn count_tags(posts: &[Post]) -> TagCounts {
    let mut tags = TagCounts::new();
    for post in posts {
        for tag in &post.tags {
            *tags.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    tags
}

/// Keep the posts carrying `tag`, preserving order
pub fn filter_by_tag(posts: Vec<Post>, tag: &str) -> Vec<Post> {
    posts.into_iter().filter(|p| p.has_tag(tag)).collect()
}

/// A slug must name a file directly inside the content directory
fn is_file_slug(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn frontmatter(published_at: &str, tags: &[&str], published: bool) -> String {
        let tags: Vec<String> = tags.iter().map(|t| format!("\"{}\"", t)).collect();
        format!(
            "---\ntitle: \"テスト記事\"\ndescription: \"テストの説明\"\npublishedAt: \"{}\"\ntags: [{}]\npublished: {}\n---\n本文です。",
            published_at,
            tags.join(", "),
            published
        )
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    /// a (2025-01-01, [x]), b (2025-01-30, [x, y]), c (unpublished)
    fn sample_repo() -> (TempDir, ContentRepository) {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.mdx", &frontmatter("2025-01-01", &["x"], true));
        write(&dir, "b.mdx", &frontmatter("2025-01-30", &["x", "y"], true));
        write(&dir, "c.mdx", &frontmatter("2025-02-10", &["x", "z"], false));
        let repo = ContentRepository::new(dir.path());
        (dir, repo)
    }

    fn slugs_of(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_slugs_filters_extension() {
        let dir = TempDir::new().unwrap();
        write(&dir, "post1.mdx", &frontmatter("2025-01-01", &[], true));
        write(&dir, "readme.md", "# readme");
        write(&dir, "image.png", "");
        write(&dir, "post2.mdx", &frontmatter("2025-01-01", &[], true));
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(&dir, "nested/post3.mdx", &frontmatter("2025-01-01", &[], true));

        let repo = ContentRepository::new(dir.path());
        let mut slugs = repo.slugs().unwrap();
        slugs.sort();
        assert_eq!(slugs, vec!["post1.mdx", "post2.mdx"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let repo = ContentRepository::new(dir.path().join("does-not-exist"));
        assert!(repo.slugs().unwrap().is_empty());
        assert!(repo.all_posts().unwrap().is_empty());
        assert!(repo.all_tags().unwrap().is_empty());
        assert!(repo.posts_by_tag("x").unwrap().is_empty());
    }

    #[test]
    fn test_post_by_slug() {
        let (_dir, repo) = sample_repo();

        let post = repo.post_by_slug("a").unwrap().unwrap();
        assert_eq!(post.slug, "a");
        assert_eq!(post.title, "テスト記事");
        assert_eq!(post.description, "テストの説明");
        assert_eq!(post.tags, vec!["x"]);
        assert_eq!(post.content, "本文です。");

        let with_ext = repo.post_by_slug("a.mdx").unwrap().unwrap();
        assert_eq!(with_ext, post);
    }

    #[test]
    fn test_post_by_slug_missing() {
        let (_dir, repo) = sample_repo();
        assert!(repo.post_by_slug("non-existent").unwrap().is_none());
        assert!(repo.post_by_slug("non-existent.mdx").unwrap().is_none());
        assert!(repo.post_by_slug("").unwrap().is_none());
        assert!(repo.post_by_slug("../a").unwrap().is_none());
        assert!(repo.post_by_slug("..").unwrap().is_none());
        assert!(repo.post_by_slug("a\\b").unwrap().is_none());
        assert!(repo.post_by_slug(".hidden").unwrap().is_none());
    }

    #[test]
    fn test_dot_prefixed_file_is_listed_and_fetched() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".intro.mdx", &frontmatter("2025-01-01", &["x"], true));
        let repo = ContentRepository::new(dir.path());

        assert_eq!(repo.slugs().unwrap(), vec![".intro.mdx"]);
        assert_eq!(repo.post_by_slug(".intro").unwrap().unwrap().slug, ".intro");
        assert_eq!(slugs_of(&repo.all_posts().unwrap()), vec![".intro"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        let (dir, repo) = sample_repo();
        std::os::unix::fs::symlink(dir.path().join("gone.mdx"), dir.path().join("dangling.mdx"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("b.mdx"), dir.path().join("alias.mdx"))
            .unwrap();

        let mut slugs = repo.slugs().unwrap();
        slugs.sort();
        assert_eq!(slugs, vec!["a.mdx", "alias.mdx", "b.mdx", "c.mdx"]);
        assert!(repo.post_by_slug("dangling").unwrap().is_none());

        let posts = repo.all_posts().unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(repo.all_tags().unwrap().get("y"), Some(&2));
    }

    #[test]
    fn test_unpublished_post_is_fetchable() {
        let (_dir, repo) = sample_repo();
        let post = repo.post_by_slug("c").unwrap().unwrap();
        assert!(!post.published);
    }

    #[test]
    fn test_all_posts_published_and_sorted() {
        let (_dir, repo) = sample_repo();
        let posts = repo.all_posts().unwrap();
        assert_eq!(slugs_of(&posts), vec!["b", "a"]);
        assert!(posts.iter().all(|p| p.published));
        assert!(posts
            .windows(2)
            .all(|w| w[0].published_at >= w[1].published_at));
    }

    #[test]
    fn test_all_posts_sorts_three_dates() {
        let dir = TempDir::new().unwrap();
        write(&dir, "old.mdx", &frontmatter("2025-01-01", &[], true));
        write(&dir, "new.mdx", &frontmatter("2025-01-30", &[], true));
        write(&dir, "middle.mdx", &frontmatter("2025-01-15", &[], true));

        let posts = ContentRepository::new(dir.path()).all_posts().unwrap();
        assert_eq!(slugs_of(&posts), vec!["new", "middle", "old"]);
    }

    #[test]
    fn test_all_tags() {
        let (_dir, repo) = sample_repo();
        let tags = repo.all_tags().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("x"), Some(&2));
        assert_eq!(tags.get("y"), Some(&1));
        assert_eq!(tags.get("z"), None);
    }

    #[test]
    fn test_tag_counts_include_duplicates() {
        let dir = TempDir::new().unwrap();
        write(&dir, "post1.mdx", &frontmatter("2025-01-01", &["React", "React"], true));
        write(&dir, "post2.mdx", &frontmatter("2025-01-02", &["React", "Next.js"], true));
        let repo = ContentRepository::new(dir.path());

        let tags = repo.all_tags().unwrap();
        assert_eq!(tags.get("React"), Some(&3));
        assert_eq!(tags.get("Next.js"), Some(&1));

        let total: usize = tags.values().sum();
        let occurrences: usize = repo.all_posts().unwrap().iter().map(|p| p.tags.len()).sum();
        assert_eq!(total, occurrences);
    }

    #[test]
    fn test_posts_by_tag() {
        let (_dir, repo) = sample_repo();
        assert_eq!(slugs_of(&repo.posts_by_tag("y").unwrap()), vec!["b"]);
        assert_eq!(slugs_of(&repo.posts_by_tag("x").unwrap()), vec!["b", "a"]);
        assert!(repo.posts_by_tag("z").unwrap().is_empty());
        assert!(repo.posts_by_tag("X").unwrap().is_empty());
        assert!(repo.posts_by_tag("Angular").unwrap().is_empty());
    }

    #[test]
    fn test_equal_dates_keep_relative_order() {
        let make = |slug: &str, date: &str| {
            Post::from_source(slug, &frontmatter(date, &[], true)).unwrap()
        };
        let mut posts = vec![
            make("first", "2025-01-01"),
            make("newest", "2025-03-01"),
            make("second", "2025-01-01"),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(slugs_of(&posts), vec!["newest", "first", "second"]);
    }

    #[test]
    fn test_malformed_post_propagates() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.mdx", "---\ntitle: [oops\n---\n");
        let repo = ContentRepository::new(dir.path());

        assert!(matches!(
            repo.post_by_slug("broken"),
            Err(ContentError::Parse { .. })
        ));
        assert!(repo.all_posts().is_err());
    }

    #[test]
    fn test_custom_extension() {
        let dir = TempDir::new().unwrap();
        write(&dir, "hello.md", &frontmatter("2025-01-01", &[], true));
        write(&dir, "other.mdx", &frontmatter("2025-01-01", &[], true));

        let repo = ContentRepository::new(dir.path()).with_extension(".md");
        assert_eq!(repo.slugs().unwrap(), vec!["hello.md"]);
        assert_eq!(repo.post_by_slug("hello.md").unwrap().unwrap().slug, "hello");
    }
}
