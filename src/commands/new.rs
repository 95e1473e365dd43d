//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Create a new unpublished post and return its path
pub fn create_post(blog: &Blog, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() || slug.starts_with('.') || slug.contains(['/', '\\']) {
        anyhow::bail!("Invalid slug {:?}, pass one with --slug", slug);
    }

    let repository = blog.repository();
    let file_path = repository.path_for(&slug);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(repository.root())?;
    fs::write(&file_path, scaffold(title, &chrono::Local::now().date_naive()))?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

fn scaffold(title: &str, date: &chrono::NaiveDate) -> String {
    // JSON strings are valid YAML scalars, so quoting goes through serde_json
    let quoted = serde_json::to_string(title).unwrap_or_else(|_| format!("\"{}\"", title));
    format!(
        "---\ntitle: {quoted}\ndescription: {quoted}\npublishedAt: \"{}\"\ntags: []\npublished: false\n---\n\n## {}\n",
        date.format("%Y-%m-%d"),
        title
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use tempfile::TempDir;

    #[test]
    fn test_create_post_skeleton() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let path = create_post(&blog, "My New Post", None).unwrap();
        assert_eq!(path, blog.content_dir.join("my-new-post.mdx"));

        let post = blog.repository().post_by_slug("my-new-post").unwrap().unwrap();
        assert_eq!(post.title, "My New Post");
        assert!(!post.published);
        assert!(post.tags.is_empty());

        // Drafts stay out of listings
        assert!(blog.repository().all_posts().unwrap().is_empty());
    }

    #[test]
    fn test_explicit_slug_and_quoting() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let path = create_post(&blog, "C++: \"quotes\" & more", Some("cpp")).unwrap();
        let post = Post::from_source("cpp", &fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(post.title, "C++: \"quotes\" & more");
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        create_post(&blog, "Hello", None).unwrap();
        assert!(create_post(&blog, "Hello again", Some("hello")).is_err());
    }

    #[test]
    fn test_rejects_unsafe_slug() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(create_post(&blog, "x", Some("../escape")).is_err());
        assert!(create_post(&blog, "!!!", None).is_err());
    }
}
