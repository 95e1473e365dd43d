//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::Blog;

const CONFIG_TEMPLATE: &str = r#"# Site
title: Tech Blog
description: ''
author: ''
language: ja
url: http://localhost:3000
date_format: '%Y-%m-%d'

# Directories, relative to this file
content_dir: content/posts
extension: mdx
public_dir: public
static_dir: static

# Home page
recent_posts: 3

menu:
  - name: Home
    path: /
  - name: Blog
    path: /blog

footer_links: []

highlight:
  theme: base16-ocean.dark
  keep_background: true

server:
  ip: localhost
  port: 3000
"#;

const SAMPLE_POST: &str = r#"---
title: "Hello World"
description: "The first post on this blog"
publishedAt: "{date}"
tags: ["Getting Started"]
published: true
---

Posts live in `content/posts` as `.mdx` files with a front-matter header.

## Writing posts

Create a new draft with:

```bash
$ mdx-blog new "My New Post"
```

Set `published: true` once it is ready.

### Headings

Level two and three headings show up in the table of contents.

## Publishing

```bash
$ mdx-blog generate
```

Or preview with `mdx-blog server`.
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(Blog::CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("Config already exists: {:?}", config_path);
    }

    let defaults = SiteConfig::default();
    let content_dir = target_dir.join(&defaults.content_dir);
    fs::create_dir_all(&content_dir)?;
    fs::create_dir_all(target_dir.join(&defaults.static_dir))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    fs::write(
        content_dir.join(format!("hello-world.{}", defaults.extension)),
        SAMPLE_POST.replace("{date}", &today),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config, SiteConfig::default());

        let posts = blog.repository().all_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");
        assert_eq!(posts[0].tags, vec!["Getting Started"]);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
