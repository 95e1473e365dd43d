//! Content module - posts, front-matter, table of contents and rendering

mod error;
mod frontmatter;
mod markdown;
mod post;
pub mod repository;
pub mod toc;

pub use error::{ContentError, ParseError};
pub use frontmatter::PostFrontmatter;
pub use markdown::{MarkdownRenderer, DEFAULT_THEME};
pub use post::Post;
pub use repository::{ContentRepository, TagCounts};
pub use toc::{extract_toc, heading_id, render_toc, TocItem};
