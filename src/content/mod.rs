//! Content module - front-matter, markdown and post loading

mod ci;
mod frontmatter;
pub mod loader;
mod markdown;
pub(crate) mod post;

pub use ci::{CiAuthor, CiContext};
pub use frontmatter::{AuthorField, FrontMatter, FrontMatterError};
pub use loader::PostLoader;
pub use markdown::MarkdownRenderer;
pub use post::{sort_posts, Author, Post};
