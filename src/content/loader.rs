//! Post loader - turns one markdown source into a [`Post`]

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{AuthorField, CiContext, FrontMatter, MarkdownRenderer};
use super::post::{Author, Post};
use crate::config::Config;
use crate::helpers;

/// Picture used when neither front-matter nor CI provide one
pub const DEFAULT_AVATAR: &str = "/img/avatar.png";

/// Loads posts, sharing one markdown renderer across files
pub struct PostLoader<'a> {
    config: &'a Config,
    ci: &'a CiContext,
    renderer: MarkdownRenderer,
}

impl<'a> PostLoader<'a> {
    /// Create a new post loader
    pub fn new(config: &'a Config, ci: &'a CiContext) -> Self {
        let renderer = MarkdownRenderer::new(&config.theme.code_theme);
        Self {
            config,
            ci,
            renderer,
        }
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let (fm, body) = FrontMatter::parse(&content)
            .with_context(|| format!("Failed to parse front-matter in {:?}", path))?;
        let html = self.renderer.render(body);

        let slug = fm.slug.clone().unwrap_or_else(|| file_stem(path));
        let date = fm.date.clone().unwrap_or_default();
        let category = fm.category.clone().unwrap_or_default();
        let excerpt = fm.excerpt.clone().unwrap_or_default();
        let description = fm.description.clone().unwrap_or_else(|| excerpt.clone());
        let cover_image = fm.cover_image.clone().unwrap_or_default();

        let reading_time = fm
            .reading_time
            .clone()
            .unwrap_or_else(|| helpers::reading_time(&html, self.config.blog.reading_speed));

        let og_image = fm
            .og_image
            .clone()
            .or_else(|| (!cover_image.is_empty()).then(|| cover_image.clone()))
            .unwrap_or_else(|| self.config.seo.default_og_image.clone());

        let canonical_url = fm
            .canonical_url
            .clone()
            .unwrap_or_else(|| helpers::post_url(&self.config.site.url, &slug));

        Ok(Post {
            title: fm.title.clone().unwrap_or_default(),
            formatted_date: helpers::format_date(&date, &self.config.blog.date_format),
            date,
            author: resolve_author(fm.author.as_ref(), self.ci),
            category_color: self.config.category_color(&category),
            category,
            tags: fm.tags,
            description,
            excerpt,
            cover_image,
            canonical_url,
            og_image,
            featured: fm.featured.unwrap_or_default(),
            slug,
            reading_time,
            content: html,
            source: path.to_path_buf(),
        })
    }
}

/// Author from front-matter, completed from the CI context when unnamed
pub fn resolve_author(field: Option<&AuthorField>, ci: &CiContext) -> Author {
    let mut author = Author {
        name: String::new(),
        picture: DEFAULT_AVATAR.to_string(),
    };

    if let Some(field) = field {
        if let Some(name) = &field.name {
            author.name = name.clone();
        }
        if let Some(picture) = field.picture.as_deref().and_then(normalize_picture) {
            author.picture = picture.to_string();
        }
    }

    if author.name.is_empty() {
        if let Some(ci_author) = ci.author() {
            author.name = ci_author.name.clone();
            if !ci_author.avatar.is_empty() && author.picture == DEFAULT_AVATAR {
                author.picture = ci_author.avatar.clone();
            }
        }
    }

    author
}

/// Treat blank and placeholder-ish values as "no picture"
fn normalize_picture(picture: &str) -> Option<&str> {
    let picture = picture.trim();
    let missing = picture.is_empty()
        || picture.eq_ignore_ascii_case("null")
        || picture.eq_ignore_ascii_case("undefined")
        || picture == "<nil>";
    (!missing).then_some(picture)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
