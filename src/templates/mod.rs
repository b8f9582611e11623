//! Page templates using the Tera template engine
//!
//! Templates are read from the project's template directory. `post.html`
//! renders a single post and `listing.html` the blog index; any other
//! `.html` file in the directory is available to them as a partial or base.
//!
//! Autoescaping stays on, so templates emit the trusted post body with
//! `{{ post.content | safe }}`. The escaper also encodes `/`, so URL values
//! (`site.url`, `post.canonical_url`, image paths, slugs in hrefs) are
//! marked `| safe` as well.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

use crate::config::{Config, SiteConfig};
use crate::content::Post;

pub const POST_TEMPLATE: &str = "post.html";
pub const LISTING_TEMPLATE: &str = "listing.html";

#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("failed to parse templates in {dir:?}")]
    Parse {
        dir: PathBuf,
        #[source]
        source: tera::Error,
    },
    #[error("template {name} not found in {dir:?}")]
    Missing { name: &'static str, dir: PathBuf },
    #[error("failed to render {name}")]
    Render {
        name: &'static str,
        #[source]
        source: tera::Error,
    },
}

/// Context for `post.html`
#[derive(Debug, Serialize)]
pub struct PostContext<'a> {
    pub post: &'a Post,
    pub latest_posts: Vec<&'a Post>,
    pub site: &'a SiteConfig,
    pub config: &'a Config,
    pub current_year: i32,
}

/// Context for `listing.html`
#[derive(Debug, Serialize)]
pub struct ListingContext<'a> {
    pub posts: &'a [Post],
    pub site: &'a SiteConfig,
    pub config: &'a Config,
    pub current_year: i32,
}

/// Renderer holding the parsed post and listing templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Parse every template in `dir`; both page templates must be present
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let pattern = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&pattern).map_err(|source| TemplateError::Parse {
            dir: dir.to_path_buf(),
            source,
        })?;

        for name in [POST_TEMPLATE, LISTING_TEMPLATE] {
            if !tera.get_template_names().any(|n| n == name) {
                return Err(TemplateError::Missing {
                    name,
                    dir: dir.to_path_buf(),
                });
            }
        }

        tracing::debug!("Loaded templates from {:?}", dir);
        Ok(Self { tera })
    }

    /// Build a renderer from in-memory template sources
    #[cfg(test)]
    pub fn from_sources(post: &str, listing: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![(POST_TEMPLATE, post), (LISTING_TEMPLATE, listing)])
            .map_err(|source| TemplateError::Parse {
                dir: PathBuf::new(),
                source,
            })?;
        Ok(Self { tera })
    }

    pub fn render_post(&self, context: &PostContext<'_>) -> Result<String, TemplateError> {
        self.render(POST_TEMPLATE, context)
    }

    pub fn render_listing(&self, context: &ListingContext<'_>) -> Result<String, TemplateError> {
        self.render(LISTING_TEMPLATE, context)
    }

    fn render<T: Serialize>(&self, name: &'static str, data: &T) -> Result<String, TemplateError> {
        let context =
            Context::from_serialize(data).map_err(|source| TemplateError::Render { name, source })?;
        self.tera
            .render(name, &context)
            .map_err(|source| TemplateError::Render { name, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::post::tests::post;
    use std::fs;

    fn post_context<'a>(post: &'a Post, config: &'a Config) -> PostContext<'a> {
        PostContext {
            post,
            latest_posts: Vec::new(),
            site: &config.site,
            config,
            current_year: 2024,
        }
    }

    #[test]
    fn test_render_post_keeps_content_unescaped() {
        let renderer = TemplateRenderer::from_sources(
            "<h1>{{ post.title }}</h1>{{ post.content | safe }}<footer>{{ current_year }}</footer>",
            "",
        )
        .unwrap();
        let config = Config::default();
        let mut p = post("hello", "2024-01-01", "");
        p.title = "A & B".to_string();
        p.content = "<p>Body</p>".to_string();

        let html = renderer.render_post(&post_context(&p, &config)).unwrap();
        assert_eq!(html, "<h1>A &amp; B</h1><p>Body</p><footer>2024</footer>");
    }

    #[test]
    fn test_render_listing() {
        let renderer = TemplateRenderer::from_sources(
            "",
            "{{ site.name }}:{% for p in posts %} {{ p.slug }}{% endfor %}",
        )
        .unwrap();
        let config = Config::default();
        let posts = vec![post("a", "2024-01-02", ""), post("b", "2024-01-01", "")];
        let context = ListingContext {
            posts: &posts,
            site: &config.site,
            config: &config,
            current_year: 2024,
        };
        assert_eq!(renderer.render_listing(&context).unwrap(), "Ultraviolet: a b");
    }

    #[test]
    fn test_load_from_directory_with_partials() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.html"), "[{% block body %}{% endblock %}]").unwrap();
        fs::write(
            dir.path().join("post.html"),
            r#"{% extends "base.html" %}{% block body %}{{ post.slug }}{% endblock %}"#,
        )
        .unwrap();
        fs::write(dir.path().join("listing.html"), "{{ posts | length }}").unwrap();

        let renderer = TemplateRenderer::load(dir.path()).unwrap();
        let config = Config::default();
        let p = post("hello", "2024-01-01", "");
        assert_eq!(renderer.render_post(&post_context(&p, &config)).unwrap(), "[hello]");
    }

    #[test]
    fn test_shipped_templates_render() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("scripts/templates");
        let renderer = TemplateRenderer::load(&dir).unwrap();
        let config = Config::default();

        let mut p = post("hello", "2024-01-01", "true");
        p.title = "Tips & Tricks".to_string();
        p.canonical_url = "https://www.ultraviolet.rs/blog/hello/".to_string();
        p.og_image = "/img/og.png".to_string();
        p.content = "<p>Hello <em>world</em></p>".to_string();
        let posts = vec![p.clone(), post("other", "2023-01-01", "")];
        let context = PostContext {
            post: &p,
            latest_posts: p.latest(&posts),
            site: &config.site,
            config: &config,
            current_year: 2024,
        };
        let html = renderer.render_post(&context).unwrap();
        assert!(html.contains("<p>Hello <em>world</em></p>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://www.ultraviolet.rs/blog/hello/">"#));
        assert!(html.contains(r#"<meta property="og:url" content="https://www.ultraviolet.rs/blog/hello/">"#));
        assert!(html.contains(r#"<meta property="og:image" content="/img/og.png">"#));
        assert!(html.contains(r#"<a href="https://www.ultraviolet.rs/blog/other/">"#));
        assert!(html.contains("<h1>Tips &amp; Tricks</h1>"));
        assert!(!html.contains("&#x2F;"));

        let listing = renderer
            .render_listing(&ListingContext {
                posts: &posts,
                site: &config.site,
                config: &config,
                current_year: 2024,
            })
            .unwrap();
        assert!(listing.contains(r#"class="featured""#));
        assert!(listing.contains(r#"<a href="https://www.ultraviolet.rs/blog/hello/">"#));
        assert!(!listing.contains("&#x2F;"));
    }

    #[test]
    fn test_load_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("post.html"), "ok").unwrap();
        let err = TemplateRenderer::load(dir.path()).err().unwrap();
        assert!(matches!(err, TemplateError::Missing { name: LISTING_TEMPLATE, .. }));
    }

    #[test]
    fn test_load_unparseable_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("post.html"), "{% if %}").unwrap();
        fs::write(dir.path().join("listing.html"), "ok").unwrap();
        let err = TemplateRenderer::load(dir.path()).err().unwrap();
        assert!(matches!(err, TemplateError::Parse { .. }));
    }

    #[test]
    fn test_render_failure() {
        let renderer = TemplateRenderer::from_sources("{{ missing_variable }}", "").unwrap();
        let config = Config::default();
        let p = post("hello", "2024-01-01", "");
        let err = renderer.render_post(&post_context(&p, &config)).unwrap_err();
        assert!(matches!(err, TemplateError::Render { name: POST_TEMPLATE, .. }));
    }
}
