//! Builder - runs the whole post pipeline once
//!
//! parse -> enrich -> sort -> render -> cache -> sitemap. Setup problems
//! abort the build with a [`BuildError`]; anything that concerns a single
//! post, the cache file or the sitemap is logged and skipped.

use chrono::Datelike;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cache::{self, BuildCache};
use crate::config::Config;
use crate::content::{sort_posts, CiContext, Post, PostLoader};
use crate::helpers;
use crate::sitemap;
use crate::templates::{ListingContext, PostContext, TemplateError, TemplateRenderer};

/// Fatal build failures
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("failed to create output dir {path:?}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to load templates")]
    Templates(#[source] TemplateError),
    #[error("failed to list markdown files in {path:?}")]
    ListContent {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to render listing")]
    RenderListing(#[source] TemplateError),
    #[error("failed to write listing {path:?}")]
    WriteListing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the builder reads from and writes to
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Markdown sources, one post per `*.md` file (not recursive)
    pub content_dir: PathBuf,
    /// Receives `<slug>/index.html` per post and the listing `index.html`
    pub output_dir: PathBuf,
    /// Holds `post.html` and `listing.html`
    pub template_dir: PathBuf,
    /// Hash cache from the previous build
    pub cache_file: PathBuf,
    /// Render every post page even when nothing changed
    pub force: bool,
}

impl BuildOptions {
    /// Standard project layout below `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P, force: bool) -> Self {
        let base_dir = base_dir.as_ref();
        Self {
            content_dir: base_dir.join("content/blogs"),
            output_dir: base_dir.join("blog"),
            template_dir: base_dir.join("scripts/templates"),
            cache_file: base_dir.join(".blogcache"),
            force,
        }
    }
}

/// Counts reported at the end of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    /// Pages written, including the listing
    pub built: usize,
    /// Post pages left as they were
    pub skipped: usize,
    /// Posts plus the listing
    pub total: usize,
}

/// Post pipeline orchestrator
pub struct Builder {
    config: Config,
    options: BuildOptions,
    ci: CiContext,
}

impl Builder {
    pub fn new(config: Config, options: BuildOptions, ci: CiContext) -> Self {
        if config.blog.date_format != helpers::DISPLAY_DATE {
            tracing::debug!(
                "date_format {:?} is not supported yet, dates render as {:?}",
                config.blog.date_format,
                helpers::DISPLAY_DATE
            );
        }
        Self {
            config,
            options,
            ci,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The sitemap sits next to the output directory
    pub fn sitemap_path(&self) -> PathBuf {
        self.options
            .output_dir
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join("sitemap.xml")
    }

    /// Run one build
    pub fn build(&self) -> Result<BuildSummary, BuildError> {
        let output_dir = &self.options.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| BuildError::CreateOutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let renderer =
            TemplateRenderer::load(&self.options.template_dir).map_err(BuildError::Templates)?;

        let previous = BuildCache::load(&self.options.cache_file);
        let files = self.list_content()?;
        tracing::info!("Found {} markdown files", files.len());

        let loader = PostLoader::new(&self.config, &self.ci);
        let mut current = BuildCache::new();
        let mut posts = Vec::with_capacity(files.len());

        for file in &files {
            match cache::hash_file(file) {
                Ok(hash) => current.insert(file.to_string_lossy(), hash),
                Err(e) => tracing::debug!("Cannot hash {:?}, not tracked: {}", file, e),
            }

            match loader.load_post(file) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Error processing {:?}: {:#}", file, e),
            }
        }

        let changed = current.has_changes(&previous, files.len());
        sort_posts(&mut posts);

        let current_year = chrono::Local::now().year();
        let mut summary = BuildSummary {
            built: 0,
            skipped: 0,
            total: posts.len() + 1,
        };

        if !posts.is_empty() && (changed || self.options.force) {
            tracing::info!(
                "Rendering {} posts (changed={}, force={})",
                posts.len(),
                changed,
                self.options.force
            );
            summary.built += self.render_posts(&renderer, &posts, current_year);
        } else {
            tracing::info!("No changes detected, skipping post pages");
            summary.skipped += posts.len();
        }

        self.render_listing(&renderer, &posts, current_year)?;
        summary.built += 1;

        if let Err(e) = current.save(&self.options.cache_file) {
            tracing::error!("Failed to save cache: {:#}", e);
        }

        if let Err(e) =
            sitemap::update_sitemap(&self.sitemap_path(), &self.config.site.url, &posts, &files)
        {
            tracing::warn!("Failed to update sitemap: {:#}", e);
        }

        Ok(summary)
    }

    /// All `*.md` files directly inside the content directory, sorted
    fn list_content(&self) -> Result<Vec<PathBuf>, BuildError> {
        let dir = &self.options.content_dir;
        let list_error = |source: io::Error| BuildError::ListContent {
            path: dir.clone(),
            source,
        };

        if !fs::metadata(dir).map_err(list_error)?.is_dir() {
            return Err(list_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }

        let pattern = format!("{}/*.md", glob::Pattern::escape(&dir.to_string_lossy()));
        let entries = glob::glob(&pattern)
            .map_err(|e| list_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!("Cannot read {:?}: {}", e.path(), e.error()),
            }
        }
        Ok(files)
    }

    /// Render every post page; returns how many were written
    fn render_posts(&self, renderer: &TemplateRenderer, posts: &[Post], current_year: i32) -> usize {
        let mut built = 0;

        for post in posts {
            let context = PostContext {
                post,
                latest_posts: post.latest(posts),
                site: &self.config.site,
                config: &self.config,
                current_year,
            };

            let html = match renderer.render_post(&context) {
                Ok(html) => html,
                Err(e) => {
                    tracing::error!("Error rendering {}: {:#}", post.slug, anyhow::Error::from(e));
                    continue;
                }
            };

            let post_dir = self.options.output_dir.join(&post.slug);
            if let Err(e) = fs::create_dir_all(&post_dir) {
                tracing::error!("Error creating post dir {:?}: {}", post_dir, e);
                continue;
            }

            let output_path = post_dir.join("index.html");
            if let Err(e) = fs::write(&output_path, html) {
                tracing::error!("Error writing {:?}: {}", output_path, e);
                continue;
            }

            tracing::debug!("Generated post: {:?}", output_path);
            built += 1;
        }

        built
    }

    fn render_listing(
        &self,
        renderer: &TemplateRenderer,
        posts: &[Post],
        current_year: i32,
    ) -> Result<(), BuildError> {
        let context = ListingContext {
            posts,
            site: &self.config.site,
            config: &self.config,
            current_year,
        };
        let html = renderer
            .render_listing(&context)
            .map_err(BuildError::RenderListing)?;

        let output_path = self.options.output_dir.join("index.html");
        fs::write(&output_path, html).map_err(|source| BuildError::WriteListing {
            path: output_path.clone(),
            source,
        })?;
        tracing::debug!("Generated listing: {:?}", output_path);
        Ok(())
    }
}
