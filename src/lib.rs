//! blogsmith: incremental blog builder
//!
//! Reads markdown posts with YAML front-matter, renders them through Tera
//! templates into `blog/<slug>/index.html` plus a listing page, skips post
//! pages when no source changed since the last build, and keeps the site's
//! sitemap in step with the published posts.

pub mod builder;
pub mod cache;
pub mod config;
pub mod content;
pub mod helpers;
pub mod sitemap;
pub mod templates;

use std::path::{Path, PathBuf};

pub use builder::{BuildError, BuildOptions, BuildSummary, Builder};

/// Location of the configuration file, relative to the base directory
pub const CONFIG_FILE: &str = "scripts/config.yml";

/// The blog of one site checkout
pub struct Blog {
    /// Base directory
    pub base_dir: PathBuf,
    builder: Builder,
}

impl Blog {
    /// Set up a build rooted at `base_dir`
    ///
    /// A missing or unreadable config file is not an error; defaults are used.
    pub fn new<P: AsRef<Path>>(base_dir: P, force: bool) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::Config::load_or_default(&base_dir.join(CONFIG_FILE));
        let options = BuildOptions::new(&base_dir, force);
        let ci = content::CiContext::from_env();

        Self {
            base_dir,
            builder: Builder::new(config, options, ci),
        }
    }

    pub fn config(&self) -> &config::Config {
        self.builder.config()
    }

    /// Build the blog
    pub fn build(&self) -> Result<BuildSummary, BuildError> {
        self.builder.build()
    }
}
