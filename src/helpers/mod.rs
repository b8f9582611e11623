//! Helper functions shared by the post parser, the builder and the sitemap

mod date;
mod reading;
mod url;

pub use date::*;
pub use reading::*;
pub use url::*;
