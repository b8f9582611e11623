//! URL helper functions

/// Path segment every post lives under
pub const BLOG_PATH: &str = "blog";

/// URL prefix shared by all post pages, with trailing slash
///
/// # Examples
/// ```ignore
/// blog_prefix("https://example.com") // -> "https://example.com/blog/"
/// ```
pub fn blog_prefix(site_url: &str) -> String {
    format!("{}/{}/", site_url.trim_end_matches('/'), BLOG_PATH)
}

/// Canonical URL of a post page
pub fn post_url(site_url: &str, slug: &str) -> String {
    format!("{}{}/", blog_prefix(site_url), slug)
}
