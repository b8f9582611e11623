//! Sitemap maintenance.
//!
//! The sitemap is shared with the rest of the site: entries under the blog
//! prefix belong to this tool, everything else is carried through as-is.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!     <url>
//!         <loc>https://example.com/blog/hello/</loc>
//!         <lastmod>2025-01-01</lastmod>
//!         <changefreq>monthly</changefreq>
//!         <priority>0.7</priority>
//!     </url>
//! </urlset>
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::Post;
use crate::helpers;

/// XML namespace for sitemap
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Change frequency given to newly added post entries
pub const NEW_CHANGEFREQ: &str = "monthly";

/// Priority given to newly added post entries
pub const NEW_PRIORITY: &str = "0.7";

/// Sitemap document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "urlset")]
pub struct Sitemap {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "String::is_empty")]
    pub xmlns: String,
    #[serde(rename = "url", default)]
    pub urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlEntry {
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl Sitemap {
    /// Read and parse an existing sitemap
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read sitemap {:?}", path))?;
        let sitemap = quick_xml::de::from_str(&content)
            .with_context(|| format!("Failed to parse sitemap {:?}", path))?;
        Ok(sitemap)
    }

    /// Serialize with an XML declaration and 4-space indentation
    pub fn to_xml(&self) -> Result<String> {
        let mut body = String::new();
        let mut serializer = quick_xml::se::Serializer::with_root(&mut body, Some("urlset"))?;
        serializer.indent(' ', 4);
        self.serialize(serializer)?;

        Ok(format!("{}\n{}\n", XML_HEADER, body))
    }

    /// Write sitemap to file, replacing it
    pub fn write(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml()?;
        fs::write(path, xml).with_context(|| format!("Failed to write sitemap {:?}", path))?;
        Ok(())
    }

    /// Refresh or add one entry per post URL
    ///
    /// Existing entries under `prefix` only get their `lastmod` replaced;
    /// unknown post URLs are appended. Entries outside `prefix`, and post
    /// entries with no matching post, are left untouched.
    pub fn merge_posts<I>(&mut self, prefix: &str, posts: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut blog_urls: HashMap<String, usize> = self
            .urls
            .iter()
            .enumerate()
            .filter(|(_, url)| url.loc.starts_with(prefix))
            .map(|(i, url)| (url.loc.clone(), i))
            .collect();

        for (loc, lastmod) in posts {
            match blog_urls.get(&loc) {
                Some(&idx) => self.urls[idx].lastmod = Some(lastmod),
                None => {
                    blog_urls.insert(loc.clone(), self.urls.len());
                    self.urls.push(UrlEntry {
                        loc,
                        lastmod: Some(lastmod),
                        changefreq: Some(NEW_CHANGEFREQ.to_string()),
                        priority: Some(NEW_PRIORITY.to_string()),
                    });
                }
            }
        }

        if self.xmlns.is_empty() {
            self.xmlns = SITEMAP_NS.to_string();
        }
    }
}

/// Bring the sitemap at `path` in line with the current posts
///
/// `lastmod` comes from the modification time of each post's source among
/// `files`, or today's date when it is unknown.
pub fn update_sitemap(path: &Path, site_url: &str, posts: &[Post], files: &[PathBuf]) -> Result<()> {
    let mut sitemap = Sitemap::load(path)?;

    let modified: HashMap<&Path, String> = files
        .iter()
        .filter_map(|file| {
            let mtime = fs::metadata(file).and_then(|m| m.modified()).ok()?;
            Some((file.as_path(), helpers::date_ymd(&DateTime::<Local>::from(mtime))))
        })
        .collect();
    let today = helpers::date_ymd(&Local::now());

    let entries = posts.iter().map(|post| {
        let lastmod = modified
            .get(post.source.as_path())
            .cloned()
            .unwrap_or_else(|| today.clone());
        (helpers::post_url(site_url, &post.slug), lastmod)
    });

    sitemap.merge_posts(&helpers::blog_prefix(site_url), entries);
    sitemap.write(path)?;

    tracing::debug!("Updated sitemap {:?} ({} entries)", path, sitemap.urls.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::post::tests::post;

    const EXISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/about/</loc>
    <lastmod>2020-01-01</lastmod>
    <changefreq>yearly</changefreq>
    <priority>0.5</priority>
  </url>
  <url>
    <loc>https://example.com/blog/kept/</loc>
    <lastmod>2021-01-01</lastmod>
    <changefreq>weekly</changefreq>
    <priority>0.9</priority>
  </url>
  <url>
    <loc>https://example.com/blog/removed/</loc>
    <lastmod>2019-05-05</lastmod>
    <changefreq>monthly</changefreq>
    <priority>0.7</priority>
  </url>
</urlset>
"#;

    fn entry(loc: &str, lastmod: &str, changefreq: &str, priority: &str) -> UrlEntry {
        UrlEntry {
            loc: loc.to_string(),
            lastmod: Some(lastmod.to_string()),
            changefreq: Some(changefreq.to_string()),
            priority: Some(priority.to_string()),
        }
    }

    #[test]
    fn test_parse_sitemap() {
        let sitemap: Sitemap = quick_xml::de::from_str(EXISTING).unwrap();
        assert_eq!(sitemap.xmlns, SITEMAP_NS);
        assert_eq!(sitemap.urls.len(), 3);
        assert_eq!(
            sitemap.urls[0],
            entry("https://example.com/about/", "2020-01-01", "yearly", "0.5")
        );
    }

    #[test]
    fn test_merge_posts() {
        let mut sitemap: Sitemap = quick_xml::de::from_str(EXISTING).unwrap();
        sitemap.merge_posts(
            "https://example.com/blog/",
            vec![
                ("https://example.com/blog/kept/".to_string(), "2024-03-03".to_string()),
                ("https://example.com/blog/fresh/".to_string(), "2024-04-04".to_string()),
            ],
        );

        assert_eq!(
            sitemap.urls,
            vec![
                entry("https://example.com/about/", "2020-01-01", "yearly", "0.5"),
                entry("https://example.com/blog/kept/", "2024-03-03", "weekly", "0.9"),
                entry("https://example.com/blog/removed/", "2019-05-05", "monthly", "0.7"),
                entry("https://example.com/blog/fresh/", "2024-04-04", "monthly", "0.7"),
            ]
        );
    }

    #[test]
    fn test_merge_sets_missing_namespace() {
        let mut sitemap = Sitemap::default();
        sitemap.merge_posts("https://example.com/blog/", Vec::new());
        assert_eq!(sitemap.xmlns, SITEMAP_NS);
    }

    #[test]
    fn test_to_xml_omits_absent_fields() {
        let sitemap = Sitemap {
            xmlns: SITEMAP_NS.to_string(),
            urls: vec![UrlEntry {
                loc: "https://example.com/".to_string(),
                ..Default::default()
            }],
        };
        let xml = sitemap.to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset"));
        assert!(xml.contains(r#"xmlns="http://www.sitemaps.org/schemas/sitemap/0.9""#));
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(!xml.contains("lastmod"));
        assert!(xml.ends_with("</urlset>\n"));

        let reparsed: Sitemap = quick_xml::de::from_str(&xml).unwrap();
        assert_eq!(reparsed, sitemap);
    }

    #[test]
    fn test_update_sitemap_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");
        fs::write(&path, EXISTING).unwrap();

        let kept_source = dir.path().join("kept.md");
        fs::write(&kept_source, "---\n---\n").unwrap();
        let mut kept = post("kept", "2024-01-01", "");
        kept.source = kept_source.clone();
        let fresh = post("fresh", "2024-02-01", "");

        update_sitemap(&path, "https://example.com", &[kept, fresh], &[kept_source]).unwrap();

        let sitemap = Sitemap::load(&path).unwrap();
        let today = helpers::date_ymd(&Local::now());
        assert_eq!(sitemap.urls.len(), 4);
        assert_eq!(
            sitemap.urls[0],
            entry("https://example.com/about/", "2020-01-01", "yearly", "0.5")
        );
        assert_eq!(sitemap.urls[1].lastmod.as_deref(), Some(today.as_str()));
        assert_eq!(sitemap.urls[1].changefreq.as_deref(), Some("weekly"));
        assert_eq!(
            sitemap.urls[2],
            entry("https://example.com/blog/removed/", "2019-05-05", "monthly", "0.7")
        );
        assert_eq!(
            sitemap.urls[3],
            entry("https://example.com/blog/fresh/", &today, "monthly", "0.7")
        );
    }

    #[test]
    fn test_update_missing_sitemap_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = update_sitemap(&dir.path().join("sitemap.xml"), "https://example.com", &[], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_malformed_sitemap_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");
        fs::write(&path, "<urlset><url><loc>oops</urlset>").unwrap();
        assert!(update_sitemap(&path, "https://example.com", &[], &[]).is_err());
        // untouched on failure
        assert_eq!(fs::read_to_string(&path).unwrap(), "<urlset><url><loc>oops</urlset>");
    }
}
