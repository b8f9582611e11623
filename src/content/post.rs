//! Post model and ordering

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::PathBuf;

use crate::helpers;

/// Number of other posts offered at the end of each post page
pub const LATEST_POSTS: usize = 3;

/// Resolved post author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    pub picture: String,
}

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date as written in front-matter (`YYYY-MM-DD`)
    pub date: String,

    /// Date rendered for display
    pub formatted_date: String,

    pub author: Author,

    pub category: String,

    /// Display color looked up from the category
    pub category_color: String,

    pub tags: Vec<String>,

    /// Falls back to the excerpt
    pub description: String,

    pub excerpt: String,

    pub cover_image: String,

    pub canonical_url: String,

    /// Social preview image
    pub og_image: String,

    /// Free text; see [`Post::is_featured`]
    pub featured: String,

    /// URL-friendly name, also the output directory name
    pub slug: String,

    /// e.g. `"4 min"`
    pub reading_time: String,

    /// Rendered HTML content (trusted)
    pub content: String,

    /// Source markdown file
    #[serde(skip)]
    pub source: PathBuf,
}

impl Post {
    /// Whether `featured` reads as "true", ignoring case and surrounding space
    pub fn is_featured(&self) -> bool {
        self.featured.trim().eq_ignore_ascii_case("true")
    }

    /// Publication date; unparseable dates sort as the earliest possible
    pub fn sort_date(&self) -> NaiveDate {
        helpers::parse_date(&self.date).unwrap_or(NaiveDate::MIN)
    }

    /// Up to three other posts, in list order, for "latest posts" display
    pub fn latest<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts
            .iter()
            .filter(|p| p.slug != self.slug)
            .take(LATEST_POSTS)
            .collect()
    }
}

/// Featured posts first, then newest first
///
/// The sort is stable, so posts with equal keys keep discovery order.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(compare_posts);
}

fn compare_posts(a: &Post, b: &Post) -> Ordering {
    b.is_featured()
        .cmp(&a.is_featured())
        .then_with(|| b.sort_date().cmp(&a.sort_date()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn post(slug: &str, date: &str, featured: &str) -> Post {
        Post {
            title: slug.to_string(),
            date: date.to_string(),
            formatted_date: date.to_string(),
            author: Author {
                name: "Jane".to_string(),
                picture: "/img/avatar.png".to_string(),
            },
            category: String::new(),
            category_color: "primary".to_string(),
            tags: Vec::new(),
            description: String::new(),
            excerpt: String::new(),
            cover_image: String::new(),
            canonical_url: String::new(),
            og_image: String::new(),
            featured: featured.to_string(),
            slug: slug.to_string(),
            reading_time: "1 min".to_string(),
            content: String::new(),
            source: PathBuf::from(format!("{}.md", slug)),
        }
    }

    fn slugs(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_is_featured() {
        assert!(post("a", "", "true").is_featured());
        assert!(post("a", "", " TRUE ").is_featured());
        assert!(!post("a", "", "yes").is_featured());
        assert!(!post("a", "", "").is_featured());
    }

    #[test]
    fn test_sort_newest_first_invalid_last() {
        let mut posts = vec![
            post("old", "2023-01-01", ""),
            post("broken", "someday", ""),
            post("new", "2024-06-01", ""),
            post("mid", "2023-09-15", ""),
        ];
        sort_posts(&mut posts);
        assert_eq!(slugs(&posts), vec!["new", "mid", "old", "broken"]);
    }

    #[test]
    fn test_sort_featured_first() {
        let mut posts = vec![
            post("new", "2024-06-01", ""),
            post("old-featured", "2020-01-01", "True"),
            post("newer-featured", "2021-01-01", "true"),
            post("old", "2023-01-01", "false"),
        ];
        sort_posts(&mut posts);
        assert_eq!(
            slugs(&posts),
            vec!["newer-featured", "old-featured", "new", "old"]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut posts = vec![
            post("first", "2024-01-01", ""),
            post("second", "2024-01-01", ""),
            post("third", "2024-01-01", ""),
        ];
        sort_posts(&mut posts);
        assert_eq!(slugs(&posts), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_latest_excludes_self_and_caps() {
        let posts = vec![
            post("a", "2024-05-01", ""),
            post("b", "2024-04-01", ""),
            post("c", "2024-03-01", ""),
            post("d", "2024-02-01", ""),
            post("e", "2024-01-01", ""),
        ];

        let latest: Vec<_> = posts[1].latest(&posts).iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(latest, vec!["a", "c", "d"]);

        let latest: Vec<_> = posts[4].latest(&posts).iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(latest, vec!["a", "b", "c"]);

        let single = vec![post("only", "2024-01-01", "")];
        assert!(single[0].latest(&single).is_empty());
    }
}
