//! Front-matter parsing
//!
//! Metadata is declared loosely in YAML (numbers, booleans and strings are
//! all accepted where a string is meant), so every field goes through one
//! normalisation step here and comes out as a plain `Option<String>`.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

#[derive(thiserror::Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter block is not closed by `---`")]
    Unterminated,
    #[error("invalid front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Author as declared in front-matter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorField {
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "loose_string")]
    pub title: Option<String>,
    /// Expected as `YYYY-MM-DD`
    #[serde(deserialize_with = "loose_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "author_field")]
    pub author: Option<AuthorField>,
    #[serde(deserialize_with = "loose_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "loose_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub excerpt: Option<String>,
    #[serde(rename = "coverImage", alias = "image", deserialize_with = "loose_string")]
    pub cover_image: Option<String>,
    #[serde(rename = "canonicalUrl", deserialize_with = "loose_string")]
    pub canonical_url: Option<String>,
    #[serde(rename = "ogImage", deserialize_with = "og_image_url")]
    pub og_image: Option<String>,
    /// Free text, compared case-insensitively to "true"
    #[serde(deserialize_with = "loose_string")]
    pub featured: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub slug: Option<String>,
    #[serde(rename = "readingTime", deserialize_with = "loose_string")]
    pub reading_time: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// A document that does not open with a `---` line has no front-matter.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}');

        let Some(rest) = strip_delimiter(content) else {
            return Ok((FrontMatter::default(), content));
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                let yaml = &rest[..offset];
                let body = &rest[offset + line.len()..];
                if yaml.trim().is_empty() {
                    return Ok((FrontMatter::default(), body));
                }
                let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
                return Ok((fm, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unterminated)
    }
}

/// Strip an opening `---` line, if present
fn strip_delimiter(content: &str) -> Option<&str> {
    let (first, rest) = match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    };
    (first.trim_end() == "---").then_some(rest)
}

/// Stringify a YAML scalar; empty strings, null and collections yield `None`
fn scalar_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Tagged(tagged) => return scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// Accepts a list of scalars or a single scalar
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Accepts `{name, picture}` or a bare name
fn author_field<'de, D>(deserializer: D) -> Result<Option<AuthorField>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Mapping(map)) => Some(AuthorField {
            name: map.get("name").and_then(scalar_to_string),
            picture: map.get("picture").and_then(scalar_to_string),
        }),
        Some(other) => scalar_to_string(&other).map(|name| AuthorField {
            name: Some(name),
            picture: None,
        }),
        None => None,
    })
}

/// Accepts `{url}` or a bare URL
fn og_image_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Mapping(map)) => map.get("url").and_then(scalar_to_string),
        Some(other) => scalar_to_string(&other),
        None => None,
    })
}
