//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::{Captures, Regex};
use std::collections::HashSet;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Theme used when the configured code theme is not bundled with syntect
const FALLBACK_THEME: &str = "base16-ocean.dark";

lazy_static! {
    static ref EMOJI_SHORTCODE: Regex = Regex::new(r":([a-z0-9_+\-]+):").unwrap();
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a renderer highlighting code with the given theme
    pub fn new(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Render markdown to HTML
    ///
    /// Headings without an explicit `{#id}` get a slug id, `:shortcode:`
    /// emoji outside code are replaced, and fenced code is highlighted.
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = TextMergeStream::new(Parser::new_ext(markdown, options));

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_content = String::new();

        let mut heading_start: Option<usize> = None;
        let mut heading_text = String::new();
        let mut used_ids: HashSet<String> = HashSet::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) => lang.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let highlighted = self.highlight_code(&code_content, &code_lang);
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if in_code_block => {
                    code_content.push_str(&text);
                }
                Event::Start(Tag::Heading { ref id, .. }) => {
                    match id {
                        Some(id) => {
                            used_ids.insert(id.to_string());
                        }
                        None => heading_start = Some(events.len()),
                    }
                    heading_text.clear();
                    events.push(event);
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(start) = heading_start.take() {
                        let id = unique_id(&heading_text, &mut used_ids);
                        if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[start] {
                            *slot = Some(CowStr::from(id));
                        }
                    }
                    events.push(event);
                }
                Event::Text(text) => {
                    if heading_start.is_some() {
                        heading_text.push_str(&text);
                    }
                    events.push(Event::Text(replace_emoji(&text).into_owned().into()));
                }
                Event::Code(ref code) => {
                    if heading_start.is_some() {
                        heading_text.push_str(code);
                    }
                    events.push(event);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn theme(&self) -> Option<&Theme> {
        let themes = &self.theme_set.themes;
        themes
            .get(&self.theme_name)
            .or_else(|| themes.get(FALLBACK_THEME))
            .or_else(|| themes.values().next())
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let lang = if lang.is_empty() { "text" } else { lang };

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self
            .theme()
            .and_then(|theme| highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok());

        match highlighted {
            Some(html) => html,
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        }
    }
}

/// Slugify heading text, suffixing `-1`, `-2`, ... on collisions
fn unique_id(text: &str, used: &mut HashSet<String>) -> String {
    let base = match slug::slugify(text) {
        s if s.is_empty() => "section".to_string(),
        s => s,
    };
    let mut id = base.clone();
    let mut suffix = 1;
    while used.contains(&id) {
        id = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    used.insert(id.clone());
    id
}

/// Replace known `:shortcode:` emoji, leaving unknown ones verbatim
fn replace_emoji(text: &str) -> std::borrow::Cow<'_, str> {
    EMOJI_SHORTCODE.replace_all(text, |caps: &Captures| {
        match emojis::get_by_shortcode(&caps[1]) {
            Some(emoji) => emoji.as_str().to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
