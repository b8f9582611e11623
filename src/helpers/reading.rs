//! Reading-time estimation

/// Words per minute used when the configured speed is not positive
pub const DEFAULT_WORDS_PER_MINUTE: i64 = 200;

/// Strip everything between `<` and `>`
///
/// Deliberately naive: escaped angle brackets in text are not recognised.
pub fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Count whitespace-separated words in rendered HTML
pub fn count_words(html: &str) -> usize {
    strip_tags(html).split_whitespace().count()
}

/// Estimate reading time as `"<n> min"`, rounded, never below one minute
pub fn reading_time(html: &str, words_per_minute: i64) -> String {
    let wpm = if words_per_minute <= 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };
    let words = count_words(html) as f64;
    let minutes = (words / wpm as f64).round().max(1.0) as u64;
    format!("{} min", minutes)
}
