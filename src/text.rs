//! Markup helpers used by previews, content paging and links

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker splitting a post into a teaser and the rest
pub const MORE_MARKER: &str = "<!--more-->";

/// Marker splitting a post into pages
pub const NEXTPAGE_MARKER: &str = "<!--nextpage-->";

/// HTML ellipsis entity appended to truncated text
pub const ELLIPSIS: &str = "&hellip;";

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    // Comments first so `>` inside them does not end the match early
    Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("tag pattern is valid")
});

static MORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<!--more(?:\s[^>]*?)?-->").expect("more pattern is valid")
});

/// Remove every tag and HTML comment from `text`
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Truncate `text` to at most `max_words` words
///
/// Markup is stripped first and whitespace collapsed. When words were dropped and
/// `more` is given, it is appended after a space. Returns the text and whether
/// anything was cut.
pub fn trim_words(text: &str, max_words: usize, more: Option<&str>) -> (String, bool) {
    let plain = strip_tags(text);
    let words: Vec<&str> = plain.split_whitespace().collect();

    if words.len() <= max_words {
        return (words.join(" "), false);
    }

    let mut out = words[..max_words].join(" ");
    if let Some(more) = more {
        out.push(' ');
        out.push_str(more);
    }
    (out, true)
}

/// Text before the first `<!--more-->` marker, if the content has one
pub fn teaser(content: &str) -> Option<&str> {
    MORE_RE.find(content).map(|m| &content[..m.start()])
}

/// Split content into its `<!--nextpage-->` pages
pub fn split_pages(content: &str) -> Vec<&str> {
    content.split(NEXTPAGE_MARKER).collect()
}

/// Whether trimmed text already ends a sentence
pub fn ends_sentence(text: &str) -> bool {
    matches!(text.trim_end().chars().last(), Some('.' | '!' | '?'))
}

/// Turn an absolute URL into a site-relative path
///
/// `http://example.org/2015/07/04/my-cool-post/?a=1` becomes
/// `/2015/07/04/my-cool-post/?a=1`. Anything that is not an absolute URL is
/// returned unchanged.
pub fn relative_url(link: &str) -> String {
    match url::Url::parse(link) {
        Ok(url) if url.has_host() => {
            let mut path = url.path().to_string();
            if let Some(query) = url.query() {
                path.push('?');
                path.push_str(query);
            }
            if let Some(fragment) = url.fragment() {
                path.push('#');
                path.push_str(fragment);
            }
            path
        }
        _ => link.to_string(),
    }
}
