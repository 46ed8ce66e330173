//! Post previews

use super::PostView;
use crate::config::PreviewConfig;
use crate::text::{self, ELLIPSIS};

/// Options for [`PostView::preview_with`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOptions {
    /// Maximum number of words
    pub len: usize,
    /// Also trim a manual excerpt or `<!--more-->` teaser to `len`
    pub force: bool,
    /// Text of the link appended after the preview; `None` for no link
    pub read_more: Option<String>,
    /// Strip markup from the preview
    pub strip: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self::from_config(&PreviewConfig::default())
    }
}

impl PreviewOptions {
    /// Options matching the configured defaults
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            len: config.length,
            force: false,
            read_more: (!config.read_more.is_empty()).then(|| config.read_more.clone()),
            strip: config.strip,
        }
    }

    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn with_read_more(mut self, read_more: Option<&str>) -> Self {
        self.read_more = read_more.map(str::to_string);
        self
    }

    pub fn with_strip(mut self, strip: bool) -> Self {
        self.strip = strip;
        self
    }
}

impl PostView {
    /// Preview with the configured defaults
    pub fn preview(&mut self) -> String {
        let options = PreviewOptions::from_config(&self.host.config.preview);
        self.preview_with(&options)
    }

    /// Short version of the post for listings
    ///
    /// Uses the manual excerpt if there is one, otherwise the text before
    /// `<!--more-->`, otherwise the first `len` words of the filtered content.
    /// The first two are only trimmed when `force` is set. Trimmed text that does
    /// not end a sentence gets an ellipsis, and `read_more` adds a link to the post.
    pub fn preview_with(&mut self, options: &PreviewOptions) -> String {
        let Some(record) = self.record() else {
            return String::new();
        };
        let excerpt = record.excerpt.clone();
        let teaser = text::teaser(&record.content).map(str::to_string);

        let mut text = String::new();
        let mut trimmed = false;

        if !excerpt.is_empty() {
            if options.force {
                (text, trimmed) = text::trim_words(&excerpt, options.len, None);
            } else {
                text = excerpt;
            }
        }

        if text.is_empty() {
            if let Some(teaser) = teaser {
                if options.force {
                    (text, trimmed) = text::trim_words(&teaser, options.len, None);
                } else {
                    text = teaser;
                }
            }
        }

        if text.is_empty() {
            let content = self.content();
            (text, trimmed) = text::trim_words(&content, options.len, None);
        }

        let mut text = if options.strip {
            text::strip_tags(&text).trim().to_string()
        } else {
            text.trim().to_string()
        };
        if text.is_empty() {
            return text;
        }

        let ellipsis = trimmed && !text::ends_sentence(&text);

        if !options.strip {
            if let Some(pos) = text.rfind("</p>") {
                text.truncate(pos);
            }
        }
        if ellipsis {
            text.push(' ');
            text.push_str(ELLIPSIS);
        }
        if let Some(read_more) = options.read_more.as_deref().filter(|r| !r.is_empty()) {
            let link = self.permalink();
            text.push_str(&format!(" <a href=\"{}\" class=\"read-more\">{}</a>", link, read_more));
        }
        if !options.strip {
            text.push_str("</p>");
        }

        text.trim().to_string()
    }
}
