//! Markdown content filter
//!
//! Registers a `the_content` handler that renders Markdown bodies to HTML.
//! Hosts that already store HTML should not enable it.

use pulldown_cmark::{html, Options, Parser};
use serde_json::Value;

use super::{hook_names, HookManager, PRIORITY_EARLY};

/// Owner tag used when registering, so the filter can be removed again
pub const MARKDOWN_OWNER: &str = "markdown";

/// Render Markdown to HTML with tables, strikethrough, task lists and smart punctuation
pub fn render(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Register the Markdown renderer on `the_content`
///
/// Runs early so later content filters see HTML.
pub fn register_markdown_filter(hooks: &HookManager) {
    hooks.register(
        hook_names::THE_CONTENT,
        |data: &mut Value| {
            let rendered = data.get("content").and_then(|v| v.as_str()).map(render);
            if let (Some(html), Some(obj)) = (rendered, data.as_object_mut()) {
                obj.insert("content".to_string(), Value::String(html));
            }
            None
        },
        PRIORITY_EARLY,
        Some(MARKDOWN_OWNER.to_string()),
    );
}
