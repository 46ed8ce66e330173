//! Template integration
//!
//! Turns a `PostView` into the object templates receive and renders Tera
//! templates against it. Templates see the computed values (`title`, `link`,
//! `content`, `terms`, ...), the raw record fields and every custom field.

use serde_json::{json, Map, Value};
use std::path::Path;
use tera::{Context as TeraContext, Tera};
use tracing::{debug, warn};

use crate::error::{ViewError, ViewResult};
use crate::text;
use crate::view::{CommentView, PostView};

/// Template value of a post
///
/// Custom fields come first so record fields and computed values win on name
/// clashes. The ID is exposed as both `id` and `ID`. Related posts (`parent`,
/// `children`, `next`, `prev`) are summaries rather than full objects.
pub async fn to_value(post: &mut PostView) -> ViewResult<Value> {
    if !post.exists() {
        return Ok(Value::Null);
    }

    let mut map: Map<String, Value> = post
        .custom()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    map.insert("custom".to_string(), json!(post.custom()));

    if let Some(record) = post.record() {
        map.insert("id".to_string(), json!(record.id));
        map.insert("ID".to_string(), json!(record.id));
        map.insert("author_id".to_string(), json!(record.author_id));
        map.insert("parent_id".to_string(), json!(record.parent_id));
        map.insert("post_type".to_string(), json!(record.post_type));
        map.insert("slug".to_string(), json!(record.slug));
        map.insert("status".to_string(), json!(record.status.as_str()));
        map.insert("excerpt".to_string(), json!(record.excerpt));
        map.insert("menu_order".to_string(), json!(record.menu_order));
    }

    map.insert("title".to_string(), json!(post.title()));
    map.insert("link".to_string(), json!(post.link()));
    map.insert("path".to_string(), json!(post.path()));
    map.insert("content".to_string(), json!(post.content()));
    map.insert("preview".to_string(), json!(post.preview()));
    map.insert("date".to_string(), json!(post.date(None)));
    map.insert("modified_date".to_string(), json!(post.modified_date(None)));
    map.insert("modified_time".to_string(), json!(post.modified_time(None)));
    map.insert("edit_link".to_string(), json!(post.edit_link()));
    map.insert("class".to_string(), json!(post.css_class().await?));
    map.insert("format".to_string(), json!(post.format().await?));
    map.insert("pagination".to_string(), json!(post.pagination()));
    map.insert("comment_count".to_string(), json!(post.comment_count().await?));
    map.insert("thumbnail".to_string(), json!(post.thumbnail().await?));
    map.insert("author".to_string(), json!(post.author().await?));
    map.insert("post_type_info".to_string(), json!(post.post_type_info().await?));

    map.insert("terms".to_string(), json!(*post.terms("").await?));
    map.insert("categories".to_string(), json!(*post.categories().await?));
    map.insert("category".to_string(), json!(post.category().await?));
    map.insert("tags".to_string(), json!(*post.tags().await?));

    let comments: Vec<Value> = post.comments().await?.iter().map(CommentView::to_value).collect();
    map.insert("comments".to_string(), Value::Array(comments));

    let parent = post.parent().await?.as_ref().map(summary);
    map.insert("parent".to_string(), json!(parent));

    let children: Vec<Value> = post.children("any").await?.iter().map(summary).collect();
    map.insert("children".to_string(), Value::Array(children));

    let next = post.next(None).await?.map(summary);
    map.insert("next".to_string(), json!(next));

    let prev = post.prev(None).await?.map(summary);
    map.insert("prev".to_string(), json!(prev));

    Ok(Value::Object(map))
}

/// Short form of a related post
fn summary(post: &PostView) -> Value {
    let link = post.peek_permalink();
    json!({
        "id": post.id(),
        "ID": post.id(),
        "title": post.title(),
        "slug": post.slug(),
        "path": text::relative_url(&link),
        "link": link,
        "date": post.date(None),
    })
}

/// Tera templates that render posts
pub struct PostTemplates {
    tera: Tera,
}

impl Default for PostTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl PostTemplates {
    /// Create an empty template set
    ///
    /// Autoescaping is off: titles, content and previews are already HTML.
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        Self { tera }
    }

    /// Add a template from a string
    pub fn add_raw(&mut self, name: &str, content: &str) -> ViewResult<()> {
        self.tera.add_raw_template(name, content)?;
        Ok(())
    }

    /// Add a template file under its file name
    pub fn add_file(&mut self, path: &Path) -> ViewResult<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ViewError::Template(format!("Invalid template path: {}", path.display())))?
            .to_string();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ViewError::Template(format!("Failed to read template '{}': {}", path.display(), e))
        })?;

        self.add_raw(&name, &content)?;
        debug!("Loaded template '{}'", name);
        Ok(name)
    }

    /// Render a template with a prepared context
    pub fn render(&self, template: &str, context: &TeraContext) -> ViewResult<String> {
        Ok(self.tera.render(template, context)?)
    }

    /// Render a template with `post` in scope
    pub async fn render_post(&self, template: &str, post: &mut PostView) -> ViewResult<String> {
        let mut context = TeraContext::new();
        context.insert("post", &to_value(post).await?);
        self.render(template, &context)
    }

    /// Render a template or return default content on error
    pub fn render_or_default(&self, template: &str, context: &TeraContext, default: &str) -> String {
        match self.render(template, context) {
            Ok(html) => html,
            Err(e) => {
                warn!("Template '{}' failed ({}), using default", template, e);
                default.to_string()
            }
        }
    }
}
