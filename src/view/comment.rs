//! Comment views and threading

use chrono::NaiveDateTime;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use super::{format_datetime, PostView};
use crate::config::ViewConfig;
use crate::error::ViewResult;
use crate::hooks::{hook_names, HookManager};
use crate::models::{CommentQuery, CommentRecord, CommentStatus, SortOrder};

/// Options for [`PostView::comments_with`]
#[derive(Debug, Clone, PartialEq)]
pub struct CommentOptions {
    /// Maximum number of comments, 0 for all
    pub number: usize,
    /// Sort order; `None` uses the site-wide order
    pub order: Option<SortOrder>,
    /// Only comments of this type; `None` for every type
    pub comment_type: Option<String>,
    /// Only comments with this status; `None` for every status
    pub status: Option<CommentStatus>,
}

impl Default for CommentOptions {
    fn default() -> Self {
        Self {
            number: 0,
            order: None,
            comment_type: Some("comment".to_string()),
            status: Some(CommentStatus::Approved),
        }
    }
}

/// A comment as templates see it
#[derive(Debug, Clone)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    /// Parent comment ID, 0 for top-level comments
    pub parent_id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub author_email: String,
    pub author_url: String,
    pub status: CommentStatus,
    pub comment_type: String,
    /// Direct replies, in the order the store returned them
    pub children: Vec<CommentView>,
    raw_content: String,
    posted_at: NaiveDateTime,
    date_format: String,
    hooks: Arc<HookManager>,
}

impl CommentView {
    pub fn new(record: CommentRecord, hooks: Arc<HookManager>, config: &ViewConfig) -> Self {
        Self {
            id: record.id,
            post_id: record.post_id,
            parent_id: record.parent_id,
            user_id: record.user_id,
            author_name: record.author_name,
            author_email: record.author_email,
            author_url: record.author_url,
            status: record.status,
            comment_type: record.comment_type,
            children: Vec::new(),
            raw_content: record.content,
            posted_at: record.date,
            date_format: config.dates.date_format.clone(),
            hooks,
        }
    }

    /// Whether this comment replies to another one
    pub fn is_child(&self) -> bool {
        self.parent_id > 0
    }

    /// Unfiltered comment text
    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    /// When the comment was posted
    pub fn posted_at(&self) -> NaiveDateTime {
        self.posted_at
    }

    /// Comment text after the `comment_text` filter
    pub fn content(&self) -> String {
        self.hooks.filter_string(
            hook_names::COMMENT_TEXT,
            json!({
                "text": self.raw_content,
                "comment_id": self.id,
                "post_id": self.post_id,
            }),
            "text",
            &self.raw_content,
        )
    }

    /// Gravatar URL for the comment author
    pub fn avatar(&self, size: u32) -> String {
        let email = self.author_email.trim();
        if email.is_empty() {
            return format!("https://www.gravatar.com/avatar/?d=mp&s={}", size);
        }
        let hash = format!("{:x}", md5::compute(email.to_lowercase()));
        format!("https://www.gravatar.com/avatar/{}?d=mp&s={}", hash, size)
    }

    /// Posting date in `format`, or the configured date format
    pub fn date(&self, format: Option<&str>) -> String {
        let format = format
            .filter(|f| !f.is_empty())
            .unwrap_or(self.date_format.as_str());
        format_datetime(&self.posted_at, format)
    }

    /// Template value of the comment and its replies
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "ID": self.id,
            "post_id": self.post_id,
            "parent_id": self.parent_id,
            "user_id": self.user_id,
            "author_name": self.author_name,
            "author_url": self.author_url,
            "status": self.status.to_string(),
            "comment_type": self.comment_type,
            "content": self.content(),
            "date": self.date(None),
            "avatar": self.avatar(80),
            "is_child": self.is_child(),
            "children": self.children.iter().map(CommentView::to_value).collect::<Vec<_>>(),
        })
    }
}

/// Nest replies under their parents, one level deep
///
/// Top-level comments keep their relative order and so do the replies under each
/// parent. A reply whose parent is not a top-level comment of the same list is
/// dropped rather than promoted.
pub fn thread_comments(comments: Vec<CommentView>) -> Vec<CommentView> {
    let top_level: HashSet<i64> = comments
        .iter()
        .filter(|c| !c.is_child())
        .map(|c| c.id)
        .collect();

    let mut threaded: Vec<CommentView> = Vec::new();
    let mut replies_map: HashMap<i64, Vec<CommentView>> = HashMap::new();

    for comment in comments {
        if !comment.is_child() {
            threaded.push(comment);
        } else if top_level.contains(&comment.parent_id) {
            replies_map.entry(comment.parent_id).or_default().push(comment);
        } else {
            debug!(
                "Dropping comment {}: parent {} is not in the result",
                comment.id, comment.parent_id
            );
        }
    }

    // Attach replies to parent comments
    for comment in &mut threaded {
        if let Some(replies) = replies_map.remove(&comment.id) {
            comment.children = replies;
        }
    }

    threaded
}

impl PostView {
    /// Approved comments of the post, threaded
    pub async fn comments(&self) -> ViewResult<Vec<CommentView>> {
        self.comments_with(&CommentOptions::default()).await
    }

    /// Comments of the post matching `options`, threaded
    pub async fn comments_with(&self, options: &CommentOptions) -> ViewResult<Vec<CommentView>> {
        let Some(record) = self.record() else {
            return Ok(Vec::new());
        };

        let query = CommentQuery {
            post_id: record.id,
            status: options.status,
            order: options.order.unwrap_or(self.host.config.comments.order),
            number: (options.number > 0).then_some(options.number),
            comment_type: options.comment_type.clone(),
        };

        let views = self
            .host
            .comments
            .comments(&query)
            .await?
            .into_iter()
            .map(|r| self.host.factory.comment(&self.host, r))
            .collect();

        Ok(thread_comments(views))
    }

    /// Number of approved comments
    pub async fn comment_count(&self) -> ViewResult<i64> {
        match self.record() {
            Some(record) => Ok(self.host.comments.count(record.id).await?),
            None => Ok(0),
        }
    }
}
