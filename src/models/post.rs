//! Post record
//!
//! The host's native post row, copied verbatim into views. Dates are the raw
//! local timestamps the host stores; formatting happens in the view layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Post record as provided by the host post store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostRecord {
    /// Unique identifier
    pub id: i64,
    /// Author user ID
    #[serde(default)]
    pub author_id: i64,
    /// Raw title
    #[serde(default)]
    pub title: String,
    /// Raw content, may contain `<!--more-->` and `<!--nextpage-->` markers
    #[serde(default)]
    pub content: String,
    /// Manual excerpt, empty when none was written
    #[serde(default)]
    pub excerpt: String,
    /// Machine name of the post type, e.g. `post`, `page`, `attachment`
    #[serde(default = "default_post_type")]
    pub post_type: String,
    /// Publication status
    #[serde(default)]
    pub status: PostStatus,
    /// Parent post ID, 0 when the post has no parent
    #[serde(default)]
    pub parent_id: i64,
    /// URL-safe slug
    #[serde(default)]
    pub slug: String,
    /// Publication timestamp
    pub date: NaiveDateTime,
    /// Last modification timestamp
    pub modified: NaiveDateTime,
    /// Manual ordering among siblings
    #[serde(default)]
    pub menu_order: i32,
}

fn default_post_type() -> String {
    "post".to_string()
}

impl PostRecord {
    /// Create a published post with the given identity and body
    pub fn new(id: i64, slug: &str, title: &str, content: &str, date: NaiveDateTime) -> Self {
        Self {
            id,
            author_id: 0,
            title: title.to_string(),
            content: content.to_string(),
            excerpt: String::new(),
            post_type: default_post_type(),
            status: PostStatus::Publish,
            parent_id: 0,
            slug: slug.to_string(),
            date,
            modified: date,
            menu_order: 0,
        }
    }

    /// Set the author
    pub fn with_author(mut self, author_id: i64) -> Self {
        self.author_id = author_id;
        self
    }

    /// Set the manual excerpt
    pub fn with_excerpt(mut self, excerpt: &str) -> Self {
        self.excerpt = excerpt.to_string();
        self
    }

    /// Set the post type
    pub fn with_type(mut self, post_type: &str) -> Self {
        self.post_type = post_type.to_string();
        self
    }

    /// Set the parent post
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the modification timestamp
    pub fn with_modified(mut self, modified: NaiveDateTime) -> Self {
        self.modified = modified;
        self
    }

    /// Set the menu order
    pub fn with_menu_order(mut self, menu_order: i32) -> Self {
        self.menu_order = menu_order;
        self
    }
}

/// Post publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Visible to everyone
    #[default]
    Publish,
    /// Scheduled for a future date
    Future,
    /// Not yet submitted
    Draft,
    /// Awaiting review
    Pending,
    /// Visible to editors only
    Private,
    /// In the trash
    Trash,
    /// Takes the status of its parent (attachments, revisions)
    Inherit,
}

impl PostStatus {
    /// Convert status to its host string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Future => "future",
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Private => "private",
            PostStatus::Trash => "trash",
            PostStatus::Inherit => "inherit",
        }
    }

    /// Parse status from its host string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "publish" | "published" => Some(PostStatus::Publish),
            "future" => Some(PostStatus::Future),
            "draft" => Some(PostStatus::Draft),
            "pending" => Some(PostStatus::Pending),
            "private" => Some(PostStatus::Private),
            "trash" => Some(PostStatus::Trash),
            "inherit" => Some(PostStatus::Inherit),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registered post type, as exposed to templates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostTypeInfo {
    /// Machine name
    pub name: String,
    /// Singular label
    pub label: String,
    /// Plural label
    pub plural_label: String,
    /// Whether posts of this type nest under parents
    #[serde(default)]
    pub hierarchical: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 7, 5).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_post_record_new_defaults() {
        let post = PostRecord::new(7, "hello-world", "Hello", "Body", noon());

        assert_eq!(post.id, 7);
        assert_eq!(post.post_type, "post");
        assert_eq!(post.status, PostStatus::Publish);
        assert_eq!(post.parent_id, 0);
        assert_eq!(post.modified, post.date);
        assert!(post.excerpt.is_empty());
    }

    #[test]
    fn test_post_status_roundtrip() {
        for status in [
            PostStatus::Publish,
            PostStatus::Future,
            PostStatus::Draft,
            PostStatus::Pending,
            PostStatus::Private,
            PostStatus::Trash,
            PostStatus::Inherit,
        ] {
            assert_eq!(PostStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(PostStatus::from_str("PUBLISHED"), Some(PostStatus::Publish));
        assert_eq!(PostStatus::from_str("bogus"), None);
    }

    #[test]
    fn test_post_record_deserialize_fills_defaults() {
        let post: PostRecord = serde_json::from_str(
            r#"{"id": 3, "slug": "about", "date": "2015-07-04T10:00:00", "modified": "2015-07-04T10:00:00"}"#,
        )
        .unwrap();

        assert_eq!(post.post_type, "post");
        assert_eq!(post.status, PostStatus::Publish);
        assert_eq!(post.title, "");
    }
}
