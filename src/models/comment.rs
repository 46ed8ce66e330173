//! Comment model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Comment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Approved,
    Pending,
    Spam,
    Trash,
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Pending => write!(f, "pending"),
            Self::Spam => write!(f, "spam"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

impl std::str::FromStr for CommentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approved" | "approve" => Ok(Self::Approved),
            "pending" | "hold" => Ok(Self::Pending),
            "spam" => Ok(Self::Spam),
            "trash" => Ok(Self::Trash),
            _ => Err(format!("Invalid comment status: {}", s)),
        }
    }
}

/// Sort direction for comment listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

impl SortOrder {
    /// Parse an order from a case-insensitive string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Comment record as provided by the host comment store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentRecord {
    pub id: i64,
    pub post_id: i64,
    /// Parent comment ID, 0 for top-level comments
    #[serde(default)]
    pub parent_id: i64,
    /// Registered user who wrote the comment, 0 for guests
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub author_url: String,
    #[serde(default)]
    pub content: String,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub status: CommentStatus,
    /// `comment`, `pingback`, `trackback`, ...
    #[serde(default = "default_comment_type")]
    pub comment_type: String,
}

fn default_comment_type() -> String {
    "comment".to_string()
}

impl CommentRecord {
    /// Create an approved top-level comment
    pub fn new(id: i64, post_id: i64, author_name: &str, content: &str, date: NaiveDateTime) -> Self {
        Self {
            id,
            post_id,
            parent_id: 0,
            user_id: 0,
            author_name: author_name.to_string(),
            author_email: String::new(),
            author_url: String::new(),
            content: content.to_string(),
            date,
            status: CommentStatus::Approved,
            comment_type: default_comment_type(),
        }
    }

    /// Make this comment a reply
    pub fn reply_to(mut self, parent_id: i64) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: CommentStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the author's email
    pub fn with_email(mut self, email: &str) -> Self {
        self.author_email = email.to_string();
        self
    }
}

/// Filter set passed to the host comment store
#[derive(Debug, Clone, PartialEq)]
pub struct CommentQuery {
    pub post_id: i64,
    /// Only comments with this status; `None` returns every status
    pub status: Option<CommentStatus>,
    pub order: SortOrder,
    /// Maximum number of comments; `None` is unlimited
    pub number: Option<usize>,
    /// Only comments of this type; `None` returns every type
    pub comment_type: Option<String>,
}

impl CommentQuery {
    /// Approved comments of a post, oldest first
    pub fn for_post(post_id: i64) -> Self {
        Self {
            post_id,
            status: Some(CommentStatus::Approved),
            order: SortOrder::Asc,
            number: None,
            comment_type: None,
        }
    }

    /// Whether a record passes every filter except the count cap
    pub fn accepts(&self, comment: &CommentRecord) -> bool {
        comment.post_id == self.post_id
            && self.status.map_or(true, |s| comment.status == s)
            && self
                .comment_type
                .as_deref()
                .map_or(true, |t| comment.comment_type == t)
    }
}
