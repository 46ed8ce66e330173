//! Host record types
//!
//! Plain data as the host platform stores it. Views wrap these records; nothing
//! in this module talks to a store.

mod comment;
mod media;
mod post;
mod term;
mod user;

use std::collections::BTreeMap;

pub use comment::{CommentQuery, CommentRecord, CommentStatus, SortOrder};
pub use media::MediaRecord;
pub use post::{PostRecord, PostStatus, PostTypeInfo};
pub use term::{TermRecord, TermRef, TAXONOMY_CATEGORY, TAXONOMY_TAG};
pub use user::{UserRecord, Viewer};

/// Custom fields of a post, keyed by field name
pub type MetaMap = BTreeMap<String, serde_json::Value>;
