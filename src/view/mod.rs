//! Presentation layer
//!
//! `PostView` decorates a host post record so templates can ask for
//! `post.title` or `post.thumbnail.src` instead of calling host services
//! directly. Term, comment, user and image views are the small wrappers a post
//! hands out; `ViewFactory` decides how they are built.

mod comment;
mod factory;
mod identity;
mod image;
mod meta;
mod pagination;
mod post;
mod preview;
mod terms;
mod user;

#[cfg(test)]
mod tests;

use chrono::NaiveDateTime;
use std::fmt::Write;
use tracing::warn;

pub use comment::{thread_comments, CommentOptions, CommentView};
pub use factory::{DefaultViewFactory, ViewFactory};
pub use identity::PostRef;
pub use image::ImageView;
pub use pagination::{AdjacentPage, PageLink, Pagination};
pub use post::PostView;
pub use preview::PreviewOptions;
pub use terms::TermView;
pub use user::UserView;

/// Format a timestamp with a strftime-style format
///
/// An invalid format falls back to the ISO representation instead of panicking.
pub(crate) fn format_datetime(timestamp: &NaiveDateTime, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(format)).is_err() {
        warn!("Invalid date format '{}', using ISO format", format);
        return timestamp.format("%Y-%m-%dT%H:%M:%S").to_string();
    }
    out
}
