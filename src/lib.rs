//! Postview - template-facing post views over CMS host services
//!
//! A [`view::PostView`] wraps one post record from the host's stores and exposes
//! what a theme template needs: filtered title and content, permalinks, dates,
//! previews, terms, comments, custom fields and neighbouring posts. The host
//! side is a set of async store traits in [`host`]; [`host::MemoryHost`] is an
//! in-memory implementation backed by JSON fixtures.

pub mod config;
pub mod error;
pub mod hooks;
pub mod host;
pub mod models;
pub mod template;
pub mod text;
pub mod view;

pub use error::{ViewError, ViewResult};
pub use view::PostView;
