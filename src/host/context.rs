//! Request-scoped ambient state
//!
//! The state a host keeps for the page being rendered: what the main query
//! resolved to, which page of a split post is showing, who is looking, and
//! which post is "current" for host helpers that work on the current post.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::models::{PostRecord, Viewer};
use crate::text;

/// What the main query resolved to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum QueriedObject {
    Post(i64),
    Term(i64),
    User(i64),
    PostType(String),
}

/// Main query state for the current request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryState {
    /// Resolved singular object, if any
    #[serde(default)]
    pub queried_object: Option<QueriedObject>,
    /// ID of the resolved object, 0 when none
    #[serde(default)]
    pub queried_object_id: i64,
    /// Whether this is the posts home (or a static front page)
    #[serde(default)]
    pub is_home: bool,
    /// Raw query parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
    /// Post ID the template loop is positioned on, supplied by the integration
    #[serde(default)]
    pub loop_post_id: Option<i64>,
}

impl QueryState {
    /// Query state for a singular post request
    pub fn singular(post_id: i64) -> Self {
        Self {
            queried_object: Some(QueriedObject::Post(post_id)),
            queried_object_id: post_id,
            ..Default::default()
        }
    }

    /// Set a query parameter
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }
}

/// Paging state for posts split with `<!--nextpage-->`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// Current page, 1-based
    pub page: u32,
    /// Number of pages
    pub numpages: u32,
    /// Whether the post has more than one page
    pub multipage: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self::single()
    }
}

impl PageState {
    /// A post that is not split
    pub fn single() -> Self {
        Self {
            page: 1,
            numpages: 1,
            multipage: false,
        }
    }

    /// Paging state for `content` viewed at `page`
    ///
    /// Page numbers are clamped into `1..=numpages`.
    pub fn for_content(content: &str, page: u32) -> Self {
        let numpages = text::split_pages(content).len() as u32;
        Self {
            page: page.clamp(1, numpages.max(1)),
            numpages,
            multipage: numpages > 1,
        }
    }
}

/// Ambient state of one render pass
#[derive(Debug, Default)]
pub struct RequestContext {
    pub query: QueryState,
    pub paging: PageState,
    pub viewer: Option<Viewer>,
    current: RwLock<Option<PostRecord>>,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the main query state
    pub fn with_query(mut self, query: QueryState) -> Self {
        self.query = query;
        self
    }

    /// Set the paging state
    pub fn with_paging(mut self, paging: PageState) -> Self {
        self.paging = paging;
        self
    }

    /// Set the viewing user
    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = Some(viewer);
        self
    }

    /// Set the current post the loop is positioned on
    pub fn with_current_post(self, post: PostRecord) -> Self {
        self.set_current_post(Some(post));
        self
    }

    /// The current post, if any
    pub fn current_post(&self) -> Option<PostRecord> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// ID of the current post, if any
    pub fn current_post_id(&self) -> Option<i64> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|p| p.id)
    }

    /// Replace the current post, returning the previous one
    ///
    /// For integrations that drive a template loop. View code uses
    /// [`RequestContext::scoped_current`] instead.
    pub fn set_current_post(&self, post: Option<PostRecord>) -> Option<PostRecord> {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *current, post)
    }

    /// Make `post` current until the returned guard is dropped
    pub fn scoped_current(&self, post: PostRecord) -> CurrentPostGuard<'_> {
        let previous = self.set_current_post(Some(post));
        CurrentPostGuard {
            ctx: self,
            previous: Some(previous),
        }
    }
}

/// Restores the previous current post when dropped
#[must_use = "the previous current post is restored as soon as the guard is dropped"]
pub struct CurrentPostGuard<'a> {
    ctx: &'a RequestContext,
    previous: Option<Option<PostRecord>>,
}

impl Drop for CurrentPostGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.ctx.set_current_post(previous);
        }
    }
}
