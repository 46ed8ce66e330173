//! Host platform services
//!
//! Everything this crate does not own: post storage, metadata, taxonomy,
//! comments, users, media and permalink generation. Views only talk to these
//! traits; `memory::MemoryHost` implements all of them in process.

pub mod context;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ViewConfig;
use crate::hooks::HookManager;
use crate::models::{
    CommentQuery, CommentRecord, MediaRecord, PostRecord, PostTypeInfo, TermRecord, TermRef,
    UserRecord,
};
use crate::view::{DefaultViewFactory, ViewFactory};

pub use context::{CurrentPostGuard, PageState, QueriedObject, QueryState, RequestContext};
pub use memory::{Fixture, MemoryHost};

/// Which neighbour to look up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

/// Post store
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Get a post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<PostRecord>>;

    /// Find the ID of a post by slug
    ///
    /// When several posts share a slug the store picks one; which one is
    /// implementation-defined.
    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<i64>>;

    /// Children of a post ordered by menu order then title
    ///
    /// `post_type` of `None` returns children of every type.
    async fn children(&self, parent_id: i64, post_type: Option<&str>) -> Result<Vec<PostRecord>>;

    /// The previous or next post relative to the context's current post
    ///
    /// With `within_taxonomy` set, only posts sharing a term of that taxonomy
    /// with the current post qualify.
    async fn adjacent(
        &self,
        ctx: &RequestContext,
        direction: Direction,
        within_taxonomy: Option<&str>,
    ) -> Result<Option<PostRecord>>;

    /// CSS classes for the context's current post, plus `extra`
    async fn post_classes(&self, ctx: &RequestContext, extra: &str) -> Result<Vec<String>>;

    /// Media ID of the featured image
    async fn thumbnail_id(&self, post_id: i64) -> Result<Option<i64>>;

    /// Post format slug (`aside`, `gallery`, ...), `None` for standard posts
    async fn format(&self, post_id: i64) -> Result<Option<String>>;

    /// Registration info for a post type
    async fn post_type_info(&self, post_type: &str) -> Result<Option<PostTypeInfo>>;
}

/// Post metadata store
///
/// Values are raw strings; structured values are stored as JSON text.
#[async_trait]
pub trait MetaStore: Send + Sync {
    /// Every field of a post with all of its values
    async fn all(&self, post_id: i64) -> Result<BTreeMap<String, Vec<String>>>;

    /// All values of one field, empty when the field is unset
    async fn get(&self, post_id: i64, field: &str) -> Result<Vec<String>>;

    /// Replace a field with a single value
    async fn set(&self, post_id: i64, field: &str, value: &str) -> Result<()>;
}

/// Taxonomy term store
#[async_trait]
pub trait TermStore: Send + Sync {
    /// Terms of one taxonomy attached to a post
    async fn post_terms(&self, post_id: i64, taxonomy: &str) -> Result<Vec<TermRecord>>;

    /// Whether a post carries a term in the given taxonomy
    async fn has_term(&self, term: &TermRef, taxonomy: &str, post_id: i64) -> Result<bool>;

    /// Taxonomies registered for a post type
    async fn object_taxonomies(&self, post_type: &str) -> Result<Vec<String>>;
}

/// Comment store
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Flat, ordered comment list matching a query
    async fn comments(&self, query: &CommentQuery) -> Result<Vec<CommentRecord>>;

    /// Number of approved comments on a post
    async fn count(&self, post_id: i64) -> Result<i64>;
}

/// User store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<UserRecord>>;
}

/// Media store
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Get a media item by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<MediaRecord>>;
}

/// Permalink and rewrite engine
///
/// Pure URL computation, so it is synchronous.
pub trait PermalinkEngine: Send + Sync {
    /// Canonical absolute URL of a post
    fn permalink(&self, post: &PostRecord) -> String;

    /// Admin URL for editing a post
    fn edit_link(&self, post_id: i64) -> String;

    /// URL of page `page` (1-based) of the context's current post
    fn page_link(&self, ctx: &RequestContext, page: u32) -> String;

    /// Archive URL of a term
    fn term_link(&self, term: &TermRecord) -> String;

    /// Archive URL of an author
    fn author_link(&self, user: &UserRecord) -> String;
}

/// Bundle of host services handed to every view
#[derive(Clone)]
pub struct Host {
    pub posts: Arc<dyn PostStore>,
    pub meta: Arc<dyn MetaStore>,
    pub terms: Arc<dyn TermStore>,
    pub comments: Arc<dyn CommentStore>,
    pub users: Arc<dyn UserStore>,
    pub media: Arc<dyn MediaStore>,
    pub links: Arc<dyn PermalinkEngine>,
    pub hooks: Arc<HookManager>,
    pub config: Arc<ViewConfig>,
    pub factory: Arc<dyn ViewFactory>,
}

impl Host {
    /// Build a host where one backend provides every service
    pub fn from_backend<B>(backend: Arc<B>, config: ViewConfig) -> Self
    where
        B: PostStore
            + MetaStore
            + TermStore
            + CommentStore
            + UserStore
            + MediaStore
            + PermalinkEngine
            + 'static,
    {
        Self {
            posts: backend.clone(),
            meta: backend.clone(),
            terms: backend.clone(),
            comments: backend.clone(),
            users: backend.clone(),
            media: backend.clone(),
            links: backend,
            hooks: Arc::new(HookManager::new()),
            config: Arc::new(config),
            factory: Arc::new(DefaultViewFactory),
        }
    }

    /// Use a shared hook manager
    pub fn with_hooks(mut self, hooks: Arc<HookManager>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Use a custom view factory
    pub fn with_factory(mut self, factory: Arc<dyn ViewFactory>) -> Self {
        self.factory = factory;
        self
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("hooks", &self.hooks)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
