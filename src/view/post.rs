//! Post view
//!
//! Wraps one host post record for a template. Raw fields are copied from the
//! record; everything derived (permalink, filtered content, CSS classes,
//! neighbours, terms) is computed on first use and kept for the lifetime of
//! the view.

use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use super::identity::{self, PostRef};
use super::meta::{self, EDIT_LAST_META_KEY};
use super::{format_datetime, ImageView, TermView, UserView};
use crate::error::ViewResult;
use crate::hooks::hook_names;
use crate::host::{Direction, Host, RequestContext};
use crate::models::{MetaMap, PostRecord, PostStatus, PostTypeInfo, TAXONOMY_CATEGORY};
use crate::text;

/// Post type argument of [`PostView::children`] meaning "same type as the parent"
const CHILDREN_OF_OWN_TYPE: &str = "parent";

/// Post type argument of [`PostView::children`] meaning "every type"
const CHILDREN_OF_ANY_TYPE: &str = "any";

type AdjacentCache = HashMap<Option<String>, Option<Box<PostView>>>;

/// A host post decorated for templates
pub struct PostView {
    pub(super) host: Arc<Host>,
    pub(super) ctx: Arc<RequestContext>,
    record: Option<PostRecord>,
    pub(super) custom: MetaMap,
    /// Fields written through this view, served from `custom` on read
    pub(super) written: HashSet<String>,
    permalink: Option<String>,
    content: Option<String>,
    css_class: Option<String>,
    next: AdjacentCache,
    prev: AdjacentCache,
    pub(super) term_cache: HashMap<String, Arc<Vec<TermView>>>,
    pub(super) term_tax_cache: HashMap<String, Arc<BTreeMap<String, Vec<TermView>>>>,
}

impl std::fmt::Debug for PostView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostView")
            .field("record", &self.record)
            .field("custom", &self.custom)
            .finish_non_exhaustive()
    }
}

impl PostView {
    /// Build a view from an ID, a slug, a record or the request
    ///
    /// A reference that matches nothing yields an empty view; check
    /// [`PostView::exists`] before rendering it.
    pub async fn new(
        host: Arc<Host>,
        ctx: Arc<RequestContext>,
        post: impl Into<PostRef>,
    ) -> ViewResult<Self> {
        let post = post.into();
        match identity::resolve(&host, &ctx, post).await? {
            Some(record) => Self::from_record(host, ctx, record).await,
            None => {
                debug!("No post resolved, returning an empty view");
                Ok(Self::empty(host, ctx))
            }
        }
    }

    /// View of the post the request is about
    pub async fn current(host: Arc<Host>, ctx: Arc<RequestContext>) -> ViewResult<Self> {
        Self::new(host, ctx, PostRef::Ambient).await
    }

    /// Build a view from a fetched record, loading its custom fields
    pub async fn from_record(
        host: Arc<Host>,
        ctx: Arc<RequestContext>,
        record: PostRecord,
    ) -> ViewResult<Self> {
        let custom = meta::load_custom(&host, record.id).await?;
        let mut view = Self::empty(host, ctx);
        view.record = Some(record);
        view.custom = custom;
        Ok(view)
    }

    fn empty(host: Arc<Host>, ctx: Arc<RequestContext>) -> Self {
        Self {
            host,
            ctx,
            record: None,
            custom: MetaMap::new(),
            written: HashSet::new(),
            permalink: None,
            content: None,
            css_class: None,
            next: HashMap::new(),
            prev: HashMap::new(),
            term_cache: HashMap::new(),
            term_tax_cache: HashMap::new(),
        }
    }

    /// Whether a post was resolved
    pub fn exists(&self) -> bool {
        self.record.is_some()
    }

    /// The wrapped record
    pub fn record(&self) -> Option<&PostRecord> {
        self.record.as_ref()
    }

    /// Post status; `None` when nothing was resolved
    pub fn status(&self) -> Option<PostStatus> {
        self.record.as_ref().map(|r| r.status)
    }

    /// Post ID, 0 when nothing was resolved
    pub fn id(&self) -> i64 {
        self.record.as_ref().map_or(0, |r| r.id)
    }

    pub fn author_id(&self) -> i64 {
        self.record.as_ref().map_or(0, |r| r.author_id)
    }

    pub fn parent_id(&self) -> i64 {
        self.record.as_ref().map_or(0, |r| r.parent_id)
    }

    pub fn slug(&self) -> &str {
        self.record.as_ref().map_or("", |r| r.slug.as_str())
    }

    pub fn post_type(&self) -> &str {
        self.record.as_ref().map_or("", |r| r.post_type.as_str())
    }

    /// Manual excerpt, unfiltered
    pub fn excerpt(&self) -> &str {
        self.record.as_ref().map_or("", |r| r.excerpt.as_str())
    }

    /// Title after the `the_title` filter
    pub fn title(&self) -> String {
        let Some(record) = &self.record else {
            return String::new();
        };
        self.host.hooks.filter_string(
            hook_names::THE_TITLE,
            json!({ "title": record.title, "post_id": record.id }),
            "title",
            &record.title,
        )
    }

    /// Same as [`PostView::title`]
    pub fn name(&self) -> String {
        self.title()
    }

    /// Canonical URL
    pub fn permalink(&mut self) -> String {
        if let Some(link) = &self.permalink {
            return link.clone();
        }
        if self.record.is_none() {
            return String::new();
        }
        let link = self.peek_permalink();
        self.permalink = Some(link.clone());
        link
    }

    /// Canonical URL, from the view's cache when already computed
    pub fn peek_permalink(&self) -> String {
        if let Some(link) = &self.permalink {
            return link.clone();
        }
        self.record
            .as_ref()
            .map(|record| self.host.links.permalink(record))
            .unwrap_or_default()
    }

    /// Same as [`PostView::permalink`]
    pub fn link(&mut self) -> String {
        self.permalink()
    }

    /// Permalink as a site-relative path
    pub fn path(&mut self) -> String {
        text::relative_url(&self.permalink())
    }

    /// Edit URL, only for viewers allowed to edit the post
    pub fn edit_link(&self) -> Option<String> {
        let record = self.record.as_ref()?;
        let viewer = self.ctx.viewer?;
        viewer
            .can_edit(record.author_id)
            .then(|| self.host.links.edit_link(record.id))
    }

    /// Publication date in `format`, or the configured date format
    pub fn date(&self, format: Option<&str>) -> String {
        let Some(record) = &self.record else {
            return String::new();
        };
        let requested = format.unwrap_or_default();
        let format = Some(requested)
            .filter(|f| !f.is_empty())
            .unwrap_or(self.host.config.dates.date_format.as_str());
        let the_date = format_datetime(&record.date, format);

        self.host.hooks.filter_string(
            hook_names::GET_THE_DATE,
            json!({ "date": the_date, "format": requested, "post_id": record.id }),
            "date",
            &the_date,
        )
    }

    /// Modification date in `format`, or the configured date format
    ///
    /// Goes through the modified-time filter before the modified-date one.
    pub fn modified_date(&self, format: Option<&str>) -> String {
        let requested = format.unwrap_or_default();
        let format = Some(requested)
            .filter(|f| !f.is_empty())
            .unwrap_or(self.host.config.dates.date_format.as_str());
        let the_time = self.modified_time(Some(format));

        self.host.hooks.filter_string(
            hook_names::GET_THE_MODIFIED_DATE,
            json!({ "date": the_time, "format": requested, "post_id": self.id() }),
            "date",
            &the_time,
        )
    }

    /// Modification time in `format`, or the configured time format
    pub fn modified_time(&self, format: Option<&str>) -> String {
        let Some(record) = &self.record else {
            return String::new();
        };
        let requested = format.unwrap_or_default();
        let format = Some(requested)
            .filter(|f| !f.is_empty())
            .unwrap_or(self.host.config.dates.time_format.as_str());
        let the_time = format_datetime(&record.modified, format);

        self.host.hooks.filter_string(
            hook_names::GET_THE_MODIFIED_TIME,
            json!({ "time": the_time, "format": requested, "post_id": record.id }),
            "time",
            &the_time,
        )
    }

    /// Content after the `the_content` filter
    pub fn content(&mut self) -> String {
        self.content_with(0, 0)
    }

    /// Content trimmed to `len` words (0 for all) and/or one page (0 for all)
    ///
    /// Only the untrimmed, unpaged result is kept on the view.
    pub fn content_with(&mut self, len: usize, page: u32) -> String {
        let canonical = len == 0 && page == 0;
        if canonical {
            if let Some(content) = &self.content {
                return content.clone();
            }
        }
        let Some(record) = &self.record else {
            return String::new();
        };

        let mut content = record.content.clone();
        if len > 0 {
            content = text::trim_words(&content, len, Some(text::ELLIPSIS)).0;
        }
        if page > 0 {
            let pages = text::split_pages(&content);
            if let Some(selected) = pages.get(page as usize - 1) {
                content = selected.to_string();
            }
        }

        let filtered = self.host.hooks.filter_string(
            hook_names::THE_CONTENT,
            json!({ "content": content, "post_id": record.id }),
            "content",
            &content,
        );

        if canonical {
            self.content = Some(filtered.clone());
        }
        filtered
    }

    /// One page of the content
    pub fn content_page(&mut self, page: u32) -> String {
        self.content_with(0, page)
    }

    /// The page of the content the request is on
    pub fn paged_content(&mut self) -> String {
        let page = self.ctx.paging.page;
        self.content_with(0, page)
    }

    /// CSS classes of the post
    pub async fn css_class(&mut self) -> ViewResult<String> {
        if let Some(class) = &self.css_class {
            return Ok(class.clone());
        }
        let class = self.post_class("").await?;
        self.css_class = Some(class.clone());
        Ok(class)
    }

    /// CSS classes of the post plus `extra`
    pub async fn post_class(&self, extra: &str) -> ViewResult<String> {
        let Some(record) = &self.record else {
            return Ok(extra.to_string());
        };
        let _guard = self.ctx.scoped_current(record.clone());
        let classes = self.host.posts.post_classes(&self.ctx, extra).await?;
        Ok(classes.join(" "))
    }

    /// The next post, optionally sharing a term of `taxonomy`
    ///
    /// Without a taxonomy the lookup is unrestricted.
    pub async fn next(&mut self, taxonomy: Option<&str>) -> ViewResult<Option<&PostView>> {
        let key = taxonomy.map(str::to_string);
        if !self.next.contains_key(&key) {
            let found = self.adjacent(Direction::Next, taxonomy).await?;
            self.next.insert(key.clone(), found.map(Box::new));
        }
        Ok(self.next.get(&key).and_then(|p| p.as_deref()))
    }

    /// The previous post, sharing a term of `taxonomy`
    ///
    /// Without a taxonomy the lookup stays within the post's categories.
    pub async fn prev(&mut self, taxonomy: Option<&str>) -> ViewResult<Option<&PostView>> {
        let key = taxonomy.map(str::to_string);
        if !self.prev.contains_key(&key) {
            let within = taxonomy.unwrap_or(TAXONOMY_CATEGORY);
            let found = self.adjacent(Direction::Previous, Some(within)).await?;
            self.prev.insert(key.clone(), found.map(Box::new));
        }
        Ok(self.prev.get(&key).and_then(|p| p.as_deref()))
    }

    async fn adjacent(
        &self,
        direction: Direction,
        within_taxonomy: Option<&str>,
    ) -> ViewResult<Option<PostView>> {
        let Some(record) = &self.record else {
            return Ok(None);
        };

        let found = {
            let _guard = self.ctx.scoped_current(record.clone());
            self.host
                .posts
                .adjacent(&self.ctx, direction, within_taxonomy)
                .await?
        };

        match found {
            Some(adjacent) => Ok(Some(self.wrap(adjacent).await?)),
            None => Ok(None),
        }
    }

    /// The parent post
    pub async fn parent(&self) -> ViewResult<Option<PostView>> {
        let parent_id = self.parent_id();
        if parent_id == 0 {
            return Ok(None);
        }
        match self.host.posts.get_by_id(parent_id).await? {
            Some(parent) => Ok(Some(self.wrap(parent).await?)),
            None => Ok(None),
        }
    }

    /// Child posts ordered by menu order then title
    ///
    /// `post_type` of `"any"` returns every type, `"parent"` this post's own type.
    pub async fn children(&self, post_type: &str) -> ViewResult<Vec<PostView>> {
        let Some(record) = &self.record else {
            return Ok(Vec::new());
        };
        let post_type = match post_type {
            CHILDREN_OF_ANY_TYPE => None,
            CHILDREN_OF_OWN_TYPE => Some(record.post_type.as_str()),
            other => Some(other),
        };

        let records = self.host.posts.children(record.id, post_type).await?;
        futures::future::try_join_all(records.into_iter().map(|child| self.wrap(child))).await
    }

    /// The author
    pub async fn author(&self) -> ViewResult<Option<UserView>> {
        let Some(record) = &self.record else {
            return Ok(None);
        };
        self.user(record.author_id).await
    }

    /// The user who last edited the post, falling back to the author
    pub async fn modified_author(&self) -> ViewResult<Option<UserView>> {
        let Some(record) = &self.record else {
            return Ok(None);
        };
        let editor = self
            .host
            .meta
            .get(record.id, EDIT_LAST_META_KEY)
            .await?
            .first()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0);

        match editor {
            Some(user_id) => self.user(user_id).await,
            None => self.author().await,
        }
    }

    async fn user(&self, user_id: i64) -> ViewResult<Option<UserView>> {
        if user_id == 0 {
            return Ok(None);
        }
        Ok(self
            .host
            .users
            .get_by_id(user_id)
            .await?
            .map(|u| self.host.factory.user(&self.host, u)))
    }

    /// Featured image
    pub async fn thumbnail(&self) -> ViewResult<Option<ImageView>> {
        let Some(record) = &self.record else {
            return Ok(None);
        };
        match self.host.posts.thumbnail_id(record.id).await? {
            Some(media_id) => self.media(media_id).await,
            None => Ok(None),
        }
    }

    /// Image whose media ID is stored in a custom field
    pub async fn image(&self, field: &str) -> ViewResult<Option<ImageView>> {
        let media_id = match self.custom.get(field) {
            Some(serde_json::Value::Number(n)) => n.as_i64(),
            Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match media_id.filter(|id| *id > 0) {
            Some(media_id) => self.media(media_id).await,
            None => Ok(None),
        }
    }

    async fn media(&self, media_id: i64) -> ViewResult<Option<ImageView>> {
        Ok(self
            .host
            .media
            .get_by_id(media_id)
            .await?
            .map(|m| self.host.factory.image(&self.host, m)))
    }

    /// Post format slug, `None` for standard posts
    pub async fn format(&self) -> ViewResult<Option<String>> {
        match &self.record {
            Some(record) => Ok(self.host.posts.format(record.id).await?),
            None => Ok(None),
        }
    }

    /// Registration info of the post type
    pub async fn post_type_info(&self) -> ViewResult<Option<PostTypeInfo>> {
        match &self.record {
            Some(record) => Ok(self.host.posts.post_type_info(&record.post_type).await?),
            None => Ok(None),
        }
    }

    /// Wrap a related record with the host's factory
    async fn wrap(&self, record: PostRecord) -> ViewResult<PostView> {
        self.host
            .factory
            .post(self.host.clone(), self.ctx.clone(), record)
            .await
    }
}

impl std::fmt::Display for PostView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
