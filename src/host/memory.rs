//! In-memory host implementation
//!
//! Implements every host service over plain maps. Used by the test suite and
//! the demo binary; it can be seeded programmatically or from a JSON fixture.
//! Read counters make it possible to assert that memoized views do not go back
//! to the store.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::{
    CommentStore, Direction, MediaStore, MetaStore, PermalinkEngine, PostStore, RequestContext,
    TermStore, UserStore,
};
use crate::models::{
    CommentQuery, CommentRecord, CommentStatus, MediaRecord, PostRecord, PostStatus,
    PostTypeInfo, SortOrder, TermRecord, TermRef, UserRecord, TAXONOMY_CATEGORY, TAXONOMY_TAG,
};

/// Taxonomy holding post formats
pub const TAXONOMY_POST_FORMAT: &str = "post_format";

/// Meta field holding the featured image ID
pub const THUMBNAIL_META_KEY: &str = "_thumbnail_id";

/// A metadata row in a fixture
#[derive(Debug, Clone, Deserialize)]
pub struct MetaEntry {
    pub post_id: i64,
    pub key: String,
    /// Strings are stored as-is, anything else as JSON text
    pub value: serde_json::Value,
}

/// A post/term relationship in a fixture
#[derive(Debug, Clone, Deserialize)]
pub struct TermAssignment {
    pub post_id: i64,
    pub term_id: i64,
}

/// Seed data for a [`MemoryHost`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub posts: Vec<PostRecord>,
    #[serde(default)]
    pub meta: Vec<MetaEntry>,
    #[serde(default)]
    pub terms: Vec<TermRecord>,
    #[serde(default)]
    pub assignments: Vec<TermAssignment>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub media: Vec<MediaRecord>,
}

impl Fixture {
    /// Load a fixture from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixture: {}", path.display()))
    }
}

/// Snapshot of store read/write counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub post_reads: usize,
    pub meta_reads: usize,
    pub meta_writes: usize,
    pub term_reads: usize,
    pub comment_reads: usize,
    pub adjacent_reads: usize,
}

#[derive(Debug, Default)]
struct Counters {
    post_reads: AtomicUsize,
    meta_reads: AtomicUsize,
    meta_writes: AtomicUsize,
    term_reads: AtomicUsize,
    comment_reads: AtomicUsize,
    adjacent_reads: AtomicUsize,
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default)]
struct MemoryData {
    posts: BTreeMap<i64, PostRecord>,
    meta: BTreeMap<i64, BTreeMap<String, Vec<String>>>,
    terms: BTreeMap<i64, TermRecord>,
    /// post ID -> term IDs in assignment order
    relationships: BTreeMap<i64, Vec<i64>>,
    comments: Vec<CommentRecord>,
    users: BTreeMap<i64, UserRecord>,
    media: BTreeMap<i64, MediaRecord>,
    /// post type -> registered taxonomies
    taxonomies: BTreeMap<String, Vec<String>>,
    post_types: BTreeMap<String, PostTypeInfo>,
    failing_taxonomies: HashSet<String>,
}

impl MemoryData {
    fn terms_of(&self, post_id: i64, taxonomy: &str) -> Vec<TermRecord> {
        self.relationships
            .get(&post_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.terms.get(id))
                    .filter(|t| t.taxonomy == taxonomy)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn term_ids_of(&self, post_id: i64, taxonomy: &str) -> HashSet<i64> {
        self.terms_of(post_id, taxonomy).into_iter().map(|t| t.id).collect()
    }

    fn thumbnail_of(&self, post_id: i64) -> Option<i64> {
        self.meta
            .get(&post_id)
            .and_then(|fields| fields.get(THUMBNAIL_META_KEY))
            .and_then(|values| values.first())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
    }

    fn format_of(&self, post_id: i64) -> Option<String> {
        self.terms_of(post_id, TAXONOMY_POST_FORMAT)
            .first()
            .map(|t| t.slug.trim_start_matches("post-format-").to_string())
    }
}

/// In-memory implementation of every host service
#[derive(Debug)]
pub struct MemoryHost {
    base_url: String,
    data: RwLock<MemoryData>,
    counters: Counters,
}

impl MemoryHost {
    /// Create an empty host serving links under `base_url`
    pub fn new(base_url: &str) -> Self {
        let mut data = MemoryData::default();

        data.taxonomies.insert(
            "post".to_string(),
            vec![
                TAXONOMY_CATEGORY.to_string(),
                TAXONOMY_TAG.to_string(),
                TAXONOMY_POST_FORMAT.to_string(),
            ],
        );
        for (name, label, plural, hierarchical) in [
            ("post", "Post", "Posts", false),
            ("page", "Page", "Pages", true),
            ("attachment", "Media", "Media", false),
        ] {
            data.post_types.insert(
                name.to_string(),
                PostTypeInfo {
                    name: name.to_string(),
                    label: label.to_string(),
                    plural_label: plural.to_string(),
                    hierarchical,
                },
            );
        }

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            data: RwLock::new(data),
            counters: Counters::default(),
        }
    }

    /// Create a host seeded from a fixture
    ///
    /// The fixture's base URL wins over `default_base_url`.
    pub fn from_fixture(fixture: Fixture, default_base_url: &str) -> Self {
        let host = Self::new(fixture.base_url.as_deref().unwrap_or(default_base_url));

        for post in fixture.posts {
            host.insert_post(post);
        }
        for entry in fixture.meta {
            let value = match entry.value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            host.add_meta(entry.post_id, &entry.key, &value);
        }
        for term in fixture.terms {
            host.insert_term(term);
        }
        for assignment in fixture.assignments {
            host.assign_term(assignment.post_id, assignment.term_id);
        }
        for comment in fixture.comments {
            host.insert_comment(comment);
        }
        for user in fixture.users {
            host.insert_user(user);
        }
        for media in fixture.media {
            host.insert_media(media);
        }

        host
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryData> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or replace a post
    pub fn insert_post(&self, post: PostRecord) {
        self.write().posts.insert(post.id, post);
    }

    /// Append a value to a meta field
    pub fn add_meta(&self, post_id: i64, key: &str, value: &str) {
        self.write()
            .meta
            .entry(post_id)
            .or_default()
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// Insert or replace a term
    pub fn insert_term(&self, term: TermRecord) {
        self.write().terms.insert(term.id, term);
    }

    /// Attach a term to a post
    pub fn assign_term(&self, post_id: i64, term_id: i64) {
        let mut data = self.write();
        let ids = data.relationships.entry(post_id).or_default();
        if !ids.contains(&term_id) {
            ids.push(term_id);
        }
    }

    /// Insert a comment
    pub fn insert_comment(&self, comment: CommentRecord) {
        self.write().comments.push(comment);
    }

    /// Insert or replace a user
    pub fn insert_user(&self, user: UserRecord) {
        self.write().users.insert(user.id, user);
    }

    /// Insert or replace a media item
    pub fn insert_media(&self, media: MediaRecord) {
        self.write().media.insert(media.id, media);
    }

    /// Set the featured image of a post
    pub fn set_thumbnail(&self, post_id: i64, media_id: i64) {
        self.write()
            .meta
            .entry(post_id)
            .or_default()
            .insert(THUMBNAIL_META_KEY.to_string(), vec![media_id.to_string()]);
    }

    /// Register a taxonomy for a post type
    pub fn register_taxonomy(&self, post_type: &str, taxonomy: &str) {
        let mut data = self.write();
        let taxonomies = data.taxonomies.entry(post_type.to_string()).or_default();
        if !taxonomies.iter().any(|t| t == taxonomy) {
            taxonomies.push(taxonomy.to_string());
        }
    }

    /// Register a post type
    pub fn register_post_type(&self, info: PostTypeInfo) {
        self.write().post_types.insert(info.name.clone(), info);
    }

    /// Make term lookups for `taxonomy` fail, as a broken host taxonomy would
    pub fn fail_taxonomy(&self, taxonomy: &str) {
        self.write().failing_taxonomies.insert(taxonomy.to_string());
    }

    /// Current read/write counters
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            post_reads: self.counters.post_reads.load(Ordering::Relaxed),
            meta_reads: self.counters.meta_reads.load(Ordering::Relaxed),
            meta_writes: self.counters.meta_writes.load(Ordering::Relaxed),
            term_reads: self.counters.term_reads.load(Ordering::Relaxed),
            comment_reads: self.counters.comment_reads.load(Ordering::Relaxed),
            adjacent_reads: self.counters.adjacent_reads.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl PostStore for MemoryHost {
    async fn get_by_id(&self, id: i64) -> Result<Option<PostRecord>> {
        bump(&self.counters.post_reads);
        Ok(self.read().posts.get(&id).cloned())
    }

    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<i64>> {
        bump(&self.counters.post_reads);
        // Lowest ID wins when slugs collide
        Ok(self
            .read()
            .posts
            .values()
            .find(|p| p.slug == slug)
            .map(|p| p.id))
    }

    async fn children(&self, parent_id: i64, post_type: Option<&str>) -> Result<Vec<PostRecord>> {
        let data = self.read();
        let mut children: Vec<PostRecord> = data
            .posts
            .values()
            .filter(|p| p.parent_id == parent_id && p.status != PostStatus::Trash)
            .filter(|p| post_type.map_or(true, |t| p.post_type == t))
            .cloned()
            .collect();
        children.sort_by(|a, b| {
            a.menu_order
                .cmp(&b.menu_order)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(children)
    }

    async fn adjacent(
        &self,
        ctx: &RequestContext,
        direction: Direction,
        within_taxonomy: Option<&str>,
    ) -> Result<Option<PostRecord>> {
        bump(&self.counters.adjacent_reads);

        let Some(current) = ctx.current_post() else {
            debug!("Adjacent lookup without a current post");
            return Ok(None);
        };

        let data = self.read();
        let shared = within_taxonomy.map(|tax| (tax, data.term_ids_of(current.id, tax)));
        let key = (current.date, current.id);

        let candidates = data.posts.values().filter(|p| {
            p.id != current.id
                && p.post_type == current.post_type
                && p.status == PostStatus::Publish
                && match &shared {
                    None => true,
                    Some((tax, ids)) => data.term_ids_of(p.id, tax).iter().any(|id| ids.contains(id)),
                }
        });

        let found = match direction {
            Direction::Previous => candidates
                .filter(|p| (p.date, p.id) < key)
                .max_by_key(|p| (p.date, p.id)),
            Direction::Next => candidates
                .filter(|p| (p.date, p.id) > key)
                .min_by_key(|p| (p.date, p.id)),
        };

        Ok(found.cloned())
    }

    async fn post_classes(&self, ctx: &RequestContext, extra: &str) -> Result<Vec<String>> {
        let mut classes: Vec<String> = Vec::new();

        if let Some(post) = ctx.current_post() {
            let data = self.read();
            classes.push(format!("post-{}", post.id));
            classes.push(post.post_type.clone());
            classes.push(format!("type-{}", post.post_type));
            classes.push(format!("status-{}", post.status));
            classes.push(format!(
                "format-{}",
                data.format_of(post.id).unwrap_or_else(|| "standard".to_string())
            ));
            if data.thumbnail_of(post.id).is_some() {
                classes.push("has-post-thumbnail".to_string());
            }
            for term in data.terms_of(post.id, TAXONOMY_CATEGORY) {
                classes.push(format!("category-{}", term.slug));
            }
            for term in data.terms_of(post.id, TAXONOMY_TAG) {
                classes.push(format!("tag-{}", term.slug));
            }
        }

        classes.extend(extra.split_whitespace().map(str::to_string));
        Ok(classes)
    }

    async fn thumbnail_id(&self, post_id: i64) -> Result<Option<i64>> {
        Ok(self.read().thumbnail_of(post_id))
    }

    async fn format(&self, post_id: i64) -> Result<Option<String>> {
        Ok(self.read().format_of(post_id))
    }

    async fn post_type_info(&self, post_type: &str) -> Result<Option<PostTypeInfo>> {
        Ok(self.read().post_types.get(post_type).cloned())
    }
}

#[async_trait]
impl MetaStore for MemoryHost {
    async fn all(&self, post_id: i64) -> Result<BTreeMap<String, Vec<String>>> {
        bump(&self.counters.meta_reads);
        Ok(self.read().meta.get(&post_id).cloned().unwrap_or_default())
    }

    async fn get(&self, post_id: i64, field: &str) -> Result<Vec<String>> {
        bump(&self.counters.meta_reads);
        Ok(self
            .read()
            .meta
            .get(&post_id)
            .and_then(|fields| fields.get(field))
            .cloned()
            .unwrap_or_default())
    }

    async fn set(&self, post_id: i64, field: &str, value: &str) -> Result<()> {
        bump(&self.counters.meta_writes);
        let mut data = self.write();
        if !data.posts.contains_key(&post_id) {
            return Err(anyhow!("Cannot set meta '{}' on unknown post {}", field, post_id));
        }
        data.meta
            .entry(post_id)
            .or_default()
            .insert(field.to_string(), vec![value.to_string()]);
        Ok(())
    }
}

#[async_trait]
impl TermStore for MemoryHost {
    async fn post_terms(&self, post_id: i64, taxonomy: &str) -> Result<Vec<TermRecord>> {
        bump(&self.counters.term_reads);
        let data = self.read();
        if data.failing_taxonomies.contains(taxonomy) {
            return Err(anyhow!("Invalid taxonomy: {}", taxonomy));
        }
        Ok(data.terms_of(post_id, taxonomy))
    }

    async fn has_term(&self, term: &TermRef, taxonomy: &str, post_id: i64) -> Result<bool> {
        let data = self.read();
        if data.failing_taxonomies.contains(taxonomy) {
            return Err(anyhow!("Invalid taxonomy: {}", taxonomy));
        }
        Ok(data.terms_of(post_id, taxonomy).iter().any(|t| term.matches(t)))
    }

    async fn object_taxonomies(&self, post_type: &str) -> Result<Vec<String>> {
        Ok(self.read().taxonomies.get(post_type).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CommentStore for MemoryHost {
    async fn comments(&self, query: &CommentQuery) -> Result<Vec<CommentRecord>> {
        bump(&self.counters.comment_reads);
        let data = self.read();
        let mut found: Vec<CommentRecord> = data
            .comments
            .iter()
            .filter(|c| query.accepts(c))
            .cloned()
            .collect();

        found.sort_by_key(|c| (c.date, c.id));
        if query.order == SortOrder::Desc {
            found.reverse();
        }
        if let Some(number) = query.number {
            found.truncate(number);
        }
        Ok(found)
    }

    async fn count(&self, post_id: i64) -> Result<i64> {
        Ok(self
            .read()
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.status == CommentStatus::Approved)
            .count() as i64)
    }
}

#[async_trait]
impl UserStore for MemoryHost {
    async fn get_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        Ok(self.read().users.get(&id).cloned())
    }
}

#[async_trait]
impl MediaStore for MemoryHost {
    async fn get_by_id(&self, id: i64) -> Result<Option<MediaRecord>> {
        Ok(self.read().media.get(&id).cloned())
    }
}

impl PermalinkEngine for MemoryHost {
    fn permalink(&self, post: &PostRecord) -> String {
        if post.slug.is_empty() {
            return format!("{}/?p={}", self.base_url, post.id);
        }
        let slug = urlencoding::encode(&post.slug);
        match post.post_type.as_str() {
            "post" => format!("{}/{}/{}/", self.base_url, post.date.format("%Y/%m/%d"), slug),
            "page" => format!("{}/{}/", self.base_url, slug),
            other => format!("{}/{}/{}/", self.base_url, other, slug),
        }
    }

    fn edit_link(&self, post_id: i64) -> String {
        format!("{}/admin/post.php?post={}&action=edit", self.base_url, post_id)
    }

    fn page_link(&self, ctx: &RequestContext, page: u32) -> String {
        let Some(post) = ctx.current_post() else {
            return String::new();
        };
        let link = self.permalink(&post);
        if page <= 1 {
            link
        } else if link.contains('?') {
            format!("{}&page={}", link, page)
        } else {
            format!("{}{}/", link, page)
        }
    }

    fn term_link(&self, term: &TermRecord) -> String {
        let base = match term.taxonomy.as_str() {
            TAXONOMY_CATEGORY => "category",
            TAXONOMY_TAG => "tag",
            other => other,
        };
        format!("{}/{}/{}/", self.base_url, base, urlencoding::encode(&term.slug))
    }

    fn author_link(&self, user: &UserRecord) -> String {
        format!("{}/author/{}/", self.base_url, urlencoding::encode(&user.nicename))
    }
}
