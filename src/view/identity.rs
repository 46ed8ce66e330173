//! Identity resolution
//!
//! Turns whatever a template passed (nothing, an ID, a slug or a record) into a
//! single host post record.

use tracing::debug;

use crate::error::ViewResult;
use crate::host::{Host, QueriedObject, RequestContext};
use crate::models::PostRecord;

/// What a post view is built from
#[derive(Debug, Clone, PartialEq)]
pub enum PostRef {
    /// Infer the post from the request
    Ambient,
    /// Post ID; 0 means the current post
    Id(i64),
    /// Post slug
    Slug(String),
    /// An already fetched record, used as-is
    Record(PostRecord),
    /// Matches no post
    Unresolved,
}

impl From<i64> for PostRef {
    fn from(id: i64) -> Self {
        PostRef::Id(id)
    }
}

impl From<Option<i64>> for PostRef {
    fn from(id: Option<i64>) -> Self {
        id.map_or(PostRef::Ambient, PostRef::Id)
    }
}

impl From<&str> for PostRef {
    /// Numeric strings are IDs, anything else is a slug
    ///
    /// Only the integer 0 stands for the current post; the string `"0"` matches
    /// nothing.
    fn from(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(0) => PostRef::Unresolved,
            Ok(id) => PostRef::Id(id),
            Err(_) => PostRef::Slug(value.to_string()),
        }
    }
}

impl From<String> for PostRef {
    fn from(value: String) -> Self {
        PostRef::from(value.as_str())
    }
}

impl From<PostRecord> for PostRef {
    fn from(record: PostRecord) -> Self {
        PostRef::Record(record)
    }
}

/// Infer the post a request is about
///
/// First match wins: a singular queried post, a static front page, the current
/// post, a `p` query parameter, then the loop position supplied by the integration.
pub(crate) fn ambient_post_id(ctx: &RequestContext) -> Option<i64> {
    let query = &ctx.query;

    if let Some(QueriedObject::Post(id)) = &query.queried_object {
        if query.queried_object_id > 0 {
            debug!("Resolved post {} from the queried object", query.queried_object_id);
            return Some(query.queried_object_id);
        }
        if *id > 0 {
            return Some(*id);
        }
    }

    if query.is_home && query.queried_object_id > 0 {
        debug!("Resolved static front page {}", query.queried_object_id);
        return Some(query.queried_object_id);
    }

    if let Some(id) = ctx.current_post_id().filter(|id| *id > 0) {
        return Some(id);
    }

    if let Some(id) = query
        .params
        .get("p")
        .and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
    {
        debug!("Resolved post {} from the query string", id);
        return Some(id);
    }

    query.loop_post_id.filter(|id| *id > 0)
}

/// Resolve a reference to a host record
///
/// `Ok(None)` means nothing matched; only store failures are errors.
pub(crate) async fn resolve(
    host: &Host,
    ctx: &RequestContext,
    post: PostRef,
) -> ViewResult<Option<PostRecord>> {
    let id = match post {
        PostRef::Record(record) => return Ok(Some(record)),
        PostRef::Unresolved => None,
        PostRef::Ambient => ambient_post_id(ctx),
        PostRef::Id(0) => ctx.current_post_id(),
        PostRef::Id(id) => Some(id),
        PostRef::Slug(slug) => host.posts.find_id_by_slug(&slug).await?,
    };

    match id {
        Some(id) => Ok(host.posts.get_by_id(id).await?),
        None => Ok(None),
    }
}
