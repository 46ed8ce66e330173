//! View construction strategy
//!
//! A post hands out child posts, terms, comments, users and images. Which
//! concrete views it builds is decided by the `ViewFactory` stored in the
//! `Host`, so an integration can decorate any of them without touching
//! `PostView`.

use async_trait::async_trait;
use std::sync::Arc;

use super::{CommentView, ImageView, PostView, TermView, UserView};
use crate::error::ViewResult;
use crate::host::{Host, RequestContext};
use crate::models::{CommentRecord, MediaRecord, PostRecord, TermRecord, UserRecord};

/// Builds the views a post hands out
///
/// Every method has a default, so custom factories override only what they need.
#[async_trait]
pub trait ViewFactory: Send + Sync {
    /// Related posts: parent, children, previous and next
    async fn post(
        &self,
        host: Arc<Host>,
        ctx: Arc<RequestContext>,
        record: PostRecord,
    ) -> ViewResult<PostView> {
        PostView::from_record(host, ctx, record).await
    }

    fn term(&self, host: &Host, record: TermRecord) -> TermView {
        let link = host.links.term_link(&record);
        TermView::new(record, link)
    }

    fn comment(&self, host: &Host, record: CommentRecord) -> CommentView {
        CommentView::new(record, host.hooks.clone(), &host.config)
    }

    fn user(&self, host: &Host, record: UserRecord) -> UserView {
        let link = host.links.author_link(&record);
        UserView::new(record, link)
    }

    fn image(&self, _host: &Host, record: MediaRecord) -> ImageView {
        ImageView::from(record)
    }
}

/// Factory producing the stock views
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultViewFactory;

#[async_trait]
impl ViewFactory for DefaultViewFactory {}
