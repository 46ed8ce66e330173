//! Post view tests against the in-memory host

use super::*;
use crate::config::ViewConfig;
use crate::hooks::{hook_names, PRIORITY_DEFAULT};
use crate::host::{Host, MemoryHost, MetaStore, PageState, PostStore, QueryState, RequestContext};
use crate::models::{
    CommentRecord, CommentStatus, MediaRecord, PostRecord, PostStatus, SortOrder, TermRecord,
    UserRecord, Viewer, TAXONOMY_CATEGORY, TAXONOMY_TAG,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 7, day)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

const PAGED_CONTENT: &str = "page one<!--nextpage-->page two<!--nextpage-->page three";

fn backend() -> Arc<MemoryHost> {
    let backend = Arc::new(MemoryHost::new("http://example.org"));

    backend.insert_post(
        PostRecord::new(1, "hello-world", "Hello World", "<p>Welcome to the site.</p>", at(1))
            .with_author(1),
    );
    backend.insert_post(
        PostRecord::new(2, "second", "Second", "one two three <!--more--> four five", at(2))
            .with_author(1),
    );
    backend.insert_post(PostRecord::new(3, "third", "Third", PAGED_CONTENT, at(3)).with_author(2));
    backend.insert_post(PostRecord::new(4, "about", "About", "About us", at(4)).with_type("page"));
    backend.insert_post(
        PostRecord::new(5, "team", "Team", "", at(5))
            .with_type("page")
            .with_parent(4)
            .with_menu_order(2),
    );
    backend.insert_post(
        PostRecord::new(6, "history", "History", "", at(6))
            .with_type("page")
            .with_parent(4)
            .with_menu_order(1),
    );

    backend.insert_user(UserRecord::new(1, "admin", "Site Admin"));
    backend.insert_user(UserRecord::new(2, "ann", "Ann"));

    backend.insert_term(TermRecord::new(10, TAXONOMY_CATEGORY, "news", "News"));
    backend.insert_term(TermRecord::new(11, TAXONOMY_CATEGORY, "misc", "Misc"));
    backend.insert_term(TermRecord::new(20, TAXONOMY_TAG, "rust", "Rust"));
    backend.assign_term(1, 10);
    backend.assign_term(2, 11);
    backend.assign_term(3, 10);
    backend.assign_term(3, 20);

    backend
}

fn host_for(backend: &Arc<MemoryHost>) -> Arc<Host> {
    Arc::new(Host::from_backend(backend.clone(), ViewConfig::default()))
}

fn ctx() -> Arc<RequestContext> {
    Arc::new(RequestContext::new())
}

async fn view(host: &Arc<Host>, post: impl Into<PostRef>) -> PostView {
    PostView::new(host.clone(), ctx(), post).await.unwrap()
}

// ============================================================================
// Identity
// ============================================================================

#[tokio::test]
async fn test_id_slug_and_record_resolve_the_same_post() {
    let backend = backend();
    let host = host_for(&backend);
    let record = PostStore::get_by_id(&*backend, 2).await.unwrap().unwrap();

    let mut by_id = view(&host, 2_i64).await;
    let mut by_slug = view(&host, "second").await;
    let mut by_record = view(&host, record).await;

    for post in [&mut by_id, &mut by_slug, &mut by_record] {
        assert!(post.exists());
        assert_eq!(post.id(), 2);
        assert_eq!(post.title(), "Second");
        assert_eq!(post.content(), "one two three <!--more--> four five");
    }
}

#[tokio::test]
async fn test_unresolved_post_is_empty() {
    let backend = backend();
    let host = host_for(&backend);

    let mut missing = view(&host, 99_i64).await;
    assert!(!missing.exists());
    assert_eq!(missing.status(), None);
    assert_eq!(missing.title(), "");
    assert_eq!(missing.permalink(), "");
    assert!(missing.comments().await.unwrap().is_empty());
    assert!(missing.terms("category").await.unwrap().is_empty());

    let missing = view(&host, "no-such-slug").await;
    assert!(!missing.exists());
}

#[tokio::test]
async fn test_zero_id_means_current_post_but_zero_string_does_not() {
    let backend = backend();
    let host = host_for(&backend);
    let current = PostStore::get_by_id(&*backend, 3).await.unwrap().unwrap();
    let ctx = Arc::new(RequestContext::new().with_current_post(current));

    let by_int = PostView::new(host.clone(), ctx.clone(), 0_i64).await.unwrap();
    assert_eq!(by_int.id(), 3);

    let by_string = PostView::new(host, ctx, "0").await.unwrap();
    assert!(!by_string.exists());
}

#[tokio::test]
async fn test_ambient_resolution() {
    let backend = backend();
    let host = host_for(&backend);

    let singular = Arc::new(RequestContext::new().with_query(QueryState::singular(3)));
    let post = PostView::current(host.clone(), singular).await.unwrap();
    assert_eq!(post.id(), 3);
    assert_eq!(post.status(), Some(PostStatus::Publish));

    let current = PostStore::get_by_id(&*backend, 1).await.unwrap().unwrap();
    let in_loop = Arc::new(RequestContext::new().with_current_post(current));
    let post = PostView::new(host.clone(), in_loop, 0_i64).await.unwrap();
    assert_eq!(post.id(), 1);

    let nothing = PostView::current(host, ctx()).await.unwrap();
    assert!(!nothing.exists());
}

// ============================================================================
// Content and preview
// ============================================================================

#[tokio::test]
async fn test_forced_preview_uses_teaser_only() {
    let backend = backend();
    let host = host_for(&backend);
    let mut post = view(&host, 2_i64).await;

    let preview = post.preview_with(&PreviewOptions::default().with_len(2).forced());

    assert_eq!(
        preview,
        "one two &hellip; <a href=\"http://example.org/2015/07/02/second/\" class=\"read-more\">Read More</a>"
    );
}

#[tokio::test]
async fn test_unforced_teaser_is_not_trimmed() {
    let backend = backend();
    let host = host_for(&backend);
    let mut post = view(&host, 2_i64).await;

    let preview = post.preview_with(&PreviewOptions::default().with_len(2).with_read_more(None));
    assert_eq!(preview, "one two three");
}

#[tokio::test]
async fn test_preview_from_content_and_excerpt() {
    let backend = backend();
    backend.insert_post(
        PostRecord::new(7, "with-excerpt", "Excerpt", "Long body", at(7)).with_excerpt("<p>Short intro.</p>"),
    );
    let host = host_for(&backend);

    let mut post = view(&host, 1_i64).await;
    let short = post.preview_with(&PreviewOptions::default().with_len(2).with_read_more(None));
    assert_eq!(short, "Welcome to &hellip;");

    // Ends a sentence, so no ellipsis
    let whole = post.preview_with(&PreviewOptions::default().with_len(10).with_read_more(None));
    assert_eq!(whole, "Welcome to the site.");

    let mut post = view(&host, 7_i64).await;
    let kept_markup = post.preview_with(
        &PreviewOptions::default().with_strip(false).with_read_more(None),
    );
    assert_eq!(kept_markup, "<p>Short intro.</p>");

    let stripped = post.preview();
    assert_eq!(
        stripped,
        "Short intro. <a href=\"http://example.org/2015/07/07/with-excerpt/\" class=\"read-more\">Read More</a>"
    );
}

#[tokio::test]
async fn test_content_memoized_only_for_full_content() {
    let backend = backend();
    let host = host_for(&backend);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    host.hooks.register(
        hook_names::THE_CONTENT,
        move |data| {
            counter.fetch_add(1, Ordering::SeqCst);
            let content = data["content"].as_str().unwrap_or_default().to_string();
            data["content"] = json!(format!("<div>{}</div>", content));
            None
        },
        PRIORITY_DEFAULT,
        None,
    );

    let mut post = view(&host, 3_i64).await;
    assert_eq!(post.content_page(2), "<div>page two</div>");
    assert_eq!(post.content_with(1, 0), "<div>page &hellip;</div>");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let full = post.content();
    assert_eq!(post.content(), full);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Out of range pages fall back to the whole content
    assert_eq!(post.content_page(9), format!("<div>{}</div>", PAGED_CONTENT));
}

#[tokio::test]
async fn test_paged_content_follows_request() {
    let backend = backend();
    let host = host_for(&backend);
    let paged = Arc::new(RequestContext::new().with_paging(PageState::for_content(PAGED_CONTENT, 3)));

    let mut post = PostView::new(host, paged, 3_i64).await.unwrap();
    assert_eq!(post.paged_content(), "page three");
}

#[tokio::test]
async fn test_title_and_dates_are_filtered() {
    let backend = backend();
    let host = host_for(&backend);
    host.hooks.register(
        hook_names::THE_TITLE,
        |data| {
            let title = data["title"].as_str().unwrap_or_default().to_uppercase();
            data["title"] = json!(title);
            None
        },
        PRIORITY_DEFAULT,
        None,
    );
    host.hooks.register(
        hook_names::GET_THE_DATE,
        |data| {
            let date = data["date"].as_str().unwrap_or_default().to_string();
            data["date"] = json!(format!("on {}", date));
            None
        },
        PRIORITY_DEFAULT,
        None,
    );

    let post = view(&host, 1_i64).await;
    assert_eq!(post.title(), "HELLO WORLD");
    assert_eq!(post.to_string(), "HELLO WORLD");
    assert_eq!(post.date(None), "on July 1, 2015");
    assert_eq!(post.date(Some("%Y")), "on 2015");
    assert_eq!(post.modified_time(None), "10:30 AM");
    assert_eq!(post.modified_date(Some("%d/%m/%Y")), "01/07/2015");
}

// ============================================================================
// Links, pagination and the current post
// ============================================================================

#[tokio::test]
async fn test_links() {
    let backend = backend();
    let host = host_for(&backend);

    let mut post = view(&host, 1_i64).await;
    assert_eq!(post.link(), "http://example.org/2015/07/01/hello-world/");
    assert_eq!(post.path(), "/2015/07/01/hello-world/");

    let mut page = view(&host, 4_i64).await;
    assert_eq!(page.permalink(), "http://example.org/about/");
}

#[tokio::test]
async fn test_edit_link_requires_permission() {
    let backend = backend();
    let host = host_for(&backend);

    let post = view(&host, 3_i64).await;
    assert_eq!(post.edit_link(), None);

    let as_author = Arc::new(RequestContext::new().with_viewer(Viewer { user_id: 2, is_editor: false }));
    let post = PostView::new(host.clone(), as_author, 3_i64).await.unwrap();
    assert_eq!(
        post.edit_link().as_deref(),
        Some("http://example.org/admin/post.php?post=3&action=edit")
    );

    let as_stranger = Arc::new(RequestContext::new().with_viewer(Viewer { user_id: 1, is_editor: false }));
    let post = PostView::new(host, as_stranger, 3_i64).await.unwrap();
    assert_eq!(post.edit_link(), None);
}

#[tokio::test]
async fn test_pagination_on_middle_page() {
    let backend = backend();
    let host = host_for(&backend);
    let paged = Arc::new(RequestContext::new().with_paging(PageState::for_content(PAGED_CONTENT, 2)));

    let post = PostView::new(host, paged.clone(), 3_i64).await.unwrap();
    let pagination = post.pagination();

    assert_eq!(pagination.pages.len(), 3);
    let current: Vec<u32> = pagination.pages.iter().filter(|p| p.current).map(|p| p.index).collect();
    assert_eq!(current, vec![2]);
    assert_eq!(pagination.pages[2].link, "http://example.org/2015/07/03/third/3/");
    assert_eq!(
        pagination.prev.map(|p| p.link).as_deref(),
        Some("http://example.org/2015/07/03/third/")
    );
    assert_eq!(
        pagination.next.map(|p| p.link).as_deref(),
        Some("http://example.org/2015/07/03/third/3/")
    );
    assert_eq!(paged.current_post_id(), None);
}

#[tokio::test]
async fn test_single_page_post_has_no_pagination() {
    let backend = backend();
    let host = host_for(&backend);

    let post = view(&host, 1_i64).await;
    assert!(post.pagination().is_empty());
}

#[tokio::test]
async fn test_current_post_restored_after_scoped_lookups() {
    let backend = backend();
    let host = host_for(&backend);
    let outer = PostStore::get_by_id(&*backend, 2).await.unwrap().unwrap();
    let shared = Arc::new(
        RequestContext::new()
            .with_current_post(outer)
            .with_paging(PageState::for_content(PAGED_CONTENT, 1)),
    );

    let mut post = PostView::new(host, shared.clone(), 3_i64).await.unwrap();
    post.css_class().await.unwrap();
    post.prev(None).await.unwrap();
    post.next(None).await.unwrap();
    post.pagination();

    assert_eq!(shared.current_post_id(), Some(2));
}

#[tokio::test]
async fn test_css_class() {
    let backend = backend();
    let host = host_for(&backend);

    let mut post = view(&host, 3_i64).await;
    assert_eq!(
        post.css_class().await.unwrap(),
        "post-3 post type-post status-publish format-standard category-news tag-rust"
    );
    assert!(post.post_class("featured").await.unwrap().ends_with(" featured"));
}

// ============================================================================
// Adjacent posts
// ============================================================================

#[tokio::test]
async fn test_prev_defaults_to_category_next_is_unrestricted() {
    let backend = backend();
    let host = host_for(&backend);

    // Post 3 is in "news"; post 2 is the previous post overall but is in "misc"
    let mut third = view(&host, 3_i64).await;
    let prev = third.prev(None).await.unwrap().map(|p| p.id());
    assert_eq!(prev, Some(1));

    let prev_any_tag = third.prev(Some(TAXONOMY_TAG)).await.unwrap().map(|p| p.id());
    assert_eq!(prev_any_tag, None);

    // Post 1's next post overall is post 2, in another category
    let mut first = view(&host, 1_i64).await;
    let next = first.next(None).await.unwrap().map(|p| p.id());
    assert_eq!(next, Some(2));

    let next_in_category = first.next(Some(TAXONOMY_CATEGORY)).await.unwrap().map(|p| p.id());
    assert_eq!(next_in_category, Some(3));
}

#[tokio::test]
async fn test_adjacent_lookups_are_cached_per_argument() {
    let backend = backend();
    let host = host_for(&backend);
    let mut post = view(&host, 3_i64).await;

    post.prev(None).await.unwrap();
    let after_first = backend.stats().adjacent_reads;
    post.prev(None).await.unwrap();
    assert_eq!(backend.stats().adjacent_reads, after_first);

    post.prev(Some(TAXONOMY_CATEGORY)).await.unwrap();
    assert_eq!(backend.stats().adjacent_reads, after_first + 1);
}

// ============================================================================
// Terms
// ============================================================================

#[tokio::test]
async fn test_term_lists_are_cached_per_argument() {
    let backend = backend();
    let host = host_for(&backend);
    let mut post = view(&host, 3_i64).await;

    let first = post.terms("category").await.unwrap();
    let reads = backend.stats().term_reads;
    let second = post.terms("category").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(backend.stats().term_reads, reads);

    let tags = post.terms("post_tag").await.unwrap();
    assert!(!Arc::ptr_eq(&first, &tags));
    assert_eq!(tags.iter().map(|t| t.slug.as_str()).collect::<Vec<_>>(), vec!["rust"]);
    assert_eq!(backend.stats().term_reads, reads + 1);
}

#[tokio::test]
async fn test_terms_aliases_and_all() {
    let backend = backend();
    let host = host_for(&backend);
    let mut post = view(&host, 3_i64).await;

    let names = |terms: &[TermView]| terms.iter().map(|t| t.name.clone()).collect::<Vec<_>>();

    assert_eq!(names(&post.tags().await.unwrap()), vec!["Rust"]);
    assert_eq!(names(&post.categories().await.unwrap()), vec!["News"]);
    assert_eq!(names(&post.terms("").await.unwrap()), vec!["News", "Rust"]);
    assert_eq!(post.category().await.unwrap().map(|t| t.link).as_deref(), Some("http://example.org/category/news/"));

    let keyed = post.terms_by_taxonomy("all").await.unwrap();
    assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["category", "post_tag"]);
}

#[tokio::test]
async fn test_failing_taxonomy_is_skipped() {
    let backend = backend();
    backend.fail_taxonomy(TAXONOMY_TAG);
    let host = host_for(&backend);
    let mut post = view(&host, 3_i64).await;

    let terms = post.terms("category,tags").await.unwrap();
    assert_eq!(terms.iter().map(|t| t.id).collect::<Vec<_>>(), vec![10]);
}

#[tokio::test]
async fn test_has_term() {
    let backend = backend();
    let host = host_for(&backend);
    let post = view(&host, 3_i64).await;

    assert!(post.has_term("news", TAXONOMY_CATEGORY).await.unwrap());
    assert!(post.has_term(20_i64, "tags").await.unwrap());
    assert!(post.has_term("rust", "all").await.unwrap());
    assert!(!post.has_term("misc", "any").await.unwrap());
}

#[tokio::test]
async fn test_custom_factory_decorates_terms() {
    struct ShoutingTerms;

    #[async_trait::async_trait]
    impl ViewFactory for ShoutingTerms {
        fn term(&self, host: &Host, record: TermRecord) -> TermView {
            let mut view = DefaultViewFactory.term(host, record);
            view.name = view.name.to_uppercase();
            view
        }
    }

    let backend = backend();
    let host = Arc::new(
        Host::from_backend(backend.clone(), ViewConfig::default()).with_factory(Arc::new(ShoutingTerms)),
    );
    let mut post = view(&host, 1_i64).await;

    let names: Vec<String> = post.categories().await.unwrap().iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["NEWS"]);
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comments_are_threaded_one_level() {
    let backend = backend();
    backend.insert_comment(CommentRecord::new(1, 1, "Ann", "First", at(1)));
    backend.insert_comment(CommentRecord::new(2, 1, "Bob", "Reply", at(2)).reply_to(1));
    backend.insert_comment(CommentRecord::new(3, 1, "Cat", "Another", at(3)).reply_to(1));
    backend.insert_comment(
        CommentRecord::new(4, 1, "Spam", "Buy", at(4)).with_status(CommentStatus::Spam),
    );
    backend.insert_comment(CommentRecord::new(5, 1, "Dan", "Reply to spam", at(5)).reply_to(4));
    let host = host_for(&backend);
    let post = view(&host, 1_i64).await;

    let comments = post.comments().await.unwrap();
    assert_eq!(comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1]);
    assert_eq!(comments[0].children.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(post.comment_count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_comment_options() {
    let backend = backend();
    for id in 1..=3 {
        backend.insert_comment(CommentRecord::new(id, 2, "Ann", "Hi", at(id as u32)));
    }
    let host = host_for(&backend);
    let post = view(&host, 2_i64).await;

    let options = CommentOptions {
        number: 2,
        order: Some(SortOrder::Desc),
        ..Default::default()
    };
    let comments = post.comments_with(&options).await.unwrap();
    assert_eq!(comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![3, 2]);
}

// ============================================================================
// Metadata
// ============================================================================

#[tokio::test]
async fn test_update_then_read_skips_the_store() {
    let backend = backend();
    let host = host_for(&backend);
    let mut post = view(&host, 1_i64).await;

    let reads = backend.stats().meta_reads;
    post.update("color", "red").await.unwrap();

    assert_eq!(post.field("color").await.unwrap(), json!("red"));
    assert_eq!(backend.stats().meta_reads, reads);
    assert_eq!(backend.stats().meta_writes, 1);

    // Written through to the store
    let fresh = view(&host, 1_i64).await;
    assert_eq!(fresh.custom().get("color"), Some(&json!("red")));
}

#[tokio::test]
async fn test_custom_fields_are_unwrapped_and_decoded() {
    let backend = backend();
    backend.add_meta(1, "subtitle", "A greeting");
    backend.add_meta(1, "dimensions", r#"{"w": 3, "h": 4}"#);
    backend.add_meta(1, "related", "2");
    backend.add_meta(1, "related", "3");
    let host = host_for(&backend);
    let post = view(&host, 1_i64).await;

    assert_eq!(post.field("subtitle").await.unwrap(), json!("A greeting"));
    assert_eq!(post.field("dimensions").await.unwrap(), json!({"w": 3, "h": 4}));
    assert_eq!(post.field("related").await.unwrap(), json!(["2", "3"]));
    assert_eq!(post.field("missing").await.unwrap(), Value::Null);
    assert_eq!(post.meta(None).await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_field_hooks() {
    let backend = backend();
    backend.add_meta(1, "price", "10");
    let host = host_for(&backend);
    host.hooks.register(
        hook_names::POST_GET_META_FIELD_PRE,
        |data| {
            if data["field"] == "virtual" {
                data["value"] = json!("computed");
            }
            None
        },
        PRIORITY_DEFAULT,
        None,
    );
    host.hooks.register(
        hook_names::POST_GET_META_FIELD,
        |data| {
            if data["field"] == "price" {
                data["value"] = json!(format!("${}", data["value"].as_str().unwrap_or_default()));
            }
            None
        },
        PRIORITY_DEFAULT,
        None,
    );

    let mut post = view(&host, 1_i64).await;
    assert_eq!(post.field("virtual").await.unwrap(), json!("computed"));
    assert_eq!(post.field("price").await.unwrap(), json!("$10"));

    post.import_field("virtual").await.unwrap();
    assert_eq!(post.custom().get("virtual"), Some(&json!("computed")));
}

#[tokio::test]
async fn test_meta_hooks_replace_custom_fields() {
    let backend = backend();
    backend.add_meta(1, "_private", "x");
    backend.add_meta(1, "shown", "y");
    let host = host_for(&backend);
    host.hooks.register(
        hook_names::POST_GET_META,
        |data| {
            if let Some(meta) = data["meta"].as_object_mut() {
                meta.retain(|key, _| !key.starts_with('_'));
            }
            None
        },
        PRIORITY_DEFAULT,
        None,
    );

    let post = view(&host, 1_i64).await;
    assert_eq!(post.custom().keys().collect::<Vec<_>>(), vec!["shown"]);
}

#[tokio::test]
async fn test_field_reads_the_store_not_the_filtered_map() {
    let backend = backend();
    backend.add_meta(1, "mood", "happy");
    let host = host_for(&backend);
    host.hooks.register(
        hook_names::POST_GET_META,
        |data| {
            data["meta"]["mood"] = json!("rewritten");
            None
        },
        PRIORITY_DEFAULT,
        None,
    );

    let post = view(&host, 1_i64).await;
    assert_eq!(post.custom().get("mood"), Some(&json!("rewritten")));
    assert_eq!(post.field("mood").await.unwrap(), json!("happy"));

    // Writes made elsewhere are visible on the next read
    MetaStore::set(&*backend, 1, "mood", "sad").await.unwrap();
    assert_eq!(post.field("mood").await.unwrap(), json!("sad"));
}

// ============================================================================
// Related records
// ============================================================================

#[tokio::test]
async fn test_children_ordered_by_menu_order() {
    let backend = backend();
    let host = host_for(&backend);
    let page = view(&host, 4_i64).await;

    let ids = |children: Vec<PostView>| children.iter().map(|c| c.id()).collect::<Vec<_>>();
    assert_eq!(ids(page.children("any").await.unwrap()), vec![6, 5]);
    assert_eq!(ids(page.children("parent").await.unwrap()), vec![6, 5]);
    assert!(page.children("post").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_parent_author_and_modified_author() {
    let backend = backend();
    backend.add_meta(3, "_edit_last", "1");
    let host = host_for(&backend);

    let child = view(&host, 5_i64).await;
    assert_eq!(child.parent().await.unwrap().map(|p| p.id()), Some(4));

    let top = view(&host, 4_i64).await;
    assert!(top.parent().await.unwrap().is_none());
    assert!(top.author().await.unwrap().is_none());

    let post = view(&host, 3_i64).await;
    let author = post.author().await.unwrap().unwrap();
    assert_eq!(author.name(), "Ann");
    assert_eq!(author.link, "http://example.org/author/ann/");
    assert_eq!(post.modified_author().await.unwrap().map(|u| u.id), Some(1));

    let unedited = view(&host, 1_i64).await;
    assert_eq!(unedited.modified_author().await.unwrap().map(|u| u.id), Some(1));
}

#[tokio::test]
async fn test_thumbnail_and_image_fields() {
    let backend = backend();
    backend.insert_media(MediaRecord::new(50, "http://example.org/uploads/cover.jpg", 1200, 800));
    backend.insert_media(MediaRecord::new(51, "http://example.org/uploads/hero.jpg", 800, 400));
    backend.set_thumbnail(1, 50);
    backend.add_meta(1, "hero", "51");
    let host = host_for(&backend);

    let post = view(&host, 1_i64).await;
    let thumbnail = post.thumbnail().await.unwrap().unwrap();
    assert_eq!(thumbnail.src, "http://example.org/uploads/cover.jpg");
    assert_eq!(post.image("hero").await.unwrap().map(|i| i.id), Some(51));
    assert!(post.image("missing").await.unwrap().is_none());

    let bare = view(&host, 2_i64).await;
    assert!(bare.thumbnail().await.unwrap().is_none());
}

#[tokio::test]
async fn test_format_and_post_type_info() {
    let backend = backend();
    backend.insert_term(TermRecord::new(30, "post_format", "post-format-aside", "Aside"));
    backend.assign_term(2, 30);
    let host = host_for(&backend);

    let mut aside = view(&host, 2_i64).await;
    assert_eq!(aside.format().await.unwrap().as_deref(), Some("aside"));
    assert!(aside.css_class().await.unwrap().contains("format-aside"));

    let page = view(&host, 4_i64).await;
    assert_eq!(page.format().await.unwrap(), None);
    let info = page.post_type_info().await.unwrap().unwrap();
    assert_eq!(info.plural_label, "Pages");
    assert!(info.hierarchical);
}
