//! Postview - render one post of a fixture site through a template

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postview::{
    config::ViewConfig,
    hooks::HookManager,
    host::{Fixture, Host, MemoryHost, QueryState, RequestContext},
    template::PostTemplates,
    view::{PostRef, PostView},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postview=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        bail!("Usage: postview <fixture.json> <template.html> [slug]");
    }

    // Load configuration
    let config = ViewConfig::load_with_env(Path::new("postview.yml"))?;
    tracing::info!("Configuration loaded");

    let fixture = Fixture::load(Path::new(&args[0]))?;
    let backend = Arc::new(MemoryHost::from_fixture(fixture, &config.site.base_url));

    let hooks = Arc::new(HookManager::new());
    #[cfg(feature = "markdown")]
    postview::hooks::markdown::register_markdown_filter(&hooks);

    let host = Arc::new(Host::from_backend(backend, config).with_hooks(hooks));

    let mut templates = PostTemplates::new();
    let template = templates.add_file(Path::new(&args[1]))?;

    let (ctx, post) = match args.get(2) {
        Some(slug) => (RequestContext::new(), PostRef::from(slug.as_str())),
        None => {
            let id = std::env::var("POSTVIEW_POST_ID").unwrap_or_else(|_| "0".to_string());
            let ctx = RequestContext::new().with_query(QueryState::default().with_param("p", &id));
            (ctx, PostRef::Ambient)
        }
    };

    let mut view = PostView::new(host, Arc::new(ctx), post).await?;
    if !view.exists() {
        bail!("No post matched");
    }
    tracing::info!("Rendering post {} ({})", view.id(), view.slug());

    let html = templates
        .render_post(&template, &mut view)
        .await
        .context("Failed to render post")?;
    println!("{}", html);

    Ok(())
}
