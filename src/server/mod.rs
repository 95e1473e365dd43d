//! HTTP server rendering pages per request

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::pages::SiteRenderer;
use crate::Blog;

/// Server state
struct ServerState {
    site: SiteRenderer,
}

type SharedState = Arc<ServerState>;

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(blog: &Blog) -> Result<Router> {
    let state = Arc::new(ServerState {
        site: SiteRenderer::new(blog)?,
    });

    let mut app = Router::new()
        .route("/", get(home_handler))
        .route("/blog", get(blog_index_handler))
        .route("/blog/:slug", get(post_handler))
        .route("/blog/tags/:tag", get(tag_handler))
        .fallback(fallback_handler)
        .with_state(state);

    if blog.static_dir.is_dir() {
        tracing::debug!("Serving static files from {:?}", blog.static_dir);
        app = app.nest_service("/static", ServeDir::new(&blog.static_dir));
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

async fn home_handler(State(state): State<SharedState>) -> Response {
    render_page(state, |site| site.home().map(Some)).await
}

async fn blog_index_handler(State(state): State<SharedState>) -> Response {
    render_page(state, |site| site.blog_index().map(Some)).await
}

async fn post_handler(State(state): State<SharedState>, Path(slug): Path<String>) -> Response {
    render_page(state, move |site| site.post(&slug)).await
}

async fn tag_handler(State(state): State<SharedState>, Path(tag): Path<String>) -> Response {
    render_page(state, move |site| site.tag(&tag)).await
}

async fn fallback_handler(State(state): State<SharedState>) -> Response {
    render_page(state, |_| Ok(None)).await
}

/// Run a page render on the blocking pool; the repository reads the disk
/// synchronously on every call.
async fn render_page<F>(state: SharedState, render: F) -> Response
where
    F: FnOnce(&SiteRenderer) -> Result<Option<String>> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || -> Result<(StatusCode, String)> {
        let page = render(&state.site)?;
        match page {
            Some(html) => Ok((StatusCode::OK, html)),
            None => Ok((StatusCode::NOT_FOUND, state.site.not_found()?)),
        }
    })
    .await;

    match result {
        Ok(Ok((status, html))) => (status, Html(html)).into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e.into()),
    }
}

fn internal_error(e: anyhow::Error) -> Response {
    tracing::error!("Failed to render page: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
