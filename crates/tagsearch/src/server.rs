//! HTTP surface over the query service.
//!
//! - `POST /search` with form field `searchTag` → comma-joined image URLs
//! - `GET /fetchTags` → comma-joined label list
//! - everything else → static assets, when a directory is configured

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use tagsearch_core::QueryService;
use tower_http::services::ServeDir;

#[derive(Debug, Deserialize)]
struct SearchForm {
    #[serde(rename = "searchTag", default)]
    search_tag: String,
}

/// Build the application router.
pub fn router(queries: QueryService, static_dir: Option<&Path>) -> Router {
    let app = Router::new()
        .route("/search", post(search))
        .route("/fetchTags", get(fetch_tags))
        .with_state(queries);

    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}

/// A body that is not a readable form counts as an empty label.
async fn search(
    State(queries): State<QueryService>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> String {
    let label = match form {
        Ok(Form(form)) => form.search_tag,
        Err(rejection) => {
            tracing::debug!("Unreadable search form, treating as empty: {rejection}");
            String::new()
        }
    };
    let result = queries.search(&label);
    tracing::debug!("search {label:?} -> {result:?}");
    result
}

async fn fetch_tags(State(queries): State<QueryService>) -> String {
    queries.fetch_tags()
}

/// Serve `app` on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
