//! HTTP routing and server lifecycle.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | recent feed |
//! | `GET, POST /upload` | upload form and submission |
//! | `GET /search` | search page |
//! | `GET /article/{id}` | article details, counts a view |
//! | `GET /publications` | issues and their articles |
//! | `GET /publications/view/{*path}` | viewer page for one publication |
//! | `GET /publications/pdf/{*path}` | raw publication bytes |
//! | `GET /uploads/{name}` | raw uploaded PDF |
//! | `GET /api/articles` | every article as JSON |
//! | `GET /api/articles/{id}` | one article as JSON, counts a view |
//! | `GET /api/search` | filtered articles as JSON |
//! | `POST /api/upload` | JSON upload |
//! | `GET /static/*` | embedded script and stylesheet |

use std::future::Future;

use axum::{
  extract::{rejection::PathRejection, DefaultBodyLimit, Path},
  routing::{get, post},
  Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::*;

pub mod api;
pub mod assets;
pub mod files;
pub mod flash;
pub mod pages;
pub mod publications;
pub mod upload;
pub mod views;

/// State shared by every handler.
pub struct AppState {
  /// The opened archive
  pub folio: Folio,
}

/// Handle to [`AppState`] as handlers receive it.
pub type SharedState = Arc<AppState>;

/// Article id from a `{id}` route segment. Anything that is not an integer
/// names no article.
pub fn article_id(
  path: std::result::Result<Path<i64>, PathRejection>,
) -> folio::error::Result<i64> {
  path.map(|Path(id)| id).map_err(|rejection| {
    debug!(%rejection, "Article id is not an integer");
    folio::error::FolioError::NotFound
  })
}

/// Builds the application router around an opened archive.
pub fn create_router(folio: Folio) -> Router {
  let body_limit = folio.config().max_upload_bytes;
  let state = Arc::new(AppState { folio });

  Router::new()
    .route("/", get(pages::index))
    .route("/upload", get(upload::form).post(upload::submit_form))
    .route("/search", get(pages::search))
    .route("/article/{id}", get(pages::article))
    .route("/publications", get(publications::index))
    .route("/publications/view/{*path}", get(publications::view))
    .route("/publications/pdf/{*path}", get(publications::pdf))
    .route("/uploads/{name}", get(files::uploaded_pdf))
    .route("/api/articles", get(api::list_articles))
    .route("/api/articles/{id}", get(api::get_article))
    .route("/api/search", get(api::search))
    .route("/api/upload", post(upload::submit_api))
    .route("/static/main.js", get(assets::main_js))
    .route("/static/style.css", get(assets::style_css))
    .layer(DefaultBodyLimit::max(body_limit))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn serve(folio: Folio, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
  let address = folio.config().bind_address.clone();
  let listener = TcpListener::bind(&address).await?;
  info!(address = %listener.local_addr()?, "Serving folio");

  axum::serve(listener, create_router(folio)).with_graceful_shutdown(shutdown).await?;
  info!("Server stopped");
  Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM on Unix.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      warn!(error = %e, "Could not listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
    info!("Received Ctrl-C, shutting down");
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
        info!("Received terminate signal, shutting down");
      },
      Err(e) => {
        warn!(error = %e, "Could not listen for SIGTERM");
        std::future::pending::<()>().await;
      },
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
