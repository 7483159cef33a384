//! Static assets compiled into the binary.

use axum::{http::header, response::IntoResponse};

/// Search page behaviour.
const MAIN_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/main.js"));

/// Site stylesheet.
const STYLE_CSS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/style.css"));

/// `GET /static/main.js`
pub async fn main_js() -> impl IntoResponse {
  ([(header::CONTENT_TYPE, "text/javascript; charset=utf-8")], MAIN_JS)
}

/// `GET /static/style.css`
pub async fn style_css() -> impl IntoResponse {
  ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}
