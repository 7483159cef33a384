//! Raw file responses.

use axum::{
  extract::{Path, State},
  http::header,
  response::{IntoResponse, Response},
};

use super::*;

/// Responds with file bytes for display in the browser.
///
/// The content type is guessed from the extension of `name`.
pub fn inline_file(name: &str, bytes: Vec<u8>) -> Response {
  let mime = mime_guess::from_path(name).first_or_octet_stream();
  (
    [
      (header::CONTENT_TYPE, mime.to_string()),
      (header::CONTENT_DISPOSITION, format!("inline; filename=\"{}\"", header_safe(name))),
    ],
    bytes,
  )
    .into_response()
}

/// Last path segment of `name`, reduced to characters allowed in a quoted
/// header parameter.
fn header_safe(name: &str) -> String {
  name
    .rsplit('/')
    .next()
    .unwrap_or(name)
    .chars()
    .map(|c| if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' { c } else { '_' })
    .collect()
}

/// `GET /uploads/{name}`: a previously uploaded PDF.
pub async fn uploaded_pdf(
  State(state): State<SharedState>,
  Path(name): Path<String>,
) -> Result<Response> {
  let bytes = state.folio.uploads().read(&name).await?;
  Ok(inline_file(&name, bytes))
}
