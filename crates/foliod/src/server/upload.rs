//! Article submission, as an HTML form and as a JSON endpoint.
//!
//! Both read the same multipart body: a file part named `pdf` plus the text
//! fields `title`, `authors`, `abstract`, `keywords` and `category`. When a
//! field is repeated, its first value wins.

use axum::{
  extract::{
    multipart::{Multipart, MultipartRejection},
    State,
  },
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use folio::upload::{Submission, UploadedFile};
use serde::Serialize;

use super::{
  flash::{self, Flash, FlashKind},
  pages::PageResult,
  *,
};

/// Flash shown after a successful form upload.
pub const UPLOADED_FLASH: &str = "Article uploaded successfully!";

/// Message returned by a successful API upload.
pub const UPLOADED_MESSAGE: &str = "Article uploaded successfully";

/// Body of a successful `POST /api/upload`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
  /// Always [`UPLOADED_MESSAGE`]
  pub message: &'static str,
  /// The stored record
  pub article: Article,
}

/// Collects a multipart body into a [`Submission`].
pub async fn read_submission(mut multipart: Multipart) -> Result<Submission> {
  let mut submission = Submission::default();

  while let Some(field) = multipart.next_field().await? {
    let Some(name) = field.name().map(str::to_string) else {
      continue;
    };

    match name.as_str() {
      "pdf" if submission.file.is_none() => {
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await?;
        debug!(%filename, size = content.len(), "Received PDF part");
        submission.file = Some(UploadedFile::new(filename, content.to_vec()));
      },
      "title" => keep_first(&mut submission.title, field.text().await?),
      "authors" => keep_first(&mut submission.authors, field.text().await?),
      "abstract" => keep_first(&mut submission.abstract_text, field.text().await?),
      "keywords" => keep_first(&mut submission.keywords, field.text().await?),
      "category" => keep_first(&mut submission.category, field.text().await?),
      other => debug!(field = other, "Ignoring form field"),
    }
  }

  Ok(submission)
}

/// Sets `slot` unless an earlier value is already there.
fn keep_first(slot: &mut Option<String>, value: String) {
  if slot.is_none() {
    *slot = Some(value);
  }
}

/// `GET /upload`: the submission form.
pub async fn form(flash: Flash) -> Response {
  let html = views::upload_form(flash.message());
  flash.render(html)
}

/// `POST /upload`: stores the article and redirects home, or back to the
/// form with the reason it was refused.
pub async fn submit_form(
  State(state): State<SharedState>,
  multipart: std::result::Result<Multipart, MultipartRejection>,
) -> PageResult {
  let submission = read_submission(multipart.map_err(FoliodError::from)?).await?;

  match state.folio.upload(submission).await {
    Ok(article) => {
      info!(id = article.id, "Article uploaded through form");
      Ok(flash::redirect("/", FlashKind::Success, UPLOADED_FLASH))
    },
    Err(e) if e.is_validation() => {
      debug!(error = %e, "Upload refused");
      Ok(flash::redirect("/upload", FlashKind::Error, &e.to_string()))
    },
    Err(e) => Err(e.into()),
  }
}

/// `POST /api/upload`: stores the article and answers `201` with the record.
pub async fn submit_api(
  State(state): State<SharedState>,
  multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
  let submission = read_submission(multipart?).await?;
  let article = state.folio.upload(submission).await?;
  info!(id = article.id, "Article uploaded through API");

  Ok((StatusCode::CREATED, Json(UploadResponse { message: UPLOADED_MESSAGE, article }))
    .into_response())
}
