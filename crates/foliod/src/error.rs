//! Error types for the folio server and CLI.
//!
//! [`FoliodError`] is what every handler and command returns. As an axum
//! response it becomes a JSON body `{"error": "..."}` with a status chosen by
//! [`FoliodError::status`]; HTML routes wrap it in [`PageError`] to get the
//! same status with a rendered error page instead.

use axum::{
  extract::multipart::{MultipartError, MultipartRejection},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
  Json,
};
use folio::error::FolioError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::server::views;

/// Error type alias used for the [`foliod`](crate) crate.
pub type Result<T> = core::result::Result<T, FoliodError>;

/// Message shown for failures the client cannot do anything about.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Errors raised by the server and the CLI commands.
#[derive(Error, Debug)]
pub enum FoliodError {
  /// Errors from the folio library
  #[error(transparent)]
  Folio(#[from] FolioError),

  /// A multipart body could not be read
  #[error(transparent)]
  Multipart(#[from] MultipartError),

  /// The request was not a multipart body at all
  #[error(transparent)]
  MultipartRejection(#[from] MultipartRejection),

  /// Standard I/O errors
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// Errors from interactive prompts
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),
}

impl FoliodError {
  /// HTTP status for this error.
  ///
  /// Upload validation failures are `400`, missing articles and paths that
  /// escape a storage root are `404`, malformed bodies keep the status axum
  /// assigns them and everything else is `500`.
  pub fn status(&self) -> StatusCode {
    match self {
      FoliodError::Folio(e) if e.is_validation() => StatusCode::BAD_REQUEST,
      FoliodError::Folio(e) if e.is_not_found() => StatusCode::NOT_FOUND,
      FoliodError::Multipart(e) => e.status(),
      FoliodError::MultipartRejection(e) => e.status(),
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Message safe to show to the client.
  pub fn public_message(&self) -> String {
    match self {
      FoliodError::Folio(e) if e.is_validation() => e.to_string(),
      FoliodError::Folio(e) if e.is_not_found() => FolioError::NotFound.to_string(),
      FoliodError::Multipart(e) => e.body_text(),
      FoliodError::MultipartRejection(e) => e.body_text(),
      _ => INTERNAL_MESSAGE.to_string(),
    }
  }

  /// Logs server side failures; client errors are only traced at debug level.
  fn log(&self, status: StatusCode) {
    if status.is_server_error() {
      error!(error = %self, ?status, "Request failed");
    } else {
      tracing::debug!(error = %self, ?status, "Request rejected");
    }
  }
}

impl IntoResponse for FoliodError {
  fn into_response(self) -> Response {
    let status = self.status();
    self.log(status);
    (status, Json(json!({ "error": self.public_message() }))).into_response()
  }
}

/// A [`FoliodError`] raised by a route that answers with HTML.
#[derive(Debug)]
pub struct PageError(pub FoliodError);

impl From<FoliodError> for PageError {
  fn from(error: FoliodError) -> Self { Self(error) }
}

impl From<FolioError> for PageError {
  fn from(error: FolioError) -> Self { Self(error.into()) }
}

impl From<MultipartError> for PageError {
  fn from(error: MultipartError) -> Self { Self(error.into()) }
}

impl IntoResponse for PageError {
  fn into_response(self) -> Response {
    let status = self.0.status();
    self.0.log(status);
    (status, Html(views::error_page(status, &self.0.public_message()))).into_response()
  }
}
