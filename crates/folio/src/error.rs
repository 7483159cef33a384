//! Error types for the folio library.
//!
//! [`FolioError`] covers every failure mode of the archive:
//! - Upload validation (missing file, rejected extension, missing metadata)
//! - Lookups that find nothing
//! - Paths that try to leave a storage root
//! - Database, filesystem and serialization failures
//!
//! Validation failures are the only ones a user is expected to fix, so
//! [`FolioError::is_validation`] exists to let front ends decide between a
//! "bad request" style answer and an internal failure.
//!
//! # Examples
//!
//! ```
//! use folio::error::FolioError;
//!
//! let err = FolioError::DisallowedExtension("notes.txt".into());
//! assert!(err.is_validation());
//! assert_eq!(err.to_string(), "Only PDF files are allowed");
//! ```

use thiserror::Error;

/// Error type alias used for the [`folio`](crate) crate.
pub type Result<T> = core::result::Result<T, FolioError>;

/// Errors that can occur when working with the folio library.
#[derive(Error, Debug)]
pub enum FolioError {
  /// The submission did not carry a file part at all.
  #[error("No file selected")]
  MissingFile,

  /// A file part was sent, but with an empty filename.
  ///
  /// Browsers do this when the file input is left untouched.
  #[error("No file selected")]
  EmptyFilename,

  /// The uploaded file's extension is not in the allowed set.
  ///
  /// The string carries the rejected filename for logging.
  #[error("Only PDF files are allowed")]
  DisallowedExtension(String),

  /// A required metadata field was missing or blank.
  #[error("Missing required field: {0}")]
  MissingField(&'static str),

  /// A metadata field exceeded its column width.
  #[error("Field `{field}` must be at most {max} characters")]
  FieldTooLong {
    /// Name of the offending field
    field: &'static str,
    /// Maximum length in characters
    max:   usize,
  },

  /// The requested article or publication does not exist.
  #[error("Article not found")]
  NotFound,

  /// A relative path would resolve outside of its storage root.
  ///
  /// Raised for `..` components, absolute paths and symlinks pointing out of
  /// the root. The string carries the offending request path.
  #[error("Path escapes storage root: {0}")]
  PathEscapesRoot(String),

  /// A SQLite operation failed.
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// An async SQLite operation failed.
  #[error(transparent)]
  AsyncSqlite(#[from] tokio_rusqlite::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// Serializing or decoding a stored list failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be written out.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// Configuration is present but unusable.
  #[error("{0}")]
  Config(String),
}

impl FolioError {
  /// Whether this error was caused by the submitted data rather than the
  /// system, i.e. whether the caller can fix it by resubmitting.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      FolioError::MissingFile
        | FolioError::EmptyFilename
        | FolioError::DisallowedExtension(_)
        | FolioError::MissingField(_)
        | FolioError::FieldTooLong { .. }
    )
  }

  /// Whether this error means "nothing there" from the caller's point of view.
  ///
  /// Paths escaping a root are reported as missing so that probing the
  /// filesystem layout gives nothing away.
  pub fn is_not_found(&self) -> bool {
    matches!(self, FolioError::NotFound | FolioError::PathEscapesRoot(_))
      || matches!(self, FolioError::Path(e) if e.kind() == std::io::ErrorKind::NotFound)
  }
}
