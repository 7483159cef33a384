//! Validation of submitted articles.
//!
//! A [`Submission`] is the raw content of an upload form: an optional file and
//! optional text fields, exactly as received. [`Submission::validate`] checks
//! it and produces a [`ValidUpload`], which knows the safe name its PDF will be
//! stored under and the record to create once the PDF is written.
//!
//! Checks run in this order, and the first failure is reported:
//! 1. a file part is present ([`FolioError::MissingFile`])
//! 2. its filename is not empty ([`FolioError::EmptyFilename`])
//! 3. its extension is allowed ([`FolioError::DisallowedExtension`])
//! 4. `title`, `authors`, `abstract` and `category` are present and not blank
//! 5. `title` and `category` fit their columns
//!
//! Long filenames are not an error. [`ValidUpload::stored_name`] shortens the
//! stem so the recorded `pdf_path` fits in [`MAX_PDF_PATH_LEN`].

use super::*;

lazy_static! {
  /// Characters kept in stored filenames.
  static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.-]").unwrap();
  /// Runs of whitespace, collapsed to a single underscore.
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Filename used when sanitizing leaves nothing behind.
const FALLBACK_STEM: &str = "upload";

/// Room kept for the `_N` suffix added when a stored name is already taken.
const COLLISION_SUFFIX_LEN: usize = 4;

/// An uploaded file as received.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
  /// Client supplied filename, possibly empty or with directory parts
  pub filename: String,
  /// File content
  pub content:  Vec<u8>,
}

impl UploadedFile {
  /// Wraps a received file.
  pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
    Self { filename: filename.into(), content: content.into() }
  }
}

/// Raw upload form content.
#[derive(Debug, Clone, Default)]
pub struct Submission {
  /// The `pdf` file part
  pub file:          Option<UploadedFile>,
  /// Article title
  pub title:         Option<String>,
  /// Comma separated or JSON array
  pub authors:       Option<String>,
  /// Abstract text
  pub abstract_text: Option<String>,
  /// Comma separated or JSON array, may be absent
  pub keywords:      Option<String>,
  /// Category slug
  pub category:      Option<String>,
}

/// A submission that passed validation.
#[derive(Debug, Clone)]
pub struct ValidUpload {
  /// Sanitized filename, without timestamp
  filename: String,
  /// PDF content
  content:  Vec<u8>,
  /// Metadata, `pdf_path` still empty
  article:  NewArticle,
}

impl Submission {
  /// Checks the submission against the configured rules.
  pub fn validate(self, config: &Config) -> Result<ValidUpload> {
    let file = self.file.ok_or(FolioError::MissingFile)?;
    if file.filename.is_empty() {
      return Err(FolioError::EmptyFilename);
    }
    if !config.is_allowed(&file.filename) {
      debug!(filename = %file.filename, "Rejected upload with disallowed extension");
      return Err(FolioError::DisallowedExtension(file.filename));
    }

    let title = required("title", self.title)?;
    let authors = required("authors", self.authors)?;
    let abstract_text = required("abstract", self.abstract_text)?;
    let category = required("category", self.category)?;

    if title.chars().count() > MAX_TITLE_LEN {
      return Err(FolioError::FieldTooLong { field: "title", max: MAX_TITLE_LEN });
    }
    if category.chars().count() > MAX_CATEGORY_LEN {
      return Err(FolioError::FieldTooLong { field: "category", max: MAX_CATEGORY_LEN });
    }

    let article = NewArticle {
      title,
      authors: parse_list(&authors),
      abstract_text,
      keywords: self.keywords.as_deref().map(parse_list).unwrap_or_default(),
      category,
      pdf_path: String::new(),
      upload_date: None,
    };

    Ok(ValidUpload { filename: sanitize_filename(&file.filename), content: file.content, article })
  }
}

impl ValidUpload {
  /// The sanitized filename.
  pub fn filename(&self) -> &str { &self.filename }

  /// The PDF content.
  pub fn content(&self) -> &[u8] { &self.content }

  /// The metadata that will be recorded.
  pub fn article(&self) -> &NewArticle { &self.article }

  /// Storage name under `root`: `YYYYMMDD_HHMMSS_` followed by the sanitized
  /// filename, its stem cut short so that `root/<name>` stays within
  /// [`MAX_PDF_PATH_LEN`] while leaving room for a collision suffix.
  ///
  /// Fails with [`FolioError::Config`] when `root` alone is too long to hold
  /// any name.
  pub fn stored_name(&self, at: DateTime<Utc>, root: &Path) -> Result<String> {
    let stamp = format!("{}_", at.format("%Y%m%d_%H%M%S"));
    let prefix_len = root.join(&stamp).to_string_lossy().chars().count();
    let budget = MAX_PDF_PATH_LEN.saturating_sub(prefix_len + COLLISION_SUFFIX_LEN);

    let name = shorten_filename(&self.filename, budget).ok_or_else(|| {
      FolioError::Config(format!(
        "uploads path {} leaves no room for file names within {MAX_PDF_PATH_LEN} characters",
        root.display()
      ))
    })?;
    if name.len() < self.filename.len() {
      debug!(original = %self.filename, stored = %name, "Shortened long upload filename");
    }
    Ok(format!("{stamp}{name}"))
  }

  /// The record to insert once the PDF is stored at `pdf_path`.
  pub fn into_article(self, pdf_path: String) -> NewArticle {
    NewArticle { pdf_path, ..self.article }
  }
}

/// A required text field, trimmed for the blank check but stored as sent.
fn required(field: &'static str, value: Option<String>) -> Result<String> {
  match value {
    Some(value) if !value.trim().is_empty() => Ok(value),
    _ => Err(FolioError::MissingField(field)),
  }
}

/// Reduces a client supplied filename to something safe to store.
///
/// Directory parts (`/` or `\` separated) are dropped, whitespace becomes
/// `_`, anything outside `[A-Za-z0-9._-]` is removed and leading or trailing
/// `.`/`_` are trimmed. If nothing usable remains the name becomes `upload`
/// with the original extension.
///
/// ```
/// use folio::upload::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/My Paper (final).pdf"), "My_Paper_final.pdf");
/// assert_eq!(sanitize_filename(r"C:\Users\ada\paper.PDF"), "paper.PDF");
/// assert_eq!(sanitize_filename("论文.pdf"), "upload.pdf");
/// ```
pub fn sanitize_filename(filename: &str) -> String {
  let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
  let spaced = WHITESPACE.replace_all(base.trim(), "_");
  let cleaned = UNSAFE_FILENAME_CHARS.replace_all(&spaced, "");
  let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

  match trimmed.rsplit_once('.') {
    Some((stem, _)) if !stem.trim_matches(|c| c == '.' || c == '_').is_empty() =>
      trimmed.to_string(),
    Some((_, ext)) => format!("{FALLBACK_STEM}.{ext}"),
    None => match base.rsplit_once('.') {
      // The whole name was stripped; keep the extension from the original.
      Some((_, ext)) if !UNSAFE_FILENAME_CHARS.is_match(ext) && !ext.is_empty() =>
        format!("{FALLBACK_STEM}.{ext}"),
      _ if trimmed.is_empty() => FALLBACK_STEM.to_string(),
      _ => trimmed.to_string(),
    },
  }
}

/// Cuts a sanitized filename down to `max` characters, keeping its
/// extension. `None` when not even one stem character fits.
///
/// ```
/// use folio::upload::shorten_filename;
///
/// assert_eq!(shorten_filename("paper.pdf", 20).as_deref(), Some("paper.pdf"));
/// assert_eq!(shorten_filename("long_paper_name.pdf", 10).as_deref(), Some("long_p.pdf"));
/// assert_eq!(shorten_filename("paper.pdf", 4), None);
/// ```
pub fn shorten_filename(filename: &str, max: usize) -> Option<String> {
  if filename.chars().count() <= max {
    return Some(filename.to_string());
  }

  let (stem, ext) = match filename.rsplit_once('.') {
    Some((stem, ext)) => (stem, Some(ext)),
    None => (filename, None),
  };
  let ext_len = ext.map_or(0, |ext| ext.chars().count() + 1);
  let keep = max.checked_sub(ext_len).filter(|&keep| keep > 0)?;

  let cut: String = stem.chars().take(keep).collect();
  let stem = cut.trim_end_matches(['.', '_']);
  if stem.is_empty() {
    return None;
  }
  Some(match ext {
    Some(ext) => format!("{stem}.{ext}"),
    None => stem.to_string(),
  })
}
