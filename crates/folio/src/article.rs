//! The article record and helpers for its list-valued fields.
//!
//! An [`Article`] is the only persisted entity. Its `authors` and `keywords`
//! are ordered lists of strings which the database keeps as JSON text; the
//! [`encode_list`]/[`decode_list`] pair does that conversion and
//! [`parse_list`] turns raw form input into a list in the first place.
//!
//! # Examples
//!
//! ```
//! use folio::article::parse_list;
//!
//! // Comma separated input is split and trimmed
//! assert_eq!(parse_list("Ada Smith,  Ben Jones"), vec!["Ada Smith", "Ben Jones"]);
//!
//! // JSON arrays keep commas inside items
//! assert_eq!(parse_list(r#"["Smith, Ada", "Jones, Ben"]"#), vec!["Smith, Ada", "Jones, Ben"]);
//!
//! // A malformed array falls back to comma splitting
//! assert_eq!(parse_list(r#"["unterminated, list"#), vec![r#"["unterminated"#, r#"list"#]);
//! ```

use super::*;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Longest accepted category slug, in characters.
pub const MAX_CATEGORY_LEN: usize = 50;

/// Longest recorded `pdf_path`, in characters.
pub const MAX_PDF_PATH_LEN: usize = 200;

/// A stored article and its metadata.
///
/// Serializes to the JSON shape served by the API:
///
/// ```json
/// { "id": 1, "title": "...", "authors": ["..."], "abstract": "...",
///   "keywords": ["..."], "category": "...", "pdf_path": "...",
///   "upload_date": "2024-05-01T12:00:00Z", "views": 0, "citations": 0 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
  /// Identifier assigned by the store
  pub id:            i64,
  /// Article title
  pub title:         String,
  /// Author names in submission order
  pub authors:       Vec<String>,
  /// Abstract text
  #[serde(rename = "abstract")]
  pub abstract_text: String,
  /// Keywords in submission order
  pub keywords:      Vec<String>,
  /// Category slug, e.g. `art-history`
  pub category:      String,
  /// Location of the PDF in upload storage
  pub pdf_path:      String,
  /// When the article was recorded
  pub upload_date:   DateTime<Utc>,
  /// Number of single-article fetches
  pub views:         i64,
  /// Reserved, never changed by this system
  pub citations:     i64,
}

impl Article {
  /// File name of the stored PDF, without its directory.
  pub fn pdf_filename(&self) -> &str {
    Path::new(&self.pdf_path).file_name().and_then(|name| name.to_str()).unwrap_or(&self.pdf_path)
  }

  /// Display label for the category.
  pub fn category_label(&self) -> String { category_label(&self.category) }
}

/// An article that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
  /// Article title
  pub title:         String,
  /// Author names, in the order given
  pub authors:       Vec<String>,
  /// Abstract text
  pub abstract_text: String,
  /// Keywords, possibly empty
  pub keywords:      Vec<String>,
  /// Category slug
  pub category:      String,
  /// Where the PDF was stored
  pub pdf_path:      String,
  /// Upload time, `None` for "now"
  pub upload_date:   Option<DateTime<Utc>>,
}

/// Turns a raw author/keyword field into a list.
///
/// Fallback order:
/// 1. A blank value is the empty list.
/// 2. A value starting with `[` is read as a JSON array of strings.
/// 3. Anything else, or an array that fails to parse, is split on `,`.
///
/// Every resulting item is trimmed; order is preserved and empty items are
/// kept, so `"a,,b"` gives `["a", "", "b"]`.
pub fn parse_list(raw: &str) -> Vec<String> {
  if raw.trim().is_empty() {
    return Vec::new();
  }

  if raw.starts_with('[') {
    match serde_json::from_str::<Vec<String>>(raw) {
      Ok(items) => return items.iter().map(|item| item.trim().to_string()).collect(),
      Err(e) => trace!(error = %e, "List field is not a JSON array, splitting on commas"),
    }
  }

  raw.split(',').map(|item| item.trim().to_string()).collect()
}

/// Encodes a list for storage.
pub fn encode_list(items: &[String]) -> Result<String> { Ok(serde_json::to_string(items)?) }

/// Decodes a stored list. `NULL` and empty text decode to the empty list.
pub fn decode_list(stored: Option<&str>) -> serde_json::Result<Vec<String>> {
  match stored {
    None => Ok(Vec::new()),
    Some(text) if text.is_empty() => Ok(Vec::new()),
    Some(text) => serde_json::from_str(text),
  }
}

/// Formats a timestamp the way it is stored: RFC 3339, UTC, microseconds.
///
/// The fixed width keeps text order equal to time order in SQL.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Display label for a category slug.
///
/// ```
/// use folio::article::category_label;
///
/// assert_eq!(category_label("art-history"), "Art History");
/// assert_eq!(category_label("medieval-studies"), "Medieval Studies");
/// ```
pub fn category_label(slug: &str) -> String {
  let known = match slug {
    "philosophy" => Some("Philosophy"),
    "history" => Some("History"),
    "literature" => Some("Literature"),
    "art-history" => Some("Art History"),
    "cultural-studies" => Some("Cultural Studies"),
    "linguistics" => Some("Linguistics"),
    "religious-studies" => Some("Religious Studies"),
    "classics" => Some("Classics"),
    "computer-science" => Some("Computer Science"),
    "biology" => Some("Biology"),
    "physics" => Some("Physics"),
    "chemistry" => Some("Chemistry"),
    "mathematics" => Some("Mathematics"),
    "medicine" => Some("Medicine"),
    "engineering" => Some("Engineering"),
    "social-sciences" => Some("Social Sciences"),
    _ => None,
  };
  if let Some(label) = known {
    return label.to_string();
  }

  slug
    .split('-')
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
      }
    })
    .collect::<Vec<String>>()
    .join(" ")
}

/// Category slugs offered by the upload and search forms, with labels.
pub fn categories() -> Vec<(&'static str, String)> {
  [
    "philosophy",
    "history",
    "literature",
    "art-history",
    "cultural-studies",
    "linguistics",
    "religious-studies",
    "classics",
  ]
  .into_iter()
  .map(|slug| (slug, category_label(slug)))
  .collect()
}
