//! Process configuration.
//!
//! A [`Config`] is read once at start up (usually from
//! `<config_dir>/folio/config.toml`) and never changes afterwards. Every key is
//! optional in the file; anything left out takes the value from
//! [`Config::default`].
//!
//! ```toml
//! database_path = "/srv/folio/folio.db"
//! uploads_path = "/srv/folio/uploads"
//! issues_path = "/srv/folio/articles"
//! allowed_extensions = ["pdf"]
//! bind_address = "0.0.0.0:5000"
//! max_upload_bytes = 16777216
//! ```

use super::*;

/// Upload size limit used when none is configured.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Configuration for a folio archive and the server in front of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// SQLite database file holding article records
  pub database_path:      PathBuf,
  /// Directory receiving uploaded PDFs
  pub uploads_path:       PathBuf,
  /// Root of the curated `issue/article` tree
  pub issues_path:        PathBuf,
  /// Lowercase file extensions accepted for upload
  pub allowed_extensions: Vec<String>,
  /// Address the HTTP server binds to
  pub bind_address:       String,
  /// Largest accepted request body for uploads
  pub max_upload_bytes:   usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_path:      Self::default_database_path(),
      uploads_path:       Self::default_uploads_path(),
      issues_path:        PathBuf::from("articles"),
      allowed_extensions: vec!["pdf".to_string()],
      bind_address:       "127.0.0.1:5000".to_string(),
      max_upload_bytes:   DEFAULT_MAX_UPLOAD_BYTES,
    }
  }
}

impl Config {
  /// Location of the configuration file.
  ///
  /// - On Unix: `~/.config/folio/config.toml`
  /// - On macOS: `~/Library/Application Support/folio/config.toml`
  /// - On Windows: `%APPDATA%\folio\config.toml`
  pub fn default_path() -> Result<PathBuf> {
    dirs::config_dir()
      .map(|dir| dir.join("folio").join("config.toml"))
      .ok_or_else(|| FolioError::Config("no configuration directory on this platform".into()))
  }

  /// Default database file, `<data_dir>/folio/folio.db`, falling back to the
  /// working directory.
  pub fn default_database_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("folio").join("folio.db")
  }

  /// Default uploads directory, `<data_dir>/folio/uploads`.
  pub fn default_uploads_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("folio").join("uploads")
  }

  /// Reads a configuration file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    config.allowed_extensions =
      config.allowed_extensions.iter().map(|ext| normalize_extension(ext)).collect();
    debug!(path = %path.display(), ?config, "Loaded configuration");
    Ok(config)
  }

  /// Writes this configuration to `path`, creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    Ok(())
  }

  /// Sets the SQLite database file.
  pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.database_path = path.into();
    self
  }

  /// Sets the directory receiving uploaded PDFs.
  pub fn with_uploads_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.uploads_path = path.into();
    self
  }

  /// Sets the root of the curated issues tree.
  pub fn with_issues_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.issues_path = path.into();
    self
  }

  /// Replaces the accepted extensions. A leading `.` is dropped and case is
  /// ignored.
  pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>, {
    self.allowed_extensions =
      extensions.into_iter().map(|ext| normalize_extension(ext.as_ref())).collect();
    self
  }

  /// Sets the address the server listens on.
  pub fn with_bind_address(mut self, address: impl Into<String>) -> Self {
    self.bind_address = address.into();
    self
  }

  /// Sets the largest accepted upload body.
  pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
    self.max_upload_bytes = bytes;
    self
  }

  /// Whether `filename` carries one of the allowed extensions.
  ///
  /// Only the text after the last `.` counts, compared case-insensitively, so
  /// `paper.PDF` passes and `archive.pdf.zip` or `pdf` do not.
  pub fn is_allowed(&self, filename: &str) -> bool {
    match filename.rsplit_once('.') {
      Some((_, ext)) =>
        self.allowed_extensions.iter().any(|allowed| allowed == &ext.to_lowercase()),
      None => false,
    }
  }
}

/// Lowercases an extension and strips a leading dot.
fn normalize_extension(ext: &str) -> String { ext.trim().trim_start_matches('.').to_lowercase() }
