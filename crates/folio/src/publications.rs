//! Browsing of the curated publications tree.
//!
//! Curated publications live in a read-only directory laid out as
//! `<issues root>/<issue>/<article file>`. Nothing about them is stored in the
//! database; every listing is read fresh from disk. Handlers talk to the tree
//! through [`IssueCatalog`], so a metadata-backed catalog can replace
//! [`DirectoryCatalog`] without changing them.

use super::*;
use crate::storage::EntryKind;

/// One issue and the article files it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
  /// Directory name of the issue
  pub name:     String,
  /// File names in the issue, sorted
  pub articles: Vec<String>,
}

/// A located publication, ready for the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publication {
  /// File name without extension
  pub title: String,
  /// Issue the file belongs to (its parent directory, relative to the root)
  pub issue: String,
  /// Path relative to the issues root, `/` separated
  pub path:  String,
}

/// Source of issues and their publications.
#[async_trait]
pub trait IssueCatalog: Send + Sync {
  /// All issues with their articles, sorted by name. Hidden entries are left
  /// out.
  async fn issues(&self) -> Result<Vec<Issue>>;

  /// Looks up a publication by its issue-relative path.
  async fn locate(&self, path: &str) -> Result<Publication>;

  /// Reads the bytes of a publication.
  async fn open(&self, path: &str) -> Result<Vec<u8>>;
}

/// [`IssueCatalog`] reading a directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
  /// Read access to the tree
  store: FilesystemStore,
}

impl DirectoryCatalog {
  /// A catalog of the tree under `root`. A missing root lists no issues.
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { store: FilesystemStore::new(root) } }
}

#[async_trait]
impl IssueCatalog for DirectoryCatalog {
  async fn issues(&self) -> Result<Vec<Issue>> {
    if !tokio::fs::try_exists(self.store.root()).await? {
      debug!(root = %self.store.root().display(), "Issues root is missing, nothing to list");
      return Ok(Vec::new());
    }

    let mut issues = Vec::new();
    for entry in self.store.list("").await? {
      if entry.is_hidden() || entry.kind != EntryKind::Directory {
        continue;
      }
      let articles = self
        .store
        .list(&entry.name)
        .await?
        .into_iter()
        .filter(|file| !file.is_hidden() && file.kind == EntryKind::File)
        .map(|file| file.name)
        .collect();
      issues.push(Issue { name: entry.name, articles });
    }
    Ok(issues)
  }

  async fn locate(&self, path: &str) -> Result<Publication> {
    let resolved = self.store.resolve(path).await.map_err(not_found)?;
    if !tokio::fs::metadata(&resolved).await?.is_file() {
      return Err(FolioError::NotFound);
    }

    let relative = storage::sanitize_relative(path)?;
    let title = relative.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string();
    let issue = relative.parent().map(slash_joined).unwrap_or_default();

    Ok(Publication { title, issue, path: slash_joined(&relative) })
  }

  async fn open(&self, path: &str) -> Result<Vec<u8>> {
    self.store.read(path).await.map_err(not_found)
  }
}

/// Renders a relative path with `/` separators regardless of platform.
fn slash_joined(path: &Path) -> String {
  path.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}

/// Collapses "does not exist" style I/O errors into [`FolioError::NotFound`].
fn not_found(error: FolioError) -> FolioError {
  match error {
    FolioError::Path(e) if e.kind() == std::io::ErrorKind::NotFound => FolioError::NotFound,
    other => other,
  }
}
