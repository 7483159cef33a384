//! Blob storage rooted at a directory.
//!
//! Every path handed to a [`BlobStore`] is relative to its root and is checked
//! to stay inside it: `..` and absolute components are refused outright, and
//! the resolved path is canonicalized so that symlinks pointing out of the
//! root are refused as well.

use tokio::{fs, io::AsyncWriteExt};

use super::*;

/// How many numbered alternatives [`BlobStore::put`] tries before giving up.
const MAX_NAME_ATTEMPTS: usize = 1000;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
  /// A regular file
  File,
  /// A directory
  Directory,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  /// File or directory name, without any path
  pub name: String,
  /// Whether the entry is a file or a directory
  pub kind: EntryKind,
}

impl Entry {
  /// Whether the name starts with a dot.
  pub fn is_hidden(&self) -> bool { self.name.starts_with('.') }
}

/// Storage of named binary blobs below a root directory.
#[async_trait]
pub trait BlobStore: Send + Sync {
  /// The directory all paths are relative to.
  fn root(&self) -> &Path;

  /// Stores `content` as a new file directly under the root.
  ///
  /// The root is created if needed. An existing file is never overwritten:
  /// if `name` is taken, `_1`, `_2`, ... is inserted before the extension.
  /// Returns the path of the file actually written.
  async fn put(&self, name: &str, content: &[u8]) -> Result<PathBuf>;

  /// Deletes a file directly under the root.
  async fn remove(&self, name: &str) -> Result<()>;

  /// Reads a file below the root.
  async fn read(&self, relative: &str) -> Result<Vec<u8>>;

  /// Lists a directory below the root, sorted by name. An empty path lists
  /// the root itself.
  async fn list(&self, relative: &str) -> Result<Vec<Entry>>;

  /// Resolves a relative path to an existing location inside the root.
  async fn resolve(&self, relative: &str) -> Result<PathBuf>;
}

/// [`BlobStore`] backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
  /// Root directory
  root: PathBuf,
}

impl FilesystemStore {
  /// A store rooted at `root`. The directory is created on the first `put`.
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  /// Joins a single file name onto the root, refusing anything that is not a
  /// plain name.
  fn name_to_path(&self, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
      (Some(std::path::Component::Normal(_)), None) => Ok(self.root.join(name)),
      _ => Err(FolioError::PathEscapesRoot(name.to_string())),
    }
  }
}

/// Checks that a relative path only walks downwards.
///
/// `.` components are dropped; `..`, root and prefix components are refused.
pub fn sanitize_relative(relative: &str) -> Result<PathBuf> {
  use std::path::Component;

  let mut clean = PathBuf::new();
  for component in Path::new(relative).components() {
    match component {
      Component::Normal(part) => clean.push(part),
      Component::CurDir => {},
      Component::ParentDir | Component::RootDir | Component::Prefix(_) =>
        return Err(FolioError::PathEscapesRoot(relative.to_string())),
    }
  }
  Ok(clean)
}

/// Candidate file name for attempt `n` of a `put`.
fn numbered_name(name: &str, n: usize) -> String {
  if n == 0 {
    return name.to_string();
  }
  match name.rsplit_once('.') {
    Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{n}.{ext}"),
    _ => format!("{name}_{n}"),
  }
}

/// Removes a file whose write failed so its name is not left claimed by a
/// truncated blob.
async fn discard_partial(path: &Path) {
  if let Err(e) = fs::remove_file(path).await {
    warn!(error = %e, path = %path.display(), "Could not remove partially written blob");
  }
}

#[async_trait]
impl BlobStore for FilesystemStore {
  fn root(&self) -> &Path { &self.root }

  async fn put(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
    self.name_to_path(name)?;
    fs::create_dir_all(&self.root).await?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
      let path = self.root.join(numbered_name(name, attempt));
      let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
          trace!(path = %path.display(), "Blob name taken, trying next");
          continue;
        },
        Err(e) => return Err(e.into()),
      };

      if let Err(e) = async {
        file.write_all(content).await?;
        file.sync_all().await
      }
      .await
      {
        discard_partial(&path).await;
        return Err(e.into());
      }
      return Ok(path);
    }

    Err(FolioError::Path(std::io::Error::new(
      std::io::ErrorKind::AlreadyExists,
      format!("no free name for {name} after {MAX_NAME_ATTEMPTS} attempts"),
    )))
  }

  async fn remove(&self, name: &str) -> Result<()> {
    let path = self.name_to_path(name)?;
    fs::remove_file(&path).await?;
    Ok(())
  }

  async fn read(&self, relative: &str) -> Result<Vec<u8>> {
    let path = self.resolve(relative).await?;
    if !fs::metadata(&path).await?.is_file() {
      return Err(FolioError::NotFound);
    }
    Ok(fs::read(&path).await?)
  }

  async fn list(&self, relative: &str) -> Result<Vec<Entry>> {
    let dir = self.resolve(relative).await?;
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(&dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
      let Some(name) = entry.file_name().to_str().map(str::to_string) else {
        warn!(path = %entry.path().display(), "Skipping entry with non UTF-8 name");
        continue;
      };
      // Follows symlinks; dangling ones are skipped.
      let kind = match fs::metadata(entry.path()).await {
        Ok(meta) if meta.is_dir() => EntryKind::Directory,
        Ok(meta) if meta.is_file() => EntryKind::File,
        Ok(_) => continue,
        Err(e) => {
          debug!(error = %e, %name, "Skipping unreadable entry");
          continue;
        },
      };
      entries.push(Entry { name, kind });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
  }

  async fn resolve(&self, relative: &str) -> Result<PathBuf> {
    let clean = sanitize_relative(relative)?;
    let root = fs::canonicalize(&self.root).await?;
    let resolved = fs::canonicalize(root.join(&clean)).await?;

    if !resolved.starts_with(&root) {
      warn!(path = %relative, "Refusing path that resolves outside the storage root");
      return Err(FolioError::PathEscapesRoot(relative.to_string()));
    }
    Ok(resolved)
  }
}
