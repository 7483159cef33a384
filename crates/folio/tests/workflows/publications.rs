use async_trait::async_trait;
use folio::publications::{Issue, Publication};

use super::*;

#[traced_test]
#[tokio::test]
async fn test_directory_catalog_from_config() -> TestResult<()> {
  let (folio, dir) = create_test_folio().await;
  let issues_root = dir.path().join("articles");

  // Issues root does not exist yet
  assert!(folio.catalog().issues().await?.is_empty());

  std::fs::create_dir_all(issues_root.join("Issue 2"))?;
  std::fs::create_dir_all(issues_root.join("Issue 1"))?;
  std::fs::write(issues_root.join("Issue 1").join("Opening Essay.pdf"), b"%PDF-essay")?;

  let issues = folio.catalog().issues().await?;
  assert_eq!(issues, vec![
    Issue { name: "Issue 1".into(), articles: vec!["Opening Essay.pdf".into()] },
    Issue { name: "Issue 2".into(), articles: vec![] },
  ]);

  let publication = folio.catalog().locate("Issue 1/Opening Essay.pdf").await?;
  assert_eq!(publication.title, "Opening Essay");
  assert_eq!(publication.issue, "Issue 1");
  assert_eq!(folio.catalog().open(&publication.path).await?, b"%PDF-essay");
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_catalog_refuses_escapes() -> TestResult<()> {
  let (folio, dir) = create_test_folio().await;
  std::fs::create_dir_all(dir.path().join("articles").join("Issue 1"))?;

  // The database lives next to the issues root; it must not be reachable.
  for path in ["../folio.db", "Issue 1/../../folio.db", "/etc/passwd"] {
    let err = folio.catalog().open(path).await.unwrap_err();
    assert!(err.is_not_found(), "{path} gave {err}");
  }
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_uploaded_blob_readable_through_store() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let article = folio.upload(create_test_submission("paper.pdf")).await?;

  assert_eq!(folio.uploads().read(article.pdf_filename()).await?, b"%PDF-1.4 test");
  assert!(folio.uploads().read("../folio.db").await.unwrap_err().is_not_found());
  Ok(())
}

/// Catalog serving a fixed set of publications from memory.
struct FixedCatalog;

#[async_trait]
impl IssueCatalog for FixedCatalog {
  async fn issues(&self) -> folio::error::Result<Vec<Issue>> {
    Ok(vec![Issue { name: "Winter".into(), articles: vec!["Frost.pdf".into()] }])
  }

  async fn locate(&self, path: &str) -> folio::error::Result<Publication> {
    match path {
      "Winter/Frost.pdf" =>
        Ok(Publication { title: "Frost".into(), issue: "Winter".into(), path: path.into() }),
      _ => Err(FolioError::NotFound),
    }
  }

  async fn open(&self, path: &str) -> folio::error::Result<Vec<u8>> {
    self.locate(path).await.map(|_| b"%PDF-frost".to_vec())
  }
}

#[traced_test]
#[tokio::test]
async fn test_catalog_can_be_replaced() -> TestResult<()> {
  let dir = tempdir()?;
  let config = Config::default()
    .with_database_path(dir.path().join("folio.db"))
    .with_uploads_path(dir.path().join("uploads"));
  let folio = Folio::builder().with_config(config).with_catalog(Arc::new(FixedCatalog)).build().await?;

  assert_eq!(folio.catalog().issues().await?[0].name, "Winter");
  assert_eq!(folio.catalog().open("Winter/Frost.pdf").await?, b"%PDF-frost");
  assert!(matches!(folio.catalog().locate("Spring/Thaw.pdf").await, Err(FolioError::NotFound)));
  Ok(())
}
