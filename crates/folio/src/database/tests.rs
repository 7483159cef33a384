use super::*;

/// Helper function to set up a test database
async fn setup_test_db() -> (Database, PathBuf, tempfile::TempDir) {
  let dir = tempdir().unwrap();
  let path = dir.path().join("nested").join("test.db");
  let db = Database::open(&path).await.unwrap();
  (db, path, dir)
}

fn new_article(title: &str, at: &str) -> NewArticle {
  NewArticle {
    title:         title.to_string(),
    authors:       vec!["Ada Smith".to_string(), "Ben Jones".to_string()],
    abstract_text: "An abstract".to_string(),
    keywords:      vec!["margins".to_string()],
    category:      "history".to_string(),
    pdf_path:      format!("uploads/{title}.pdf"),
    upload_date:   Some(at.parse().unwrap()),
  }
}

#[traced_test]
#[tokio::test]
async fn test_database_creation() {
  let (_db, path, _dir) = setup_test_db().await;
  assert!(path.exists());
}

#[traced_test]
#[test]
fn test_default_path() {
  let path = Database::default_path();
  assert!(path.ends_with("folio/folio.db") || path.ends_with("folio\\folio.db"));
}

#[traced_test]
#[tokio::test]
async fn test_reopen_keeps_records() {
  let (db, path, _dir) = setup_test_db().await;
  let stored = Add::new(new_article("Kept", "2024-01-01T00:00:00Z")).execute(&db).await.unwrap();
  drop(db);

  let db = Database::open(&path).await.unwrap();
  let found = Query::by_id(stored.id).execute(&db).await.unwrap();
  assert_eq!(found, vec![stored]);
}

#[traced_test]
#[tokio::test]
async fn test_add_assigns_ids_and_defaults() {
  let db = Database::open_in_memory().await.unwrap();
  let mut article = new_article("First", "2024-01-01T00:00:00Z");
  article.upload_date = None;

  let before = Utc::now();
  let first = Add::new(article).execute(&db).await.unwrap();
  let second =
    Add::new(new_article("Second", "2024-01-02T00:00:00Z")).execute(&db).await.unwrap();

  assert!(first.id > 0);
  assert!(second.id > first.id);
  assert_eq!(first.views, 0);
  assert_eq!(first.citations, 0);
  assert!(first.upload_date >= before - chrono::Duration::seconds(1));
}

#[traced_test]
#[tokio::test]
async fn test_view_increments_and_persists() {
  let db = Database::open_in_memory().await.unwrap();
  let stored = Add::new(new_article("Viewed", "2024-01-01T00:00:00Z")).execute(&db).await.unwrap();

  assert_eq!(RecordView::new(stored.id).execute(&db).await.unwrap().views, 1);
  assert_eq!(RecordView::new(stored.id).execute(&db).await.unwrap().views, 2);

  let reread = Query::by_id(stored.id).execute(&db).await.unwrap();
  assert_eq!(reread[0].views, 2);
}

#[traced_test]
#[tokio::test]
async fn test_view_unknown_id_is_not_found() {
  let db = Database::open_in_memory().await.unwrap();
  let stored = Add::new(new_article("Only", "2024-01-01T00:00:00Z")).execute(&db).await.unwrap();

  let result = RecordView::new(999_999).execute(&db).await;
  assert!(matches!(result, Err(FolioError::NotFound)));

  let all = Query::list_all().execute(&db).await.unwrap();
  assert_eq!(all, vec![stored]);
}

#[traced_test]
#[tokio::test]
async fn test_concurrent_views_are_not_lost() {
  let db = Database::open_in_memory().await.unwrap();
  let stored = Add::new(new_article("Busy", "2024-01-01T00:00:00Z")).execute(&db).await.unwrap();

  let mut handles = Vec::new();
  for _ in 0..20 {
    let db = db.clone();
    handles.push(tokio::spawn(async move { RecordView::new(stored.id).execute(&db).await }));
  }
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  let reread = Query::by_id(stored.id).execute(&db).await.unwrap();
  assert_eq!(reread[0].views, 20);
}

#[traced_test]
#[tokio::test]
async fn test_ordering_and_limit() {
  let db = Database::open_in_memory().await.unwrap();
  for (title, at) in [
    ("Middle", "2024-02-01T00:00:00Z"),
    ("Oldest", "2024-01-01T00:00:00Z"),
    ("Newest", "2024-03-01T00:00:00.5Z"),
  ] {
    Add::new(new_article(title, at)).execute(&db).await.unwrap();
  }

  let titles = |articles: Vec<Article>| articles.into_iter().map(|a| a.title).collect::<Vec<_>>();

  let newest_first =
    Query::list_all().order_by(OrderField::UploadDate).descending().execute(&db).await.unwrap();
  assert_eq!(titles(newest_first), vec!["Newest", "Middle", "Oldest"]);

  let top_two = Query::list_all()
    .order_by(OrderField::UploadDate)
    .descending()
    .limit(2)
    .execute(&db)
    .await
    .unwrap();
  assert_eq!(titles(top_two), vec!["Newest", "Middle"]);

  let by_title = Query::list_all().order_by(OrderField::Title).execute(&db).await.unwrap();
  assert_eq!(titles(by_title), vec!["Middle", "Newest", "Oldest"]);
}

#[traced_test]
#[tokio::test]
async fn test_same_timestamp_ties_break_by_id() {
  let db = Database::open_in_memory().await.unwrap();
  let first = Add::new(new_article("A", "2024-01-01T00:00:00Z")).execute(&db).await.unwrap();
  let second = Add::new(new_article("B", "2024-01-01T00:00:00Z")).execute(&db).await.unwrap();

  let results =
    Query::list_all().order_by(OrderField::UploadDate).descending().execute(&db).await.unwrap();
  assert_eq!(results.iter().map(|a| a.id).collect::<Vec<_>>(), vec![second.id, first.id]);
}

#[traced_test]
#[tokio::test]
async fn test_lists_survive_storage() {
  let db = Database::open_in_memory().await.unwrap();
  let mut article = new_article("Lists", "2024-01-01T00:00:00Z");
  article.authors = vec!["Smith, Ada".into(), "Zoë".into(), "\"Q\"".into()];
  article.keywords = vec![];

  let stored = Add::new(article.clone()).execute(&db).await.unwrap();
  let reread = Query::by_id(stored.id).execute(&db).await.unwrap().remove(0);
  assert_eq!(reread.authors, article.authors);
  assert!(reread.keywords.is_empty());
}
