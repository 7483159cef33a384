use super::*;

/// Uploads three articles with distinct authors and categories.
async fn seed(folio: &Folio) -> TestResult<Vec<Article>> {
  let mut articles = Vec::new();
  for (file, title, authors, abstract_text, category) in [
    ("a.pdf", "Smith's Letters", "Clara Oswald", "Correspondence.", "history"),
    ("b.pdf", "Greek Metre", "Ada Smith", "Scansion of verse.", "classics"),
    ("c.pdf", "On Forging", "Dan Brown", "The blacksmith as a figure of craft.", "history"),
    ("d.pdf", "Unrelated", "Eve Moneypenny", "Nothing to see.", "history"),
  ] {
    let mut submission = create_test_submission(file);
    submission.title = Some(title.into());
    submission.authors = Some(authors.into());
    submission.abstract_text = Some(abstract_text.into());
    submission.category = Some(category.into());
    articles.push(folio.upload(submission).await?);
  }
  Ok(articles)
}

fn titles(articles: &[Article]) -> Vec<&str> { articles.iter().map(|a| a.title.as_str()).collect() }

#[traced_test]
#[tokio::test]
async fn test_search_text_matches_title_abstract_or_authors() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  seed(&folio).await?;

  let hits = folio.search(SearchFilter::new().with_text("Smith")).await?;
  // Newest first; "blacksmith" does not contain "Smith" with a capital S
  assert_eq!(titles(&hits), vec!["Greek Metre", "Smith's Letters"]);
  assert!(hits.iter().all(|a| a.title.contains("Smith")
    || a.abstract_text.contains("Smith")
    || a.authors.iter().any(|name| name.contains("Smith"))));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_search_is_case_sensitive() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  seed(&folio).await?;

  let hits = folio.search(SearchFilter::new().with_text("smith")).await?;
  assert_eq!(titles(&hits), vec!["On Forging"]);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_search_text_and_category_intersect() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  seed(&folio).await?;

  let filter = SearchFilter::new().with_text("Smith").with_category("history");
  let hits = folio.search(filter).await?;
  assert_eq!(titles(&hits), vec!["Smith's Letters"]);

  let by_category = folio.search(SearchFilter::new().with_category("history")).await?;
  assert_eq!(titles(&by_category), vec!["Unrelated", "On Forging", "Smith's Letters"]);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_empty_filters_return_everything() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let seeded = seed(&folio).await?;

  let filter = SearchFilter::new().with_text("").with_category("");
  let hits = folio.search(filter).await?;
  assert_eq!(hits.len(), seeded.len());
  assert_eq!(hits, folio.articles().await?);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_search_does_not_count_views() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  seed(&folio).await?;

  folio.search(SearchFilter::new().with_text("Smith")).await?;
  assert!(folio.articles().await?.iter().all(|a| a.views == 0));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_recent_is_limited_and_newest_first() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  for i in 0..12 {
    let mut submission = create_test_submission(&format!("paper-{i}.pdf"));
    submission.title = Some(format!("Paper {i}"));
    folio.upload(submission).await?;
  }

  let recent = folio.recent().await?;
  assert_eq!(recent.len(), folio::RECENT_LIMIT);
  assert_eq!(recent[0].title, "Paper 11");
  assert_eq!(recent[9].title, "Paper 2");
  Ok(())
}
