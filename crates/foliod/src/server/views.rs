//! HTML rendering.
//!
//! Pages are plain strings assembled with `format!`. Every value that comes
//! from a user, the database or the filesystem goes through [`html_escape`]
//! before it is written out, and every path placed in a URL goes through
//! [`path_href`].

use axum::http::StatusCode;
use folio::{
  article::categories,
  publications::{Issue, Publication},
};
use url::Url;

use super::{flash::FlashMessage, *};

/// Longest abstract shown on a feed card before it is cut.
const ABSTRACT_PREVIEW_CHARS: usize = 180;

/// Base used to percent-encode path segments; only its path is kept.
const URL_BASE: &str = "http://folio.invalid/";

/// Escapes text for use in element content and quoted attributes.
pub fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#39;")
}

/// Builds `/<prefix>/<relative>` with every segment percent-encoded.
///
/// `relative` is split on `/`, so each of its segments is encoded on its own.
pub fn path_href(prefix: &str, relative: &str) -> String {
  Url::parse(URL_BASE)
    .map(|mut url| {
      if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().extend(prefix.split('/')).extend(relative.split('/'));
      }
      url.path().to_string()
    })
    .unwrap_or_else(|_| format!("/{prefix}/{relative}"))
}

/// Wraps page content in the shared layout.
pub fn layout(title: &str, flash: Option<&FlashMessage>, body: &str) -> String {
  let flash = flash
    .map(|f| {
      format!(
        "<div class=\"flash flash-{}\" role=\"status\">{}</div>\n",
        f.kind.as_str(),
        html_escape(&f.message)
      )
    })
    .unwrap_or_default();

  format!(
    "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
<title>{title} | Folio</title>
<link rel=\"stylesheet\" href=\"/static/style.css\">
</head>
<body>
<header class=\"site-header\">
<a class=\"brand\" href=\"/\">Folio</a>
<nav>
<a href=\"/\">Home</a>
<a href=\"/publications\">Publications</a>
<a href=\"/search\">Search</a>
<a href=\"/upload\">Submit</a>
</nav>
</header>
<main>
{flash}{body}</main>
<script src=\"/static/main.js\"></script>
</body>
</html>
",
    title = html_escape(title),
  )
}

/// Short card for feeds and search results.
pub fn article_card(article: &Article) -> String {
  let preview = match article.abstract_text.char_indices().nth(ABSTRACT_PREVIEW_CHARS) {
    Some((cut, _)) => format!("{}...", &article.abstract_text[..cut]),
    None => article.abstract_text.clone(),
  };

  format!(
    "<article class=\"article-card\">
<h3><a href=\"/article/{id}\">{title}</a></h3>
<div class=\"meta\"><span>{authors}</span><span>{category}</span><span>{date}</span></div>
<p class=\"abstract\">{preview}</p>
<a href=\"/article/{id}\" class=\"read-more\">Read more</a>
</article>
",
    id = article.id,
    title = html_escape(&article.title),
    authors = html_escape(&article.authors.join(", ")),
    category = html_escape(&article.category_label()),
    date = article.upload_date.format("%B %-d, %Y"),
    preview = html_escape(&preview),
  )
}

/// Cards for a list of articles, or `empty` when there are none.
fn article_list(articles: &[Article], empty: &str) -> String {
  if articles.is_empty() {
    return format!("<p class=\"empty\">{}</p>\n", html_escape(empty));
  }
  let mut html = String::new();
  for article in articles {
    html.push_str(&article_card(article));
  }
  html
}

/// Home page with the most recent uploads.
pub fn index(articles: &[Article], flash: Option<&FlashMessage>) -> String {
  let body = format!(
    "<section class=\"hero\">
<h1>Recent articles</h1>
<p>The latest submissions to the archive.</p>
</section>
<section id=\"recent\">
{}</section>
",
    article_list(articles, "No articles have been uploaded yet.")
  );
  layout("Home", flash, &body)
}

/// Full record of one article.
pub fn article_detail(article: &Article, flash: Option<&FlashMessage>) -> String {
  let mut keywords = String::new();
  for keyword in article.keywords.iter().filter(|k| !k.is_empty()) {
    keywords.push_str(&format!("<li class=\"keyword\">{}</li>", html_escape(keyword)));
  }

  let body = format!(
    "<article class=\"article-detail\">
<h1>{title}</h1>
<p class=\"authors\">{authors}</p>
<dl class=\"meta\">
<dt>Category</dt><dd>{category}</dd>
<dt>Uploaded</dt><dd>{date}</dd>
<dt>Views</dt><dd id=\"views\">{views}</dd>
<dt>Citations</dt><dd>{citations}</dd>
</dl>
<h2>Abstract</h2>
<p class=\"abstract\">{abstract_text}</p>
<ul class=\"keywords\">{keywords}</ul>
<p><a class=\"button\" href=\"{pdf}\">Read the PDF</a></p>
</article>
",
    title = html_escape(&article.title),
    authors = html_escape(&article.authors.join(", ")),
    category = html_escape(&article.category_label()),
    date = article.upload_date.format("%B %-d, %Y"),
    views = article.views,
    citations = article.citations,
    abstract_text = html_escape(&article.abstract_text),
    pdf = html_escape(&path_href("uploads", article.pdf_filename())),
  );
  layout(&article.title, flash, &body)
}

/// `<option>` elements for the category select, `selected` pre-chosen.
fn category_options(selected: Option<&str>, placeholder: &str) -> String {
  let mut html = format!("<option value=\"\">{}</option>", html_escape(placeholder));
  for (slug, label) in categories() {
    let attr = if selected == Some(slug) { " selected" } else { "" };
    html.push_str(&format!("<option value=\"{slug}\"{attr}>{}</option>", html_escape(&label)));
  }
  html
}

/// Article submission form.
pub fn upload_form(flash: Option<&FlashMessage>) -> String {
  let body = format!(
    "<h1>Submit an article</h1>
<form class=\"upload-form\" action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">
<label>Title <input type=\"text\" name=\"title\" maxlength=\"{max_title}\" required></label>
<label>Authors <input type=\"text\" name=\"authors\" placeholder=\"Ada Smith, Ben Jones\" required></label>
<label>Abstract <textarea name=\"abstract\" rows=\"6\" required></textarea></label>
<label>Keywords <input type=\"text\" name=\"keywords\" placeholder=\"manuscripts, marginalia\"></label>
<label>Category <select name=\"category\" required>{options}</select></label>
<label>PDF <input type=\"file\" name=\"pdf\" accept=\".pdf,application/pdf\" required></label>
<button type=\"submit\">Upload</button>
</form>
",
    max_title = folio::article::MAX_TITLE_LEN,
    options = category_options(None, "Choose a category"),
  );
  layout("Submit", flash, &body)
}

/// Search page. Without a filter it is an empty form that the script fills
/// in from `/api/search`; with one, results are rendered directly.
pub fn search(
  filter: &SearchFilter,
  results: Option<&[Article]>,
  flash: Option<&FlashMessage>,
) -> String {
  let results = match results {
    Some(articles) => article_list(articles, "No articles found matching your search criteria."),
    None => String::new(),
  };

  let body = format!(
    "<h1>Search</h1>
<form id=\"searchForm\" class=\"search-form\" action=\"/search\" method=\"get\">
<input id=\"searchQuery\" type=\"search\" name=\"q\" value=\"{query}\" placeholder=\"Title, abstract or author\">
<select id=\"categoryFilter\" name=\"category\">{options}</select>
<button type=\"submit\">Search</button>
</form>
<section id=\"searchResults\">
{results}</section>
",
    query = html_escape(filter.text().unwrap_or_default()),
    options = category_options(filter.category(), "All categories"),
  );
  layout("Search", flash, &body)
}

/// Issues with links to their articles.
pub fn publications(issues: &[Issue], flash: Option<&FlashMessage>) -> String {
  let mut list = String::new();
  if issues.is_empty() {
    list.push_str("<p class=\"empty\">No issues have been published yet.</p>\n");
  }
  for issue in issues {
    list.push_str(&format!(
      "<section class=\"issue\">\n<h2>{}</h2>\n<ul>\n",
      html_escape(&issue.name)
    ));
    for article in &issue.articles {
      let relative = format!("{}/{}", issue.name, article);
      let title = article.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(article);
      list.push_str(&format!(
        "<li><a href=\"{}\">{}</a></li>\n",
        html_escape(&path_href("publications/view", &relative)),
        html_escape(title)
      ));
    }
    list.push_str("</ul>\n</section>\n");
  }

  layout("Publications", flash, &format!("<h1>Publications</h1>\n{list}"))
}

/// In-browser viewer for one publication. Selection and the context menu are
/// disabled around the embedded document.
pub fn viewer(publication: &Publication, flash: Option<&FlashMessage>) -> String {
  let body = format!(
    "<nav class=\"breadcrumb\"><a href=\"/publications\">Publications</a> / {issue}</nav>
<h1>{title}</h1>
<div class=\"viewer\" oncontextmenu=\"return false;\">
<iframe src=\"{src}#toolbar=0&amp;navpanes=0\" title=\"{title}\"></iframe>
</div>
",
    issue = html_escape(&publication.issue),
    title = html_escape(&publication.title),
    src = html_escape(&path_href("publications/pdf", &publication.path)),
  );
  layout(&publication.title, flash, &body)
}

/// Page shown for failed HTML requests.
pub fn error_page(status: StatusCode, message: &str) -> String {
  let heading = status.canonical_reason().unwrap_or("Error");
  let body = format!(
    "<section class=\"error\">
<h1>{code} {heading}</h1>
<p>{message}</p>
<p><a href=\"/\">Back to the archive</a></p>
</section>
",
    code = status.as_u16(),
    message = html_escape(message),
  );
  layout(heading, None, &body)
}
