//! One-shot messages carried across a redirect.
//!
//! A flash lives in the `folio_flash` cookie as a form-encoded
//! `kind=...&message=...` pair. It is set together with a redirect, shown by
//! whichever HTML page is rendered next and cleared by that same response.

use axum::{
  extract::FromRequestParts,
  http::{header, request::Parts, HeaderMap},
  response::{Html, IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use super::*;

/// Name of the cookie holding the pending flash.
pub const FLASH_COOKIE: &str = "folio_flash";

/// Attributes shared by setting and clearing the cookie.
const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

/// Tone of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
  /// The action went through
  Success,
  /// The action was refused
  Error,
}

impl FlashKind {
  /// Value stored in the cookie and used as a CSS class.
  pub fn as_str(&self) -> &'static str {
    match self {
      FlashKind::Success => "success",
      FlashKind::Error => "error",
    }
  }

  /// Parses a stored kind; anything unknown is shown as an error.
  fn parse(value: &str) -> Self {
    match value {
      "success" => FlashKind::Success,
      _ => FlashKind::Error,
    }
  }
}

/// A flash message read from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
  /// Tone, used for styling
  pub kind:    FlashKind,
  /// Text shown to the user
  pub message: String,
}

/// Extractor for the pending flash, if any.
///
/// Pages render through [`Flash::render`], which clears the cookie once the
/// message has been shown.
#[derive(Debug, Default)]
pub struct Flash(Option<FlashMessage>);

impl Flash {
  /// Reads the flash cookie out of request headers.
  pub fn from_headers(headers: &HeaderMap) -> Self {
    let value = headers
      .get_all(header::COOKIE)
      .iter()
      .filter_map(|value| value.to_str().ok())
      .flat_map(|cookies| cookies.split(';'))
      .filter_map(|cookie| cookie.trim().split_once('='))
      .find(|(name, _)| *name == FLASH_COOKIE)
      .map(|(_, value)| value);

    Flash(value.and_then(decode))
  }

  /// The pending message.
  pub fn message(&self) -> Option<&FlashMessage> { self.0.as_ref() }

  /// Wraps a rendered page, clearing the cookie if a message was pending.
  pub fn render(self, html: String) -> Response {
    match self.0 {
      Some(_) => ([(header::SET_COOKIE, clear_cookie())], Html(html)).into_response(),
      None => Html(html).into_response(),
    }
  }
}

impl<S: Send + Sync> FromRequestParts<S> for Flash {
  type Rejection = std::convert::Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> std::result::Result<Self, Self::Rejection> {
    Ok(Flash::from_headers(&parts.headers))
  }
}

/// Redirects to `to` with a flash for the next page.
pub fn redirect(to: &str, kind: FlashKind, message: &str) -> Response {
  let value = form_urlencoded::Serializer::new(String::new())
    .append_pair("kind", kind.as_str())
    .append_pair("message", message)
    .finish();
  let cookie = format!("{FLASH_COOKIE}={value}; {COOKIE_ATTRIBUTES}");
  ([(header::SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}

/// Header value expiring the flash cookie.
fn clear_cookie() -> String { format!("{FLASH_COOKIE}=; Max-Age=0; {COOKIE_ATTRIBUTES}") }

/// Decodes a cookie value; a value without a message is ignored.
fn decode(value: &str) -> Option<FlashMessage> {
  let mut kind = FlashKind::Error;
  let mut message = None;
  for (key, val) in form_urlencoded::parse(value.as_bytes()) {
    match key.as_ref() {
      "kind" => kind = FlashKind::parse(&val),
      "message" => message = Some(val.into_owned()),
      _ => {},
    }
  }
  message.filter(|m| !m.is_empty()).map(|message| FlashMessage { kind, message })
}
