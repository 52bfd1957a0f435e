//! Content lines: the rows of body content carried by an append request.
//!
//! Callers send each line either as a bare string or as an object with a
//! `content` field and an optional `link`. Some callers (phone shortcuts in
//! particular) cannot build JSON arrays, so the whole body may also arrive as
//! a single string holding a serialised array. [`Body::decode`] is the one
//! place that stringified form is unpacked.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Link ────────────────────────────────────────────────────────────────────

/// The only link type the journal understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
  #[default]
  Url,
}

/// A hyperlink attached to a content line, `{"type": "url", "url": "..."}`.
///
/// `type` may be omitted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
  #[serde(rename = "type", default)]
  pub kind: LinkType,
  pub url:  String,
}

impl Link {
  pub fn new(url: impl Into<String>) -> Self {
    Self { kind: LinkType::Url, url: url.into() }
  }
}

// ─── ContentLine ─────────────────────────────────────────────────────────────

/// One row of body content, before it is turned into a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentLine {
  /// A bare string.
  Plain(String),
  /// Text with an optional link.
  Rich {
    #[serde(alias = "text")]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link:    Option<Link>,
  },
}

impl ContentLine {
  pub fn plain(text: impl Into<String>) -> Self { Self::Plain(text.into()) }

  pub fn linked(text: impl Into<String>, url: impl Into<String>) -> Self {
    Self::Rich {
      content: text.into(),
      link:    Some(Link::new(url)),
    }
  }

  pub fn text(&self) -> &str {
    match self {
      Self::Plain(text) => text,
      Self::Rich { content, .. } => content,
    }
  }

  pub fn link(&self) -> Option<&Link> {
    match self {
      Self::Plain(_) => None,
      Self::Rich { link, .. } => link.as_ref(),
    }
  }
}

// ─── Body ────────────────────────────────────────────────────────────────────

/// The body of an append request as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
  Lines(Vec<ContentLine>),
  /// A JSON array serialised into a string.
  Serialized(String),
}

impl Default for Body {
  fn default() -> Self { Self::Lines(Vec::new()) }
}

impl From<Vec<ContentLine>> for Body {
  fn from(lines: Vec<ContentLine>) -> Self { Self::Lines(lines) }
}

impl Body {
  /// Resolve the body into its structured form.
  ///
  /// Fails with [`Error::MalformedBody`] if a serialised body is not a JSON
  /// array of content lines.
  pub fn decode(self) -> Result<Vec<ContentLine>> {
    match self {
      Self::Lines(lines) => Ok(lines),
      Self::Serialized(raw) => serde_json::from_str(&raw)
        .map_err(|e| Error::MalformedBody(e.to_string())),
    }
  }
}

// ─── ArticleRecord ───────────────────────────────────────────────────────────

/// A headline returned by the news fetchers. Lives for one run only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
  pub title: String,
  pub url:   String,
}

impl From<ArticleRecord> for ContentLine {
  fn from(article: ArticleRecord) -> Self {
    ContentLine::linked(article.title, article.url)
  }
}
