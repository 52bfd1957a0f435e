//! Error types for `daybook-core`.

use chrono::NaiveDate;
use thiserror::Error;

/// A boxed backend error, as produced by a [`crate::store::JournalStore`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// The request's `contentOrProperty` discriminant was missing or unknown.
  #[error("no page location specified")]
  Unroutable,

  #[error("invalid request: {0}")]
  InvalidRequest(#[source] serde_json::Error),

  /// The body could not be decoded into content lines.
  #[error("malformed body: {0}")]
  MalformedBody(String),

  #[error("unsupported block type: {0:?}")]
  UnsupportedBlockKind(String),

  #[error("unsupported property type: {0:?}")]
  UnsupportedPropertyType(String),

  #[error("property value {0:?} is not a finite number")]
  InvalidNumber(String),

  #[error("failed to locate page for {date}: {source}")]
  Locator {
    date:   NaiveDate,
    #[source]
    source: BoxError,
  },

  #[error("failed to write to page {page_id}: {source}")]
  Write {
    page_id: String,
    #[source]
    source:  BoxError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
