//! Error type for `daybook-feeds`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The news service could not be reached, answered with something other
  /// than `200`, or sent a body that is not an article list. `status` is
  /// `None` when no response was received.
  #[error("failed to fetch articles: {reason}")]
  Fetch { status: Option<u16>, reason: String },

  /// The write endpoint answered with a non-success status.
  #[error("write endpoint returned {status}: {body}")]
  Gateway { status: u16, body: String },

  /// The write endpoint answered `200` but wrote nothing; `body` is its
  /// explanation.
  #[error("write rejected: {body}")]
  Rejected { body: String },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("config error: {0}")]
  Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
