//! Error type for `daybook-notion`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("invalid header value: {0}")]
  Header(#[from] reqwest::header::InvalidHeaderValue),

  /// A non-success response, decoded from Notion's error object when
  /// possible.
  #[error("notion api error {status} ({code}): {message}")]
  Api {
    status:  u16,
    code:    String,
    message: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
