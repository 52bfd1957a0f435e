//! HTTP gateway for daybook.
//!
//! Exposes the inbound write endpoint as an axum [`Router`] backed by any
//! [`JournalStore`]. Every request is answered `200 text/plain` with either a
//! confirmation or the reason nothing was written.

use std::sync::Arc;

use axum::{
  Router,
  body::Bytes,
  extract::State,
  http::StatusCode,
  routing::post,
};
use chrono_tz::Tz;
use daybook_core::{
  date::DEFAULT_TIMEZONE,
  request::WriteRequest,
  store::JournalStore,
  writer::ContentWriter,
};
use daybook_notion::NotionConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::error;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `DAYBOOK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:     String,
  #[serde(default = "default_port")]
  pub port:     u16,
  /// Zone in which "today" is reckoned.
  #[serde(default = "default_timezone")]
  pub timezone: Tz,
  /// Notion backend. Absent means an in-memory journal.
  #[serde(default)]
  pub notion:   Option<NotionConfig>,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_timezone() -> Tz { DEFAULT_TIMEZONE }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:     default_host(),
      port:     default_port(),
      timezone: default_timezone(),
      notion:   None,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the handlers.
pub struct AppState<S> {
  pub writer: Arc<ContentWriter<S>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self { Self { writer: Arc::clone(&self.writer) } }
}

impl<S: JournalStore> AppState<S> {
  pub fn new(store: Arc<S>, timezone: Tz) -> Self {
    Self { writer: Arc::new(ContentWriter::new(store).with_timezone(timezone)) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] serving the write endpoint at `/` and
/// `/write-to-entry`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: JournalStore + 'static,
{
  Router::new()
    .route("/",               post(write_to_entry::<S>))
    .route("/write-to-entry", post(write_to_entry::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `POST /write-to-entry`: body is a content or property [`WriteRequest`].
///
/// Failures are reported in the body, never through the status code.
async fn write_to_entry<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> (StatusCode, String)
where
  S: JournalStore + 'static,
{
  let request = match WriteRequest::from_slice(&body) {
    Ok(request) => request,
    Err(e) => {
      error!(error = %e, "rejected write request");
      return (StatusCode::OK, e.to_string());
    }
  };

  match state.writer.handle(request).await {
    Ok(confirmation) => (StatusCode::OK, confirmation.to_string()),
    Err(e) => (StatusCode::OK, e.to_string()),
  }
}
