//! [`NotionStore`]: the Notion implementation of [`JournalStore`].

use std::{fmt, sync::Arc, time::Duration};

use chrono::NaiveDate;
use daybook_core::{
  block::Block,
  page::PageRef,
  request::PropertyUpdate,
  store::JournalStore,
};
use reqwest::{
  Client, RequestBuilder,
  header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
  Error, Result,
  encode::{
    RawApiError, RawObject, RawQueryResults, encode_children, encode_date_query,
    encode_new_page, encode_property_update,
  },
};

const NOTION_VERSION: HeaderName = HeaderName::from_static("notion-version");

// ─── Config ──────────────────────────────────────────────────────────────────

/// Connection settings for a Notion journal database.
#[derive(Clone, Deserialize)]
pub struct NotionConfig {
  /// Integration key, sent as a bearer token.
  pub api_key:        String,
  /// The database whose rows are journal pages.
  pub database_id:    String,
  /// Name of the date property pages are matched on.
  #[serde(default = "default_date_property")]
  pub date_property:  String,
  /// Name of the database's title property.
  #[serde(default = "default_title_property")]
  pub title_property: String,
  #[serde(default = "default_base_url")]
  pub base_url:       String,
  #[serde(default = "default_notion_version")]
  pub notion_version: String,
}

fn default_date_property() -> String { "Date".to_owned() }
fn default_title_property() -> String { "title".to_owned() }
fn default_base_url() -> String { "https://api.notion.com/v1".to_owned() }
fn default_notion_version() -> String { "2022-06-28".to_owned() }

impl NotionConfig {
  pub fn new(api_key: impl Into<String>, database_id: impl Into<String>) -> Self {
    Self {
      api_key:        api_key.into(),
      database_id:    database_id.into(),
      date_property:  default_date_property(),
      title_property: default_title_property(),
      base_url:       default_base_url(),
      notion_version: default_notion_version(),
    }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }
}

impl fmt::Debug for NotionConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NotionConfig")
      .field("api_key", &"<redacted>")
      .field("database_id", &self.database_id)
      .field("date_property", &self.date_property)
      .field("title_property", &self.title_property)
      .field("base_url", &self.base_url)
      .field("notion_version", &self.notion_version)
      .finish()
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A daybook journal kept as rows of a Notion database.
///
/// Cloning is cheap; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct NotionStore {
  client: Client,
  config: Arc<NotionConfig>,
}

impl NotionStore {
  pub fn new(config: NotionConfig) -> Result<Self> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, auth);
    headers.insert(NOTION_VERSION, HeaderValue::from_str(&config.notion_version)?);

    let client = Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config: Arc::new(config) })
  }

  pub fn config(&self) -> &NotionConfig { &self.config }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Send `req` and decode a success body as `T`.
  ///
  /// Non-success responses become [`Error::Api`], using Notion's error
  /// object when the body carries one.
  async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp.json().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<RawApiError>(&text) {
      Ok(raw) => (raw.code, raw.message),
      Err(_) => (
        status.canonical_reason().unwrap_or("unknown").to_owned(),
        text,
      ),
    };
    Err(Error::Api { status: status.as_u16(), code, message })
  }
}

impl JournalStore for NotionStore {
  type Error = Error;

  async fn find_pages(&self, date: NaiveDate) -> Result<Vec<PageRef>> {
    let path = format!("/databases/{}/query", self.config.database_id);
    let body = encode_date_query(&self.config.date_property, date);

    let raw: RawQueryResults =
      self.send(self.client.post(self.url(&path)).json(&body)).await?;

    debug!(%date, matches = raw.results.len(), "queried journal database");
    Ok(raw.results.into_iter().map(|o| PageRef { id: o.id, date }).collect())
  }

  async fn create_page(&self, date: NaiveDate) -> Result<PageRef> {
    let body = encode_new_page(
      &self.config.database_id,
      &self.config.title_property,
      &self.config.date_property,
      date,
    );

    let raw: RawObject = self.send(self.client.post(self.url("/pages")).json(&body)).await?;

    debug!(%date, page_id = %raw.id, "created journal page");
    Ok(PageRef { id: raw.id, date })
  }

  async fn append_blocks<'a>(
    &'a self,
    page_id: &'a str,
    blocks: Vec<Block>,
  ) -> Result<()> {
    let path = format!("/blocks/{page_id}/children");
    let body = encode_children(&blocks);

    let _: serde::de::IgnoredAny =
      self.send(self.client.patch(self.url(&path)).json(&body)).await?;

    debug!(page_id, count = blocks.len(), "appended blocks");
    Ok(())
  }

  async fn update_property<'a>(
    &'a self,
    page_id: &'a str,
    update: PropertyUpdate,
  ) -> Result<()> {
    let path = format!("/pages/{page_id}");
    let body = encode_property_update(&update);

    let _: serde::de::IgnoredAny =
      self.send(self.client.patch(self.url(&path)).json(&body)).await?;

    debug!(page_id, property = %update.name, "updated page property");
    Ok(())
  }
}
