//! NewsAPI client.
//!
//! Each [`ArticleQuery`] becomes one `GET {base}/{endpoint}` request. The
//! `from` date defaults to yesterday in the client's time zone, computed when
//! the query is sent.

use std::{num::NonZeroU32, time::Duration};

use chrono::NaiveDate;
use chrono_tz::Tz;
use daybook_core::{content::ArticleRecord, date::yesterday_in};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

// ─── Query ───────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Endpoint {
  TopHeadlines,
  #[default]
  Everything,
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortBy {
  #[default]
  Popularity,
  Relevancy,
  PublishedAt,
}

/// One NewsAPI search. Unset fields take NewsAPI digest defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleQuery {
  /// Search terms; omitted from the request when `None`.
  #[serde(default)]
  pub q:         Option<String>,
  #[serde(default)]
  pub endpoint:  Endpoint,
  #[serde(default = "default_language")]
  pub language:  String,
  #[serde(default)]
  pub sort_by:   SortBy,
  #[serde(default = "default_page_size")]
  pub page_size: NonZeroU32,
  /// Earliest publication date; yesterday when `None`.
  #[serde(default)]
  pub from:      Option<NaiveDate>,
}

const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(5).unwrap();

fn default_language() -> String { "en".to_owned() }
fn default_page_size() -> NonZeroU32 { DEFAULT_PAGE_SIZE }

impl Default for ArticleQuery {
  fn default() -> Self {
    Self {
      q:         None,
      endpoint:  Endpoint::default(),
      language:  default_language(),
      sort_by:   SortBy::default(),
      page_size: default_page_size(),
      from:      None,
    }
  }
}

impl ArticleQuery {
  pub fn search(q: impl Into<String>) -> Self {
    Self { q: Some(q.into()), ..Self::default() }
  }

  pub fn top_headlines() -> Self {
    Self { endpoint: Endpoint::TopHeadlines, ..Self::default() }
  }

  /// Zero is raised to one.
  pub fn page_size(mut self, page_size: u32) -> Self {
    self.page_size = NonZeroU32::new(page_size).unwrap_or(NonZeroU32::MIN);
    self
  }

  pub fn from_date(mut self, from: NaiveDate) -> Self {
    self.from = Some(from);
    self
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawArticles {
  #[serde(default)]
  articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
  title: Option<String>,
  url:   Option<String>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for NewsAPI.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct NewsClient {
  client:   Client,
  api_key:  String,
  base_url: String,
  timezone: Tz,
}

impl NewsClient {
  pub fn new(api_key: impl Into<String>, timezone: Tz) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      client,
      api_key: api_key.into(),
      base_url: DEFAULT_BASE_URL.to_owned(),
      timezone,
    })
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  fn url(&self, endpoint: Endpoint) -> String {
    format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
  }

  fn params(&self, query: &ArticleQuery) -> Vec<(&'static str, String)> {
    let from = query.from.unwrap_or_else(|| yesterday_in(self.timezone));
    let mut params = Vec::with_capacity(6);
    if let Some(q) = &query.q {
      params.push(("q", q.clone()));
    }
    params.push(("from", from.format("%Y-%m-%d").to_string()));
    params.push(("pageSize", query.page_size.to_string()));
    params.push(("sortBy", query.sort_by.to_string()));
    params.push(("language", query.language.clone()));
    params.push(("apiKey", self.api_key.clone()));
    params
  }

  /// `GET /{endpoint}?q=..&from=..&pageSize=..&sortBy=..&language=..&apiKey=..`
  ///
  /// Articles missing a title or url are dropped.
  pub async fn fetch_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>> {
    let resp = self
      .client
      .get(self.url(query.endpoint))
      .query(&self.params(query))
      .send()
      .await
      .map_err(|e| fetch_error(None, e))?;

    let status = resp.status();
    if status.as_u16() != 200 {
      return Err(Error::Fetch {
        status: Some(status.as_u16()),
        reason: status.canonical_reason().unwrap_or("unknown status").to_owned(),
      });
    }

    let raw: RawArticles = resp
      .json()
      .await
      .map_err(|e| fetch_error(Some(status.as_u16()), e))?;
    let total = raw.articles.len();
    let articles: Vec<_> = raw
      .articles
      .into_iter()
      .filter_map(|a| Some(ArticleRecord { title: a.title?, url: a.url? }))
      .collect();

    debug!(
      q = query.q.as_deref().unwrap_or("-"),
      endpoint = %query.endpoint,
      kept = articles.len(),
      dropped = total - articles.len(),
      "fetched articles"
    );
    Ok(articles)
  }
}

/// The request url carries the api key, so it is stripped before the error
/// can reach a log line.
fn fetch_error(status: Option<u16>, e: reqwest::Error) -> Error {
  Error::Fetch { status, reason: e.without_url().to_string() }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param, query_param_is_missing},
  };

  use super::*;

  async fn setup() -> (MockServer, NewsClient) {
    let server = MockServer::start().await;
    let client = NewsClient::new("news-key", chrono_tz::America::New_York)
      .unwrap()
      .with_base_url(server.uri());
    (server, client)
  }

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, 6).unwrap() }

  #[tokio::test]
  async fn search_sends_all_parameters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
      .and(path("/everything"))
      .and(query_param("q", "crypto"))
      .and(query_param("from", "2024-03-06"))
      .and(query_param("pageSize", "5"))
      .and(query_param("sortBy", "popularity"))
      .and(query_param("language", "en"))
      .and(query_param("apiKey", "news-key"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "status": "ok",
        "articles": [
          { "title": "Bitcoin up", "url": "https://n.example/1" },
          { "title": "Ether down", "url": "https://n.example/2" }
        ]
      })))
      .expect(1)
      .mount(&server)
      .await;

    let articles = client
      .fetch_articles(&ArticleQuery::search("crypto").from_date(day()))
      .await
      .unwrap();

    assert_eq!(articles, vec![
      ArticleRecord { title: "Bitcoin up".into(), url: "https://n.example/1".into() },
      ArticleRecord { title: "Ether down".into(), url: "https://n.example/2".into() },
    ]);
  }

  #[tokio::test]
  async fn top_headlines_omits_q() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
      .and(path("/top-headlines"))
      .and(query_param_is_missing("q"))
      .and(query_param("pageSize", "4"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "articles": [] })))
      .expect(1)
      .mount(&server)
      .await;

    let articles = client
      .fetch_articles(&ArticleQuery::top_headlines().page_size(4))
      .await
      .unwrap();
    assert!(articles.is_empty());
  }

  #[tokio::test]
  async fn from_defaults_to_yesterday() {
    let (server, client) = setup().await;
    let yesterday = yesterday_in(chrono_tz::America::New_York);

    Mock::given(method("GET"))
      .and(path("/everything"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "articles": [] })))
      .mount(&server)
      .await;

    client.fetch_articles(&ArticleQuery::search("x")).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let from = requests[0]
      .url
      .query_pairs()
      .find(|(k, _)| k == "from")
      .map(|(_, v)| v.into_owned())
      .unwrap();
    // Allow for the test crossing midnight in New York.
    let from: NaiveDate = from.parse().unwrap();
    assert!(from == yesterday || from.succ_opt() == Some(yesterday));
  }

  #[tokio::test]
  async fn articles_without_title_or_url_are_dropped() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "articles": [
          { "title": null, "url": "https://n.example/1" },
          { "title": "Kept", "url": "https://n.example/2" },
          { "title": "No link", "url": null }
        ]
      })))
      .mount(&server)
      .await;

    let articles = client.fetch_articles(&ArticleQuery::search("x")).await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "Kept");
  }

  #[tokio::test]
  async fn non_200_is_a_fetch_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(401).set_body_json(json!({
        "status": "error",
        "code": "apiKeyInvalid",
        "message": "Your API key is invalid."
      })))
      .mount(&server)
      .await;

    let err = client.fetch_articles(&ArticleQuery::search("x")).await.unwrap_err();
    assert!(matches!(err, Error::Fetch { status: Some(401), .. }));
    assert_eq!(err.to_string(), "failed to fetch articles: Unauthorized");
  }

  #[tokio::test]
  async fn unreachable_service_is_a_fetch_error_without_the_key() {
    let client = NewsClient::new("secret-news-key", chrono_tz::America::New_York)
      .unwrap()
      .with_base_url("http://127.0.0.1:1");

    let err = client.fetch_articles(&ArticleQuery::search("x")).await.unwrap_err();

    assert!(matches!(err, Error::Fetch { status: None, .. }), "{err:?}");
    assert!(!err.to_string().contains("secret-news-key"), "{err}");
    assert!(!format!("{err:?}").contains("secret-news-key"));
  }

  #[tokio::test]
  async fn undecodable_body_is_a_fetch_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
      .mount(&server)
      .await;

    let err = client.fetch_articles(&ArticleQuery::search("x")).await.unwrap_err();
    assert!(matches!(err, Error::Fetch { status: Some(200), .. }), "{err:?}");
    assert!(!err.to_string().contains("news-key"), "{err}");
  }

  #[test]
  fn zero_page_size_is_rejected() {
    let err = toml::from_str::<ArticleQuery>("page_size = 0");
    assert!(err.is_err());
    assert_eq!(ArticleQuery::search("x").page_size(0).page_size.get(), 1);
  }

  #[test]
  fn query_defaults_from_toml() {
    let query: ArticleQuery = toml::from_str(r#"
      q = "sports"
      page_size = 3
    "#)
    .unwrap();
    assert_eq!(query.endpoint, Endpoint::Everything);
    assert_eq!(query.language, "en");
    assert_eq!(query.sort_by, SortBy::Popularity);
    assert_eq!(query.page_size.get(), 3);

    let top: ArticleQuery = toml::from_str(r#"endpoint = "top-headlines""#).unwrap();
    assert_eq!(top.q, None);
    assert_eq!(top.endpoint, Endpoint::TopHeadlines);
  }
}
