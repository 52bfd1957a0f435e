//! The news digest: titled sections of headlines appended to today's page.
//!
//! A section's queries run in order and their articles are concatenated.
//! Sections run one after another; the first failure stops the run, so
//! sections already delivered stay delivered.

use daybook_core::{
  block::BlockKind,
  content::ContentLine,
  request::{AppendRequest, WriteRequest},
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
  Result,
  client::Delivery,
  news::{ArticleQuery, NewsClient},
};

/// One titled group of articles in the digest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
  pub title:   String,
  #[serde(default = "default_kind")]
  pub kind:    BlockKind,
  pub queries: Vec<ArticleQuery>,
}

fn default_kind() -> BlockKind { BlockKind::BulletedListItem }

impl Section {
  pub fn new(title: impl Into<String>, queries: Vec<ArticleQuery>) -> Self {
    Self { title: title.into(), kind: default_kind(), queries }
  }
}

/// "Top Headlines" (general, sports, technology) and "Crypto Articles".
pub fn default_sections() -> Vec<Section> {
  vec![
    Section::new("Top Headlines", vec![
      ArticleQuery::top_headlines().page_size(4),
      ArticleQuery::search("sports").page_size(3),
      ArticleQuery::search("technology").page_size(3),
    ]),
    Section::new("Crypto Articles", vec![ArticleQuery::search("crypto")]),
  ]
}

/// Run a section's queries and wrap the articles in an append request.
pub async fn build_section(news: &NewsClient, section: &Section) -> Result<AppendRequest> {
  let mut lines = Vec::new();
  for query in &section.queries {
    let articles = news.fetch_articles(query).await?;
    lines.extend(articles.into_iter().map(ContentLine::from));
  }
  debug!(section = %section.title, articles = lines.len(), "built digest section");
  Ok(AppendRequest::new(section.title.clone(), section.kind, lines, true))
}

/// Build and deliver every section in order.
pub async fn run(news: &NewsClient, delivery: &Delivery, sections: &[Section]) -> Result<()> {
  for section in sections {
    let request = build_section(news, section).await?;
    delivery.deliver(&WriteRequest::from(request)).await?;
    info!(section = %section.title, "digest section delivered");
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
  };

  use super::*;
  use crate::{Error, client::GatewayClient};

  fn articles(prefix: &str, n: usize) -> Value {
    let list: Vec<_> = (1..=n)
      .map(|i| json!({ "title": format!("{prefix} {i}"), "url": format!("https://n.example/{prefix}/{i}") }))
      .collect();
    json!({ "status": "ok", "articles": list })
  }

  async fn mount_news(server: &MockServer) {
    Mock::given(method("GET"))
      .and(path("/top-headlines"))
      .respond_with(ResponseTemplate::new(200).set_body_json(articles("top", 4)))
      .mount(server)
      .await;
    for (q, n) in [("sports", 3), ("technology", 3), ("crypto", 5)] {
      Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", q))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(q, n)))
        .mount(server)
        .await;
    }
  }

  fn news(server: &MockServer) -> NewsClient {
    NewsClient::new("k", chrono_tz::America::New_York)
      .unwrap()
      .with_base_url(server.uri())
  }

  #[test]
  fn default_digest_shape() {
    let sections = default_sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Top Headlines");
    let sizes: Vec<_> = sections[0].queries.iter().map(|q| q.page_size.get()).collect();
    assert_eq!(sizes, [4, 3, 3]);
    assert_eq!(sections[0].queries[0].q, None);
    assert_eq!(sections[1].queries, vec![ArticleQuery::search("crypto")]);
  }

  #[tokio::test]
  async fn top_headlines_concatenates_in_query_order() {
    let server = MockServer::start().await;
    mount_news(&server).await;

    let request = build_section(&news(&server), &default_sections()[0]).await.unwrap();

    assert_eq!(request.title, "Top Headlines");
    assert_eq!(request.kind, BlockKind::BulletedListItem);
    assert!(request.divider);
    let lines = request.body.clone().decode().unwrap();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0].text(), "top 1");
    assert_eq!(lines[4].text(), "sports 1");
    assert_eq!(lines[7].text(), "technology 1");
    assert_eq!(lines[9].link().unwrap().url, "https://n.example/technology/3");
    // Heading + ten items + spacer + divider.
    assert_eq!(request.to_blocks().unwrap().len(), 13);
  }

  #[tokio::test]
  async fn run_posts_each_section_in_order() {
    let news_server = MockServer::start().await;
    mount_news(&news_server).await;
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_string("Success! Top Headlines added to page 2024-03-07 (page id: p-1)."),
      )
      .expect(2)
      .mount(&gateway)
      .await;

    let delivery = Delivery::Post(GatewayClient::new(gateway.uri()).unwrap());
    run(&news(&news_server), &delivery, &default_sections()).await.unwrap();

    let posted: Vec<Value> = gateway
      .received_requests()
      .await
      .unwrap()
      .iter()
      .map(|r| serde_json::from_slice(&r.body).unwrap())
      .collect();
    assert_eq!(posted[0]["title"], "Top Headlines");
    assert_eq!(posted[0]["contentOrProperty"], "content");
    assert_eq!(posted[0]["divider"], true);
    assert_eq!(posted[1]["title"], "Crypto Articles");
    assert_eq!(posted[1]["body"].as_array().unwrap().len(), 5);
  }

  #[tokio::test]
  async fn fetch_failure_aborts_before_posting() {
    let news_server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&news_server)
      .await;
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&gateway)
      .await;

    let delivery = Delivery::Post(GatewayClient::new(gateway.uri()).unwrap());
    let err = run(&news(&news_server), &delivery, &default_sections())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Fetch { status: Some(500), .. }));
  }

  #[tokio::test]
  async fn rejected_section_aborts_the_run() {
    let news_server = MockServer::start().await;
    mount_news(&news_server).await;
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_string("failed to write to page p: notion api error 502"),
      )
      .expect(1)
      .mount(&gateway)
      .await;

    let delivery = Delivery::Post(GatewayClient::new(gateway.uri()).unwrap());
    let err = run(&news(&news_server), &delivery, &default_sections())
      .await
      .unwrap_err();
    assert!(
      matches!(err, Error::Rejected { ref body } if body.contains("notion api error 502")),
      "{err:?}"
    );
  }

  #[test]
  fn sections_from_toml() {
    #[derive(Deserialize)]
    struct File {
      sections: Vec<Section>,
    }

    let file: File = toml::from_str(r#"
      [[sections]]
      title = "Science"

      [[sections.queries]]
      q = "science"
      page_size = 2
    "#)
    .unwrap();
    assert_eq!(file.sections, vec![Section::new("Science", vec![
      ArticleQuery::search("science").page_size(2),
    ])]);
  }
}
