//! Delivery of write requests to the gateway.

use std::time::Duration;

use daybook_core::{request::WriteRequest, writer::Confirmation};
use reqwest::Client;
use tracing::info;

use crate::{Error, Result};

/// Async client for the gateway's write endpoint.
#[derive(Clone)]
pub struct GatewayClient {
  client:   Client,
  endpoint: String,
}

impl GatewayClient {
  pub fn new(endpoint: impl Into<String>) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, endpoint: endpoint.into() })
  }

  /// `POST {endpoint}` with `request` as JSON; returns the confirmation text.
  ///
  /// The gateway answers rejected writes with `200` and the reason in the
  /// body, so any reply that is not a confirmation is [`Error::Rejected`].
  pub async fn send(&self, request: &WriteRequest) -> Result<String> {
    let resp = self.client.post(&self.endpoint).json(request).send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
      return Err(Error::Gateway { status: status.as_u16(), body });
    }
    if !Confirmation::is_confirmation(&body) {
      return Err(Error::Rejected { body });
    }
    Ok(body)
  }
}

/// Where a job's requests go.
pub enum Delivery {
  Post(GatewayClient),
  /// Print each request as JSON instead of sending it.
  DryRun,
}

impl Delivery {
  pub async fn deliver(&self, request: &WriteRequest) -> Result<()> {
    match self {
      Self::Post(client) => {
        let reply = client.send(request).await?;
        info!(reply = %reply, "delivered");
      }
      Self::DryRun => {
        println!("{}", serde_json::to_string_pretty(request)?);
      }
    }
    Ok(())
  }
}
