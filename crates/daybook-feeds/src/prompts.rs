//! Delivery of the journaling prompts for a date.

use chrono::NaiveDate;
use daybook_core::{prompts::select_prompts, request::WriteRequest};
use tracing::info;

use crate::{Result, client::Delivery};

/// Deliver the prompts for `date` in order, each after the previous one has
/// been acknowledged.
pub async fn run(delivery: &Delivery, date: NaiveDate) -> Result<usize> {
  let prompts = select_prompts(date);
  let count = prompts.len();
  for prompt in prompts {
    let title = prompt.title.clone();
    delivery.deliver(&WriteRequest::from(prompt)).await?;
    info!(%date, prompt = %title, "prompt delivered");
  }
  Ok(count)
}
