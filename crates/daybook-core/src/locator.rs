//! Page locator: find the journal page for a date, creating it on a miss.

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::{Error, Result, page::PageRef, store::JournalStore};

/// Resolve the page for `date`.
///
/// Returns the first page the database lists for that date, or creates one
/// if there is none. Called afresh for every request; the result is never
/// cached.
pub async fn resolve_page<S>(store: &S, date: NaiveDate) -> Result<PageRef>
where
  S: JournalStore,
{
  let pages = store
    .find_pages(date)
    .await
    .map_err(|e| locator_error(date, e))?;

  if let Some(page) = pages.into_iter().next() {
    debug!(%date, page_id = %page.id, "found journal page");
    return Ok(page);
  }

  info!(%date, "no journal page for date; creating one");
  let page = store
    .create_page(date)
    .await
    .map_err(|e| locator_error(date, e))?;
  info!(%date, page_id = %page.id, "journal page created");
  Ok(page)
}

fn locator_error<E>(date: NaiveDate, source: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  error!(%date, error = %source, "page lookup failed");
  Error::Locator { date, source: Box::new(source) }
}
