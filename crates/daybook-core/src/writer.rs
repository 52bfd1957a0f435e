//! The content writer: daybook's single write path into the journal.
//!
//! Each call resolves today's page afresh, then performs exactly one
//! mutation: an append of blocks, or a property update. Validation happens
//! before the page is resolved, so a rejected request writes nothing.

use std::{fmt, sync::Arc};

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{error, info};

use crate::{
  Error, Result,
  date::{DEFAULT_TIMEZONE, today_in},
  locator::resolve_page,
  request::{AppendRequest, PropertyUpdateRequest, WriteRequest},
  store::JournalStore,
};

// ─── Confirmation ────────────────────────────────────────────────────────────

/// What a successful write did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
  Appended {
    title:   String,
    date:    NaiveDate,
    page_id: String,
    blocks:  usize,
  },
  PropertyUpdated {
    property: String,
    value:    String,
  },
}

impl Confirmation {
  /// Whether a reply text from the write endpoint reports a completed write.
  ///
  /// The endpoint answers every request with `200`, so callers tell success
  /// from failure by the text alone.
  pub fn is_confirmation(text: &str) -> bool {
    text.starts_with("Success! ")
      || (text.starts_with("property ") && text.contains(" updated to "))
  }
}

impl fmt::Display for Confirmation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Appended { title, date, page_id, .. } => write!(
        f,
        "Success! {title} added to page {date} (page id: {page_id})."
      ),
      Self::PropertyUpdated { property, value } => {
        write!(f, "property {property} updated to {value}")
      }
    }
  }
}

// ─── Writer ──────────────────────────────────────────────────────────────────

/// Applies [`WriteRequest`]s to the page for the current date.
pub struct ContentWriter<S> {
  store:    Arc<S>,
  timezone: Tz,
}

impl<S> Clone for ContentWriter<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), timezone: self.timezone }
  }
}

impl<S: JournalStore> ContentWriter<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, timezone: DEFAULT_TIMEZONE }
  }

  /// Reckon "today" in `timezone` instead of the default.
  pub fn with_timezone(mut self, timezone: Tz) -> Self {
    self.timezone = timezone;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn timezone(&self) -> Tz { self.timezone }

  /// Apply `request` to today's page.
  pub async fn handle(&self, request: WriteRequest) -> Result<Confirmation> {
    self.handle_on(request, today_in(self.timezone)).await
  }

  /// Apply `request` to the page for `date`.
  pub async fn handle_on(
    &self,
    request: WriteRequest,
    date: NaiveDate,
  ) -> Result<Confirmation> {
    let result = match request {
      WriteRequest::Content(append) => self.append(append, date).await,
      WriteRequest::Property(update) => self.update(update, date).await,
    };
    if let Err(e) = &result {
      error!(%date, error = %e, "write rejected");
    }
    result
  }

  async fn append(
    &self,
    request: AppendRequest,
    date: NaiveDate,
  ) -> Result<Confirmation> {
    let blocks = request.to_blocks()?;
    let page = resolve_page(self.store.as_ref(), date).await?;
    let count = blocks.len();

    self
      .store
      .append_blocks(&page.id, blocks)
      .await
      .map_err(|e| Error::Write { page_id: page.id.clone(), source: Box::new(e) })?;

    info!(
      %date,
      page_id = %page.id,
      title = %request.title,
      kind = %request.kind,
      blocks = count,
      "appended content"
    );
    Ok(Confirmation::Appended {
      title:   request.title,
      date:    page.date,
      page_id: page.id,
      blocks:  count,
    })
  }

  async fn update(
    &self,
    request: PropertyUpdateRequest,
    date: NaiveDate,
  ) -> Result<Confirmation> {
    let update = request.to_update()?;
    let page = resolve_page(self.store.as_ref(), date).await?;

    self
      .store
      .update_property(&page.id, update)
      .await
      .map_err(|e| Error::Write { page_id: page.id.clone(), source: Box::new(e) })?;

    info!(%date, page_id = %page.id, property = %request.property, "updated property");
    Ok(Confirmation::PropertyUpdated {
      property: request.property,
      value:    request.value,
    })
  }
}
