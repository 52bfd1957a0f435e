//! The `JournalStore` trait: daybook's view of the document database.
//!
//! The trait is implemented by backends (`daybook-notion`, and
//! [`crate::memory::MemoryStore`] for local runs and tests). The locator and
//! writer depend on this abstraction, never on a concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{block::Block, page::PageRef, request::PropertyUpdate};

/// Abstraction over the date-keyed journal database.
///
/// The database is the only source of truth; implementations must not cache
/// page ids between calls.
///
/// All methods return `Send` futures so the trait can be used behind `axum`
/// on a multi-threaded tokio runtime.
pub trait JournalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Pages ─────────────────────────────────────────────────────────────

  /// Return every page whose date property equals `date` (day granularity),
  /// in whatever order the database yields them.
  fn find_pages(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<PageRef>, Self::Error>> + Send + '_;

  /// Create a page titled with the ISO form of `date` and return it.
  fn create_page(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<PageRef, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Append `blocks` as children of the page, in order, in a single call.
  fn append_blocks<'a>(
    &'a self,
    page_id: &'a str,
    blocks: Vec<Block>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Set a single property on the page.
  fn update_property<'a>(
    &'a self,
    page_id: &'a str,
    update: PropertyUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
