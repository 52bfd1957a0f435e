//! Page references: pointers to journal pages owned by the document
//! database.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A journal page, keyed by calendar date.
///
/// The document database owns the page; daybook only holds its id for the
/// duration of one request and re-resolves it on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
  pub id:   String,
  pub date: NaiveDate,
}
