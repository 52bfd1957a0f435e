//! Notion backend for daybook.
//!
//! Implements [`daybook_core::store::JournalStore`] over the Notion REST API:
//! date-filtered database queries, page creation, block appends and page
//! property updates. Every call is a single HTTPS request authenticated with
//! an integration key.

mod encode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{NotionConfig, NotionStore};
