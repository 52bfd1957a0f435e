//! Scheduled producers for daybook.
//!
//! Two jobs post [`WriteRequest`](daybook_core::request::WriteRequest)s to
//! the gateway's write endpoint: a news digest built from NewsAPI queries,
//! and the daily (and first-of-month) journaling prompts.

pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod news;
pub mod prompts;

pub use error::{Error, Result};
