//! Core types and trait definitions for daybook.
//!
//! Daybook appends content to a journal page selected by date in a hosted
//! document database. This crate holds the pure parts: the request model,
//! the block transformer, the prompt schedule, and the page locator and
//! content writer, both written against the [`store::JournalStore`] trait.
//!
//! This crate is free of HTTP dependencies. Backends (`daybook-notion`) and
//! transports (`daybook-gateway`, `daybook-feeds`) depend on it.

#![allow(async_fn_in_trait)]

pub mod block;
pub mod content;
pub mod date;
pub mod error;
pub mod locator;
pub mod memory;
pub mod page;
pub mod prompts;
pub mod request;
pub mod store;
pub mod writer;

pub use error::{Error, Result};
