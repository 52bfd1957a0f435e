//! [`MemoryStore`], an in-process [`JournalStore`].
//!
//! Backs the gateway when no document database is configured, and records
//! every call it receives so tests can assert exactly which reads and writes
//! a request caused.

use std::{
  collections::HashMap,
  future::Future,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  block::Block,
  page::PageRef,
  request::{PropertyUpdate, PropertyValue},
  store::JournalStore,
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("page not found: {0}")]
  PageNotFound(String),
}

/// One call received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
  FindPages(NaiveDate),
  CreatePage(NaiveDate),
  AppendBlocks { page_id: String, count: usize },
  UpdateProperty { page_id: String, name: String },
}

impl StoreCall {
  pub fn is_mutation(&self) -> bool {
    matches!(self, Self::AppendBlocks { .. } | Self::UpdateProperty { .. })
  }
}

#[derive(Debug, Default)]
struct State {
  pages:      Vec<PageRef>,
  blocks:     HashMap<String, Vec<Block>>,
  properties: HashMap<String, HashMap<String, PropertyValue>>,
  calls:      Vec<StoreCall>,
}

/// A journal held entirely in memory.
///
/// Cloning is cheap and clones share the same journal.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  state: Arc<Mutex<State>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Add a page for `date` directly, without recording a call.
  ///
  /// Seeding the same date twice produces duplicate pages, as the real
  /// database allows.
  pub fn insert_page(&self, date: NaiveDate) -> PageRef {
    let page = PageRef { id: Uuid::new_v4().to_string(), date };
    self.lock().pages.push(page.clone());
    page
  }

  pub fn pages(&self) -> Vec<PageRef> { self.lock().pages.clone() }

  pub fn blocks(&self, page_id: &str) -> Vec<Block> {
    self.lock().blocks.get(page_id).cloned().unwrap_or_default()
  }

  pub fn property(&self, page_id: &str, name: &str) -> Option<PropertyValue> {
    self
      .lock()
      .properties
      .get(page_id)
      .and_then(|props| props.get(name))
      .cloned()
  }

  /// Every call received so far, oldest first.
  pub fn calls(&self) -> Vec<StoreCall> { self.lock().calls.clone() }

  pub fn mutation_count(&self) -> usize {
    self.lock().calls.iter().filter(|c| c.is_mutation()).count()
  }

  fn require_page(state: &State, page_id: &str) -> Result<(), MemoryError> {
    if state.pages.iter().any(|p| p.id == page_id) {
      Ok(())
    } else {
      Err(MemoryError::PageNotFound(page_id.to_owned()))
    }
  }
}

impl JournalStore for MemoryStore {
  type Error = MemoryError;

  fn find_pages(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<PageRef>, Self::Error>> + Send + '_ {
    async move {
      let mut state = self.lock();
      state.calls.push(StoreCall::FindPages(date));
      Ok(state.pages.iter().filter(|p| p.date == date).cloned().collect())
    }
  }

  fn create_page(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<PageRef, Self::Error>> + Send + '_ {
    async move {
      let mut state = self.lock();
      state.calls.push(StoreCall::CreatePage(date));
      let page = PageRef { id: Uuid::new_v4().to_string(), date };
      state.pages.push(page.clone());
      Ok(page)
    }
  }

  fn append_blocks<'a>(
    &'a self,
    page_id: &'a str,
    blocks: Vec<Block>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    async move {
      let mut state = self.lock();
      state.calls.push(StoreCall::AppendBlocks {
        page_id: page_id.to_owned(),
        count:   blocks.len(),
      });
      Self::require_page(&state, page_id)?;
      state.blocks.entry(page_id.to_owned()).or_default().extend(blocks);
      Ok(())
    }
  }

  fn update_property<'a>(
    &'a self,
    page_id: &'a str,
    update: PropertyUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    async move {
      let mut state = self.lock();
      state.calls.push(StoreCall::UpdateProperty {
        page_id: page_id.to_owned(),
        name:    update.name.clone(),
      });
      Self::require_page(&state, page_id)?;
      state
        .properties
        .entry(page_id.to_owned())
        .or_default()
        .insert(update.name, update.value);
      Ok(())
    }
  }
}
