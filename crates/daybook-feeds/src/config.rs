//! Optional TOML configuration for the feeds CLI.
//!
//! ```toml
//! endpoint     = "https://example.com/write-to-entry"
//! news_api_key = "..."
//! timezone     = "America/New_York"
//!
//! [[sections]]
//! title = "Science"
//!
//! [[sections.queries]]
//! q         = "science"
//! page_size = 3
//! ```

use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::{Error, Result, digest::Section};

/// Shape of the optional TOML config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
  #[serde(default)]
  pub endpoint:      Option<String>,
  #[serde(default)]
  pub news_api_key:  Option<String>,
  #[serde(default)]
  pub news_base_url: Option<String>,
  #[serde(default)]
  pub timezone:      Option<Tz>,
  /// Digest sections; the built-in digest when empty.
  #[serde(default)]
  pub sections:      Vec<Section>,
}

impl ConfigFile {
  pub fn parse(raw: &str) -> Result<Self> {
    toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
  }

  pub fn load(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .map_err(|e| Error::Config(format!("reading {}: {e}", path.display())))?;
    Self::parse(&raw)
  }
}
