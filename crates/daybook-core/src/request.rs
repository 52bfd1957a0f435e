//! Write requests accepted by the content writer.
//!
//! A request is routed on its `contentOrProperty` field: `"content"` appends
//! blocks, `"property"` updates a single page property. Anything else is
//! rejected before any request-specific parsing takes place.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use strum::{Display, EnumString};

use crate::{
  Error, Result,
  block::{self, Block, BlockKind},
  content::{Body, ContentLine},
};

// ─── Append ──────────────────────────────────────────────────────────────────

/// Append a titled group of blocks to today's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendRequest {
  pub title:   String,
  #[serde(rename = "type")]
  pub kind:    BlockKind,
  #[serde(default)]
  pub body:    Body,
  #[serde(default)]
  pub divider: bool,
}

impl AppendRequest {
  pub fn new(
    title: impl Into<String>,
    kind: BlockKind,
    body: Vec<ContentLine>,
    divider: bool,
  ) -> Self {
    Self {
      title: title.into(),
      kind,
      body: Body::Lines(body),
      divider,
    }
  }

  /// Decode the body and run it through [`block::build_blocks`].
  pub fn to_blocks(&self) -> Result<Vec<Block>> {
    let lines = self.body.clone().decode()?;
    block::build_blocks(&self.title, self.kind, &lines, self.divider)
  }
}

// ─── Property update ─────────────────────────────────────────────────────────

/// The property types the writer knows how to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PropertyType {
  Text,
  Number,
}

/// Set one named property on today's page.
///
/// `kind` stays a raw string so that an unknown type surfaces as
/// [`Error::UnsupportedPropertyType`] rather than a generic parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyUpdateRequest {
  pub property: String,
  #[serde(deserialize_with = "string_or_number")]
  pub value:    String,
  #[serde(rename = "type")]
  pub kind:     String,
}

/// A typed property value, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
  RichText(String),
  Number(Number),
}

/// A validated property update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyUpdate {
  pub name:  String,
  pub value: PropertyValue,
}

impl PropertyUpdateRequest {
  pub fn new(
    property: impl Into<String>,
    value: impl Into<String>,
    kind: PropertyType,
  ) -> Self {
    Self {
      property: property.into(),
      value:    value.into(),
      kind:     kind.to_string(),
    }
  }

  /// Validate the type and convert the value.
  pub fn to_update(&self) -> Result<PropertyUpdate> {
    let kind: PropertyType = self
      .kind
      .parse()
      .map_err(|_| Error::UnsupportedPropertyType(self.kind.clone()))?;
    let value = match kind {
      PropertyType::Text => PropertyValue::RichText(self.value.clone()),
      PropertyType::Number => PropertyValue::Number(parse_number(&self.value)?),
    };
    Ok(PropertyUpdate { name: self.property.clone(), value })
  }
}

/// Integers stay integers; other finite decimals become floats.
fn parse_number(raw: &str) -> Result<Number> {
  let trimmed = raw.trim();
  if let Ok(int) = trimmed.parse::<i64>() {
    return Ok(Number::from(int));
  }
  trimmed
    .parse::<f64>()
    .ok()
    .and_then(Number::from_f64)
    .ok_or_else(|| Error::InvalidNumber(raw.to_owned()))
}

/// Shortcut-style callers send numbers unquoted.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Text(String),
    Number(Number),
  }

  Ok(match Raw::deserialize(deserializer)? {
    Raw::Text(text) => text,
    Raw::Number(number) => number.to_string(),
  })
}

// ─── Routing ─────────────────────────────────────────────────────────────────

/// A request to the content writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "contentOrProperty", rename_all = "lowercase")]
pub enum WriteRequest {
  Content(AppendRequest),
  Property(PropertyUpdateRequest),
}

impl WriteRequest {
  pub const DISCRIMINANT: &'static str = "contentOrProperty";

  /// Route a JSON document on its discriminant, then parse it.
  ///
  /// A missing or unknown discriminant is [`Error::Unroutable`]. A content
  /// request naming a block type we cannot build is
  /// [`Error::UnsupportedBlockKind`]. Any other shape mismatch is
  /// [`Error::InvalidRequest`].
  pub fn from_json(value: Value) -> Result<Self> {
    match value.get(Self::DISCRIMINANT).and_then(Value::as_str) {
      Some("content") => {
        if let Some(kind) = value.get("type").and_then(Value::as_str)
          && kind.parse::<BlockKind>().is_err()
        {
          return Err(Error::UnsupportedBlockKind(kind.to_owned()));
        }
        serde_json::from_value(value).map_err(Error::InvalidRequest)
      }
      Some("property") => serde_json::from_value(value).map_err(Error::InvalidRequest),
      _ => Err(Error::Unroutable),
    }
  }

  pub fn from_slice(bytes: &[u8]) -> Result<Self> {
    let value = serde_json::from_slice(bytes).map_err(Error::InvalidRequest)?;
    Self::from_json(value)
  }
}

impl From<AppendRequest> for WriteRequest {
  fn from(request: AppendRequest) -> Self { Self::Content(request) }
}

impl From<PropertyUpdateRequest> for WriteRequest {
  fn from(request: PropertyUpdateRequest) -> Self { Self::Property(request) }
}
