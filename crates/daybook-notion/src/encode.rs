//! Encoding between daybook domain types and Notion's JSON schema.
//!
//! Dates are sent as ISO-8601 `YYYY-MM-DD` strings. Every text block carries
//! a single rich-text run with the default color.

use chrono::NaiveDate;
use daybook_core::{
  block::{Block, RichText},
  request::{PropertyUpdate, PropertyValue},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

// ─── Blocks ──────────────────────────────────────────────────────────────────

pub fn encode_rich_text(text: &RichText) -> Value {
  let link = match &text.link {
    Some(url) => json!({ "url": url }),
    None => Value::Null,
  };
  json!({
    "type": "text",
    "text": { "content": text.content, "link": link }
  })
}

/// A block object in the shape `{"object": "block", "type": t, t: {...}}`.
pub fn encode_block(block: &Block) -> Value {
  let kind = block.discriminant();
  let payload = match block {
    Block::Bookmark { url } => json!({ "url": url }),
    Block::Divider => json!({}),
    _ => {
      let runs: Vec<Value> = block.rich_text().map(encode_rich_text).into_iter().collect();
      json!({ "rich_text": runs, "color": "default" })
    }
  };

  let mut object = Map::new();
  object.insert("object".to_owned(), json!("block"));
  object.insert("type".to_owned(), json!(kind));
  object.insert(kind.to_owned(), payload);
  Value::Object(object)
}

/// Body for `PATCH /blocks/{id}/children`.
pub fn encode_children(blocks: &[Block]) -> Value {
  json!({ "children": blocks.iter().map(encode_block).collect::<Vec<_>>() })
}

// ─── Properties ──────────────────────────────────────────────────────────────

pub fn encode_property_value(value: &PropertyValue) -> Value {
  match value {
    PropertyValue::RichText(content) => json!({
      "rich_text": [{ "type": "text", "text": { "content": content } }]
    }),
    PropertyValue::Number(number) => json!({ "number": number }),
  }
}

/// Body for `PATCH /pages/{id}`.
pub fn encode_property_update(update: &PropertyUpdate) -> Value {
  let mut properties = Map::new();
  properties.insert(update.name.clone(), encode_property_value(&update.value));
  json!({ "properties": properties })
}

// ─── Pages ───────────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format("%Y-%m-%d").to_string() }

/// Body for `POST /databases/{id}/query`, matching pages on `date_property`.
pub fn encode_date_query(date_property: &str, date: NaiveDate) -> Value {
  json!({
    "filter": {
      "or": [{ "property": date_property, "date": { "equals": encode_date(date) } }]
    }
  })
}

/// Body for `POST /pages`: a database row titled with the date.
pub fn encode_new_page(
  database_id: &str,
  title_property: &str,
  date_property: &str,
  date: NaiveDate,
) -> Value {
  let iso = encode_date(date);
  let mut properties = Map::new();
  properties.insert(
    title_property.to_owned(),
    json!({ "title": [{ "text": { "content": iso } }] }),
  );
  properties.insert(date_property.to_owned(), json!({ "date": { "start": iso } }));
  json!({
    "parent": { "database_id": database_id },
    "properties": properties
  })
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// Any Notion object; only its id is read.
#[derive(Debug, Deserialize)]
pub struct RawObject {
  pub id: String,
}

/// A page of database query results.
#[derive(Debug, Deserialize)]
pub struct RawQueryResults {
  pub results: Vec<RawObject>,
}

/// Notion's error object.
#[derive(Debug, Deserialize)]
pub struct RawApiError {
  pub code:    String,
  pub message: String,
}

#[cfg(test)]
mod tests {
  use serde_json::Number;

  use super::*;

  #[test]
  fn linked_list_item() {
    let block = Block::BulletedListItem(RichText {
      content: "A".into(),
      link:    Some("http://a".into()),
    });
    assert_eq!(encode_block(&block), json!({
      "object": "block",
      "type": "bulleted_list_item",
      "bulleted_list_item": {
        "rich_text": [{ "type": "text", "text": { "content": "A", "link": { "url": "http://a" } } }],
        "color": "default"
      }
    }));
  }

  #[test]
  fn spacer_paragraph_has_one_empty_run() {
    let value = encode_block(&Block::Paragraph(RichText::default()));
    assert_eq!(
      value["paragraph"]["rich_text"],
      json!([{ "type": "text", "text": { "content": "", "link": null } }])
    );
  }

  #[test]
  fn bookmark_and_divider() {
    assert_eq!(
      encode_block(&Block::Bookmark { url: "https://x.example".into() }),
      json!({ "object": "block", "type": "bookmark", "bookmark": { "url": "https://x.example" } })
    );
    assert_eq!(
      encode_block(&Block::Divider),
      json!({ "object": "block", "type": "divider", "divider": {} })
    );
  }

  #[test]
  fn title_heading() {
    let value = encode_block(&Block::Heading1(RichText::plain("Top Headlines")));
    assert_eq!(value["type"], "heading_1");
    assert_eq!(value["heading_1"]["rich_text"][0]["text"]["content"], "Top Headlines");
  }

  #[test]
  fn property_values() {
    assert_eq!(
      encode_property_update(&PropertyUpdate {
        name:  "Mood".into(),
        value: PropertyValue::Number(Number::from(7)),
      }),
      json!({ "properties": { "Mood": { "number": 7 } } })
    );
    assert_eq!(
      encode_property_value(&PropertyValue::RichText("calm".into())),
      json!({ "rich_text": [{ "type": "text", "text": { "content": "calm" } }] })
    );
  }

  #[test]
  fn new_page_uses_iso_date_for_title_and_date() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(encode_new_page("db", "title", "Date", date), json!({
      "parent": { "database_id": "db" },
      "properties": {
        "title": { "title": [{ "text": { "content": "2024-03-01" } }] },
        "Date": { "date": { "start": "2024-03-01" } }
      }
    }));
  }

  #[test]
  fn date_query_filters_on_day() {
    let date = NaiveDate::from_ymd_opt(2024, 12, 9).unwrap();
    assert_eq!(
      encode_date_query("Day", date)["filter"]["or"][0],
      json!({ "property": "Day", "date": { "equals": "2024-12-09" } })
    );
  }
}
