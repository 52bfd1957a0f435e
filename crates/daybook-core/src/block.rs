//! Blocks, the content units of a journal page, and the transformer that
//! builds them from an append request.
//!
//! A block is written once and never mutated. The transformer emits, in
//! order: one heading for the title, one block per body line, and an
//! optional spacer paragraph followed by a divider.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use url::Url;

use crate::{Error, Result, content::ContentLine};

// ─── BlockKind ───────────────────────────────────────────────────────────────

/// The block type requested for each body line.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BlockKind {
  Paragraph,
  BulletedListItem,
  NumberedListItem,
  #[serde(rename = "heading_1")]
  #[strum(serialize = "heading_1")]
  Heading1,
  #[serde(rename = "heading_2")]
  #[strum(serialize = "heading_2")]
  Heading2,
  #[serde(rename = "heading_3")]
  #[strum(serialize = "heading_3")]
  Heading3,
  Bookmark,
}

// ─── Block ───────────────────────────────────────────────────────────────────

/// A run of text with an optional hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
  pub content: String,
  pub link:    Option<String>,
}

impl RichText {
  pub fn plain(content: impl Into<String>) -> Self {
    Self { content: content.into(), link: None }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
  Paragraph(RichText),
  BulletedListItem(RichText),
  NumberedListItem(RichText),
  Heading1(RichText),
  Heading2(RichText),
  Heading3(RichText),
  Bookmark { url: String },
  Divider,
}

impl Block {
  /// The block type name used by the document database.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::Paragraph(_) => "paragraph",
      Self::BulletedListItem(_) => "bulleted_list_item",
      Self::NumberedListItem(_) => "numbered_list_item",
      Self::Heading1(_) => "heading_1",
      Self::Heading2(_) => "heading_2",
      Self::Heading3(_) => "heading_3",
      Self::Bookmark { .. } => "bookmark",
      Self::Divider => "divider",
    }
  }

  /// The text carried by this block, if it is a text block.
  pub fn rich_text(&self) -> Option<&RichText> {
    match self {
      Self::Paragraph(t)
      | Self::BulletedListItem(t)
      | Self::NumberedListItem(t)
      | Self::Heading1(t)
      | Self::Heading2(t)
      | Self::Heading3(t) => Some(t),
      Self::Bookmark { .. } | Self::Divider => None,
    }
  }
}

// ─── Transformer ─────────────────────────────────────────────────────────────

/// Build the block sequence for one append request.
///
/// Output is `1 + body.len() + (2 if divider)` blocks, in input order.
/// Fails with [`Error::MalformedBody`] if `kind` is
/// [`BlockKind::Bookmark`] and a line carries no usable url.
pub fn build_blocks(
  title: &str,
  kind: BlockKind,
  body: &[ContentLine],
  divider: bool,
) -> Result<Vec<Block>> {
  let mut blocks = Vec::with_capacity(body.len() + 3);
  blocks.push(Block::Heading1(RichText::plain(title)));

  for (index, line) in body.iter().enumerate() {
    let text = || RichText {
      content: line.text().to_owned(),
      link:    line.link().map(|l| l.url.clone()),
    };
    let block = match kind {
      BlockKind::Paragraph => Block::Paragraph(text()),
      BlockKind::BulletedListItem => Block::BulletedListItem(text()),
      BlockKind::NumberedListItem => Block::NumberedListItem(text()),
      BlockKind::Heading1 => Block::Heading1(text()),
      BlockKind::Heading2 => Block::Heading2(text()),
      BlockKind::Heading3 => Block::Heading3(text()),
      BlockKind::Bookmark => Block::Bookmark { url: bookmark_url(index, line)? },
    };
    blocks.push(block);
  }

  if divider {
    blocks.push(Block::Paragraph(RichText::default()));
    blocks.push(Block::Divider);
  }

  Ok(blocks)
}

/// A bookmark takes the line's link, or the line's text when that text is
/// itself an absolute http(s) url.
fn bookmark_url(index: usize, line: &ContentLine) -> Result<String> {
  if let Some(link) = line.link() {
    return Ok(link.url.clone());
  }
  match Url::parse(line.text()) {
    Ok(url) if matches!(url.scheme(), "http" | "https") => {
      Ok(line.text().to_owned())
    }
    _ => Err(Error::MalformedBody(format!(
      "bookmark line {index} has no url: {:?}",
      line.text()
    ))),
  }
}
