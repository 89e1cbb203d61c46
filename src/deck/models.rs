//! Data models for deck documents
//!
//! A deck file is JSON of the form:
//! ```json
//! {
//!   "id": "spanish-basics",
//!   "version": "1.0.0",
//!   "name": "Spanish Basics",
//!   "extends": ["./common.json"],
//!   "cards": [
//!     {
//!       "id": "hola",
//!       "sides": [
//!         { "type": "term", "content": [{ "type": "text", "inline": "hola" }] },
//!         { "type": "definition", "content": [{ "type": "text", "inline": "hello" }] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// A deck document as stored on disk, before extensions are merged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
    /// References to parent decks, absolute or relative to this document
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<DeckSettings>,
}

impl Deck {
    /// Parse a deck document from JSON text (no validation)
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// Author-supplied practice preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
}

/// A unit of study made of one or more sides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sides: Vec<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<RichText>,
}

impl Card {
    /// First side with the given role
    pub fn side(&self, role: &SideRole) -> Option<&Side> {
        self.sides.iter().find(|s| &s.role == role)
    }
}

/// One face of a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    #[serde(rename = "type")]
    pub role: SideRole,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// Role of a side. Unknown roles are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SideRole {
    Term,
    Definition,
    Other(String),
}

impl From<String> for SideRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "term" => Self::Term,
            "definition" => Self::Definition,
            _ => Self::Other(value),
        }
    }
}

impl From<SideRole> for String {
    fn from(role: SideRole) -> Self {
        match role {
            SideRole::Term => "term".to_string(),
            SideRole::Definition => "definition".to_string(),
            SideRole::Other(s) => s,
        }
    }
}

/// A typed piece of side content, discriminated by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentBlock {
    Text(TextBlock),
    Markdown(TextBlock),
    Html(TextBlock),
    Audio(AudioBlock),
    MultipleChoice(MultipleChoice),
    /// Any `type` this crate does not know how to present
    #[serde(other)]
    Unsupported,
}

impl ContentBlock {
    /// Display format of a textual block, `None` for non-text blocks
    pub fn format(&self) -> Option<ContentFormat> {
        match self {
            Self::Text(_) => Some(ContentFormat::Plain),
            Self::Markdown(_) => Some(ContentFormat::Markdown),
            Self::Html(_) => Some(ContentFormat::Html),
            _ => None,
        }
    }

    /// Inline text of a textual block
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(t) | Self::Markdown(t) | Self::Html(t) => t.inline.as_deref(),
            _ => None,
        }
    }
}

/// Body shared by text, markdown and html blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<TextDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
    Auto,
}

/// An audio clip referenced by URL, embedded as base64, or stored next to the deck
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
}

/// The single effective source of an audio block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSource<'a> {
    Url(&'a str),
    Inline(&'a str),
    File(&'a str),
}

impl AudioBlock {
    /// Resolve the source by precedence: URL, then inline payload, then file
    pub fn source(&self) -> Option<AudioSource<'_>> {
        if let Some(url) = self.url.as_deref() {
            return Some(AudioSource::Url(url));
        }
        if let Some(data) = self.base64.as_deref() {
            return Some(AudioSource::Inline(data));
        }
        self.file.as_deref().map(AudioSource::File)
    }
}

/// Multiple-choice question attached to a term side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoice {
    pub options: Vec<ChoiceOption>,
    pub correct: CorrectAnswer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub id: String,
    pub content: RichText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<RichText>,
}

/// Either one correct option id or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    One(String),
    Many(Vec<String>),
}

impl CorrectAnswer {
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::One(id) => vec![id.as_str()],
            Self::Many(ids) => ids.iter().map(String::as_str).collect(),
        }
    }
}

/// Text that may be given as a bare string, a content block, or an object
/// carrying only `inline` text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RichText {
    Plain(String),
    Block(Box<ContentBlock>),
    /// `{ "inline": ... }` without a `type`; rendered as plain text
    Inline { inline: String },
}

impl RichText {
    /// Text to display; empty for blocks without inline text
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(s) | Self::Inline { inline: s } => s,
            Self::Block(block) => block.text().unwrap_or(""),
        }
    }

    pub fn format(&self) -> ContentFormat {
        match self {
            Self::Plain(_) | Self::Inline { .. } => ContentFormat::Plain,
            Self::Block(block) => block.format().unwrap_or(ContentFormat::Plain),
        }
    }
}

/// How textual content should be rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Plain,
    Markdown,
    Html,
}
