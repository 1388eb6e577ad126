//! Typed content items exchanged with the model backend
//!
//! A prompt is an ordered list of text runs and image references. The wire
//! shape matches the OpenAI-style content parts the backend forwards as-is.

use serde::{Deserialize, Serialize};

/// An image addressed by URL (remote or `data:`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One unit of a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text {
        #[serde(default)]
        text: String,
    },
    ImageUrl {
        image_url: ImageUrl,
    },
}

impl ContentItem {
    pub fn text(value: impl Into<String>) -> Self {
        ContentItem::Text { text: value.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentItem::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ContentItem::Text { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentItem::Text { text } => Some(text),
            ContentItem::ImageUrl { .. } => None,
        }
    }

    /// True for text items that carry nothing but whitespace
    pub fn is_blank_text(&self) -> bool {
        self.as_text().is_some_and(is_blank)
    }
}

/// True when `text` is empty after trimming the way browsers trim strings:
/// Unicode whitespace plus the U+FEFF caret placeholder, but not U+0085.
pub fn is_blank(text: &str) -> bool {
    text.chars()
        .all(|c| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}'))
}

/// A normalized prompt: document order, no blank text, no adjacent text runs.
///
/// Only [`crate::merge::merge_text_items`] builds one, so the invariants hold
/// for every value of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentSequence(Vec<ContentItem>);

impl ContentSequence {
    pub(crate) fn from_merged(items: Vec<ContentItem>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentItem> {
        self.0.iter()
    }

    pub fn into_items(self) -> Vec<ContentItem> {
        self.0
    }

    /// Plain-text rendering used for the user's transcript entry.
    /// Images show up as `[image]`, parts are joined by a single space.
    pub fn flatten(&self) -> String {
        self.0
            .iter()
            .map(|item| match item {
                ContentItem::Text { text } => text.as_str(),
                ContentItem::ImageUrl { .. } => "[image]",
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a ContentSequence {
    type Item = &'a ContentItem;
    type IntoIter = std::slice::Iter<'a, ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_item_wire_shape() {
        let value = serde_json::to_value(ContentItem::text("Hi")).unwrap();
        assert_eq!(value, json!({ "type": "text", "text": "Hi" }));
    }

    #[test]
    fn test_image_item_wire_shape() {
        let value = serde_json::to_value(ContentItem::image("http://x/a.png")).unwrap();
        assert_eq!(
            value,
            json!({ "type": "image_url", "image_url": { "url": "http://x/a.png" } })
        );
    }

    #[test]
    fn test_text_item_without_text_field_is_empty() {
        let item: ContentItem = serde_json::from_value(json!({ "type": "text" })).unwrap();
        assert_eq!(item, ContentItem::text(""));
        assert!(item.is_blank_text());
    }

    #[test]
    fn test_blank_matches_browser_trim() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n\u{A0}\u{2028}"));
        assert!(is_blank("\u{FEFF}"));
        assert!(is_blank(" \u{FEFF} "));
        assert!(!is_blank("\u{85}"));
        assert!(!is_blank("\u{200B}"));
        assert!(!is_blank(" x "));
        assert!(ContentItem::text("\u{FEFF}").is_blank_text());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<ContentItem, _> =
            serde_json::from_value(json!({ "type": "audio", "url": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_flatten_marks_images() {
        let seq = ContentSequence::from_merged(vec![
            ContentItem::text("look at"),
            ContentItem::image("data:image/png;base64,AAAA"),
            ContentItem::text("please"),
        ]);
        assert_eq!(seq.flatten(), "look at [image] please");
    }
}
