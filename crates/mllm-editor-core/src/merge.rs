use crate::content::{ContentItem, ContentSequence};

/// Collapse a raw item list into a [`ContentSequence`].
///
/// Blank text items are dropped and each run of consecutive text items is
/// joined with a single `\n`. Images pass through untouched and keep their
/// position. Repeated text is kept as-is.
pub fn merge_text_items<I>(items: I) -> ContentSequence
where
    I: IntoIterator<Item = ContentItem>,
{
    let merged = items
        .into_iter()
        .fold(Vec::new(), |mut acc: Vec<ContentItem>, item| {
            if item.is_blank_text() {
                return acc;
            }

            match item {
                ContentItem::Text { text } if acc.last().is_some_and(ContentItem::is_text) => {
                    if let Some(ContentItem::Text { text: last }) = acc.last_mut() {
                        last.push('\n');
                        last.push_str(&text);
                    }
                }
                other => acc.push(other),
            }
            acc
        });

    ContentSequence::from_merged(merged)
}
