//! Document tree to content items
//!
//! Walks a [`DocumentTree`] in document order with an explicit stack, so deep
//! or hostile markup cannot exhaust the call stack.

use crate::content::{is_blank, ContentItem, ContentSequence};
use crate::document::{DocumentTree, NodeKind};
use crate::merge::merge_text_items;
use url::Url;

/// Extract and normalize the content of a document.
pub fn extract_content<T: DocumentTree>(tree: &T) -> ContentSequence {
    let raw = extract_raw(tree);
    let raw_len = raw.len();
    let sequence = merge_text_items(raw);
    tracing::debug!(raw = raw_len, merged = sequence.len(), "extracted content items");
    sequence
}

/// Linearize a document into raw items, one per text node or image, in the
/// order the nodes appear. Nothing is merged here.
pub fn extract_raw<T: DocumentTree>(tree: &T) -> Vec<ContentItem> {
    let mut items = Vec::new();
    let base = tree.base_url();

    // The root's own siblings are outside the fragment, so it is handled
    // before the loop that follows sibling links
    let root = tree.root();
    let mut stack = Vec::new();
    if classify(tree.kind(root), base, &mut items) {
        stack.extend(tree.first_child(root));
    }

    while let Some(node) = stack.pop() {
        // Sibling goes under the child so the whole subtree is seen first
        stack.extend(tree.next_sibling(node));
        if classify(tree.kind(node), base, &mut items) {
            stack.extend(tree.first_child(node));
        }
    }

    items
}

/// Emit the item for one node, returning whether its children are visited
fn classify(kind: NodeKind<'_>, base: Option<&Url>, items: &mut Vec<ContentItem>) -> bool {
    match kind {
        NodeKind::Text(value) => {
            if !is_blank(value) {
                items.push(ContentItem::text(value));
            }
            false
        }
        NodeKind::Image(src) => {
            if let Some(url) = src.and_then(|s| resolve_source(s, base)) {
                items.push(ContentItem::image(url));
            }
            false
        }
        NodeKind::Container => true,
        NodeKind::Ignored => false,
    }
}

/// Resolve an image `src` to an absolute URL.
///
/// Absolute URLs (including `data:`) are normalized, relative ones need a
/// base. Anything else is unresolvable.
pub fn resolve_source(src: &str, base: Option<&Url>) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    match Url::parse(src) {
        Ok(url) => Some(url.into()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base.and_then(|b| b.join(src).ok()).map(Into::into)
        }
        Err(_) => None,
    }
}
