//! Read-only document trees captured from the editing surface
//!
//! The editor hands us markup it does not control. [`Fragment`] parses it with
//! html5ever (through `scraper`) and copies the result into a flat arena that
//! keeps only what extraction needs: text, image sources, and structure.

use scraper::Html;
use std::collections::HashMap;
use url::Url;

/// Closed set of node kinds the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    /// A text node with its raw, untrimmed value
    Text(&'a str),
    /// An `<img>` element and its raw `src` attribute, if any
    Image(Option<&'a str>),
    /// Any other element; carries no content of its own
    Container,
    /// Comments, doctypes, processing instructions
    Ignored,
}

/// A tree the extractor can walk in document order.
///
/// Navigation is DOM style (first child, next sibling) so the walker can keep
/// its own explicit stack instead of recursing.
pub trait DocumentTree {
    type Node: Copy;

    fn root(&self) -> Self::Node;
    fn kind(&self, node: Self::Node) -> NodeKind<'_>;
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Base used to resolve relative image sources
    fn base_url(&self) -> Option<&Url> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeData {
    Text(String),
    Image(Option<String>),
    Container,
    Ignored,
}

#[derive(Debug, Clone)]
struct Slot {
    data: NodeData,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// An owned snapshot of the user's composition
#[derive(Debug, Clone)]
pub struct Fragment {
    nodes: Vec<Slot>,
    base: Option<Url>,
}

impl Fragment {
    /// A fragment holding only an empty root container
    pub fn empty() -> Self {
        Self {
            nodes: vec![Slot {
                data: NodeData::Container,
                first_child: None,
                last_child: None,
                next_sibling: None,
            }],
            base: None,
        }
    }

    /// Parse an HTML fragment the way a browser parses `innerHTML` of a body
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_fragment(markup);
        Self::from_html(&html)
    }

    pub fn parse_with_base(markup: &str, base: Url) -> Self {
        let mut fragment = Self::parse(markup);
        fragment.base = Some(base);
        fragment
    }

    pub fn with_base(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    fn from_html(html: &Html) -> Self {
        let mut fragment = Self {
            nodes: Vec::new(),
            base: None,
        };
        let mut index = HashMap::new();

        // descendants() is pre-order, so a node's parent and previous sibling
        // are always copied before the node itself
        for node in html.tree.root().descendants() {
            let data = match node.value() {
                scraper::Node::Document | scraper::Node::Fragment => NodeData::Container,
                scraper::Node::Text(text) => NodeData::Text(String::from(&**text)),
                scraper::Node::Element(el) if el.name() == "img" => {
                    NodeData::Image(el.attr("src").map(str::to_string))
                }
                // Inert markup, never rendered in the compose surface
                scraper::Node::Element(el) if el.name() == "template" => NodeData::Ignored,
                scraper::Node::Element(_) => NodeData::Container,
                _ => NodeData::Ignored,
            };

            let id = match node.parent().and_then(|p| index.get(&p.id()).copied()) {
                Some(parent) => fragment.push_child(parent, data),
                None => fragment.push_slot(data),
            };
            index.insert(node.id(), id);
        }

        if fragment.nodes.is_empty() {
            return Self::empty();
        }
        fragment
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_child(parent, NodeData::Text(text.to_string()))
    }

    pub fn append_element(&mut self, parent: NodeId) -> NodeId {
        self.push_child(parent, NodeData::Container)
    }

    pub fn append_image(&mut self, parent: NodeId, src: Option<&str>) -> NodeId {
        self.push_child(parent, NodeData::Image(src.map(str::to_string)))
    }

    pub fn append_comment(&mut self, parent: NodeId) -> NodeId {
        self.push_child(parent, NodeData::Ignored)
    }

    fn push_slot(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Slot {
            data,
            first_child: None,
            last_child: None,
            next_sibling: None,
        });
        id
    }

    fn push_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.push_slot(data);
        match self.nodes[parent.0].last_child {
            Some(prev) => self.nodes[prev.0].next_sibling = Some(id),
            None => self.nodes[parent.0].first_child = Some(id),
        }
        self.nodes[parent.0].last_child = Some(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root has no children at all
    pub fn is_empty(&self) -> bool {
        self.nodes[0].first_child.is_none()
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::empty()
    }
}

impl DocumentTree for Fragment {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> NodeKind<'_> {
        match self.nodes.get(node.0).map(|slot| &slot.data) {
            Some(NodeData::Text(text)) => NodeKind::Text(text),
            Some(NodeData::Image(src)) => NodeKind::Image(src.as_deref()),
            Some(NodeData::Container) => NodeKind::Container,
            Some(NodeData::Ignored) | None => NodeKind::Ignored,
        }
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|slot| slot.first_child)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|slot| slot.next_sibling)
    }

    fn base_url(&self) -> Option<&Url> {
        self.base.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(fragment: &Fragment) -> Vec<NodeKind<'_>> {
        (0..fragment.len())
            .map(|i| fragment.kind(NodeId(i)))
            .filter(|k| *k != NodeKind::Container)
            .collect()
    }

    #[test]
    fn test_parse_keeps_text_and_images() {
        let fragment = Fragment::parse(r#"<p>Hi</p><img src="a.png"><img>"#);
        assert_eq!(
            kinds(&fragment),
            vec![
                NodeKind::Text("Hi"),
                NodeKind::Image(Some("a.png")),
                NodeKind::Image(None),
            ]
        );
    }

    #[test]
    fn test_parse_marks_comments_ignored() {
        let fragment = Fragment::parse("<!-- note --><p>x</p>");
        assert!(kinds(&fragment).contains(&NodeKind::Ignored));
    }

    #[test]
    fn test_empty_markup_has_no_content_nodes() {
        assert!(kinds(&Fragment::parse("")).is_empty());
        assert!(Fragment::empty().is_empty());
    }

    #[test]
    fn test_template_is_ignored() {
        let fragment = Fragment::parse("<template>t</template>");
        assert_eq!(kinds(&fragment).first(), Some(&NodeKind::Ignored));
    }

    #[test]
    fn test_builder_links_siblings_in_order() {
        let mut fragment = Fragment::empty();
        let root = fragment.root();
        let a = fragment.append_text(root, "a");
        let b = fragment.append_element(root);
        let c = fragment.append_text(b, "c");

        assert_eq!(fragment.first_child(root), Some(a));
        assert_eq!(fragment.next_sibling(a), Some(b));
        assert_eq!(fragment.next_sibling(b), None);
        assert_eq!(fragment.first_child(b), Some(c));
        assert_eq!(fragment.kind(c), NodeKind::Text("c"));
    }

    #[test]
    fn test_unknown_node_is_ignored() {
        let fragment = Fragment::empty();
        assert_eq!(fragment.kind(NodeId(42)), NodeKind::Ignored);
        assert_eq!(fragment.first_child(NodeId(42)), None);
    }
}
