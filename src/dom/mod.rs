//! Render tree produced from component markup
//!
//! Each render of a component parses its markup into a fresh [`RenderTree`].
//! Nodes live in an arena and are addressed by index; nothing is carried
//! over from one render to the next.

mod element;
mod selector;

pub use element::ElementData;
pub use selector::{Selector, SelectorError};

use crate::template::escape_text;

/// Elements serialized without a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text content is serialized without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

/// Index of a node inside a [`RenderTree`]
pub type NodeId = usize;

/// Content of a tree node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of parsed markup nodes
#[derive(Debug, Clone, Default)]
pub struct RenderTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl RenderTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent`, or as a top-level node
    pub fn append(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|parent| self.nodes.get_mut(parent)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Top-level nodes in document order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|node| &node.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Element data of `id`, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Mutable element data of `id`, if it is an element
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// All nodes in document order
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.collect_subtree(*root, &mut order);
        }
        order
    }

    /// Nodes below `id` in document order, excluding `id` itself
    pub fn descendants_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        for child in self.children(id) {
            self.collect_subtree(*child, &mut order);
        }
        order
    }

    fn collect_subtree(&self, id: NodeId, order: &mut Vec<NodeId>) {
        order.push(id);
        for child in self.children(id) {
            self.collect_subtree(*child, order);
        }
    }

    /// Concatenated text of `id` and everything below it
    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(NodeKind::Element(_)) => self
                .children(id)
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
            _ => String::new(),
        }
    }

    /// Replace the children of element `id` by a single text node.
    ///
    /// The detached children stay in the arena but are unreachable.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if self.element(id).is_none() {
            return;
        }
        let detached = std::mem::take(&mut self.nodes[id].children);
        for child in detached {
            self.nodes[child].parent = None;
        }
        self.append(Some(id), NodeKind::Text(text.to_string()));
    }

    /// Elements matching `selector`, in document order
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    /// First element matching `selector`
    pub fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        self.descendants()
            .into_iter()
            .find(|id| selector.matches(self, *id))
    }

    /// Serialize the tree back to markup
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            self.write_node(*root, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => {
                let raw = self
                    .parent(id)
                    .and_then(|parent| self.element(parent))
                    .is_some_and(|parent| RAW_TEXT_ELEMENTS.contains(&parent.tag()));
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            Some(NodeKind::Comment(text)) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Some(NodeKind::Element(element)) => {
                element.write_open_tag(out);
                if VOID_ELEMENTS.contains(&element.tag()) {
                    return;
                }
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(element.tag());
                out.push('>');
            }
            None => {}
        }
    }
}

/// Handle to an element of one specific render
///
/// Handles are only valid for the root and render that produced them.
/// After a re-render they no longer resolve, so code that outlives a render
/// (a delayed animation step, for instance) must query again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    root: u64,
    generation: u64,
    node: NodeId,
}

impl ElementRef {
    pub(crate) fn new(root: u64, generation: u64, node: NodeId) -> Self {
        Self {
            root,
            generation,
            node,
        }
    }

    /// Identity of the root this handle was issued by
    pub fn root(&self) -> u64 {
        self.root
    }

    /// Render generation this handle belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Node index inside that render's tree
    pub fn node(&self) -> NodeId {
        self.node
    }
}
