//! Isolated render root of a component
//!
//! Every component renders into its own root: a private stylesheet (reset,
//! shared and component styles) plus a render tree that is replaced wholesale
//! on each render. Queries and event targets resolve against this root only,
//! so nothing crosses into a parent's or child's markup.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::dom::{ElementRef, NodeId, RenderTree, Selector};
use crate::events::{EventType, ListenerSet, PropagationPhase};
use crate::style::root_stylesheet;

static NEXT_ROOT_ID: AtomicU64 = AtomicU64::new(1);

/// Style and markup scope of one component instance
#[derive(Debug)]
pub struct IsolatedRoot {
    id: u64,
    stylesheet: String,
    tree: RenderTree,
    generation: u64,
    listeners: Vec<ListenerSet>,
}

impl IsolatedRoot {
    /// Create an empty root scoped with `own_styles`
    pub fn new(own_styles: &str) -> Self {
        Self {
            id: NEXT_ROOT_ID.fetch_add(1, Ordering::Relaxed),
            stylesheet: root_stylesheet(own_styles),
            tree: RenderTree::new(),
            generation: 0,
            listeners: Vec::new(),
        }
    }

    /// Identity of this root, distinct from every other root
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut RenderTree {
        &mut self.tree
    }

    /// Number of renders committed so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Swap in an already parsed render, invalidating older handles
    pub fn install(&mut self, tree: RenderTree) {
        self.tree = tree;
        self.generation += 1;
    }

    pub fn add_listener(&mut self, listener: ListenerSet) {
        if !self.listeners.iter().any(|set| set.phase == listener.phase) {
            self.listeners.push(listener);
        }
    }

    pub fn remove_listener(&mut self, phase: PropagationPhase) {
        self.listeners.retain(|set| set.phase != phase);
    }

    pub fn listeners(&self) -> &[ListenerSet] {
        &self.listeners
    }

    /// Phase of the listener receiving `event_type`, if any
    pub fn listener_for(&self, event_type: &EventType) -> Option<PropagationPhase> {
        self.listeners
            .iter()
            .find(|set| set.handles(event_type))
            .map(|set| set.phase)
    }

    /// Handle for `node` in the current render
    pub fn element_ref(&self, node: NodeId) -> ElementRef {
        ElementRef::new(self.id, self.generation, node)
    }

    /// Node of `element` if it belongs to this root's current render
    pub fn resolve(&self, element: ElementRef) -> Option<NodeId> {
        if element.root() != self.id || element.generation() != self.generation {
            return None;
        }
        self.tree.element(element.node()).map(|_| element.node())
    }

    pub fn query(&self, selector: &Selector) -> Option<ElementRef> {
        self.tree
            .select_first(selector)
            .map(|node| self.element_ref(node))
    }

    pub fn query_all(&self, selector: &Selector) -> Vec<ElementRef> {
        self.tree
            .select(selector)
            .into_iter()
            .map(|node| self.element_ref(node))
            .collect()
    }

    /// Serialize the root: the scoped stylesheet followed by the markup
    pub fn to_html(&self) -> String {
        format!("<style>{}</style>{}", self.stylesheet, self.tree.to_html())
    }
}
