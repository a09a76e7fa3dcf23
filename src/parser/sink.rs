//! html5ever tree sink collecting nodes into a [`RenderTree`]

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ExpandedName, LocalName, Namespace, QualName};
use log::trace;

use crate::dom::{ElementData, NodeId, NodeKind, RenderTree};

const DOCUMENT: usize = 0;

/// Node handle handed to the html5ever tree builder
#[derive(Debug, Clone)]
pub struct SinkHandle {
    id: usize,
    name: QualName,
}

#[derive(Debug)]
enum SinkData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug)]
struct SinkNode {
    data: SinkData,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Tree builder sink; [`TreeSink::finish`] yields the render tree.
///
/// The document wrapper html5ever always builds (`<html>`, `<head>`,
/// `<body>`) is flattened away, so the markup's top-level nodes become
/// the tree's roots.
#[derive(Debug)]
pub struct TreeCollector {
    nodes: RefCell<Vec<SinkNode>>,
}

impl TreeCollector {
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![SinkNode {
                data: SinkData::Document,
                parent: None,
                children: Vec::new(),
            }]),
        }
    }

    fn create_node(&self, data: SinkData, name: QualName) -> SinkHandle {
        let mut nodes = self.nodes.borrow_mut();
        let id = nodes.len();
        nodes.push(SinkNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        SinkHandle { id, name }
    }

    fn detach(nodes: &mut [SinkNode], id: usize) {
        if let Some(parent) = nodes[id].parent.take() {
            nodes[parent].children.retain(|child| *child != id);
        }
    }

    /// Insert `child` under `parent` at `index`, merging adjacent text
    fn insert(&self, parent: usize, index: usize, child: NodeOrText<SinkHandle>) {
        let mut nodes = self.nodes.borrow_mut();
        match child {
            NodeOrText::AppendNode(handle) => {
                Self::detach(&mut nodes, handle.id);
                nodes[handle.id].parent = Some(parent);
                let index = index.min(nodes[parent].children.len());
                nodes[parent].children.insert(index, handle.id);
            }
            NodeOrText::AppendText(text) => {
                let previous = index
                    .checked_sub(1)
                    .and_then(|before| nodes[parent].children.get(before).copied());
                if let Some(previous) = previous {
                    if let SinkData::Text(existing) = &mut nodes[previous].data {
                        existing.push_str(&text);
                        return;
                    }
                }

                let id = nodes.len();
                nodes.push(SinkNode {
                    data: SinkData::Text(text.to_string()),
                    parent: Some(parent),
                    children: Vec::new(),
                });
                let index = index.min(nodes[parent].children.len());
                nodes[parent].children.insert(index, id);
            }
        }
    }

    fn child_count(&self, parent: usize) -> usize {
        self.nodes.borrow()[parent].children.len()
    }

    fn position(&self, id: usize) -> Option<(usize, usize)> {
        let nodes = self.nodes.borrow();
        let parent = nodes[id].parent?;
        let index = nodes[parent].children.iter().position(|child| *child == id)?;
        Some((parent, index))
    }
}

impl Default for TreeCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_name() -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(""))
}

fn is_element(node: &SinkNode, tag: &str) -> bool {
    matches!(&node.data, SinkData::Element(element) if element.tag() == tag)
}

fn copy_subtree(nodes: &[SinkNode], id: usize, parent: Option<NodeId>, tree: &mut RenderTree) {
    let kind = match &nodes[id].data {
        SinkData::Document => return,
        SinkData::Element(element) => NodeKind::Element(element.clone()),
        SinkData::Text(text) => NodeKind::Text(text.clone()),
        SinkData::Comment(text) => NodeKind::Comment(text.clone()),
    };
    let node = tree.append(parent, kind);
    for child in &nodes[id].children {
        copy_subtree(nodes, *child, Some(node), tree);
    }
}

impl TreeSink for TreeCollector {
    type Handle = SinkHandle;
    type Output = RenderTree;
    type ElemName<'a> = ExpandedName<'a>;

    fn finish(self) -> Self::Output {
        let nodes = self.nodes.into_inner();
        let mut tree = RenderTree::new();

        for top in &nodes[DOCUMENT].children {
            if !is_element(&nodes[*top], "html") {
                copy_subtree(&nodes, *top, None, &mut tree);
                continue;
            }
            for section in &nodes[*top].children {
                if is_element(&nodes[*section], "head") || is_element(&nodes[*section], "body") {
                    for child in &nodes[*section].children {
                        copy_subtree(&nodes, *child, None, &mut tree);
                    }
                } else {
                    copy_subtree(&nodes, *section, None, &mut tree);
                }
            }
        }
        tree
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!("Recovered from markup error: {msg}");
    }

    fn get_document(&self) -> Self::Handle {
        SinkHandle {
            id: DOCUMENT,
            name: empty_name(),
        }
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> ExpandedName<'a> {
        target.name.expanded()
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        let element = ElementData::new(&name.local, attributes);
        self.create_node(SinkData::Element(element), name)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.create_node(SinkData::Comment(text.to_string()), empty_name())
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        self.create_node(SinkData::Comment(data.to_string()), empty_name())
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        self.insert(parent.id, self.child_count(parent.id), child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.position(element.id).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.id == y.id
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        if let Some((parent, index)) = self.position(sibling.id) {
            self.insert(parent, index, new_node);
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut nodes = self.nodes.borrow_mut();
        if let SinkData::Element(element) = &mut nodes[target.id].data {
            for attr in attrs {
                let name = attr.name.local.to_string();
                if !element.has_attribute(&name) {
                    element.set_attribute(&name, &attr.value);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        Self::detach(&mut self.nodes.borrow_mut(), target.id);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut nodes = self.nodes.borrow_mut();
        let children = std::mem::take(&mut nodes[node.id].children);
        for child in &children {
            nodes[*child].parent = Some(new_parent.id);
        }
        nodes[new_parent.id].children.extend(children);
    }
}
