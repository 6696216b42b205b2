//! StringDoc - the significant-node document
//!
//! Parses template markup once into an arena of nodes, keeping only the
//! significant ones structurally. Everything else collapses to opaque
//! literal fragments sliced verbatim from the input, so rendering an
//! untouched document reproduces the input byte for byte and rendering a
//! mutated one only pays for the parts that are actually tracked.
//!
//! All lookups are permissive: a missing node or a detached anchor is an
//! empty result or a silent no-op, never an error. The only fatal path is
//! `parse` itself.

use super::attributes::StringAttributes;
use super::node::{Labels, NodeData, NodeId, Significant, SignificantKind, StringNode};
use super::significant::{SignificantBuild, SignificantRegistry};
use crate::core::entities::encode_text;
use crate::error::ParseError;
use crate::raw::{RawDocument, RawElement, RawId};
use log::debug;
use std::fmt::Write as _;

/// A parsed template document
#[derive(Debug, Clone, Default)]
pub struct StringDoc {
    nodes: Vec<StringNode>,
    top: Vec<NodeId>,
}

impl StringDoc {
    /// Parse template markup into a document. Fails fast on malformed
    /// markup; never fails on marker semantics.
    pub fn parse(markup: &str, registry: &SignificantRegistry) -> Result<Self, ParseError> {
        let raw = RawDocument::parse(markup.as_bytes())?;
        let mut doc = StringDoc::default();
        doc.top = doc.convert_siblings(&raw, registry, raw.top(), None);
        doc.default_form_names();
        debug!(
            "parsed template: {} bytes, {} nodes, {} top-level",
            markup.len(),
            doc.nodes.len(),
            doc.top.len()
        );
        Ok(doc)
    }

    /// An empty document
    pub fn empty() -> Self {
        StringDoc::default()
    }

    /// A document holding one opaque literal fragment, no parsing
    pub fn from_fragment(fragment: impl Into<String>) -> Self {
        let mut doc = StringDoc::default();
        let id = doc.push_opaque(&fragment.into(), None);
        doc.top.push(id);
        doc
    }

    fn convert_siblings(
        &mut self,
        raw: &RawDocument<'_>,
        registry: &SignificantRegistry,
        ids: &[RawId],
        parent: Option<NodeId>,
    ) -> Vec<NodeId> {
        let mut out = Vec::new();
        // Run of adjacent inert siblings, collapsed into one opaque node
        let mut run: Option<(usize, usize)> = None;

        for &raw_id in ids {
            let span = raw.node(raw_id).span;

            let claimed = raw.element(raw_id).and_then(|el| {
                match registry.match_element(el) {
                    Some(build) => Some((el, Some(build))),
                    None if el.any_descendant(&|d| registry.is_significant(d)) => Some((el, None)),
                    None => None,
                }
            });

            match claimed {
                Some((el, build)) => {
                    if let Some(span) = run.take() {
                        out.push(self.push_opaque(raw.fragment(span), parent));
                    }
                    out.push(self.build_significant(raw, registry, el, parent, build));
                }
                None => {
                    run = Some(match run {
                        Some((start, _)) => (start, span.1),
                        None => span,
                    });
                }
            }
        }

        if let Some(span) = run {
            out.push(self.push_opaque(raw.fragment(span), parent));
        }
        out
    }

    fn build_significant(
        &mut self,
        raw: &RawDocument<'_>,
        registry: &SignificantRegistry,
        el: RawElement<'_, '_>,
        parent: Option<NodeId>,
        build: Option<SignificantBuild>,
    ) -> NodeId {
        let (kind, name, labels, strip) = match build {
            Some(build) => (build.kind, build.name, build.labels, build.strip),
            None => (SignificantKind::Structure, None, Labels::new(), vec![]),
        };

        let mut attributes = StringAttributes::new();
        for attr in el.attributes() {
            let attr_name = attr.name_str().unwrap_or("");
            if strip.contains(&attr_name) {
                continue;
            }
            attributes.set(attr_name, attr.value_str().unwrap_or(""));
        }

        let void = el.is_void();
        let tag = el.name();
        let id = self.nodes.len() as NodeId;
        self.nodes.push(StringNode {
            data: NodeData::Significant(Significant {
                kind,
                name,
                labels,
                attributes,
                open: format!("<{}", tag),
                close: if void { String::new() } else { format!("</{}>", tag) },
                void,
                children: Vec::new(),
            }),
            parent,
        });

        let children = self.convert_siblings(raw, registry, el.children(), Some(id));
        if let Some(sig) = self.nodes[id as usize].as_significant_mut() {
            sig.children = children;
        }
        id
    }

    fn push_opaque(&mut self, fragment: &str, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(StringNode {
            data: NodeData::Opaque(fragment.to_string()),
            parent,
        });
        id
    }

    /// Default `name` on every form field: a prop inside a form scope gets
    /// `scope[prop]` unless the template already set a name. Runs once at
    /// parse; nested binding scopes inside the form are not crossed.
    fn default_form_names(&mut self) {
        let forms: Vec<NodeId> = (0..self.nodes.len() as NodeId)
            .filter(|&id| self.kind(id) == Some(SignificantKind::Form))
            .collect();

        for form_id in forms {
            let scope = match self.name(form_id) {
                Some(scope) => scope.to_string(),
                None => continue,
            };
            let mut stack: Vec<NodeId> = self.children(form_id).to_vec();
            while let Some(id) = stack.pop() {
                match self.kind(id) {
                    Some(SignificantKind::BindingScope) | Some(SignificantKind::Form) => continue,
                    Some(SignificantKind::BindingProp) => {
                        if let Some(prop) = self.name(id).map(str::to_string) {
                            if let Some(sig) = self.nodes[id as usize].as_significant_mut() {
                                if !sig.attributes.has("name") {
                                    sig.attributes.set("name", format!("{}[{}]", scope, prop));
                                }
                            }
                        }
                    }
                    _ => stack.extend_from_slice(self.children(id)),
                }
            }
        }
    }

    // --- queries ---------------------------------------------------------

    /// Top-level node handles, in document order
    pub fn top(&self) -> &[NodeId] {
        &self.top
    }

    /// Get a node by handle
    pub fn node(&self, id: NodeId) -> Option<&StringNode> {
        self.nodes.get(id as usize)
    }

    /// Get a node mutably by handle
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut StringNode> {
        self.nodes.get_mut(id as usize)
    }

    /// Parent handle of a node, `None` for top-level or detached nodes
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Kind of a node, `None` for opaque or unknown handles
    pub fn kind(&self, id: NodeId) -> Option<SignificantKind> {
        self.node(id).and_then(StringNode::kind)
    }

    /// Name of a node
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(StringNode::name)
    }

    /// Label value attached to a node at parse
    pub fn label(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node(id)
            .and_then(StringNode::as_significant)
            .and_then(|sig| sig.labels.get(key))
            .map(String::as_str)
    }

    /// Child handles of a node; empty for opaque or unknown handles
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(StringNode::children).unwrap_or(&[])
    }

    /// The sibling list a node sits in: its parent's children, or the
    /// top-level list. Empty for detached or unknown handles.
    pub fn siblings(&self, id: NodeId) -> &[NodeId] {
        match self.parent(id) {
            Some(parent) => self.children(parent),
            None if self.top.contains(&id) => &self.top,
            None => &[],
        }
    }

    /// All significant nodes matching `kind` and `name`, document order,
    /// descending through the whole tree. `None` matches anything.
    pub fn find_significant(
        &self,
        kind: Option<SignificantKind>,
        name: Option<&str>,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.top.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.matches(id, kind, name) {
                found.push(id);
            }
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        found
    }

    /// Significant nodes matching `kind` and `name` at the top level only
    pub fn top_significant(
        &self,
        kind: Option<SignificantKind>,
        name: Option<&str>,
    ) -> Vec<NodeId> {
        self.top
            .iter()
            .copied()
            .filter(|&id| self.matches(id, kind, name))
            .collect()
    }

    fn matches(&self, id: NodeId, kind: Option<SignificantKind>, name: Option<&str>) -> bool {
        let Some(sig) = self.node(id).and_then(StringNode::as_significant) else {
            return false;
        };
        if let Some(kind) = kind {
            if sig.kind != kind {
                return false;
            }
        }
        if let Some(name) = name {
            if sig.name.as_deref() != Some(name) {
                return false;
            }
        }
        true
    }

    // --- mutation --------------------------------------------------------

    /// Move another document's nodes into this arena, returning the
    /// re-addressed top-level handles (detached, parentless)
    pub fn graft(&mut self, other: StringDoc) -> Vec<NodeId> {
        let offset = self.nodes.len() as NodeId;
        let top: Vec<NodeId> = other.top.iter().map(|id| id + offset).collect();
        for mut node in other.nodes {
            if let Some(parent) = node.parent.as_mut() {
                *parent += offset;
            }
            if let NodeData::Significant(sig) = &mut node.data {
                for child in &mut sig.children {
                    *child += offset;
                }
            }
            self.nodes.push(node);
        }
        top
    }

    /// Concatenate content onto the end of the top-level list
    pub fn append(&mut self, content: StringDoc) -> &mut Self {
        let ids = self.graft(content);
        self.top.extend_from_slice(&ids);
        self
    }

    /// Concatenate content onto the front of the top-level list
    pub fn prepend(&mut self, content: StringDoc) -> &mut Self {
        let ids = self.graft(content);
        self.top.splice(0..0, ids);
        self
    }

    /// Append content to a node's children. No-op for opaque, void, or
    /// unknown targets.
    pub fn append_to(&mut self, target: NodeId, content: StringDoc) -> &mut Self {
        let ids = self.graft(content);
        if self.accepts_children(target) {
            for &id in &ids {
                self.nodes[id as usize].parent = Some(target);
            }
            if let Some(sig) = self.nodes[target as usize].as_significant_mut() {
                sig.children.extend_from_slice(&ids);
            }
        }
        self
    }

    /// Prepend content to a node's children. No-op for opaque, void, or
    /// unknown targets.
    pub fn prepend_to(&mut self, target: NodeId, content: StringDoc) -> &mut Self {
        let ids = self.graft(content);
        if self.accepts_children(target) {
            for &id in &ids {
                self.nodes[id as usize].parent = Some(target);
            }
            if let Some(sig) = self.nodes[target as usize].as_significant_mut() {
                sig.children.splice(0..0, ids);
            }
        }
        self
    }

    fn accepts_children(&self, id: NodeId) -> bool {
        self.node(id)
            .and_then(StringNode::as_significant)
            .map(|sig| !sig.void)
            .unwrap_or(false)
    }

    /// Insert content after an anchor node in its sibling list. Silent
    /// no-op when the anchor is detached or unknown.
    pub fn insert_after(&mut self, content: StringDoc, anchor: NodeId) -> &mut Self {
        self.insert_at(content, anchor, 1)
    }

    /// Insert content before an anchor node in its sibling list. Silent
    /// no-op when the anchor is detached or unknown.
    pub fn insert_before(&mut self, content: StringDoc, anchor: NodeId) -> &mut Self {
        self.insert_at(content, anchor, 0)
    }

    fn insert_at(&mut self, content: StringDoc, anchor: NodeId, offset: usize) -> &mut Self {
        let parent = self.parent(anchor);
        let position = self.siblings(anchor).iter().position(|&id| id == anchor);
        let Some(position) = position else {
            return self;
        };

        let ids = self.graft(content);
        for &id in &ids {
            self.nodes[id as usize].parent = parent;
        }
        match parent {
            Some(parent) => {
                if let Some(sig) = self.nodes[parent as usize].as_significant_mut() {
                    sig.children.splice(position + offset..position + offset, ids);
                }
            }
            None => {
                self.top.splice(position + offset..position + offset, ids);
            }
        }
        self
    }

    /// Attach an already-grafted, detached node after an anchor in the
    /// anchor's sibling list. Silent no-op when the anchor is detached or
    /// either handle is unknown.
    pub fn insert_node_after(&mut self, node: NodeId, anchor: NodeId) -> &mut Self {
        self.insert_node_at(node, anchor, 1)
    }

    /// Attach a detached node before an anchor in its sibling list
    pub fn insert_node_before(&mut self, node: NodeId, anchor: NodeId) -> &mut Self {
        self.insert_node_at(node, anchor, 0)
    }

    fn insert_node_at(&mut self, node: NodeId, anchor: NodeId, offset: usize) -> &mut Self {
        if self.node(node).is_none() {
            return self;
        }
        let parent = self.parent(anchor);
        let position = self.siblings(anchor).iter().position(|&id| id == anchor);
        let Some(position) = position else {
            return self;
        };
        self.nodes[node as usize].parent = parent;
        match parent {
            Some(parent) => {
                if let Some(sig) = self.nodes[parent as usize].as_significant_mut() {
                    sig.children.insert(position + offset, node);
                }
            }
            None => {
                self.top.insert(position + offset, node);
            }
        }
        self
    }

    /// Detach a node from the tree. Silent no-op for detached or unknown
    /// handles. The node stays in the arena, unreachable.
    pub fn remove_node(&mut self, id: NodeId) -> &mut Self {
        let parent = self.parent(id);
        let position = self.siblings(id).iter().position(|&sib| sib == id);
        let Some(position) = position else {
            return self;
        };
        match parent {
            Some(parent) => {
                if let Some(sig) = self.nodes[parent as usize].as_significant_mut() {
                    sig.children.remove(position);
                }
            }
            None => {
                self.top.remove(position);
            }
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        self
    }

    /// Replace a node with content: insert after, then detach. Silent no-op
    /// when the node is detached or unknown.
    pub fn replace_node(&mut self, old: NodeId, content: StringDoc) -> &mut Self {
        if self.siblings(old).contains(&old) {
            self.insert_after(content, old);
            self.remove_node(old);
        }
        self
    }

    /// Replace the whole document with other content
    pub fn replace_with(&mut self, content: StringDoc) -> &mut Self {
        self.top.clear();
        let ids = self.graft(content);
        self.top = ids;
        self
    }

    /// Empty the top-level list
    pub fn clear(&mut self) -> &mut Self {
        let top: Vec<NodeId> = self.top.drain(..).collect();
        for id in top {
            if let Some(node) = self.node_mut(id) {
                node.parent = None;
            }
        }
        self
    }

    /// Remove all children of a node
    pub fn clear_node(&mut self, id: NodeId) -> &mut Self {
        let children: Vec<NodeId> = self.children(id).to_vec();
        for child in &children {
            if let Some(node) = self.node_mut(*child) {
                node.parent = None;
            }
        }
        if let Some(sig) = self.nodes.get_mut(id as usize).and_then(StringNode::as_significant_mut)
        {
            sig.children.clear();
        }
        self
    }

    // --- node content ----------------------------------------------------

    /// Get an attribute of a significant node
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(StringNode::as_significant)
            .and_then(|sig| sig.attributes.get(name))
    }

    /// Set an attribute on a significant node. No-op for opaque nodes.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        if let Some(sig) = self.nodes.get_mut(id as usize).and_then(StringNode::as_significant_mut)
        {
            sig.attributes.set(name, value);
        }
        self
    }

    /// Remove an attribute from a significant node
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> &mut Self {
        if let Some(sig) = self.nodes.get_mut(id as usize).and_then(StringNode::as_significant_mut)
        {
            sig.attributes.remove(name);
        }
        self
    }

    /// Replace a node's children with escaped text content
    pub fn set_text(&mut self, id: NodeId, text: &str) -> &mut Self {
        let escaped = encode_text(text).into_owned();
        self.set_content(id, escaped)
    }

    /// Replace a node's children with raw markup content, no escaping
    pub fn set_html(&mut self, id: NodeId, html: &str) -> &mut Self {
        self.set_content(id, html.to_string())
    }

    fn set_content(&mut self, id: NodeId, content: String) -> &mut Self {
        if !self.accepts_children(id) {
            return self;
        }
        self.clear_node(id);
        let child = self.push_opaque(&content, Some(id));
        if let Some(sig) = self.nodes[id as usize].as_significant_mut() {
            sig.children.push(child);
        }
        self
    }

    // --- copy ------------------------------------------------------------

    /// Deep copy of the whole document
    pub fn duplicate(&self) -> StringDoc {
        self.clone()
    }

    /// Copy a subtree out as a new document. `None` for unknown handles.
    pub fn extract(&self, id: NodeId) -> Option<StringDoc> {
        self.node(id)?;
        let mut out = StringDoc::default();
        let root = self.copy_into(id, &mut out, None);
        out.top.push(root);
        Some(out)
    }

    /// Deep copy of a subtree inside this arena. The copy is detached;
    /// insert it somewhere to make it reachable. `None` for unknown handles.
    pub fn duplicate_node(&mut self, id: NodeId) -> Option<NodeId> {
        let sub = self.extract(id)?;
        Some(self.graft(sub)[0])
    }

    fn copy_into(&self, id: NodeId, out: &mut StringDoc, parent: Option<NodeId>) -> NodeId {
        let source = &self.nodes[id as usize];
        let new_id = out.nodes.len() as NodeId;
        match &source.data {
            NodeData::Opaque(fragment) => {
                out.nodes.push(StringNode {
                    data: NodeData::Opaque(fragment.clone()),
                    parent,
                });
            }
            NodeData::Significant(sig) => {
                let children = sig.children.clone();
                let mut copy = sig.clone();
                copy.children = Vec::with_capacity(children.len());
                out.nodes.push(StringNode {
                    data: NodeData::Significant(copy),
                    parent,
                });
                for child in children {
                    let new_child = self.copy_into(child, out, Some(new_id));
                    if let Some(sig) = out.nodes[new_id as usize].as_significant_mut() {
                        sig.children.push(new_child);
                    }
                }
            }
        }
        new_id
    }

    // --- render ----------------------------------------------------------

    /// Render the document to markup: document order, depth first. A pure
    /// function of tree state.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for &id in &self.top {
            self.write_node(id, &mut out);
        }
        out
    }

    /// Render one subtree to markup
    pub fn render_node(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.data {
            NodeData::Opaque(fragment) => out.push_str(fragment),
            NodeData::Significant(sig) => {
                out.push_str(&sig.open);
                let _ = write!(out, "{}", sig.attributes);
                out.push('>');
                if !sig.void {
                    for &child in &sig.children {
                        self.write_node(child, out);
                    }
                    out.push_str(&sig.close);
                }
            }
        }
    }
}
