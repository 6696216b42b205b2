//! StringNode - arena node for the significant-node document
//!
//! Nodes live in the owning document's arena and are addressed by stable
//! `NodeId` handles. A node is either an opaque literal fragment (a subtree
//! with no significant descendant, collapsed to one string) or a significant
//! node carrying type, name, labels, attributes, and child handles.
//!
//! The parent handle is a back-reference only, used for lookups such as
//! locating a node's sibling list. Ownership and traversal always go through
//! child lists, never through the parent link.

use super::attributes::StringAttributes;
use std::collections::HashMap;

/// Compact node identifier (index into the document arena)
pub type NodeId = u32;

/// Kind of significant node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignificantKind {
    /// Insignificant element kept only because a descendant is significant
    Structure,
    /// Named data region representing one record
    BindingScope,
    /// One field within a binding scope
    BindingProp,
    /// Form scope (binding scope with form semantics)
    Form,
    /// Named layout insertion point
    Container,
    /// Partial include point
    Partial,
    /// UI component mount point
    Component,
    /// Alternate template version (outside a binding)
    Versioned,
}

/// Arbitrary key→value metadata attached to a significant node during
/// parsing (e.g. `version`, `include`, `exclude`)
pub type Labels = HashMap<String, String>;

/// Payload of a document node
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Pre-rendered literal fragment; no children, no type, no name
    Opaque(String),
    /// Structurally tracked node
    Significant(Significant),
}

/// Data carried by a significant node
#[derive(Debug, Clone)]
pub struct Significant {
    pub kind: SignificantKind,
    /// Binding/container/partial/component name, when the kind carries one
    pub name: Option<String>,
    pub labels: Labels,
    pub attributes: StringAttributes,
    /// Open-tag prefix, e.g. `<div`
    pub open: String,
    /// Closing fragment, e.g. `</div>`; empty for void elements. Set once
    /// during parse, never re-derived.
    pub close: String,
    /// Void elements render no `>`+children+close sequence
    pub void: bool,
    /// Ordered child handles
    pub children: Vec<NodeId>,
}

/// A node in the document arena
#[derive(Debug, Clone)]
pub struct StringNode {
    pub data: NodeData,
    /// Weak back-reference to the owning parent, `None` for top-level or
    /// detached nodes
    pub parent: Option<NodeId>,
}

impl StringNode {
    /// Create an opaque literal node
    pub fn opaque(fragment: impl Into<String>) -> Self {
        StringNode {
            data: NodeData::Opaque(fragment.into()),
            parent: None,
        }
    }

    /// Create a significant node
    pub fn significant(data: Significant) -> Self {
        StringNode {
            data: NodeData::Significant(data),
            parent: None,
        }
    }

    /// Get the significant payload, if this node has one
    pub fn as_significant(&self) -> Option<&Significant> {
        match &self.data {
            NodeData::Significant(sig) => Some(sig),
            NodeData::Opaque(_) => None,
        }
    }

    /// Mutable significant payload
    pub fn as_significant_mut(&mut self) -> Option<&mut Significant> {
        match &mut self.data {
            NodeData::Significant(sig) => Some(sig),
            NodeData::Opaque(_) => None,
        }
    }

    /// Kind of this node, `None` for opaque nodes
    pub fn kind(&self) -> Option<SignificantKind> {
        self.as_significant().map(|sig| sig.kind)
    }

    /// Name of this node, `None` for opaque or unnamed nodes
    pub fn name(&self) -> Option<&str> {
        self.as_significant().and_then(|sig| sig.name.as_deref())
    }

    /// Child handles; empty for opaque nodes
    pub fn children(&self) -> &[NodeId] {
        match &self.data {
            NodeData::Significant(sig) => &sig.children,
            NodeData::Opaque(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_node() {
        let node = StringNode::opaque("<p>hi</p>");
        assert!(node.as_significant().is_none());
        assert!(node.kind().is_none());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_significant_node() {
        let node = StringNode::significant(Significant {
            kind: SignificantKind::BindingProp,
            name: Some("title".to_string()),
            labels: Labels::new(),
            attributes: StringAttributes::new(),
            open: "<h1".to_string(),
            close: "</h1>".to_string(),
            void: false,
            children: vec![],
        });
        assert_eq!(node.kind(), Some(SignificantKind::BindingProp));
        assert_eq!(node.name(), Some("title"));
    }
}
