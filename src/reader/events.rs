//! Markup event types
//!
//! Event types for pull-parser style template processing. Unlike a generic
//! reader, every event keeps its byte span: the document engine collapses
//! inert subtrees into verbatim slices of the original input.

use crate::core::attributes::Attribute;

/// A markup parsing event
#[derive(Debug, Clone)]
pub enum MarkupEvent<'a> {
    /// Start of an element: <name attrs...>
    StartElement(StartElement<'a>),
    /// End of an element: </name>
    EndElement(EndElement<'a>),
    /// Self-closed element: <name attrs.../>
    EmptyElement(StartElement<'a>),
    /// Text content between tags
    Text { span: (usize, usize) },
    /// Comment, including its delimiters
    Comment { span: (usize, usize) },
    /// CDATA section, including its delimiters
    CData { span: (usize, usize) },
    /// DOCTYPE declaration
    Doctype { span: (usize, usize) },
    /// End of document
    EndDocument,
}

/// Start element event data
#[derive(Debug, Clone)]
pub struct StartElement<'a> {
    /// Element name
    pub name: &'a str,
    /// Element attributes
    pub attributes: Vec<Attribute<'a>>,
    /// Span of the open tag, '<' through '>'
    pub span: (usize, usize),
}

impl<'a> StartElement<'a> {
    /// Get an attribute value by name as string
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name_str() == Some(name))
            .and_then(|a| a.value_str())
    }

    /// Check for an attribute by name
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name_str() == Some(name))
    }
}

/// End element event data
#[derive(Debug, Clone)]
pub struct EndElement<'a> {
    /// Element name
    pub name: &'a str,
    /// Span of the close tag
    pub span: (usize, usize),
}
