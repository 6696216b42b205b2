//! Raw element tree
//!
//! Arena-backed tree over the reader events. Every node keeps its full byte
//! span in the input, so any subtree can be sliced back out verbatim. The
//! significant-node parser walks this tree; subtrees it deems inert never
//! become more than a span.
//!
//! Structure is checked strictly: mismatched or unclosed tags are parse
//! errors. HTML void elements (`br`, `img`, `input`, ...) take no close tag.

use crate::core::attributes::Attribute;
use crate::error::ParseError;
use crate::reader::events::MarkupEvent;
use crate::reader::slice::SliceReader;

/// Compact raw node identifier (index into the arena)
pub type RawId = u32;

/// HTML elements that never take a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Check whether a tag name is an HTML void element
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|v| v.eq_ignore_ascii_case(name))
}

/// Payload of a raw node
#[derive(Debug)]
pub enum RawData<'a> {
    /// An element with parsed attributes and child links
    Element {
        name: &'a str,
        attributes: Vec<Attribute<'a>>,
        children: Vec<RawId>,
        void: bool,
    },
    /// Text, comment, CDATA, or DOCTYPE; only the span matters
    Inert,
}

/// A raw node in the arena
#[derive(Debug)]
pub struct RawNode<'a> {
    pub data: RawData<'a>,
    /// Full byte range in the input, open tag through close tag
    pub span: (usize, usize),
}

/// Raw markup tree, the engine parser's input
#[derive(Debug)]
pub struct RawDocument<'a> {
    input: &'a [u8],
    nodes: Vec<RawNode<'a>>,
    top: Vec<RawId>,
}

impl<'a> RawDocument<'a> {
    /// Parse template input into a raw tree. Fails fast on malformed markup.
    pub fn parse(input: &'a [u8]) -> Result<Self, ParseError> {
        let mut doc = RawDocument {
            input,
            nodes: Vec::with_capacity(64),
            top: Vec::new(),
        };

        let mut reader = SliceReader::new(input);
        // Open elements: (node id, name, open-tag start)
        let mut stack: Vec<(RawId, &'a str, usize)> = Vec::new();

        while let Some(event) = reader.next_event()? {
            match event {
                MarkupEvent::StartElement(elem) => {
                    let void = is_void_element(elem.name);
                    let id = doc.push_node(
                        RawData::Element {
                            name: elem.name,
                            attributes: elem.attributes,
                            children: Vec::new(),
                            void,
                        },
                        elem.span,
                        stack.last().map(|(id, _, _)| *id),
                    );
                    if !void {
                        stack.push((id, elem.name, elem.span.0));
                    }
                }

                MarkupEvent::EmptyElement(elem) => {
                    let void = is_void_element(elem.name);
                    doc.push_node(
                        RawData::Element {
                            name: elem.name,
                            attributes: elem.attributes,
                            children: Vec::new(),
                            void,
                        },
                        elem.span,
                        stack.last().map(|(id, _, _)| *id),
                    );
                }

                MarkupEvent::EndElement(end) => {
                    let (id, open_name, _) = stack.pop().ok_or_else(|| {
                        ParseError::new(
                            format!("unexpected end tag: </{}>", end.name),
                            end.span.0,
                        )
                    })?;
                    if !open_name.eq_ignore_ascii_case(end.name) {
                        return Err(ParseError::new(
                            format!("tag mismatch: <{}> closed with </{}>", open_name, end.name),
                            end.span.0,
                        ));
                    }
                    doc.nodes[id as usize].span.1 = end.span.1;
                }

                MarkupEvent::Text { span }
                | MarkupEvent::Comment { span }
                | MarkupEvent::CData { span }
                | MarkupEvent::Doctype { span } => {
                    doc.push_node(RawData::Inert, span, stack.last().map(|(id, _, _)| *id));
                }

                MarkupEvent::EndDocument => break,
            }
        }

        if let Some((_, name, start)) = stack.first() {
            return Err(ParseError::new(format!("unclosed tag: <{}>", name), *start));
        }

        Ok(doc)
    }

    fn push_node(
        &mut self,
        data: RawData<'a>,
        span: (usize, usize),
        parent: Option<RawId>,
    ) -> RawId {
        let id = self.nodes.len() as RawId;
        self.nodes.push(RawNode { data, span });
        match parent {
            Some(parent_id) => {
                if let RawData::Element { children, .. } = &mut self.nodes[parent_id as usize].data
                {
                    children.push(id);
                }
            }
            None => self.top.push(id),
        }
        id
    }

    /// Top-level node ids, in document order
    pub fn top(&self) -> &[RawId] {
        &self.top
    }

    /// Get a node by id
    pub fn node(&self, id: RawId) -> &RawNode<'a> {
        &self.nodes[id as usize]
    }

    /// Slice the verbatim input fragment covering `span`
    pub fn fragment(&self, span: (usize, usize)) -> &'a str {
        // Input came in as &str, so span boundaries sit on valid UTF-8
        std::str::from_utf8(&self.input[span.0..span.1]).unwrap_or("")
    }

    /// View an element node for matcher inspection
    pub fn element(&self, id: RawId) -> Option<RawElement<'a, '_>> {
        match &self.nodes[id as usize].data {
            RawData::Element { .. } => Some(RawElement { doc: self, id }),
            RawData::Inert => None,
        }
    }
}

/// Read-only view of one raw element, handed to significant-type matchers
#[derive(Clone, Copy)]
pub struct RawElement<'a, 'd> {
    doc: &'d RawDocument<'a>,
    id: RawId,
}

impl<'a, 'd> RawElement<'a, 'd> {
    pub fn id(&self) -> RawId {
        self.id
    }

    /// Element tag name
    pub fn name(&self) -> &'a str {
        match &self.doc.node(self.id).data {
            RawData::Element { name, .. } => name,
            RawData::Inert => "",
        }
    }

    /// Whether this is a void element
    pub fn is_void(&self) -> bool {
        matches!(
            self.doc.node(self.id).data,
            RawData::Element { void: true, .. }
        )
    }

    /// Parsed attributes of the element
    pub fn attributes(&self) -> &'d [Attribute<'a>] {
        match &self.doc.node(self.id).data {
            RawData::Element { attributes, .. } => attributes,
            RawData::Inert => &[],
        }
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&'d str> {
        self.attributes()
            .iter()
            .find(|a| a.name_str() == Some(name))
            .and_then(|a| a.value_str())
    }

    /// Check for an attribute by name
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes().iter().any(|a| a.name_str() == Some(name))
    }

    /// Child node ids
    pub fn children(&self) -> &'d [RawId] {
        match &self.doc.node(self.id).data {
            RawData::Element { children, .. } => children,
            RawData::Inert => &[],
        }
    }

    /// Check whether any descendant element satisfies `test`
    pub fn any_descendant(&self, test: &dyn Fn(RawElement<'a, '_>) -> bool) -> bool {
        let mut stack: Vec<RawId> = self.children().to_vec();
        while let Some(id) = stack.pop() {
            if let Some(el) = self.doc.element(id) {
                if test(el) {
                    return true;
                }
                stack.extend_from_slice(el.children());
            }
        }
        false
    }
}
