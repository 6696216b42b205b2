//! Zero-copy slice reader
//!
//! Turns tokenizer tokens into markup events. Input references are
//! maintained directly in the output; nothing is copied here.

use super::events::{EndElement, MarkupEvent, StartElement};
use crate::core::attributes::{parse_attributes, Attribute};
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};
use crate::error::ParseError;

/// Zero-copy markup reader over a byte slice
pub struct SliceReader<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
}

impl<'a> SliceReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Get the next markup event, or `None` at end of input
    pub fn next_event(&mut self) -> Result<Option<MarkupEvent<'a>>, ParseError> {
        loop {
            let token = match self.tokenizer.next_token()? {
                Some(token) => token,
                None => return Ok(None),
            };

            match token.kind {
                TokenKind::Eof => return Ok(Some(MarkupEvent::EndDocument)),

                TokenKind::StartTag => {
                    let attrs = self.parse_tag_attributes(&token);
                    let name = self.token_name(&token)?;
                    return Ok(Some(MarkupEvent::StartElement(StartElement {
                        name,
                        attributes: attrs,
                        span: token.span,
                    })));
                }

                TokenKind::EmptyTag => {
                    let attrs = self.parse_tag_attributes(&token);
                    let name = self.token_name(&token)?;
                    return Ok(Some(MarkupEvent::EmptyElement(StartElement {
                        name,
                        attributes: attrs,
                        span: token.span,
                    })));
                }

                TokenKind::EndTag => {
                    let name = self.token_name(&token)?;
                    return Ok(Some(MarkupEvent::EndElement(EndElement {
                        name,
                        span: token.span,
                    })));
                }

                TokenKind::Text => {
                    let (start, end) = token.span;
                    if start < end {
                        return Ok(Some(MarkupEvent::Text { span: token.span }));
                    }
                    // Zero-length text, keep pulling
                }

                TokenKind::Comment => return Ok(Some(MarkupEvent::Comment { span: token.span })),
                TokenKind::CData => return Ok(Some(MarkupEvent::CData { span: token.span })),
                TokenKind::Doctype => return Ok(Some(MarkupEvent::Doctype { span: token.span })),
            }
        }
    }

    fn token_name(&self, token: &Token<'a>) -> Result<&'a str, ParseError> {
        let name = token
            .name
            .ok_or_else(|| ParseError::new("tag token without a name", token.span.0))?;
        std::str::from_utf8(name)
            .map_err(|_| ParseError::new("element name is not valid UTF-8", token.span.0))
    }

    /// Parse attributes from a tag token's span
    fn parse_tag_attributes(&self, token: &Token<'a>) -> Vec<Attribute<'a>> {
        let (start, end) = token.span;
        let tag_content = &self.input[start..end];

        // Skip '<' and the tag name
        let mut pos = 1;
        while pos < tag_content.len() {
            let b = tag_content[pos];
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' || b == b'>' || b == b'/' {
                break;
            }
            pos += 1;
        }

        // Trim the closing '>' or '/>'
        let mut attr_end = tag_content.len();
        if tag_content.ends_with(b"/>") {
            attr_end -= 2;
        } else if tag_content.ends_with(b">") {
            attr_end -= 1;
        }

        if pos >= attr_end {
            return Vec::new();
        }

        parse_attributes(&tag_content[pos..attr_end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(input: &[u8]) -> Vec<MarkupEvent<'_>> {
        let mut reader = SliceReader::new(input);
        let mut out = Vec::new();
        while let Some(event) = reader.next_event().expect("parse error") {
            if matches!(event, MarkupEvent::EndDocument) {
                break;
            }
            out.push(event);
        }
        out
    }

    #[test]
    fn test_simple_element() {
        let evts = events(b"<article>hello</article>");
        assert_eq!(evts.len(), 3);
        assert!(matches!(&evts[0], MarkupEvent::StartElement(e) if e.name == "article"));
        assert!(matches!(&evts[1], MarkupEvent::Text { span } if *span == (9, 14)));
        assert!(matches!(&evts[2], MarkupEvent::EndElement(e) if e.name == "article"));
    }

    #[test]
    fn test_empty_element() {
        let evts = events(b"<br/>");
        assert_eq!(evts.len(), 1);
        assert!(matches!(&evts[0], MarkupEvent::EmptyElement(e) if e.name == "br"));
    }

    #[test]
    fn test_attributes() {
        let evts = events(b"<div data-b=\"post\" class=\"card\"/>");
        if let MarkupEvent::EmptyElement(e) = &evts[0] {
            assert_eq!(e.get_attribute("data-b"), Some("post"));
            assert_eq!(e.get_attribute("class"), Some("card"));
        } else {
            panic!("expected EmptyElement");
        }
    }

    #[test]
    fn test_comment_and_doctype() {
        let evts = events(b"<!DOCTYPE html><!-- note --><p>x</p>");
        assert!(matches!(&evts[0], MarkupEvent::Doctype { span } if *span == (0, 15)));
        assert!(matches!(&evts[1], MarkupEvent::Comment { .. }));
    }

    #[test]
    fn test_malformed_surfaces_error() {
        let mut reader = SliceReader::new(b"<div><!-- broken");
        assert!(reader.next_event().is_ok());
        assert!(reader.next_event().is_err());
    }
}
