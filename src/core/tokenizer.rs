//! Template tokenizer - state machine for markup token extraction
//!
//! Pull-parser style tokenizer over template input. Every token carries its
//! byte span so callers can slice the original input back out verbatim,
//! which is what the opaque-node optimization relies on.
//!
//! Malformed markup is a hard error: templates are developer-authored and
//! checked once at load time, so failing fast beats silently misrendering.

use super::scanner::Scanner;
use crate::error::ParseError;

/// Type of markup token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Self-closed element: <element/>
    EmptyTag,
    /// Text content between tags
    Text,
    /// Comment: <!--...-->
    Comment,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// DOCTYPE declaration
    Doctype,
    /// End of input
    Eof,
}

/// A token sliced out of the input
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags: the element name
    pub name: Option<&'a [u8]>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(name);
        self
    }
}

/// Markup tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            done: false,
        }
    }

    /// Get the current position in the input
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.scanner.position())
    }

    /// Get the next token. Returns an `Eof` token exactly once at end of
    /// input, then `None`.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        if self.done {
            return Ok(None);
        }

        if self.scanner.is_eof() {
            self.done = true;
            let pos = self.scanner.position();
            return Ok(Some(Token::new(TokenKind::Eof, (pos, pos))));
        }

        match self.scanner.peek() {
            Some(b'<') => self.parse_markup().map(Some),
            Some(_) => self.parse_text().map(Some),
            None => {
                self.done = true;
                let pos = self.scanner.position();
                Ok(Some(Token::new(TokenKind::Eof, (pos, pos))))
            }
        }
    }

    /// Parse text content up to the next '<' or end of input
    fn parse_text(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.scanner.position();
        let end = self.scanner.find_byte(b'<').unwrap_or_else(|| {
            self.scanner.remaining().len() + self.scanner.position()
        });
        self.scanner.set_position(end);
        Ok(Token::new(TokenKind::Text, (start, end)))
    }

    /// Parse markup starting with '<'
    fn parse_markup(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(1); // Skip '<'

        match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang_markup(start),
            Some(b'?') => Err(self.error(
                "processing instructions are not supported in templates",
            )),
            Some(_) => self.parse_start_tag(start),
            None => Err(self.error("unexpected end of input after '<'")),
        }
    }

    /// Parse a start tag or self-closed tag
    fn parse_start_tag(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| self.error("invalid element name"))?;

        let end = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| self.error("unterminated tag"))?;

        let is_empty = end > start + 1 && self.scanner.slice(end - 1, end) == b"/";

        self.scanner.set_position(end + 1);
        let kind = if is_empty {
            TokenKind::EmptyTag
        } else {
            TokenKind::StartTag
        };
        Ok(Token::new(kind, (start, end + 1)).with_name(name))
    }

    /// Parse an end tag
    fn parse_end_tag(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1); // Skip '/'

        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| self.error("invalid element name in end tag"))?;

        let end = self
            .scanner
            .find_byte(b'>')
            .ok_or_else(|| self.error("unterminated end tag"))?;

        self.scanner.set_position(end + 1);
        Ok(Token::new(TokenKind::EndTag, (start, end + 1)).with_name(name))
    }

    /// Parse markup starting with '<!' (comment, CDATA, DOCTYPE)
    fn parse_bang_markup(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1); // Skip '!'

        if self.scanner.starts_with(b"--") {
            self.parse_comment(start)
        } else if self.scanner.starts_with(b"[CDATA[") {
            self.parse_cdata(start)
        } else if self.scanner.starts_with(b"DOCTYPE") || self.scanner.starts_with(b"doctype") {
            self.parse_doctype(start)
        } else {
            Err(self.error("invalid declaration: expected comment, CDATA, or DOCTYPE"))
        }
    }

    /// Parse a comment <!--...-->
    fn parse_comment(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(2); // Skip '--'

        loop {
            let pos = self
                .scanner
                .find_byte(b'-')
                .ok_or_else(|| self.error("unterminated comment"))?;
            self.scanner.set_position(pos);

            if self.scanner.starts_with(b"-->") {
                self.scanner.advance(3);
                return Ok(Token::new(
                    TokenKind::Comment,
                    (start, self.scanner.position()),
                ));
            }
            self.scanner.advance(1);
        }
    }

    /// Parse a CDATA section <![CDATA[...]]>
    fn parse_cdata(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(7); // Skip '[CDATA['

        loop {
            let pos = self
                .scanner
                .find_byte(b']')
                .ok_or_else(|| self.error("unterminated CDATA section"))?;
            self.scanner.set_position(pos);

            if self.scanner.starts_with(b"]]>") {
                self.scanner.advance(3);
                return Ok(Token::new(
                    TokenKind::CData,
                    (start, self.scanner.position()),
                ));
            }
            self.scanner.advance(1);
        }
    }

    /// Parse a DOCTYPE declaration
    fn parse_doctype(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let end = self
            .scanner
            .find_byte(b'>')
            .ok_or_else(|| self.error("unterminated DOCTYPE"))?;
        self.scanner.set_position(end + 1);
        Ok(Token::new(TokenKind::Doctype, (start, end + 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Vec<Token<'_>> {
        let mut tokenizer = Tokenizer::new(input);
        let mut out = Vec::new();
        while let Some(token) = tokenizer.next_token().expect("parse error") {
            if token.kind == TokenKind::Eof {
                break;
            }
            out.push(token);
        }
        out
    }

    #[test]
    fn test_simple_element() {
        let toks = tokens(b"<div>hello</div>");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[0].kind, TokenKind::StartTag);
        assert_eq!(toks[0].name, Some(b"div" as &[u8]));
        assert_eq!(toks[1].kind, TokenKind::Text);
        assert_eq!(toks[1].span, (5, 10));
        assert_eq!(toks[2].kind, TokenKind::EndTag);
    }

    #[test]
    fn test_self_closed() {
        let toks = tokens(b"<br/>");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::EmptyTag);
    }

    #[test]
    fn test_spans_cover_input() {
        let input = b"<div id=\"a\">x</div>";
        let toks = tokens(input);
        assert_eq!(toks[0].span, (0, 12));
        assert_eq!(toks[2].span, (13, 19));
    }

    #[test]
    fn test_comment() {
        let toks = tokens(b"<!-- hi -->");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Comment);
        assert_eq!(toks[0].span, (0, 11));
    }

    #[test]
    fn test_doctype() {
        let toks = tokens(b"<!DOCTYPE html><html></html>");
        assert_eq!(toks[0].kind, TokenKind::Doctype);
        assert_eq!(toks[0].span, (0, 15));
    }

    #[test]
    fn test_cdata() {
        let toks = tokens(b"<![CDATA[a < b]]>");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::CData);
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let toks = tokens(b"<a title=\"a > b\">x</a>");
        assert_eq!(toks[0].kind, TokenKind::StartTag);
        assert_eq!(toks[0].span.1, 17);
    }

    #[test]
    fn test_unterminated_tag_fails() {
        let mut tokenizer = Tokenizer::new(b"<div");
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn test_unterminated_comment_fails() {
        let mut tokenizer = Tokenizer::new(b"<!-- never closed");
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn test_processing_instruction_rejected() {
        let mut tokenizer = Tokenizer::new(b"<?xml version=\"1.0\"?>");
        assert!(tokenizer.next_token().is_err());
    }
}
