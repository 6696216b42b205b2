//! Core markup parsing primitives
//!
//! The fundamental building blocks under the document engine:
//! - Scanner: memchr-accelerated delimiter detection
//! - Tokenizer: state machine for spanned markup tokens
//! - Entities: entity decoding plus text/attribute escaping
//! - Attributes: raw attribute parsing (HTML-lenient)

pub mod attributes;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
