//! Markup reader module
//!
//! Pull-parser events over the tokenizer:
//! - SliceReader: zero-copy slice reader
//! - Events: spanned markup event types

pub mod events;
pub mod slice;
