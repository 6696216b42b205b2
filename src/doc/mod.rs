//! Significant-node document
//!
//! - StringDoc: parse once, mutate many, render fast
//! - StringNode: arena node (opaque literal | significant)
//! - StringAttributes: ordered attribute map
//! - SignificantRegistry: pluggable marker matchers

pub mod attributes;
pub mod document;
pub mod node;
pub mod significant;
