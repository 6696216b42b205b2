//! StringAttributes - ordered attribute map for significant nodes
//!
//! Insertion-ordered name→value pairs. Duplicate keys are not allowed: a
//! second write to the same name replaces the value in place, keeping the
//! original position. Serializes to ` name="value"` pairs with attribute
//! escaping applied.

use crate::core::entities::encode_attribute;
use std::fmt;

/// Ordered mapping from attribute name to value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringAttributes {
    pairs: Vec<(String, String)>,
}

impl StringAttributes {
    pub fn new() -> Self {
        StringAttributes { pairs: Vec::new() }
    }

    /// Get an attribute value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check for an attribute by name
    pub fn has(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Set an attribute. Last write wins; an existing name keeps its
    /// position, a new name is appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    /// Remove an attribute by name, returning its value if present
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == name)?;
        Some(self.pairs.remove(index).1)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for StringAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.pairs {
            write!(f, " {}=\"{}\"", name, encode_attribute(value))?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = StringAttributes::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut attrs = StringAttributes::new();
        attrs.set("class", "card");
        attrs.set("id", "main");
        attrs.set("data-b", "post");
        assert_eq!(
            attrs.to_string(),
            " class=\"card\" id=\"main\" data-b=\"post\""
        );
    }

    #[test]
    fn test_last_write_wins_in_place() {
        let mut attrs = StringAttributes::new();
        attrs.set("class", "a");
        attrs.set("id", "x");
        attrs.set("class", "b");
        assert_eq!(attrs.get("class"), Some("b"));
        assert_eq!(attrs.to_string(), " class=\"b\" id=\"x\"");
    }

    #[test]
    fn test_remove() {
        let mut attrs = StringAttributes::new();
        attrs.set("id", "x");
        assert_eq!(attrs.remove("id"), Some("x".to_string()));
        assert_eq!(attrs.remove("id"), None);
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_values_escaped_on_serialize() {
        let mut attrs = StringAttributes::new();
        attrs.set("title", "Tom & \"Jerry\"");
        assert_eq!(attrs.to_string(), " title=\"Tom &amp; &quot;Jerry&quot;\"");
    }
}
