//! Template store
//!
//! Parse once, render many: templates register by name, the store keeps
//! the parsed documents in an LRU cache backed by the original sources.
//! Fetching always hands out a deep duplicate, so every render pass
//! mutates its own tree and the cached original stays pristine. An entry
//! evicted under cache pressure is re-parsed from its source on the next
//! fetch.

use crate::doc::document::StringDoc;
use crate::doc::significant::SignificantRegistry;
use crate::error::ParseError;
use log::debug;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Named template registry with a bounded parsed-document cache
pub struct TemplateStore {
    registry: SignificantRegistry,
    sources: HashMap<String, String>,
    parsed: LruCache<String, StringDoc>,
}

impl TemplateStore {
    /// Create a store caching up to `capacity` parsed templates
    pub fn new(capacity: usize) -> Self {
        TemplateStore::with_registry(capacity, SignificantRegistry::default())
    }

    /// Create a store parsing with a custom significant-type registry
    pub fn with_registry(capacity: usize, registry: SignificantRegistry) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        TemplateStore {
            registry,
            sources: HashMap::new(),
            parsed: LruCache::new(capacity),
        }
    }

    /// Register a template. Parses eagerly so malformed markup fails here,
    /// not at fetch time.
    pub fn insert(&mut self, name: &str, markup: &str) -> Result<&mut Self, ParseError> {
        let doc = StringDoc::parse(markup, &self.registry)?;
        self.sources.insert(name.to_string(), markup.to_string());
        self.parsed.put(name.to_string(), doc);
        Ok(self)
    }

    /// Whether a template is registered
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Registered template count
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fetch a deep duplicate of a template, re-parsing if it was evicted.
    /// `None` for unregistered names.
    pub fn fetch(&mut self, name: &str) -> Option<StringDoc> {
        if let Some(doc) = self.parsed.get(name) {
            return Some(doc.duplicate());
        }
        let source = self.sources.get(name)?;
        debug!("re-parsing evicted template '{}'", name);
        // Sources are validated at insert, so this parse cannot fail
        let doc = StringDoc::parse(source, &self.registry).ok()?;
        let duplicate = doc.duplicate();
        self.parsed.put(name.to_string(), doc);
        Some(duplicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_returns_duplicate() {
        let mut store = TemplateStore::new(4);
        store
            .insert("post/show", "<h1 data-b=\"title\">x</h1>")
            .unwrap();

        let mut first = store.fetch("post/show").unwrap();
        let top = first.top()[0];
        first.set_text(top, "mutated");

        let second = store.fetch("post/show").unwrap();
        assert_eq!(second.render(), "<h1 data-b=\"title\">x</h1>");
    }

    #[test]
    fn test_unknown_name() {
        let mut store = TemplateStore::new(4);
        assert!(store.fetch("nope").is_none());
        assert!(!store.contains("nope"));
    }

    #[test]
    fn test_malformed_template_fails_at_insert() {
        let mut store = TemplateStore::new(4);
        assert!(store.insert("bad", "<div><p></div>").is_err());
        assert!(!store.contains("bad"));
    }

    #[test]
    fn test_evicted_template_reparsed() {
        let mut store = TemplateStore::new(1);
        store.insert("a", "<p>a</p>").unwrap();
        store.insert("b", "<p>b</p>").unwrap();
        // "a" was evicted by "b"
        assert_eq!(store.fetch("a").unwrap().render(), "<p>a</p>");
        assert_eq!(store.fetch("b").unwrap().render(), "<p>b</p>");
        assert_eq!(store.len(), 2);
    }
}
