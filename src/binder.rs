//! Binder protocol
//!
//! Binders sit between raw data and the document: a `BinderDef` registers
//! per-field closures for one scope name, each producing a `BoundValue`.
//! Fields with no override fall through to the wrapped object's raw value.
//!
//! Route resolution is an explicit optional capability: a binder that wants
//! to build links is handed a `&dyn RouteResolver` at construction, or
//! nothing at all.

use serde_json::Value;
use std::collections::HashMap;

/// Resolves named routes to paths. Resolution is best-effort; `None` means
/// the route cannot be built and the caller leaves the target unset.
pub trait RouteResolver {
    /// Resolve a named route, with route params drawn from `params`
    fn path(&self, name: &str, params: &Value) -> Option<String>;

    /// Resolve a route for a specific object; defaults to `path`
    fn path_to(&self, name: &str, params: &Value) -> Option<String> {
        self.path(name, params)
    }
}

/// Ordered part name → value list for a multi-part bound value
///
/// The `content` part is escaped text content, the `html` part is raw
/// markup content, and any other part is written as an attribute.
#[derive(Debug, Clone, Default)]
pub struct BindingParts {
    parts: Vec<(String, String)>,
}

impl BindingParts {
    pub fn new() -> Self {
        BindingParts::default()
    }

    /// Builder-style part write
    pub fn part(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a part; last write wins, position preserved
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.parts.iter_mut().find(|(k, _)| *k == name) {
            Some(pair) => pair.1 = value,
            None => self.parts.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.parts
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Keep only the named parts
    pub fn accept(&mut self, names: &[&str]) {
        self.parts.retain(|(k, _)| names.contains(&k.as_str()));
    }

    /// Drop the named parts
    pub fn reject(&mut self, names: &[&str]) {
        self.parts.retain(|(k, _)| !names.contains(&k.as_str()));
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterate parts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// What a binder produced for one field
#[derive(Debug, Clone)]
pub enum BoundValue {
    /// Plain value, escaped into the node's content
    Plain(Value),
    /// Multi-part value: content/html parts plus attribute writes
    Parts(BindingParts),
    /// Nothing to bind; the template content stays as authored
    Unbound,
}

/// Context handed to field closures: the wrapped object plus the optional
/// route resolver
pub struct BinderCtx<'a> {
    object: &'a Value,
    resolver: Option<&'a dyn RouteResolver>,
}

impl<'a> BinderCtx<'a> {
    /// The whole wrapped object
    pub fn object(&self) -> &Value {
        self.object
    }

    /// One field of the wrapped object
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.object.get(name)
    }

    /// Resolve a named route against the wrapped object. `None` when no
    /// resolver was provided or the route cannot be built.
    pub fn path(&self, name: &str) -> Option<String> {
        self.resolver.and_then(|r| r.path(name, self.object))
    }

    /// Resolve a route for the wrapped object specifically
    pub fn path_to(&self, name: &str) -> Option<String> {
        self.resolver.and_then(|r| r.path_to(name, self.object))
    }
}

type FieldFn = Box<dyn Fn(&BinderCtx<'_>) -> BoundValue + Send + Sync>;

/// Field overrides for one scope name
#[derive(Default)]
pub struct BinderDef {
    fields: HashMap<String, FieldFn>,
}

impl BinderDef {
    pub fn new() -> Self {
        BinderDef::default()
    }

    /// Register a field override
    pub fn field(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&BinderCtx<'_>) -> BoundValue + Send + Sync + 'static,
    ) -> Self {
        self.fields.insert(name.into(), Box::new(f));
        self
    }
}

/// Registry mapping scope name → binder definition
#[derive(Default)]
pub struct Binders {
    defs: HashMap<String, BinderDef>,
}

impl Binders {
    pub fn new() -> Self {
        Binders::default()
    }

    pub fn register(&mut self, scope: impl Into<String>, def: BinderDef) -> &mut Self {
        self.defs.insert(scope.into(), def);
        self
    }

    pub fn get(&self, scope: &str) -> Option<&BinderDef> {
        self.defs.get(scope)
    }
}

/// One bind call's view over one object. Created per bind call and dropped
/// after, so a binder is never applied to the same node twice.
pub struct Binder<'a> {
    def: Option<&'a BinderDef>,
    object: &'a Value,
    resolver: Option<&'a dyn RouteResolver>,
}

impl<'a> Binder<'a> {
    pub fn new(
        def: Option<&'a BinderDef>,
        object: &'a Value,
        resolver: Option<&'a dyn RouteResolver>,
    ) -> Self {
        Binder {
            def,
            object,
            resolver,
        }
    }

    /// Value for one field: the registered override if any, else the raw
    /// field, else nothing. Null fields bind nothing.
    pub fn value(&self, field: &str) -> BoundValue {
        if let Some(f) = self.def.and_then(|def| def.fields.get(field)) {
            return f(&BinderCtx {
                object: self.object,
                resolver: self.resolver,
            });
        }
        match self.object.get(field) {
            Some(Value::Null) | None => BoundValue::Unbound,
            Some(value) => BoundValue::Plain(value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticRoutes;

    impl RouteResolver for StaticRoutes {
        fn path(&self, name: &str, params: &Value) -> Option<String> {
            match (name, params.get("id")) {
                ("posts", _) => Some("/posts".to_string()),
                ("post", Some(id)) => Some(format!("/posts/{}", id)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_raw_field_fallthrough() {
        let object = json!({"title": "hello", "count": 3});
        let binder = Binder::new(None, &object, None);
        assert!(matches!(
            binder.value("title"),
            BoundValue::Plain(Value::String(s)) if s == "hello"
        ));
        assert!(matches!(binder.value("count"), BoundValue::Plain(_)));
        assert!(matches!(binder.value("missing"), BoundValue::Unbound));
    }

    #[test]
    fn test_null_field_unbound() {
        let object = json!({"title": null});
        let binder = Binder::new(None, &object, None);
        assert!(matches!(binder.value("title"), BoundValue::Unbound));
    }

    #[test]
    fn test_field_override() {
        let def = BinderDef::new().field("title", |ctx| {
            let raw = ctx.field("title").and_then(Value::as_str).unwrap_or("");
            BoundValue::Plain(Value::String(raw.to_uppercase()))
        });
        let object = json!({"title": "hello"});
        let binder = Binder::new(Some(&def), &object, None);
        assert!(matches!(
            binder.value("title"),
            BoundValue::Plain(Value::String(s)) if s == "HELLO"
        ));
    }

    #[test]
    fn test_override_with_route() {
        let def = BinderDef::new().field("permalink", |ctx| {
            match ctx.path("post") {
                Some(href) => BoundValue::Parts(BindingParts::new().part("href", href)),
                None => BoundValue::Unbound,
            }
        });
        let object = json!({"id": 7});
        let binder = Binder::new(Some(&def), &object, Some(&StaticRoutes));
        match binder.value("permalink") {
            BoundValue::Parts(parts) => assert_eq!(parts.get("href"), Some("/posts/7")),
            other => panic!("expected parts, got {:?}", other),
        }
    }

    #[test]
    fn test_parts_accept_reject() {
        let mut parts = BindingParts::new()
            .part("content", "text")
            .part("class", "hot")
            .part("href", "/x");
        parts.accept(&["content", "href"]);
        assert_eq!(parts.get("class"), None);
        parts.reject(&["href"]);
        assert_eq!(parts.get("href"), None);
        assert_eq!(parts.get("content"), Some("text"));
    }

}
