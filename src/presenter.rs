//! Presenter protocol
//!
//! Three operations over binding scopes, each permissive about missing
//! scopes and tolerant of extra data:
//!
//! - `transform`: reshape a scope to match the arity of its data, leaving
//!   exactly one structurally-identical sibling per item.
//! - `bind`: write one object's fields into a scope's props.
//! - `present`: transform, bind each item, then recurse into nested scopes.
//!
//! Data is `serde_json::Value`; null and absent behave alike throughout.

use crate::binder::{Binder, Binders, BoundValue, RouteResolver};
use crate::doc::document::StringDoc;
use crate::doc::node::{NodeId, SignificantKind};
use crate::doc::significant::{ATTR_EXCLUDE, ATTR_INCLUDE, LABEL_VERSION};
use crate::inflect::pluralize;
use log::{debug, trace};
use serde_json::Value;

/// Presents data into a document's binding scopes
pub struct Presenter<'a> {
    doc: &'a mut StringDoc,
    binders: Option<&'a Binders>,
    resolver: Option<&'a dyn RouteResolver>,
}

impl<'a> Presenter<'a> {
    pub fn new(doc: &'a mut StringDoc) -> Self {
        Presenter {
            doc,
            binders: None,
            resolver: None,
        }
    }

    /// Attach a binder registry
    pub fn with_binders(mut self, binders: &'a Binders) -> Self {
        self.binders = Some(binders);
        self
    }

    /// Attach a route resolver, handed through to binders
    pub fn with_resolver(mut self, resolver: &'a dyn RouteResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Reshape every scope named `name` to match the data's arity
    pub fn transform(&mut self, name: &str, data: &Value) -> &mut Self {
        debug!("transform scope '{}'", name);
        for scope in scope_nodes(self.doc, name) {
            transform_node(self.doc, scope, data, &mut |_, _, _| {});
        }
        self
    }

    /// Bind one object's fields into every scope named `name`. Null data
    /// is a no-op; unknown fields in the data are ignored.
    pub fn bind(&mut self, name: &str, data: &Value) -> &mut Self {
        if data.is_null() {
            return self;
        }
        debug!("bind scope '{}'", name);
        for scope in scope_nodes(self.doc, name) {
            bind_node(self.doc, scope, name, data, self.binders, self.resolver);
        }
        self
    }

    /// Transform, bind each item, and recurse into nested scopes
    pub fn present(&mut self, name: &str, data: &Value) -> &mut Self {
        debug!("present scope '{}'", name);
        for scope in scope_nodes(self.doc, name) {
            present_node(self.doc, scope, name, data, self.binders, self.resolver);
        }
        self
    }
}

/// Binding scopes (including forms) named `name`, skipping alternate
/// versions; those are reshaped through their default sibling
fn scope_nodes(doc: &StringDoc, name: &str) -> Vec<NodeId> {
    doc.find_significant(None, Some(name))
        .into_iter()
        .filter(|&id| {
            matches!(
                doc.kind(id),
                Some(SignificantKind::BindingScope) | Some(SignificantKind::Form)
            )
        })
        .filter(|&id| doc.label(id, LABEL_VERSION) != Some("empty"))
        .collect()
}

/// Normalize data to the sequence a scope is shaped against
fn as_sequence(data: &Value) -> Vec<&Value> {
    match data {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Sibling of `scope` holding its `empty` version, if the template has one
fn empty_version_sibling(doc: &StringDoc, scope: NodeId) -> Option<NodeId> {
    let name = doc.name(scope)?.to_string();
    doc.siblings(scope)
        .iter()
        .copied()
        .find(|&sib| {
            sib != scope
                && doc.name(sib) == Some(name.as_str())
                && doc.label(sib, LABEL_VERSION) == Some("empty")
        })
}

/// Reshape one scope node against `data`, running `step` once per item on
/// the node that represents it
fn transform_node<F>(doc: &mut StringDoc, scope: NodeId, data: &Value, step: &mut F)
where
    F: FnMut(&mut StringDoc, NodeId, &Value),
{
    let items = as_sequence(data);

    if items.is_empty() {
        // Empty presentation: the empty version takes over if authored
        doc.remove_node(scope);
        return;
    }

    if let Some(empty) = empty_version_sibling(doc, scope) {
        doc.remove_node(empty);
    }

    // Pristine detached copy taken before any item touches the original
    let template = doc.duplicate_node(scope);

    step(doc, scope, items[0]);
    let mut anchor = scope;

    for item in &items[1..] {
        let Some(template) = template else { break };
        let Some(fresh) = doc.duplicate_node(template) else { break };
        doc.insert_node_after(fresh, anchor);
        step(doc, fresh, item);
        anchor = fresh;
    }
}

/// Prop nodes belonging to a scope, not crossing nested scopes
fn scope_props(doc: &StringDoc, scope: NodeId) -> Vec<NodeId> {
    let mut props = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(scope).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        match doc.kind(id) {
            Some(SignificantKind::BindingScope) | Some(SignificantKind::Form) => {}
            Some(SignificantKind::BindingProp) => props.push(id),
            _ => {
                for &child in doc.children(id).iter().rev() {
                    stack.push(child);
                }
            }
        }
    }
    props
}

/// Nested binding scopes directly inside a scope node, not crossing
/// deeper scopes
fn nested_scopes(doc: &StringDoc, scope: NodeId) -> Vec<NodeId> {
    let mut scopes = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(scope).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        match doc.kind(id) {
            Some(SignificantKind::BindingScope) | Some(SignificantKind::Form) => scopes.push(id),
            _ => {
                for &child in doc.children(id).iter().rev() {
                    stack.push(child);
                }
            }
        }
    }
    scopes
}

fn value_as_content(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write one object into one scope node
fn bind_node(
    doc: &mut StringDoc,
    scope: NodeId,
    name: &str,
    data: &Value,
    binders: Option<&Binders>,
    resolver: Option<&dyn RouteResolver>,
) {
    if data.is_null() {
        return;
    }

    let binder = Binder::new(binders.and_then(|b| b.get(name)), data, resolver);

    for prop in scope_props(doc, scope) {
        let Some(field) = doc.name(prop).map(str::to_string) else {
            continue;
        };

        match binder.value(&field) {
            BoundValue::Unbound => {
                trace!("prop '{}' unbound, template content kept", field);
            }
            BoundValue::Plain(value) => {
                trace!("prop '{}' bound plain", field);
                doc.set_text(prop, &value_as_content(&value));
            }
            BoundValue::Parts(mut parts) => {
                trace!("prop '{}' bound parts", field);
                if let Some(include) = doc.label(prop, ATTR_INCLUDE).map(str::to_string) {
                    parts.accept(&include.split_whitespace().collect::<Vec<_>>());
                }
                if let Some(exclude) = doc.label(prop, ATTR_EXCLUDE).map(str::to_string) {
                    parts.reject(&exclude.split_whitespace().collect::<Vec<_>>());
                }
                let parts: Vec<(String, String)> = parts
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                for (part, value) in parts {
                    match part.as_str() {
                        "content" => {
                            doc.set_text(prop, &value);
                        }
                        "html" => {
                            doc.set_html(prop, &value);
                        }
                        attribute => {
                            doc.set_attribute(prop, attribute, value);
                        }
                    }
                }
            }
        }
    }

    if let Some(id) = data.get("id") {
        doc.set_attribute(scope, "data-id", value_as_content(id));
    }
}

/// Present one scope node: transform against the data, bind each item,
/// then resolve and present nested scopes per item
fn present_node(
    doc: &mut StringDoc,
    scope: NodeId,
    name: &str,
    data: &Value,
    binders: Option<&Binders>,
    resolver: Option<&dyn RouteResolver>,
) {
    transform_node(doc, scope, data, &mut |doc, node, item| {
        bind_node(doc, node, name, item, binders, resolver);

        for nested in nested_scopes(doc, node) {
            let Some(nested_name) = doc.name(nested).map(str::to_string) else {
                continue;
            };
            if doc.label(nested, LABEL_VERSION) == Some("empty") {
                continue;
            }
            let nested_value = item
                .get(&nested_name)
                .or_else(|| item.get(pluralize(&nested_name)))
                .cloned()
                .unwrap_or(Value::Null);
            present_node(doc, nested, &nested_name, &nested_value, binders, resolver);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::significant::SignificantRegistry;
    use serde_json::json;

    fn parse(markup: &str) -> StringDoc {
        StringDoc::parse(markup, &SignificantRegistry::default()).unwrap()
    }

    #[test]
    fn test_bind_single_prop() {
        let mut doc = parse("<div data-b=\"post\"><h1 data-b=\"title\">x</h1></div>");
        Presenter::new(&mut doc).bind("post", &json!({"title": "foo"}));
        assert_eq!(
            doc.render(),
            "<div data-b=\"post\"><h1 data-b=\"title\">foo</h1></div>"
        );
    }

    #[test]
    fn test_bind_null_is_noop() {
        let input = "<div data-b=\"post\"><h1 data-b=\"title\">x</h1></div>";
        let mut doc = parse(input);
        Presenter::new(&mut doc).bind("post", &Value::Null);
        assert_eq!(doc.render(), input);
    }

    #[test]
    fn test_bind_absent_field_keeps_template_content() {
        let mut doc = parse("<div data-b=\"post\"><h1 data-b=\"title\">default</h1></div>");
        Presenter::new(&mut doc).bind("post", &json!({"other": "y"}));
        assert_eq!(
            doc.render(),
            "<div data-b=\"post\"><h1 data-b=\"title\">default</h1></div>"
        );
    }

    #[test]
    fn test_bind_escapes_plain_values() {
        let mut doc = parse("<div data-b=\"post\"><h1 data-b=\"title\">x</h1></div>");
        Presenter::new(&mut doc).bind("post", &json!({"title": "a <b> & c"}));
        assert_eq!(
            doc.render(),
            "<div data-b=\"post\"><h1 data-b=\"title\">a &lt;b&gt; &amp; c</h1></div>"
        );
    }

    #[test]
    fn test_bind_sets_data_id() {
        let mut doc = parse("<div data-b=\"post\"><h1 data-b=\"title\">x</h1></div>");
        Presenter::new(&mut doc).bind("post", &json!({"id": 7, "title": "t"}));
        let scope = doc.find_significant(None, Some("post"))[0];
        assert_eq!(doc.attribute(scope, "data-id"), Some("7"));
    }

    #[test]
    fn test_bind_ignores_unknown_keys() {
        let mut doc = parse("<div data-b=\"post\"><h1 data-b=\"title\">x</h1></div>");
        Presenter::new(&mut doc).bind("post", &json!({"title": "t", "junk": 1, "more": [2]}));
        assert_eq!(
            doc.render(),
            "<div data-b=\"post\"><h1 data-b=\"title\">t</h1></div>"
        );
    }

    #[test]
    fn test_bind_parts_write_attributes_and_content() {
        let binders = {
            let mut b = Binders::new();
            b.register(
                "post",
                crate::binder::BinderDef::new().field("title", |ctx| {
                    let text = ctx.field("title").and_then(Value::as_str).unwrap_or("");
                    BoundValue::Parts(
                        crate::binder::BindingParts::new()
                            .part("content", text)
                            .part("class", "bound"),
                    )
                }),
            );
            b
        };
        let mut doc = parse("<div data-b=\"post\"><h1 data-b=\"title\">x</h1></div>");
        Presenter::new(&mut doc)
            .with_binders(&binders)
            .bind("post", &json!({"title": "foo"}));
        assert_eq!(
            doc.render(),
            "<div data-b=\"post\"><h1 data-b=\"title\" class=\"bound\">foo</h1></div>"
        );
    }

    #[test]
    fn test_parts_filtered_by_include_exclude() {
        let binders = {
            let mut b = Binders::new();
            b.register(
                "post",
                crate::binder::BinderDef::new().field("title", |_| {
                    BoundValue::Parts(
                        crate::binder::BindingParts::new()
                            .part("content", "text")
                            .part("class", "hot")
                            .part("title", "tip"),
                    )
                }),
            );
            b
        };
        let mut doc = parse(
            "<div data-b=\"post\">\
             <h1 data-b=\"title\" include=\"content class\">x</h1></div>",
        );
        Presenter::new(&mut doc)
            .with_binders(&binders)
            .bind("post", &json!({"title": "ignored"}));
        assert_eq!(
            doc.render(),
            "<div data-b=\"post\"><h1 data-b=\"title\" class=\"hot\">text</h1></div>"
        );
    }

    #[test]
    fn test_parts_filtered_by_exclude_label() {
        let binders = {
            let mut b = Binders::new();
            b.register(
                "post",
                crate::binder::BinderDef::new().field("title", |_| {
                    BoundValue::Parts(
                        crate::binder::BindingParts::new()
                            .part("content", "text")
                            .part("class", "hot")
                            .part("href", "/x"),
                    )
                }),
            );
            b
        };
        let mut doc = parse(
            "<div data-b=\"post\">\
             <h1 data-b=\"title\" exclude=\"class\">x</h1></div>",
        );
        Presenter::new(&mut doc)
            .with_binders(&binders)
            .bind("post", &json!({"title": "ignored"}));
        assert_eq!(
            doc.render(),
            "<div data-b=\"post\"><h1 data-b=\"title\" href=\"/x\">text</h1></div>"
        );
    }

    #[test]
    fn test_transform_ordering() {
        let mut doc = parse("<li data-b=\"item\"><span data-b=\"label\">x</span></li>");
        Presenter::new(&mut doc).present(
            "item",
            &json!([{"label": "a"}, {"label": "b"}, {"label": "c"}]),
        );
        assert_eq!(
            doc.render(),
            "<li data-b=\"item\"><span data-b=\"label\">a</span></li>\
             <li data-b=\"item\"><span data-b=\"label\">b</span></li>\
             <li data-b=\"item\"><span data-b=\"label\">c</span></li>"
        );
    }

    #[test]
    fn test_transform_empty_removes_scope() {
        let mut doc = parse("<ul><li data-b=\"item\"><span data-b=\"label\">x</span></li></ul>");
        Presenter::new(&mut doc).transform("item", &json!([]));
        assert_eq!(doc.render(), "<ul></ul>");
    }

    #[test]
    fn test_transform_empty_keeps_empty_version() {
        let mut doc = parse(
            "<ul><li data-b=\"item\"><span data-b=\"label\">x</span></li>\
             <li data-b=\"item\" data-v=\"empty\">none yet</li></ul>",
        );
        Presenter::new(&mut doc).transform("item", &Value::Null);
        assert_eq!(doc.render(), "<ul><li data-b=\"item\">none yet</li></ul>");
    }

    #[test]
    fn test_transform_nonempty_removes_empty_version() {
        let mut doc = parse(
            "<ul><li data-b=\"item\"><span data-b=\"label\">x</span></li>\
             <li data-b=\"item\" data-v=\"empty\">none yet</li></ul>",
        );
        Presenter::new(&mut doc).present("item", &json!([{}, {}]));
        assert_eq!(
            doc.render(),
            "<ul><li data-b=\"item\"><span data-b=\"label\">x</span></li>\
             <li data-b=\"item\"><span data-b=\"label\">x</span></li></ul>"
        );
    }

    #[test]
    fn test_transform_single_object_keeps_one() {
        let input = "<li data-b=\"item\"><span data-b=\"label\">x</span></li>";
        let mut doc = parse(input);
        Presenter::new(&mut doc).transform("item", &json!({"label": "a"}));
        assert_eq!(doc.render(), input);
    }

    #[test]
    fn test_present_nested_scopes() {
        let mut doc = parse(
            "<article data-b=\"post\"><h1 data-b=\"title\">t</h1>\
             <div data-b=\"comment\"><p data-b=\"body\">b</p></div></article>",
        );
        Presenter::new(&mut doc).present(
            "post",
            &json!({
                "title": "hello",
                "comments": [{"body": "one"}, {"body": "two"}]
            }),
        );
        assert_eq!(
            doc.render(),
            "<article data-b=\"post\"><h1 data-b=\"title\">hello</h1>\
             <div data-b=\"comment\"><p data-b=\"body\">one</p></div>\
             <div data-b=\"comment\"><p data-b=\"body\">two</p></div></article>"
        );
    }

    #[test]
    fn test_present_missing_nested_value_removes_scope() {
        let mut doc = parse(
            "<article data-b=\"post\"><h1 data-b=\"title\">t</h1>\
             <div data-b=\"comment\"><p data-b=\"body\">b</p></div></article>",
        );
        Presenter::new(&mut doc).present("post", &json!({"title": "hello"}));
        assert_eq!(
            doc.render(),
            "<article data-b=\"post\"><h1 data-b=\"title\">hello</h1></article>"
        );
    }

    #[test]
    fn test_present_missing_scope_is_noop() {
        let input = "<p>nothing bindable</p>";
        let mut doc = parse(input);
        Presenter::new(&mut doc).present("post", &json!({"title": "x"}));
        assert_eq!(doc.render(), input);
    }

    #[test]
    fn test_chaining() {
        let mut doc = parse(
            "<div data-b=\"post\"><h1 data-b=\"title\">x</h1></div>\
             <div data-b=\"user\"><span data-b=\"name\">y</span></div>",
        );
        Presenter::new(&mut doc)
            .bind("post", &json!({"title": "a"}))
            .bind("user", &json!({"name": "b"}));
        assert_eq!(
            doc.render(),
            "<div data-b=\"post\"><h1 data-b=\"title\">a</h1></div>\
             <div data-b=\"user\"><span data-b=\"name\">b</span></div>"
        );
    }
}
