//! Form setup helpers
//!
//! A `FormView` wraps one form scope node and points it at the right
//! endpoint. Browsers only submit GET and POST, so the mutating verbs go
//! out as POST with a hidden `_method` override field prepended to the
//! form body.
//!
//! Actions resolve through the route resolver by convention: creation
//! targets the collection route (pluralized scope name), the other verbs
//! target the member route (scope name plus the object's id). When a route
//! cannot be resolved the action is simply left unset.

use crate::binder::RouteResolver;
use crate::doc::document::StringDoc;
use crate::doc::node::{NodeId, SignificantKind};
use crate::inflect::pluralize;
use log::debug;
use serde_json::Value;

/// View over one form scope node
pub struct FormView<'a> {
    doc: &'a mut StringDoc,
    node: NodeId,
    resolver: Option<&'a dyn RouteResolver>,
}

impl<'a> FormView<'a> {
    /// Wrap a form node. `None` when the handle is not a form scope.
    pub fn new(doc: &'a mut StringDoc, node: NodeId) -> Option<Self> {
        if doc.kind(node) != Some(SignificantKind::Form) {
            return None;
        }
        Some(FormView {
            doc,
            node,
            resolver: None,
        })
    }

    /// Wrap the first form scope named `name`
    pub fn named(doc: &'a mut StringDoc, name: &str) -> Option<Self> {
        let node = doc
            .find_significant(Some(SignificantKind::Form), Some(name))
            .into_iter()
            .next()?;
        FormView::new(doc, node)
    }

    /// Attach a route resolver for action resolution
    pub fn with_resolver(mut self, resolver: &'a dyn RouteResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Point the form at creating a new object
    pub fn create(&mut self) -> &mut Self {
        self.doc.set_attribute(self.node, "method", "post");
        if let Some(action) = self.collection_route() {
            self.doc.set_attribute(self.node, "action", action);
        }
        self
    }

    /// Point the form at partially updating an object
    pub fn update(&mut self, data: &Value) -> &mut Self {
        self.mutate("patch", data)
    }

    /// Point the form at fully replacing an object
    pub fn replace(&mut self, data: &Value) -> &mut Self {
        self.mutate("put", data)
    }

    /// Point the form at deleting an object
    pub fn remove(&mut self, data: &Value) -> &mut Self {
        self.mutate("delete", data)
    }

    fn mutate(&mut self, verb: &str, data: &Value) -> &mut Self {
        debug!("form '{}' set up for {}", self.scope().unwrap_or(""), verb);
        self.doc.set_attribute(self.node, "method", "post");
        let field = format!(
            "<input type=\"hidden\" name=\"_method\" value=\"{}\">",
            verb
        );
        self.doc.prepend_to(self.node, StringDoc::from_fragment(field));
        if let Some(action) = self.member_route(data) {
            self.doc.set_attribute(self.node, "action", action);
        }
        self
    }

    fn scope(&self) -> Option<&str> {
        self.doc.name(self.node)
    }

    fn collection_route(&self) -> Option<String> {
        let scope = self.scope()?;
        self.resolver?.path(&pluralize(scope), &Value::Null)
    }

    fn member_route(&self, data: &Value) -> Option<String> {
        let scope = self.scope()?.to_string();
        self.resolver?.path(&scope, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::significant::SignificantRegistry;
    use serde_json::json;

    fn parse(markup: &str) -> StringDoc {
        StringDoc::parse(markup, &SignificantRegistry::default()).unwrap()
    }

    struct PostRoutes;

    impl RouteResolver for PostRoutes {
        fn path(&self, name: &str, params: &Value) -> Option<String> {
            match (name, params.get("id")) {
                ("posts", _) => Some("/posts".to_string()),
                ("post", Some(id)) => Some(format!("/posts/{}", id)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_create() {
        let mut doc = parse("<form data-b=\"post\"><input data-b=\"title\"></form>");
        FormView::named(&mut doc, "post")
            .unwrap()
            .with_resolver(&PostRoutes)
            .create();
        assert_eq!(
            doc.render(),
            "<form data-b=\"post\" method=\"post\" action=\"/posts\">\
             <input data-b=\"title\" name=\"post[title]\"></form>"
        );
    }

    #[test]
    fn test_update_prepends_method_override() {
        let mut doc = parse("<form data-b=\"post\"><input data-b=\"title\"></form>");
        FormView::named(&mut doc, "post")
            .unwrap()
            .with_resolver(&PostRoutes)
            .update(&json!({"id": 3}));
        assert_eq!(
            doc.render(),
            "<form data-b=\"post\" method=\"post\" action=\"/posts/3\">\
             <input type=\"hidden\" name=\"_method\" value=\"patch\">\
             <input data-b=\"title\" name=\"post[title]\"></form>"
        );
    }

    #[test]
    fn test_remove_uses_delete_override() {
        let mut doc = parse("<form data-b=\"post\"><input data-b=\"title\"></form>");
        FormView::named(&mut doc, "post")
            .unwrap()
            .with_resolver(&PostRoutes)
            .remove(&json!({"id": 9}));
        let rendered = doc.render();
        assert!(rendered.contains("value=\"delete\""));
        assert!(rendered.contains("action=\"/posts/9\""));
    }

    #[test]
    fn test_unresolvable_route_leaves_action_unset() {
        let mut doc = parse("<form data-b=\"post\"><input data-b=\"title\"></form>");
        FormView::named(&mut doc, "post")
            .unwrap()
            .with_resolver(&PostRoutes)
            .update(&json!({}));
        let rendered = doc.render();
        assert!(!rendered.contains("action"));
        assert!(rendered.contains("method=\"post\""));
    }

    #[test]
    fn test_no_resolver_no_action() {
        let mut doc = parse("<form data-b=\"post\"><input data-b=\"title\"></form>");
        FormView::named(&mut doc, "post").unwrap().create();
        assert_eq!(
            doc.render(),
            "<form data-b=\"post\" method=\"post\">\
             <input data-b=\"title\" name=\"post[title]\"></form>"
        );
    }

    #[test]
    fn test_non_form_node_rejected() {
        let mut doc = parse("<div data-b=\"post\"><input data-b=\"title\"></div>");
        let node = doc.top()[0];
        assert!(FormView::new(&mut doc, node).is_none());
    }
}
