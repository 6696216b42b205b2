//! Significant-type registry
//!
//! An ordered, explicitly constructed list of matchers, each answering "is
//! this raw element significant, and if so, how should its node look". The
//! parser asks matchers in registration order and the first claim wins, so
//! earlier registration means higher priority. The default set registers
//! `form` before `binding` so `<form data-b>` is claimed as a form.
//!
//! The registry is a value the parser is configured with, not ambient state;
//! tests can run the engine against custom type sets.

use super::node::{Labels, SignificantKind};
use crate::raw::RawElement;

/// Marker attribute naming a binding scope or prop
pub const ATTR_BINDING: &str = "data-b";
/// Marker attribute naming a component
pub const ATTR_COMPONENT: &str = "data-c";
/// Marker attribute naming a template version
pub const ATTR_VERSION: &str = "data-v";
/// Marker attribute naming a layout container
pub const ATTR_CONTAINER: &str = "data-container";
/// Marker attribute naming a partial include point
pub const ATTR_PARTIAL: &str = "data-partial";
/// View-side parts filter: names to accept
pub const ATTR_INCLUDE: &str = "include";
/// View-side parts filter: names to reject
pub const ATTR_EXCLUDE: &str = "exclude";

/// Label key carrying a node's template version
pub const LABEL_VERSION: &str = "version";

/// Instructions for building a significant node out of a claimed element
#[derive(Debug)]
pub struct SignificantBuild {
    pub kind: SignificantKind,
    pub name: Option<String>,
    pub labels: Labels,
    /// Attribute names to strip from rendered output (view-side directives)
    pub strip: Vec<&'static str>,
}

/// One pluggable significant-type matcher
pub trait SignificantMatcher {
    /// Registry name of this matcher
    fn name(&self) -> &'static str;

    /// Does this matcher claim the element?
    fn claims(&self, el: RawElement<'_, '_>) -> bool;

    /// Build node instructions for a claimed element
    fn build(&self, el: RawElement<'_, '_>) -> SignificantBuild;
}

/// Ordered matcher list; registration order is priority order
pub struct SignificantRegistry {
    matchers: Vec<Box<dyn SignificantMatcher>>,
}

impl SignificantRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        SignificantRegistry {
            matchers: Vec::new(),
        }
    }

    /// Append a matcher at the lowest priority
    pub fn register(&mut self, matcher: Box<dyn SignificantMatcher>) -> &mut Self {
        self.matchers.push(matcher);
        self
    }

    /// Insert a matcher before the named one; appends if the name is absent
    pub fn register_before(
        &mut self,
        before: &str,
        matcher: Box<dyn SignificantMatcher>,
    ) -> &mut Self {
        match self.matchers.iter().position(|m| m.name() == before) {
            Some(index) => self.matchers.insert(index, matcher),
            None => self.matchers.push(matcher),
        }
        self
    }

    /// Ask matchers in priority order; first claim wins
    pub fn match_element(&self, el: RawElement<'_, '_>) -> Option<SignificantBuild> {
        self.matchers
            .iter()
            .find(|m| m.claims(el))
            .map(|m| m.build(el))
    }

    /// Whether any matcher claims the element
    pub fn is_significant(&self, el: RawElement<'_, '_>) -> bool {
        self.matchers.iter().any(|m| m.claims(el))
    }

    /// Registered matcher names, in priority order
    pub fn names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }
}

impl Default for SignificantRegistry {
    fn default() -> Self {
        let mut registry = SignificantRegistry::empty();
        registry
            .register(Box::new(FormMatcher))
            .register(Box::new(BindingMatcher))
            .register(Box::new(ContainerMatcher))
            .register(Box::new(PartialMatcher))
            .register(Box::new(ComponentMatcher))
            .register(Box::new(VersionedMatcher));
        registry
    }
}

/// Pull binding-related labels off an element (`data-v`, `include`,
/// `exclude`); these are view-side directives stripped from output
fn binding_labels(el: RawElement<'_, '_>) -> Labels {
    let mut labels = Labels::new();
    if let Some(version) = el.attribute(ATTR_VERSION) {
        labels.insert(LABEL_VERSION.to_string(), version.to_string());
    }
    if let Some(include) = el.attribute(ATTR_INCLUDE) {
        labels.insert(ATTR_INCLUDE.to_string(), include.to_string());
    }
    if let Some(exclude) = el.attribute(ATTR_EXCLUDE) {
        labels.insert(ATTR_EXCLUDE.to_string(), exclude.to_string());
    }
    labels
}

/// `<form data-b="scope">`
struct FormMatcher;

impl SignificantMatcher for FormMatcher {
    fn name(&self) -> &'static str {
        "form"
    }

    fn claims(&self, el: RawElement<'_, '_>) -> bool {
        el.name().eq_ignore_ascii_case("form") && el.has_attribute(ATTR_BINDING)
    }

    fn build(&self, el: RawElement<'_, '_>) -> SignificantBuild {
        SignificantBuild {
            kind: SignificantKind::Form,
            name: el.attribute(ATTR_BINDING).map(str::to_string),
            labels: binding_labels(el),
            strip: vec![ATTR_VERSION, ATTR_INCLUDE, ATTR_EXCLUDE],
        }
    }
}

/// Any element carrying `data-b`: a scope when it contains nested bindings,
/// otherwise a prop
struct BindingMatcher;

impl SignificantMatcher for BindingMatcher {
    fn name(&self) -> &'static str {
        "binding"
    }

    fn claims(&self, el: RawElement<'_, '_>) -> bool {
        el.has_attribute(ATTR_BINDING)
    }

    fn build(&self, el: RawElement<'_, '_>) -> SignificantBuild {
        let kind = if el.any_descendant(&|d| d.has_attribute(ATTR_BINDING)) {
            SignificantKind::BindingScope
        } else {
            SignificantKind::BindingProp
        };
        SignificantBuild {
            kind,
            name: el.attribute(ATTR_BINDING).map(str::to_string),
            labels: binding_labels(el),
            strip: vec![ATTR_VERSION, ATTR_INCLUDE, ATTR_EXCLUDE],
        }
    }
}

/// `data-container="name"`: layout insertion point
struct ContainerMatcher;

impl SignificantMatcher for ContainerMatcher {
    fn name(&self) -> &'static str {
        "container"
    }

    fn claims(&self, el: RawElement<'_, '_>) -> bool {
        el.has_attribute(ATTR_CONTAINER)
    }

    fn build(&self, el: RawElement<'_, '_>) -> SignificantBuild {
        SignificantBuild {
            kind: SignificantKind::Container,
            name: el.attribute(ATTR_CONTAINER).map(str::to_string),
            labels: Labels::new(),
            strip: vec![ATTR_CONTAINER],
        }
    }
}

/// `data-partial="name"`: partial include point
struct PartialMatcher;

impl SignificantMatcher for PartialMatcher {
    fn name(&self) -> &'static str {
        "partial"
    }

    fn claims(&self, el: RawElement<'_, '_>) -> bool {
        el.has_attribute(ATTR_PARTIAL)
    }

    fn build(&self, el: RawElement<'_, '_>) -> SignificantBuild {
        SignificantBuild {
            kind: SignificantKind::Partial,
            name: el.attribute(ATTR_PARTIAL).map(str::to_string),
            labels: Labels::new(),
            strip: vec![ATTR_PARTIAL],
        }
    }
}

/// `data-c="name"`: component mount point; the marker attribute stays in
/// the output for the client side
struct ComponentMatcher;

impl SignificantMatcher for ComponentMatcher {
    fn name(&self) -> &'static str {
        "component"
    }

    fn claims(&self, el: RawElement<'_, '_>) -> bool {
        el.has_attribute(ATTR_COMPONENT)
    }

    fn build(&self, el: RawElement<'_, '_>) -> SignificantBuild {
        SignificantBuild {
            kind: SignificantKind::Component,
            name: el.attribute(ATTR_COMPONENT).map(str::to_string),
            labels: Labels::new(),
            strip: vec![],
        }
    }
}

/// `data-v="name"` without `data-b`: a versioned view outside any binding
struct VersionedMatcher;

impl SignificantMatcher for VersionedMatcher {
    fn name(&self) -> &'static str {
        "versioned"
    }

    fn claims(&self, el: RawElement<'_, '_>) -> bool {
        el.has_attribute(ATTR_VERSION) && !el.has_attribute(ATTR_BINDING)
    }

    fn build(&self, el: RawElement<'_, '_>) -> SignificantBuild {
        let mut labels = Labels::new();
        if let Some(version) = el.attribute(ATTR_VERSION) {
            labels.insert(LABEL_VERSION.to_string(), version.to_string());
        }
        SignificantBuild {
            kind: SignificantKind::Versioned,
            name: None,
            labels,
            strip: vec![ATTR_VERSION],
        }
    }
}
