//! stringdoc - significant-node document engine
//!
//! Parses markup templates once into a tree that only tracks the nodes a
//! presentation layer cares about. Elements carrying marker attributes
//! (`data-b`, `data-container`, `data-partial`, `data-c`, `data-v`) become
//! significant nodes; everything else collapses into opaque literal
//! fragments sliced verbatim from the input. Rendering an untouched
//! document reproduces its input byte for byte, and rendering a mutated
//! one only pays for the parts that changed.
//!
//! On top of the document sits the presentation protocol: `transform`
//! reshapes a binding scope to the arity of its data, `bind` writes one
//! object's fields into a scope's props, and `present` composes both and
//! recurses through nested scopes.
//!
//! ```
//! use serde_json::json;
//! use stringdoc::{Presenter, SignificantRegistry, StringDoc};
//!
//! let registry = SignificantRegistry::default();
//! let mut doc = StringDoc::parse(
//!     "<div data-b=\"post\"><h1 data-b=\"title\">title goes here</h1></div>",
//!     &registry,
//! )
//! .unwrap();
//!
//! Presenter::new(&mut doc).bind("post", &json!({ "title": "hello" }));
//!
//! assert_eq!(
//!     doc.render(),
//!     "<div data-b=\"post\"><h1 data-b=\"title\">hello</h1></div>"
//! );
//! ```
//!
//! Parsing is the only fallible operation: malformed markup is a hard
//! [`ParseError`]. Every lookup and mutation after that is permissive,
//! returning `Option` or silently doing nothing for missing targets.

pub mod binder;
pub mod core;
pub mod doc;
pub mod error;
pub mod form;
pub mod inflect;
pub mod presenter;
pub mod raw;
pub mod reader;
pub mod store;

pub use binder::{
    Binder, BinderCtx, BinderDef, Binders, BindingParts, BoundValue, RouteResolver,
};
pub use doc::attributes::StringAttributes;
pub use doc::document::StringDoc;
pub use doc::node::{Labels, NodeId, SignificantKind, StringNode};
pub use doc::significant::{SignificantBuild, SignificantMatcher, SignificantRegistry};
pub use error::ParseError;
pub use form::FormView;
pub use inflect::pluralize;
pub use presenter::Presenter;
pub use store::TemplateStore;
