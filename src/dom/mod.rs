//! Arena DOM: parsing, querying, mutation, and serialization.
//!
//! The retrofit engine needs a document it can parse once and then keep
//! mutating while observers and timers run against it. Nodes live in a
//! contiguous arena addressed by [`NodeId`]; structural mutations are
//! journaled so the page runtime can deliver observer notifications.
//!
//! # Example
//!
//! ```
//! use pleat::dom::{self, Selector};
//!
//! let mut doc = dom::parse_html(r#"<div id="frame"><p>hi</p></div>"#);
//! let selector = Selector::compile("#frame").unwrap();
//! let frame = dom::query(&doc, doc.document(), &selector).unwrap();
//!
//! doc.set_attr(frame, "data-ready", "true");
//! assert!(dom::serialize(&doc).contains(r#"data-ready="true""#));
//! ```

mod arena;
mod element_ref;
mod query;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, Document, Node, NodeData, NodeId, attr_name, qname};
pub use element_ref::{ElementRef, PleatSelectors};
pub use query::{Selector, matches, query, query_all};
pub use serialize::{serialize, serialize_node};
pub use tree_sink::{parse_fragment, parse_html};
