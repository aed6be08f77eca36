//! Core graph model for AGX architecture documents.
//!
//! This crate defines the in-memory architecture graph produced by the
//! parser: nominal [`Type`]s with supertypes, a tree of [`Node`]s, directed
//! [`Edge`]s, and typed [`Attribute`]s. The graph is assembled with a
//! [`GraphBuilder`] and is immutable once built.
//!
//! # Example
//!
//! ```
//! use agx_core::{Attribute, AttributeValue, EdgeLinks, GraphBuilder};
//!
//! let mut builder = GraphBuilder::new();
//! let person = builder.add_type("Person", vec![]);
//! let alice = builder.add_node("Alice", Some(person), vec![], None);
//! let bob = builder.add_node("Bob", Some(person), vec![], None);
//! builder.add_edge(
//!     None,
//!     EdgeLinks { source: Some(alice), target: Some(bob), kind: None },
//!     "Alice",
//!     "Bob",
//! );
//! builder.add_attribute(Attribute::new("Version", AttributeValue::from("1")));
//!
//! let graph = builder.build();
//! assert_eq!(graph.find_nodes_by_kind("Person").len(), 2);
//! assert_eq!(graph.edges().next().unwrap().to_string(), "Alice -> Bob");
//! ```

pub mod attribute;
pub mod builder;
pub mod element;
pub mod graph;

pub use attribute::{Attribute, AttributeValue};
pub use builder::{EdgeLinks, GraphBuilder};
pub use element::{Edge, EdgeId, Node, NodeId, Type, TypeId};
pub use graph::Graph;
