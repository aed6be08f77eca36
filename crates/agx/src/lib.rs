//! agx - Architecture graphs from a declarative text description.
//!
//! Reads agx documents (typed nodes nested inside other nodes, edges between
//! them, attributes, and a type hierarchy) into an immutable, queryable
//! [`Graph`].

pub mod config;
pub mod export;

mod error;

pub use agx_core::{
    Attribute, AttributeValue, Edge, EdgeId, Graph, Node, NodeId, Type, TypeId, attribute,
};
pub use agx_parser::{
    LineIndex, coerce_value,
    error::{Diagnostic, ValidationIssue},
};

pub use error::AgxError;

use std::{fs, path::Path};

use log::{debug, info, trace};

use agx_parser::ParseOptions;

use config::ReaderConfig;

/// Reader turning agx source text into a [`Graph`].
///
/// # Examples
///
/// ```
/// use agx::{GraphReader, config::ReaderConfig};
///
/// let source = "type Person; Person Alice; Person Bob; Alice -> Bob;";
///
/// let reader = GraphReader::new(ReaderConfig::default());
/// let graph = reader.parse_str(source).expect("Failed to parse");
///
/// let edge = graph.edges().next().unwrap();
/// assert_eq!(edge.source().map(|n| n.name()), Some("Alice"));
/// assert_eq!(edge.target().map(|n| n.name()), Some("Bob"));
/// ```
#[derive(Debug, Default)]
pub struct GraphReader {
    config: ReaderConfig,
}

impl GraphReader {
    /// Create a new reader with the given configuration.
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Returns the reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Parse source text into a graph.
    ///
    /// This performs lexing, parsing, validation (unless disabled in the
    /// configuration), and elaboration.
    ///
    /// # Errors
    ///
    /// Returns [`AgxError::Parse`] for syntax errors and
    /// [`AgxError::Validation`] for semantic rule violations.
    ///
    /// # Examples
    ///
    /// ```
    /// use agx::{GraphReader, config::ReaderConfig};
    ///
    /// // Lowercase type names fail validation, but still build when it is off.
    /// let reader = GraphReader::new(ReaderConfig::new(false));
    /// let graph = reader.parse_str("type system;").unwrap();
    /// assert!(graph.find_type("system").is_some());
    /// ```
    pub fn parse_str(&self, source: &str) -> Result<Graph, AgxError> {
        info!(validate = self.config.validate(); "Reading graph");

        let options = ParseOptions {
            validate: self.config.validate(),
        };
        let graph = agx_parser::parse(source, &options)
            .map_err(|err| AgxError::from_parser(err, source))?;

        debug!("Graph read successfully");
        trace!(graph:?; "Read graph");

        Ok(graph)
    }

    /// Read and parse a file into a graph.
    ///
    /// # Errors
    ///
    /// Returns [`AgxError::Io`] when the file cannot be read, otherwise the
    /// same errors as [`GraphReader::parse_str`].
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Graph, AgxError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Reading source file");

        let source = fs::read_to_string(path)?;
        self.parse_str(&source)
    }
}
