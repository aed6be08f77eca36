//! # agx Parser
//!
//! Parsing pipeline for the agx architecture graph language: source text in,
//! immutable [`agx_core::Graph`] out.
//!
//! ## Usage
//!
//! ```
//! # use agx_parser::{parse, Error, ParseOptions};
//!
//! fn main() -> Result<(), Error> {
//!     let source = r#"
//!         type System;
//!         type Application;
//!         System X {
//!             Application A;
//!             Application B;
//!             A -> B;
//!         }
//!     "#;
//!
//!     let graph = parse(source, &ParseOptions::default())?;
//!     assert_eq!(graph.all_nodes().len(), 3);
//!     Ok(())
//! }
//! ```

mod attributes;
mod elaborate;
pub mod error;
mod lexer;
mod link;
mod parser;
mod parser_types;
mod scope;
mod span;
mod tokens;
mod validate;

pub use attributes::coerce_value;
pub use error::Error;
pub use scope::{CandidateSource, LogObserver, ScopeObserver};
pub use span::{LineIndex, Span};

use log::{debug, info};

use agx_core::Graph;

use elaborate::Elaborator;
use error::ParseError;
use link::Linker;

/// Options for [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Run semantic validation before building the graph.
    pub validate: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// Parse source text into a graph.
///
/// The pipeline is:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build the raw declaration tree
/// 3. **Validate** - Check semantic rules, skipped when
///    [`ParseOptions::validate`] is false
/// 4. **Elaborate** - Build and link the graph
///
/// # Errors
///
/// Returns [`Error::Parse`] when the source is not syntactically valid and
/// [`Error::Validation`] when a semantic rule fails. Unresolved references
/// are only errors when validation runs; otherwise they are left empty in the
/// graph.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Graph, Error> {
    parse_with_observer(source, options, &LogObserver)
}

/// Parse source text into a graph, reporting scope resolution events to
/// `observer`.
pub fn parse_with_observer(
    source: &str,
    options: &ParseOptions,
    observer: &dyn ScopeObserver,
) -> Result<Graph, Error> {
    info!(len = source.len(), validate = options.validate; "Parsing source");

    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;

    // Step 2: Parse
    let document = parser::build_document(&tokens).map_err(ParseError::from)?;
    debug!(
        types = document.types.len(),
        nodes = document.nodes.len(),
        edges = document.edges.len();
        "Parsed document",
    );

    let linker = Linker::new(&document, observer);

    // Step 3: Validate
    if options.validate {
        let warnings = validate::validate_document(&document, &linker, source)?;
        debug!(warnings = warnings.len(); "Validation passed");
    } else {
        debug!("Validation disabled");
    }

    // Step 4: Elaborate
    Ok(Elaborator::new(&document, &linker).build())
}
