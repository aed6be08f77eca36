//! Export of a finished [`Graph`] to text formats.
//!
//! # Available Formats
//!
//! - [`xml`] — `<Model>` document via [`xml::to_xml`]
//! - [`Format::Text`] — the indented outline produced by the graph's
//!   [`Display`](std::fmt::Display) implementation

/// XML export backend.
pub mod xml;

use serde::Deserialize;

use agx_core::Graph;

/// Output format for [`render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Xml,
    Text,
}

impl Format {
    /// File extension conventionally used for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Xml => "xml",
            Format::Text => "txt",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(Format::Xml),
            "text" | "txt" => Ok(Format::Text),
            other => Err(format!(
                "unknown format `{other}`, supported formats: xml, text"
            )),
        }
    }
}

/// Render `graph` in the given format.
///
/// `indent` is the number of spaces per nesting level; it only affects XML.
pub fn render(graph: &Graph, format: Format, indent: usize) -> String {
    match format {
        Format::Xml => xml::to_xml(graph, indent),
        Format::Text => graph.to_string(),
    }
}
