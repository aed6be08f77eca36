//! XML serialization of a graph.
//!
//! The document has a single `<Model>` root holding, in order, every type,
//! the node tree, top-level edges and document attributes:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Model>
//!   <AType name="System" />
//!   <ANode name="X" kind="System">
//!     <ANode name="A" />
//!     <AEdge source="A" target="B" />
//!   </ANode>
//! </Model>
//! ```
//!
//! Elements without content are self-closing. Edge attributes are omitted
//! when the corresponding reference did not resolve.

use log::debug;

use agx_core::{Attribute, Edge, Graph, Node, Type};

/// Serialize `graph` to an XML string, indenting each nesting level by
/// `indent` spaces.
pub fn to_xml(graph: &Graph, indent: usize) -> String {
    debug!(indent; "Exporting graph to XML");

    let mut writer = XmlWriter::new(indent);
    writer.line(0, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    writer.line(0, "<Model>");
    for ty in graph.types() {
        writer.write_type(ty, 1);
    }
    for node in graph.nodes() {
        writer.write_node(node, 1);
    }
    for edge in graph.edges() {
        writer.write_edge(edge, 1);
    }
    for attr in graph.attributes() {
        writer.write_attribute(attr, 1);
    }
    writer.line(0, "</Model>");
    writer.out
}

struct XmlWriter {
    indent: String,
    out: String,
}

impl XmlWriter {
    fn new(indent: usize) -> Self {
        Self {
            indent: " ".repeat(indent),
            out: String::new(),
        }
    }

    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.out.push_str(&self.indent);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn write_type(&mut self, ty: Type<'_>, level: usize) {
        let mut open = format!("<AType name=\"{}\"", escape(ty.name()));
        let supers: Vec<&str> = ty.supers().map(|s| s.name()).collect();
        if !supers.is_empty() {
            open.push_str(&format!(" supers=\"{}\"", escape(&supers.join(", "))));
        }

        if ty.attributes().is_empty() {
            open.push_str(" />");
            self.line(level, &open);
            return;
        }

        open.push('>');
        self.line(level, &open);
        for attr in ty.attributes() {
            self.write_attribute(attr, level + 1);
        }
        self.line(level, "</AType>");
    }

    fn write_node(&mut self, node: Node<'_>, level: usize) {
        let mut open = format!("<ANode name=\"{}\"", escape(node.name()));
        if let Some(kind) = node.kind() {
            open.push_str(&format!(" kind=\"{}\"", escape(kind.name())));
        }

        let has_content =
            !node.attributes().is_empty() || node.children().len() > 0 || node.edges().len() > 0;
        if !has_content {
            open.push_str(" />");
            self.line(level, &open);
            return;
        }

        open.push('>');
        self.line(level, &open);
        for attr in node.attributes() {
            self.write_attribute(attr, level + 1);
        }
        for child in node.children() {
            self.write_node(child, level + 1);
        }
        for edge in node.edges() {
            self.write_edge(edge, level + 1);
        }
        self.line(level, "</ANode>");
    }

    fn write_edge(&mut self, edge: Edge<'_>, level: usize) {
        let mut element = String::from("<AEdge");
        if let Some(source) = edge.source() {
            element.push_str(&format!(" source=\"{}\"", escape(source.name())));
        }
        if let Some(target) = edge.target() {
            element.push_str(&format!(" target=\"{}\"", escape(target.name())));
        }
        if let Some(kind) = edge.kind() {
            element.push_str(&format!(" kind=\"{}\"", escape(kind.name())));
        }
        element.push_str(" />");
        self.line(level, &element);
    }

    fn write_attribute(&mut self, attr: &Attribute, level: usize) {
        let element = format!(
            "<Attribute name=\"{}\" value=\"{}\" />",
            escape(attr.name()),
            escape(&attr.value().to_string())
        );
        self.line(level, &element);
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use agx_core::{AttributeValue, EdgeLinks, GraphBuilder};

    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_empty_graph() {
        let graph = GraphBuilder::new().build();
        assert_eq!(
            to_xml(&graph, 2),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Model>\n</Model>\n"
        );
    }

    #[test]
    fn test_full_document() {
        let mut builder = GraphBuilder::new();
        let base = builder.add_type("Base", Vec::new());
        let system = builder.add_type(
            "System",
            vec![Attribute::new("Color", AttributeValue::from("red"))],
        );
        builder.add_super(system, base);

        let x = builder.add_node(
            "X",
            Some(system),
            vec![Attribute::new("Port", AttributeValue::from(8080.0))],
            None,
        );
        let a = builder.add_node("A", None, Vec::new(), Some(x));
        let b = builder.add_node("B", Some(base), Vec::new(), Some(x));
        builder.add_edge(
            Some(x),
            EdgeLinks {
                source: Some(a),
                target: Some(b),
                kind: None,
            },
            "A",
            "B",
        );
        builder.add_edge(
            None,
            EdgeLinks {
                source: Some(x),
                ..EdgeLinks::default()
            },
            "X",
            "Missing",
        );
        builder.add_attribute(Attribute::new("Note", AttributeValue::from("a < b")));
        let graph = builder.build();

        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<Model>
  <AType name=\"Base\" />
  <AType name=\"System\" supers=\"Base\">
    <Attribute name=\"Color\" value=\"red\" />
  </AType>
  <ANode name=\"X\" kind=\"System\">
    <Attribute name=\"Port\" value=\"8080\" />
    <ANode name=\"A\" />
    <ANode name=\"B\" kind=\"Base\" />
    <AEdge source=\"A\" target=\"B\" />
  </ANode>
  <AEdge source=\"X\" />
  <Attribute name=\"Note\" value=\"a &lt; b\" />
</Model>
";
        assert_eq!(to_xml(&graph, 2), expected);
    }

    #[test]
    fn test_indent_width() {
        let mut builder = GraphBuilder::new();
        builder.add_type("T", Vec::new());
        let graph = builder.build();

        assert!(to_xml(&graph, 4).contains("\n    <AType name=\"T\" />\n"));
        assert!(to_xml(&graph, 0).contains("\n<AType name=\"T\" />\n"));
    }
}
