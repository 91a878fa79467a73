//! Request document serialization
//!
//! XML follows the GENI v3 request schema with the emulab extension for
//! blockstores. Element and attribute order is fixed so that identical
//! requests always render byte-identical output.

use std::io::Write;

use crate::error::{ProfileError, Result};
use crate::request::{NodeRequest, RequestDocument};
use crate::types::OutputFormat;

const GENI_NS: &str = "http://www.geni.net/resources/rspec/3";
const EMULAB_NS: &str = "http://www.protogeni.net/resources/rspec/ext/emulab/1";
const CLIENT_NS: &str = "http://www.protogeni.net/resources/rspec/ext/client/1";
const JACKS_NS: &str = "http://www.protogeni.net/resources/rspec/ext/jacks/1";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://www.geni.net/resources/rspec/3 http://www.geni.net/resources/rspec/3/request.xsd";

/// Render the document in the requested format
pub fn render(doc: &RequestDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Xml => to_xml(doc),
        OutputFormat::Json => to_json(doc),
    }
}

/// Render and write the document, followed by a trailing newline
pub fn write_document<W: Write>(
    doc: &RequestDocument,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let rendered = render(doc, format)?;
    out.write_all(rendered.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Pretty JSON of the descriptor tree
pub fn to_json(doc: &RequestDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// GENI v3 request RSpec.
///
/// Fails if any attribute value holds a character XML 1.0 cannot represent.
pub fn to_xml(doc: &RequestDocument) -> Result<String> {
    let mut xml = XmlWriter::new();
    xml.declaration();
    xml.open(
        "rspec",
        &[
            ("xmlns", GENI_NS),
            ("xmlns:emulab", EMULAB_NS),
            ("xmlns:client", CLIENT_NS),
            ("xmlns:jacks", JACKS_NS),
            ("xmlns:xsi", XSI_NS),
            ("xsi:schemaLocation", SCHEMA_LOCATION),
            ("type", "request"),
        ],
    )?;
    for node in &doc.nodes {
        write_node(&mut xml, node)?;
    }
    xml.close("rspec");
    Ok(xml.finish())
}

fn write_node(xml: &mut XmlWriter, node: &NodeRequest) -> Result<()> {
    let exclusive = bool_attr(node.exclusive);
    let mut attrs = vec![("client_id", node.client_id.as_str()), ("exclusive", exclusive)];
    if !node.component_manager_id.is_empty() {
        attrs.push(("component_manager_id", node.component_manager_id.as_str()));
    }
    xml.open("node", &attrs)?;

    xml.open("sliver_type", &[("name", node.sliver_type.as_str())])?;
    if !node.disk_image.is_empty() {
        xml.empty("disk_image", &[("name", node.disk_image.as_str())])?;
    }
    xml.close("sliver_type");

    if !node.hardware_type.is_empty() {
        xml.empty("hardware_type", &[("name", node.hardware_type.as_str())])?;
    }

    if !node.services.is_empty() {
        xml.open("services", &[])?;
        for svc in &node.services {
            xml.empty(
                "execute",
                &[("shell", svc.shell.as_str()), ("command", svc.command.as_str())],
            )?;
        }
        xml.close("services");
    }

    if let Some(bs) = &node.blockstore {
        let mut attrs = vec![
            ("name", bs.name.as_str()),
            ("mountpoint", bs.mount_point.as_str()),
            ("class", "local"),
            ("size", bs.size.as_str()),
            ("placement", "any"),
        ];
        // the schema treats both flags as false when absent
        if bs.readonly {
            attrs.push(("readonly", "true"));
        }
        if bs.best_effort {
            attrs.push(("best_effort", "true"));
        }
        xml.empty("emulab:blockstore", &attrs)?;
    }

    xml.close("node");
    Ok(())
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Escape a string for use inside a double-quoted attribute.
///
/// Tab, line feed and carriage return become character references so that
/// attribute normalization does not turn them into spaces.
pub fn escape_attr(value: &str) -> Result<String> {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' => escaped.push_str("&#9;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            c if is_xml_char(c) => escaped.push(c),
            c => return Err(ProfileError::invalid_xml_char(c, value)),
        }
    }
    Ok(escaped)
}

/// Minimal indenting writer for the handful of elements an RSpec needs
struct XmlWriter {
    buf: String,
    depth: usize,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            buf: String::new(),
            depth: 0,
        }
    }

    fn declaration(&mut self) {
        self.buf.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }

    fn start_tag(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.buf.push_str(&"  ".repeat(self.depth));
        self.buf.push('<');
        self.buf.push_str(tag);
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape_attr(value)?);
            self.buf.push('"');
        }
        Ok(())
    }

    fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.start_tag(tag, attrs)?;
        self.buf.push_str(">\n");
        self.depth += 1;
        Ok(())
    }

    fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.start_tag(tag, attrs)?;
        self.buf.push_str("/>\n");
        Ok(())
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.buf.push_str(&"  ".repeat(self.depth));
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push_str(">\n");
    }

    fn finish(mut self) -> String {
        while self.buf.ends_with('\n') {
            self.buf.pop();
        }
        self.buf
    }
}
