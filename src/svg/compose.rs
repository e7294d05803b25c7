//! Sprite document serialization.
//!
//! Builds the combined sprite markup: one `<symbol>` element per processed
//! icon, wrapped in a `<defs>` container inside a single root `<svg>`.
//! Attribute values are escaped on the way out; inner markup is emitted
//! verbatim since it is carried as a raw source slice.

use std::path::Path;

/// Escape an attribute value for serialization.
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("&quot;"),
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Serialize an attribute list as ` key="value"` pairs.
fn write_attributes(out: &mut String, attributes: &[(String, String)]) {
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
}

/// Serialize one `<symbol>` element from attributes and inner markup.
pub fn symbol_element(attributes: &[(String, String)], content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 64);
    out.push_str("<symbol");
    write_attributes(&mut out, attributes);
    out.push('>');
    out.push_str(content);
    out.push_str("</symbol>");
    out
}

/// One member of a sprite document, ready for serialization.
pub struct SymbolEntry<'a> {
    pub file_path: &'a Path,
    pub attributes: &'a [(String, String)],
    pub content: &'a str,
}

/// Serialize the full sprite document.
///
/// In dev mode each symbol is preceded by a comment naming its source file,
/// so the served sprite can be inspected in the browser.
pub fn sprite_document(entries: &[SymbolEntry<'_>], dev: bool) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1">"#);
    out.push_str("<defs>");

    for entry in entries {
        if dev {
            out.push_str("\n\n<!-- File: ");
            out.push_str(&entry.file_path.display().to_string());
            out.push_str(" -->\n");
        }
        out.push_str(&symbol_element(entry.attributes, entry.content));
    }

    out.push_str("</defs>");
    out.push_str("</svg>");
    out
}
