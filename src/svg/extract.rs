//! Root `<svg>` element extraction.
//!
//! Parses an icon file's markup just far enough to pull out the root
//! element's attributes and its raw inner markup. The inner markup is kept
//! as an untouched source slice so nested elements round-trip byte for byte.

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

/// Extraction failures. All of these degrade to "symbol absent" upstream.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("SVG file is empty")]
    Empty,

    #[error("no root <svg> element found")]
    NoRoot,

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
}

/// The root element of one icon, split into attributes and inner markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSymbol {
    /// Root element attributes in source order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Raw markup between the opening and closing `<svg>` tags.
    pub content: String,
}

impl ExtractedSymbol {
    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.attributes.iter_mut().find(|(k, _)| k == name) {
            entry.1 = value;
        } else {
            self.attributes.push((name.to_string(), value));
        }
    }

    /// Remove an attribute by name.
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| k != name);
    }
}

/// Extract the root `<svg>` element from raw markup.
///
/// Leading prologue (XML declaration, comments, doctype) is skipped. The
/// first `<svg>` start tag wins; anything after its closing tag is ignored.
pub fn extract_root(source: &str) -> Result<ExtractedSymbol, ExtractError> {
    if source.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    let mut reader = Reader::from_str(source);

    loop {
        match reader.read_event()? {
            Event::Start(start) if start.local_name().as_ref() == b"svg" => {
                let attributes = read_attributes(&start)?;
                let span = reader.read_to_end(start.name())?;
                let content = source[span.start as usize..span.end as usize].to_string();
                return Ok(ExtractedSymbol {
                    attributes,
                    content,
                });
            }
            Event::Empty(start) if start.local_name().as_ref() == b"svg" => {
                return Ok(ExtractedSymbol {
                    attributes: read_attributes(&start)?,
                    content: String::new(),
                });
            }
            Event::Eof => return Err(ExtractError::NoRoot),
            _ => {}
        }
    }
}

/// Decode and unescape the attributes of a start tag, preserving order.
fn read_attributes(
    start: &quick_xml::events::BytesStart<'_>,
) -> Result<Vec<(String, String)>, ExtractError> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value).into_owned();
        let value = quick_xml::escape::unescape(&raw)?.into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}
