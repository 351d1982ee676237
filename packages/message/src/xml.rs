//! Flat XML reading and CDATA-based writing
//!
//! Platform documents are a single root element whose children are leaf
//! elements, occasionally grouped one level deeper. Reading flattens the
//! document into a name → text map: direct children of the root are keyed by
//! name and must be unique, deeper elements are keyed by their slash-separated
//! path below the root (`Articles/item/Title`). Writing emits string values as
//! CDATA.

use crate::{MessageError, Result};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use std::collections::HashMap;

/// Leaf values of a flat XML document keyed by element name or path
#[derive(Debug, Clone, Default)]
pub struct XmlFields {
    root: String,
    fields: HashMap<String, Vec<String>>,
}

impl XmlFields {
    /// Root element name
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Text of element `name`, if present
    ///
    /// For repeated nested paths this is the first occurrence.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every occurrence of a nested path, in document order
    #[must_use]
    pub fn get_all(&self, path: &str) -> &[String] {
        self.fields.get(path).map_or(&[], Vec::as_slice)
    }

    /// Text of element `name`, or an empty string when absent
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Text of element `name` when present and non-empty
    #[must_use]
    pub fn optional(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
    }

    /// Parse element `name` as a number when present and non-empty
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Parse`] if the element holds a non-numeric value.
    pub fn number<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| MessageError::parse(format!("invalid {name} '{raw}': {e}"))),
            None => Ok(None),
        }
    }

    /// Number of distinct element names and paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no elements below the root
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An element that is still open while reading
struct Frame {
    key: String,
    text: String,
    has_children: bool,
}

/// Parse `xml` into its flattened values
///
/// Text inside a leaf element is kept verbatim, including whitespace-only
/// values. Whitespace between elements is ignored.
///
/// # Errors
///
/// Returns [`MessageError::Parse`] for malformed XML, a missing root element,
/// unclosed elements, more than one root, text or CDATA directly under the
/// root, text mixed with child elements, or a repeated direct child.
pub fn flatten(xml: &[u8]) -> Result<XmlFields> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<String> = None;
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                let name = element_name(&start)?;
                open(&mut stack, &mut root, name)?;
            }
            Event::Empty(start) => {
                let name = element_name(&start)?;
                open(&mut stack, &mut root, name)?;
                close(&mut stack, &mut fields)?;
            }
            Event::End(_) => close(&mut stack, &mut fields)?,
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|e| MessageError::parse(format!("invalid text: {e}")))?;
                character_data(&mut stack, &value)?;
            }
            Event::CData(cdata) => {
                let value = String::from_utf8(cdata.into_inner().into_owned())
                    .map_err(|e| MessageError::parse(format!("invalid UTF-8 in CDATA: {e}")))?;
                character_data(&mut stack, &value)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(frame) = stack.last() {
        let name = match frame.key.as_str() {
            "" => root.as_deref().unwrap_or_default(),
            key => key,
        };
        return Err(MessageError::parse(format!("unclosed element <{name}>")));
    }
    let root = root.ok_or_else(|| MessageError::parse("missing root element"))?;
    Ok(XmlFields { root, fields })
}

fn element_name(start: &BytesStart<'_>) -> Result<String> {
    String::from_utf8(start.name().as_ref().to_vec())
        .map_err(|e| MessageError::parse(format!("invalid element name: {e}")))
}

fn open(stack: &mut Vec<Frame>, root: &mut Option<String>, name: String) -> Result<()> {
    let key = match stack.last_mut() {
        None => {
            if root.is_some() {
                return Err(MessageError::parse("multiple root elements"));
            }
            *root = Some(name);
            String::new()
        }
        Some(parent) => {
            if !parent.text.trim().is_empty() {
                return Err(MessageError::parse(format!(
                    "text mixed with child element <{name}>"
                )));
            }
            parent.text.clear();
            parent.has_children = true;
            if parent.key.is_empty() {
                name
            } else {
                format!("{}/{name}", parent.key)
            }
        }
    };
    stack.push(Frame {
        key,
        text: String::new(),
        has_children: false,
    });
    Ok(())
}

fn close(stack: &mut Vec<Frame>, fields: &mut HashMap<String, Vec<String>>) -> Result<()> {
    let Some(frame) = stack.pop() else {
        return Ok(());
    };
    // Root
    if frame.key.is_empty() {
        return Ok(());
    }

    let value = if frame.has_children {
        if !frame.text.trim().is_empty() {
            return Err(MessageError::parse(format!(
                "text mixed with child elements in <{}>",
                frame.key
            )));
        }
        String::new()
    } else {
        frame.text
    };

    if stack.len() == 1 && fields.contains_key(&frame.key) {
        return Err(MessageError::parse(format!(
            "duplicate element <{}>",
            frame.key
        )));
    }
    fields.entry(frame.key).or_default().push(value);
    Ok(())
}

fn character_data(stack: &mut [Frame], value: &str) -> Result<()> {
    match stack {
        // Prolog, epilog and indentation directly under the root
        [] | [_] if value.trim().is_empty() => Ok(()),
        [] | [_] => Err(MessageError::parse("text outside of a field element")),
        [.., frame] => {
            frame.text.push_str(value);
            Ok(())
        }
    }
}

/// Escape `&`, `<`, `>`, `'` and `"` in text.
///
/// Content is never escaped automatically; callers opt in with this helper so
/// already-escaped markup is not escaped twice.
#[must_use]
pub fn escape_text(raw: &str) -> String {
    quick_xml::escape::escape(raw).into_owned()
}

/// Incremental writer for outbound XML documents
pub struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl Default for XmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlBuilder {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    /// Write an opening tag
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Render`] if writing fails.
    pub fn open(&mut self, name: &str) -> Result<()> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    /// Write a closing tag
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Render`] if writing fails.
    pub fn close(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Write `<name><![CDATA[value]]></name>`
    ///
    /// A `]]>` inside `value` is split across two CDATA sections.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Render`] if writing fails.
    pub fn cdata(&mut self, name: &str, value: &str) -> Result<()> {
        self.open(name)?;
        let mut rest = value;
        while let Some(pos) = rest.find("]]>") {
            self.write(Event::CData(BytesCData::new(&rest[..pos + 2])))?;
            rest = &rest[pos + 2..];
        }
        self.write(Event::CData(BytesCData::new(rest)))?;
        self.close(name)
    }

    /// Write `<name>value</name>` with `value` escaped as plain text
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Render`] if writing fails.
    pub fn text(&mut self, name: &str, value: &str) -> Result<()> {
        self.open(name)?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.close(name)
    }

    /// Finish the document
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Render`] if the output is not UTF-8.
    pub fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| MessageError::Render(format!("invalid UTF-8 output: {e}")))
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| MessageError::Render(e.to_string()))
    }
}
