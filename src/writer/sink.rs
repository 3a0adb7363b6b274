use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;
use std::io::Write;

use super::options::Indent;
use crate::core::{XmlError, XmlResult};

/// The streaming XML writer the profile-aware writer delegates to.
///
/// Implementations emit events in call order; they do not know about
/// profiles or deferred start tags.
pub trait XmlSink {
    fn write_start_document(&mut self) -> XmlResult;

    /// Close every open element and flush.
    fn write_end_document(&mut self) -> XmlResult;

    fn write_start_element(
        &mut self,
        prefix: Option<&str>,
        local_name: &str,
        namespace: Option<&str>,
    ) -> XmlResult;

    fn write_end_element(&mut self) -> XmlResult;

    fn write_element_string(
        &mut self,
        prefix: Option<&str>,
        local_name: &str,
        namespace: Option<&str>,
        text: &str,
    ) -> XmlResult;

    /// Add an attribute to the start tag that was written last.
    fn write_attribute_string(
        &mut self,
        prefix: Option<&str>,
        local_name: &str,
        namespace: Option<&str>,
        value: &str,
    ) -> XmlResult;

    /// Escaped character data.
    fn write_string(&mut self, text: &str) -> XmlResult;

    /// Unescaped markup.
    fn write_raw(&mut self, raw: &str) -> XmlResult;

    fn write_comment(&mut self, text: &str) -> XmlResult;

    fn flush(&mut self) -> XmlResult;

    /// End the document and flush; the sink accepts no further output.
    fn close(&mut self) -> XmlResult;

    /// One level of indentation, `None` for compact output.
    fn indent_unit(&self) -> Option<&str>;
}

#[derive(Debug)]
struct OpenElement {
    name: String,
    /// Namespace bindings declared on this element.
    bindings: Vec<(String, String)>,
}

/// [`XmlSink`] on top of `quick_xml::Writer`.
///
/// A start tag stays pending until the next non-attribute event so that
/// attributes can still be added; an element closed while its start tag is
/// pending is written self-closing.
pub struct QuickXmlSink<W: Write> {
    writer: Writer<W>,
    pending: Option<BytesStart<'static>>,
    open: Vec<OpenElement>,
    indent_unit: Option<String>,
    closed: bool,
}

impl<W: Write> QuickXmlSink<W> {
    pub fn new(inner: W, indent: Option<Indent>) -> Self {
        let writer = match indent {
            Some(i) => Writer::new_with_indent(inner, i.char.byte(), i.size),
            None => Writer::new(inner),
        };
        Self {
            writer,
            pending: None,
            open: Vec::new(),
            indent_unit: indent.map(|i| i.unit()),
            closed: false,
        }
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn close_pending(&mut self) -> XmlResult {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }

    fn ensure_open(&self) -> XmlResult {
        if self.closed {
            return Err(XmlError::Structure("write after close".into()));
        }
        Ok(())
    }

    fn bound_uri(&self, prefix: &str) -> Option<&str> {
        self.open
            .iter()
            .rev()
            .flat_map(|e| e.bindings.iter().rev())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Declare `prefix` on the pending start tag unless it is already bound
    /// to `uri`.
    fn declare(&mut self, prefix: &str, uri: &str) -> XmlResult {
        if self.bound_uri(prefix) == Some(uri) {
            return Ok(());
        }
        let (Some(start), Some(element)) = (self.pending.as_mut(), self.open.last_mut()) else {
            return Err(XmlError::Structure(format!(
                "namespace declaration for '{prefix}' outside of a start tag"
            )));
        };
        if element.bindings.iter().any(|(p, _)| p == prefix) {
            return Err(XmlError::Structure(format!(
                "prefix '{prefix}' already declared on <{}> with another URI",
                element.name
            )));
        }
        let attr = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{prefix}")
        };
        start.push_attribute((attr.as_str(), uri));
        element.bindings.push((prefix.to_owned(), uri.to_owned()));
        Ok(())
    }
}

/// Attribute value escaping; whitespace other than a plain space becomes a
/// character reference so it survives attribute value normalisation.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn has_attribute(start: &BytesStart<'_>, name: &str) -> bool {
    start
        .attributes()
        .with_checks(false)
        .flatten()
        .any(|a| a.key.as_ref() == name.as_bytes())
}

fn qualify(prefix: Option<&str>, local_name: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}:{local_name}"),
        _ => local_name.to_owned(),
    }
}

impl<W: Write> XmlSink for QuickXmlSink<W> {
    fn write_start_document(&mut self) -> XmlResult {
        self.ensure_open()?;
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn write_end_document(&mut self) -> XmlResult {
        self.ensure_open()?;
        while !self.open.is_empty() {
            self.write_end_element()?;
        }
        self.flush()
    }

    fn write_start_element(
        &mut self,
        prefix: Option<&str>,
        local_name: &str,
        namespace: Option<&str>,
    ) -> XmlResult {
        self.ensure_open()?;
        self.close_pending()?;
        let name = qualify(prefix, local_name);
        self.pending = Some(BytesStart::new(name.clone()));
        self.open.push(OpenElement {
            name,
            bindings: Vec::new(),
        });
        if let Some(uri) = namespace {
            self.declare(prefix.unwrap_or(""), uri)?;
        }
        Ok(())
    }

    fn write_end_element(&mut self) -> XmlResult {
        self.ensure_open()?;
        let element = self
            .open
            .pop()
            .ok_or_else(|| XmlError::Structure("end element without open element".into()))?;
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self
                .writer
                .write_event(Event::End(BytesEnd::new(element.name)))?,
        }
        Ok(())
    }

    fn write_element_string(
        &mut self,
        prefix: Option<&str>,
        local_name: &str,
        namespace: Option<&str>,
        text: &str,
    ) -> XmlResult {
        self.write_start_element(prefix, local_name, namespace)?;
        self.write_string(text)?;
        self.write_end_element()
    }

    fn write_attribute_string(
        &mut self,
        prefix: Option<&str>,
        local_name: &str,
        namespace: Option<&str>,
        value: &str,
    ) -> XmlResult {
        self.ensure_open()?;
        if self.pending.is_none() {
            return Err(XmlError::Structure(format!(
                "attribute '{}' written outside of a start tag",
                qualify(prefix, local_name)
            )));
        }
        match (prefix, local_name) {
            (Some("xmlns"), p) => return self.declare(p, value),
            (None, "xmlns") => return self.declare("", value),
            (Some(p), _) if !p.is_empty() => {
                if let Some(uri) = namespace {
                    self.declare(p, uri)?;
                }
            }
            _ => {}
        }
        let name = qualify(prefix, local_name);
        let value = escape_attribute(value);
        if let Some(start) = self.pending.as_mut() {
            if has_attribute(start, &name) {
                return Err(XmlError::Structure(format!("duplicate attribute '{name}'")));
            }
            start.push_attribute(Attribute::from((name.as_bytes(), value.as_bytes())));
        }
        Ok(())
    }

    fn write_string(&mut self, text: &str) -> XmlResult {
        self.ensure_open()?;
        self.close_pending()?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn write_raw(&mut self, raw: &str) -> XmlResult {
        self.ensure_open()?;
        self.close_pending()?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(raw)))?;
        Ok(())
    }

    fn write_comment(&mut self, text: &str) -> XmlResult {
        self.ensure_open()?;
        if text.contains("--") || text.ends_with('-') {
            return Err(XmlError::InvalidComment(text.to_owned()));
        }
        self.close_pending()?;
        self.writer
            .write_event(Event::Comment(BytesText::from_escaped(text)))?;
        Ok(())
    }

    fn flush(&mut self) -> XmlResult {
        self.writer.get_mut().flush()?;
        Ok(())
    }

    fn close(&mut self) -> XmlResult {
        if self.closed {
            return Ok(());
        }
        self.write_end_document()?;
        self.closed = true;
        Ok(())
    }

    fn indent_unit(&self) -> Option<&str> {
        self.indent_unit.as_deref()
    }
}
