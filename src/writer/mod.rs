//! Profile-aware XML writer with deferred start tags.
//!
//! Every `start_element` only pushes a frame. A start tag reaches the output
//! when the first piece of real content (text, attribute, value, comment or
//! raw markup) is written somewhere below it; elements that never receive
//! content vanish together with their empty ancestors. Elements and content
//! declared for profiles that do not contain the active profile are
//! suppressed, and the exclusion is inherited by everything below them.
//!
//! ```rust
//! use profile_xml::{Profile, ProfileAwareWriter, WriterOptionsBuilder};
//!
//! let options = WriterOptionsBuilder::new(Profile::COMFORT)
//!     .compact()
//!     .write_declaration(false)
//!     .build()
//!     .unwrap();
//! let mut w = ProfileAwareWriter::in_memory(options).unwrap();
//! w.start_element("", "Party", Profile::UNKNOWN).unwrap();
//! w.start_element("", "Empty", Profile::UNKNOWN).unwrap();
//! w.end_element().unwrap();
//! w.write_element_string("", "Note", "extended only", Profile::EXTENDED).unwrap();
//! w.write_element_string("", "Name", "ACME GmbH", Profile::UNKNOWN).unwrap();
//! w.end_element().unwrap();
//! assert_eq!(w.into_string().unwrap(), "<Party><Name>ACME GmbH</Name></Party>");
//! ```

mod namespaces;
mod options;
mod sink;
mod stack;
mod values;

pub use namespaces::{NamespaceTable, cii_ns};
pub use options::{Indent, IndentChar, WriterOptions, WriterOptionsBuilder};
pub use sink::{QuickXmlSink, XmlSink};
pub use stack::{ElementStack, Frame};
pub use values::{format_date_102, format_decimal};

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::{Profile, XmlError, XmlResult, sanitize};

/// Writer into an in-memory buffer.
pub type XmlBufferWriter = ProfileAwareWriter<QuickXmlSink<Vec<u8>>>;

/// Writer into a buffered file.
pub type XmlFileWriter = ProfileAwareWriter<QuickXmlSink<BufWriter<File>>>;

/// Profile-filtering, deferred-write XML emitter over an [`XmlSink`].
///
/// Not synchronised; every operation takes `&mut self`.
pub struct ProfileAwareWriter<S: XmlSink> {
    sink: S,
    closed: bool,
    stack: ElementStack,
    profile: Profile,
    auto_clean: bool,
    write_declaration: bool,
    namespaces: NamespaceTable,
    /// Depth of the element whose content ended in raw output. Its end tag
    /// bypasses the sink's pretty printer and needs indentation by hand.
    indent_fixup: Option<usize>,
}

fn opt_prefix(prefix: &str) -> Option<&str> {
    (!prefix.is_empty()).then_some(prefix)
}

impl<S: XmlSink> ProfileAwareWriter<S> {
    pub fn with_sink(sink: S, options: WriterOptions) -> XmlResult<Self> {
        options.validate()?;
        Ok(Self {
            sink,
            closed: false,
            stack: ElementStack::new(),
            profile: options.profile,
            auto_clean: options.auto_clean,
            write_declaration: options.write_declaration,
            namespaces: options.namespaces,
            indent_fixup: None,
        })
    }

    pub fn active_profile(&self) -> Profile {
        self.profile
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Replace the namespace table. Affects start tags flushed afterwards.
    pub fn set_namespaces(&mut self, namespaces: NamespaceTable) {
        self.namespaces = namespaces;
    }

    /// False once [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// True iff no open element is excluded by the active profile.
    pub fn is_node_visible(&self) -> bool {
        self.stack.is_node_visible()
    }

    pub fn start_document(&mut self) -> XmlResult {
        if self.closed || !self.write_declaration {
            return Ok(());
        }
        self.sink.write_start_document()
    }

    /// Close every open element and flush the sink.
    pub fn end_document(&mut self) -> XmlResult {
        if self.closed {
            return Ok(());
        }
        while !self.stack.is_empty() {
            self.end_element()?;
        }
        self.sink.write_end_document()
    }

    pub fn flush(&mut self) -> XmlResult {
        self.sink.flush()
    }

    /// End the document and close the sink. Later writes are no-ops; the
    /// output stays available through [`into_inner`](Self::into_inner).
    pub fn close(&mut self) -> XmlResult {
        if self.closed {
            return Ok(());
        }
        self.end_document()?;
        self.sink.close()?;
        self.closed = true;
        Ok(())
    }

    /// Close the writer and hand back the sink.
    pub fn finish(mut self) -> XmlResult<S> {
        self.close()?;
        Ok(self.sink)
    }

    /// The sink as it is, without ending the document.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Open an element. Nothing is written until content arrives below it.
    pub fn start_element(&mut self, prefix: &str, local_name: &str, profile: Profile) -> XmlResult {
        if self.closed {
            return Ok(());
        }
        let frame = self
            .stack
            .push(opt_prefix(prefix), local_name, profile, self.profile);
        if !frame.is_visible {
            log::debug!(
                "<{}> ({}) excluded under active profile {}",
                frame.qualified_name(),
                frame.profile,
                self.profile
            );
        }
        Ok(())
    }

    /// Close the innermost element; writes an end tag only if its start tag
    /// was written.
    pub fn end_element(&mut self) -> XmlResult {
        if self.closed {
            return Ok(());
        }
        let frame = self.stack.pop().ok_or(XmlError::StackUnderflow)?;
        if !frame.is_written {
            log::trace!("dropped empty element <{}>", frame.qualified_name());
            return Ok(());
        }
        // Any end tag puts the sink's pretty printer back on track.
        if self.indent_fixup.take() == Some(self.stack.depth() + 1) {
            let fixup = self
                .sink
                .indent_unit()
                .map(|unit| format!("\n{}", unit.repeat(self.stack.depth())));
            if let Some(fixup) = fixup {
                self.sink.write_raw(&fixup)?;
            }
        }
        self.sink.write_end_element()
    }

    /// Write `<prefix:local_name>text</prefix:local_name>` inside the current
    /// element.
    pub fn write_element_string(
        &mut self,
        prefix: &str,
        local_name: &str,
        text: &str,
        profile: Profile,
    ) -> XmlResult {
        if !self.content_visible(profile) {
            return Ok(());
        }
        let text = self.clean(text)?;
        self.flush_ancestors()?;
        let prefix = opt_prefix(prefix);
        let ns = self.namespaces.get(prefix.unwrap_or(""));
        self.sink.write_element_string(prefix, local_name, ns, &text)
    }

    /// Like [`write_element_string`](Self::write_element_string), but absent
    /// or blank text writes nothing.
    pub fn write_optional_element_string(
        &mut self,
        prefix: &str,
        local_name: &str,
        text: Option<&str>,
        profile: Profile,
    ) -> XmlResult {
        match text {
            Some(t) if !t.trim().is_empty() => {
                self.write_element_string(prefix, local_name, t, profile)
            }
            _ => Ok(()),
        }
    }

    /// Add an attribute to the current element, flushing its start tag.
    ///
    /// Only the current element's own visibility is checked, not that of its
    /// ancestors. If an ancestor is excluded the start tag cannot be written
    /// and the attribute is dropped with a warning.
    pub fn write_attribute_string(
        &mut self,
        prefix: &str,
        local_name: &str,
        value: &str,
        profile: Profile,
    ) -> XmlResult {
        if self.closed {
            return Ok(());
        }
        let top = self.stack.top().ok_or_else(|| {
            XmlError::Structure(format!("attribute '{local_name}' written outside of an element"))
        })?;
        if !top.is_visible || !profile.is_compatible_with(self.profile) {
            return Ok(());
        }
        let value = self.clean(value)?;
        if !self.flush_ancestors()? {
            log::warn!(
                "attribute '{local_name}' dropped: an ancestor of the current element is excluded"
            );
            return Ok(());
        }
        let prefix = opt_prefix(prefix);
        let ns = self.namespaces.get(prefix.unwrap_or(""));
        self.sink.write_attribute_string(prefix, local_name, ns, &value)
    }

    /// Escaped character data inside the current element.
    pub fn write_value(&mut self, value: &str, profile: Profile) -> XmlResult {
        if !self.content_visible(profile) {
            return Ok(());
        }
        let value = self.clean(value)?;
        self.flush_ancestors()?;
        self.sink.write_string(&value)
    }

    pub fn write_comment(&mut self, comment: &str, profile: Profile) -> XmlResult {
        if !self.content_visible(profile) {
            return Ok(());
        }
        let comment = self.clean(comment)?;
        self.flush_ancestors()?;
        self.sink.write_comment(&comment)
    }

    /// Unescaped markup inside the current element.
    pub fn write_raw_string(&mut self, raw: &str, profile: Profile) -> XmlResult {
        if !self.content_visible(profile) {
            return Ok(());
        }
        let raw = self.clean(raw)?;
        self.flush_ancestors()?;
        self.sink.write_raw(&raw)?;
        self.indent_fixup = Some(self.stack.depth());
        Ok(())
    }

    /// A line break plus one indentation unit per open element.
    pub fn write_raw_indentation(&mut self, profile: Profile) -> XmlResult {
        if !self.content_visible(profile) {
            return Ok(());
        }
        self.flush_ancestors()?;
        let depth = self.stack.depth();
        let indentation = self
            .sink
            .indent_unit()
            .map(|unit| format!("\n{}", unit.repeat(depth)));
        if let Some(indentation) = indentation {
            self.sink.write_raw(&indentation)?;
        }
        self.indent_fixup = Some(depth);
        Ok(())
    }

    fn content_visible(&self, profile: Profile) -> bool {
        !self.closed && self.stack.is_node_visible() && profile.is_compatible_with(self.profile)
    }

    fn clean<'a>(&self, text: &'a str) -> XmlResult<Cow<'a, str>> {
        Ok(sanitize(text, self.auto_clean)?)
    }

    /// Write the start tags of all unwritten frames from the root down,
    /// stopping at the first excluded frame.
    ///
    /// Returns whether the walk reached the current element.
    fn flush_ancestors(&mut self) -> XmlResult<bool> {
        let (pending, reached_top) = self.stack.unwritten_path();
        for index in pending {
            let Some(frame) = self.stack.get(index) else {
                continue;
            };
            let prefix = frame.prefix.as_deref();
            let ns = self.namespaces.get(prefix.unwrap_or(""));
            log::trace!("writing start tag <{}>", frame.qualified_name());
            self.sink.write_start_element(prefix, &frame.local_name, ns)?;
            self.stack.mark_written(index);
        }
        Ok(reached_top)
    }
}

impl<W: Write> ProfileAwareWriter<QuickXmlSink<W>> {
    /// Writer over any byte sink.
    pub fn new(inner: W, options: WriterOptions) -> XmlResult<Self> {
        let sink = QuickXmlSink::new(inner, options.indent);
        Self::with_sink(sink, options)
    }
}

impl XmlBufferWriter {
    pub fn in_memory(options: WriterOptions) -> XmlResult<Self> {
        Self::new(Vec::new(), options)
    }

    /// End the document and return the output.
    pub fn into_string(self) -> XmlResult<String> {
        let buf = self.finish()?.into_inner();
        String::from_utf8(buf).map_err(|e| XmlError::Utf8(e.to_string()))
    }
}

impl XmlFileWriter {
    /// Create (or truncate) `path` and write to it.
    pub fn create(path: impl AsRef<Path>, options: WriterOptions) -> XmlResult<Self> {
        options.validate()?;
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), options)
    }
}
