use serde::{Deserialize, Serialize};

use super::namespaces::NamespaceTable;
use crate::core::{Profile, XmlError, XmlResult};

/// Indentation character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentChar {
    Space,
    Tab,
}

impl IndentChar {
    pub fn byte(self) -> u8 {
        match self {
            Self::Space => b' ',
            Self::Tab => b'\t',
        }
    }
}

/// Pretty-printing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indent {
    pub char: IndentChar,
    pub size: usize,
}

impl Indent {
    pub fn spaces(size: usize) -> Self {
        Self {
            char: IndentChar::Space,
            size,
        }
    }

    pub fn tabs(size: usize) -> Self {
        Self {
            char: IndentChar::Tab,
            size,
        }
    }

    /// One indentation level as a string.
    pub fn unit(self) -> String {
        char::from(self.char.byte()).to_string().repeat(self.size)
    }
}

/// Construction settings of a [`ProfileAwareWriter`](super::ProfileAwareWriter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// The profile the document is written for.
    pub profile: Profile,
    /// Strip invalid XML characters instead of failing.
    pub auto_clean: bool,
    /// `None` writes compact output.
    pub indent: Option<Indent>,
    /// Declared output encoding; only UTF-8 is supported.
    pub encoding: String,
    /// Emit `<?xml ...?>` from `start_document`.
    pub write_declaration: bool,
    pub namespaces: NamespaceTable,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            profile: Profile::UNKNOWN,
            auto_clean: false,
            indent: Some(Indent::spaces(2)),
            encoding: "UTF-8".into(),
            write_declaration: true,
            namespaces: NamespaceTable::new(),
        }
    }
}

impl WriterOptions {
    /// Reject settings the writer cannot honour.
    pub fn validate(&self) -> XmlResult {
        let enc = self.encoding.to_ascii_lowercase();
        if enc != "utf-8" && enc != "utf8" {
            return Err(XmlError::UnsupportedEncoding(self.encoding.clone()));
        }
        Ok(())
    }
}

/// Builder for [`WriterOptions`].
#[derive(Debug, Clone)]
pub struct WriterOptionsBuilder {
    options: WriterOptions,
}

impl WriterOptionsBuilder {
    pub fn new(profile: Profile) -> Self {
        Self {
            options: WriterOptions {
                profile,
                ..WriterOptions::default()
            },
        }
    }

    pub fn auto_clean(mut self, auto_clean: bool) -> Self {
        self.options.auto_clean = auto_clean;
        self
    }

    pub fn indent(mut self, indent: Indent) -> Self {
        self.options.indent = Some(indent);
        self
    }

    pub fn compact(mut self) -> Self {
        self.options.indent = None;
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.options.encoding = encoding.into();
        self
    }

    pub fn write_declaration(mut self, write: bool) -> Self {
        self.options.write_declaration = write;
        self
    }

    pub fn namespaces(mut self, namespaces: NamespaceTable) -> Self {
        self.options.namespaces = namespaces;
        self
    }

    pub fn namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.options.namespaces.insert(prefix, uri);
        self
    }

    pub fn build(self) -> XmlResult<WriterOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
