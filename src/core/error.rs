use thiserror::Error;

/// Errors raised while emitting XML.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum XmlError {
    /// Text contains a character outside the XML 1.0 `Char` production
    /// and the writer runs in strict mode.
    #[error("invalid XML character: {0}")]
    InvalidCharacter(InvalidCharacter),

    /// `end_element` was called with no open element.
    #[error("end element called without a matching start element")]
    StackUnderflow,

    /// Comment text that cannot be represented in XML.
    #[error("invalid comment: {0}")]
    InvalidComment(String),

    /// The underlying writer was driven into an impossible state.
    #[error("XML structure error: {0}")]
    Structure(String),

    /// Only UTF-8 output is supported.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// I/O failure of the output target.
    #[error("XML write error: {0}")]
    Io(#[from] std::io::Error),

    /// In-memory output was not valid UTF-8.
    #[error("XML UTF-8 error: {0}")]
    Utf8(String),
}

/// Result alias used throughout the crate.
pub type XmlResult<T = ()> = Result<T, XmlError>;

/// The first character of a value that is not allowed in XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCharacter {
    /// The rejected text. Lone surrogates of UTF-16 input are shown as U+FFFD.
    pub value: String,
    /// Byte offset for `&str` input, code unit index for UTF-16 input.
    pub offset: usize,
    /// The offending code point (or lone surrogate unit).
    pub code_point: u32,
}

impl std::fmt::Display for InvalidCharacter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "U+{:04X} at offset {} in {:?}",
            self.code_point, self.offset, self.value
        )
    }
}

impl From<InvalidCharacter> for XmlError {
    fn from(e: InvalidCharacter) -> Self {
        XmlError::InvalidCharacter(e)
    }
}
