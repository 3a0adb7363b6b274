//! Profiles, character validation and errors.
//!
//! These pieces have no I/O and are shared by the writer and its callers.

mod chars;
mod error;
mod profile;

pub use chars::{is_xml_char, sanitize, sanitize_utf16};
pub use error::*;
pub use profile::*;
