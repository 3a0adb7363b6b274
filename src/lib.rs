//! # profile-xml
//!
//! Streaming XML writer for ZUGFeRD / Factur-X style documents whose content
//! depends on an output profile.
//!
//! * Elements and values carry a [`Profile`] bitmask; anything not declared
//!   for the writer's active profile is left out, together with everything
//!   nested below it.
//! * Start tags are deferred until real content is written, so elements
//!   that end up empty never appear in the output.
//! * All text is checked against the XML 1.0 character production; invalid
//!   characters either fail the write or are stripped (`auto_clean`).
//!
//! ## Quick Start
//!
//! ```rust
//! use profile_xml::*;
//!
//! let options = WriterOptionsBuilder::new(Profile::COMFORT)
//!     .namespaces(NamespaceTable::cii())
//!     .compact()
//!     .build()
//!     .unwrap();
//! let mut w = XmlBufferWriter::in_memory(options).unwrap();
//!
//! w.start_document().unwrap();
//! w.start_element("ram", "SellerTradeParty", Profile::COMFORT | Profile::EXTENDED).unwrap();
//! w.write_element_string("ram", "Name", "ACME GmbH", Profile::UNKNOWN).unwrap();
//! w.write_optional_element_string("ram", "Description", None, Profile::UNKNOWN).unwrap();
//! w.write_element_string("ram", "ID", "extended-only", Profile::EXTENDED).unwrap();
//! w.end_element().unwrap();
//!
//! let xml = w.into_string().unwrap();
//! assert!(xml.contains("<ram:Name>ACME GmbH</ram:Name>"));
//! assert!(!xml.contains("Description"));
//! assert!(!xml.contains("extended-only"));
//! ```
//!
//! ## Profiles
//!
//! | Flag | Conformance level |
//! |------|-------------------|
//! | `MINIMUM` | MINIMUM |
//! | `BASIC_WL` | BASIC WL |
//! | `BASIC` | BASIC |
//! | `COMFORT` | EN 16931 |
//! | `EXTENDED` | EXTENDED |
//! | `XRECHNUNG1`, `XRECHNUNG` | XRECHNUNG |
//! | `E_REPORTING` | EREPORTING |

pub mod core;
pub mod writer;

pub use crate::core::*;
pub use crate::writer::*;
