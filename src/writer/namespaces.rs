use serde::{Deserialize, Serialize};

/// CII (UN/CEFACT D16B) namespace URIs.
pub mod cii_ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
    pub const A: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const XS: &str = "http://www.w3.org/2001/XMLSchema";
}

/// Prefix → namespace URI mapping consulted when a start tag is flushed.
///
/// Insertion order is kept so declarations come out in the order they were
/// registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceTable {
    entries: Vec<(String, String)>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The prefixes used by ZUGFeRD / Factur-X CII documents.
    pub fn cii() -> Self {
        let mut table = Self::new();
        table.insert("a", cii_ns::A);
        table.insert("rsm", cii_ns::RSM);
        table.insert("qdt", cii_ns::QDT);
        table.insert("ram", cii_ns::RAM);
        table.insert("xs", cii_ns::XS);
        table.insert("udt", cii_ns::UDT);
        table
    }

    /// Bind `prefix`, replacing an earlier binding of the same prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) -> &mut Self {
        let prefix = prefix.into();
        let uri = uri.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = uri,
            None => self.entries.push((prefix, uri)),
        }
        self
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>, U: Into<String>> FromIterator<(P, U)> for NamespaceTable {
    fn from_iter<I: IntoIterator<Item = (P, U)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (p, u) in iter {
            table.insert(p, u);
        }
        table
    }
}
