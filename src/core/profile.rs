use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;
use thiserror::Error;

/// ZUGFeRD / Factur-X profile bitmask.
///
/// A writer produces output for exactly one active profile; elements and
/// values declare the set of profiles they belong to. [`Profile::UNKNOWN`]
/// is the "unspecified" sentinel and inherits the active profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(u32);

impl Profile {
    /// Unspecified; always compatible.
    pub const UNKNOWN: Profile = Profile(0);
    /// Minimal machine-readable data.
    pub const MINIMUM: Profile = Profile(1);
    /// Basic with line items.
    pub const BASIC: Profile = Profile(1 << 1);
    /// Full EN 16931 (a.k.a. Comfort).
    pub const COMFORT: Profile = Profile(1 << 2);
    /// Beyond EN 16931.
    pub const EXTENDED: Profile = Profile(1 << 3);
    /// XRechnung 1.x.
    pub const XRECHNUNG1: Profile = Profile(1 << 4);
    /// XRechnung 2.x / 3.x.
    pub const XRECHNUNG: Profile = Profile(1 << 5);
    /// Basic without line items.
    pub const BASIC_WL: Profile = Profile(1 << 6);
    /// French e-reporting.
    pub const E_REPORTING: Profile = Profile(1 << 7);
    /// Every known profile.
    pub const ALL: Profile = Profile((1 << 8) - 1);

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// `None` if `bits` contains flags outside [`Profile::ALL`].
    pub const fn from_bits(bits: u32) -> Option<Profile> {
        if bits & !Self::ALL.0 == 0 {
            Some(Profile(bits))
        } else {
            None
        }
    }

    /// Drop any bits outside [`Profile::ALL`].
    pub const fn from_bits_truncate(bits: u32) -> Profile {
        Profile(bits & Self::ALL.0)
    }

    pub const fn is_unknown(self) -> bool {
        self.0 == 0
    }

    /// Whether every flag of `other` is set in `self`.
    pub const fn contains(self, other: Profile) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether an element declared for `self` is written under `active`.
    ///
    /// This is a containment test: the active profile must be a subset of the
    /// declared set. Declaring `COMFORT | EXTENDED` and running under
    /// `COMFORT` passes; running under `COMFORT | BASIC` does not.
    pub const fn is_compatible_with(self, active: Profile) -> bool {
        self.is_unknown() || self.contains(active)
    }

    /// Single flags set in this mask, lowest bit first.
    pub fn iter(self) -> impl Iterator<Item = Profile> {
        PROFILE_TABLE
            .iter()
            .map(|info| info.profile)
            .filter(move |p| self.contains(*p))
    }

    /// Catalogue entry for a single-flag profile.
    pub fn info(self) -> Option<&'static ProfileInfo> {
        PROFILE_TABLE.iter().find(|info| info.profile == self)
    }

    /// Short name, e.g. `"COMFORT"`.
    pub fn name(self) -> Option<&'static str> {
        self.info().map(|i| i.name)
    }

    /// The XMP `ConformanceLevel` value, e.g. `"EN 16931"`.
    pub fn conformance_level(self) -> Option<&'static str> {
        self.info().map(|i| i.conformance_level)
    }

    /// Guideline URN written to `GuidelineSpecifiedDocumentContextParameter`.
    pub fn urn(self) -> Option<&'static str> {
        self.info().map(|i| i.urn)
    }

    pub fn from_name(name: &str) -> Option<Profile> {
        PROFILE_TABLE
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .map(|info| info.profile)
    }

    pub fn from_urn(urn: &str) -> Option<Profile> {
        PROFILE_TABLE
            .iter()
            .find(|info| info.urn == urn)
            .map(|info| info.profile)
    }
}

/// Free-function form of [`Profile::is_compatible_with`].
pub fn profile_is_compatible(element: Profile, active: Profile) -> bool {
    element.is_compatible_with(active)
}

impl BitOr for Profile {
    type Output = Profile;
    fn bitor(self, rhs: Profile) -> Profile {
        Profile(self.0 | rhs.0)
    }
}

impl BitOrAssign for Profile {
    fn bitor_assign(&mut self, rhs: Profile) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Profile {
    type Output = Profile;
    fn bitand(self, rhs: Profile) -> Profile {
        Profile(self.0 & rhs.0)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return f.write_str("UNKNOWN");
        }
        let mut first = true;
        for info in PROFILE_TABLE.iter().filter(|i| self.contains(i.profile)) {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(info.name)?;
            first = false;
        }
        Ok(())
    }
}

/// A profile name that is not in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown profile name: {0}")]
pub struct ParseProfileError(pub String);

impl FromStr for Profile {
    type Err = ParseProfileError;

    /// Parses `"COMFORT"`, `"comfort | extended"` or `"UNKNOWN"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut profile = Profile::UNKNOWN;
        for part in s.split('|').map(str::trim) {
            if part.eq_ignore_ascii_case("UNKNOWN") {
                continue;
            }
            profile |= Profile::from_name(part).ok_or_else(|| ParseProfileError(part.to_string()))?;
        }
        Ok(profile)
    }
}

/// Static catalogue row for one profile flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileInfo {
    pub profile: Profile,
    pub name: &'static str,
    pub conformance_level: &'static str,
    pub urn: &'static str,
}

/// Profile catalogue, ordered by bit.
pub static PROFILE_TABLE: &[ProfileInfo] = &[
    ProfileInfo {
        profile: Profile::MINIMUM,
        name: "MINIMUM",
        conformance_level: "MINIMUM",
        urn: "urn:factur-x.eu:1p0:minimum",
    },
    ProfileInfo {
        profile: Profile::BASIC,
        name: "BASIC",
        conformance_level: "BASIC",
        urn: "urn:cen.eu:en16931:2017#compliant#urn:factur-x.eu:1p0:basic",
    },
    ProfileInfo {
        profile: Profile::COMFORT,
        name: "COMFORT",
        conformance_level: "EN 16931",
        urn: "urn:cen.eu:en16931:2017",
    },
    ProfileInfo {
        profile: Profile::EXTENDED,
        name: "EXTENDED",
        conformance_level: "EXTENDED",
        urn: "urn:cen.eu:en16931:2017#conformant#urn:factur-x.eu:1p0:extended",
    },
    ProfileInfo {
        profile: Profile::XRECHNUNG1,
        name: "XRECHNUNG1",
        conformance_level: "XRECHNUNG",
        urn: "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_1.2",
    },
    ProfileInfo {
        profile: Profile::XRECHNUNG,
        name: "XRECHNUNG",
        conformance_level: "XRECHNUNG",
        urn: "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0",
    },
    ProfileInfo {
        profile: Profile::BASIC_WL,
        name: "BASICWL",
        conformance_level: "BASIC WL",
        urn: "urn:factur-x.eu:1p0:basicwl",
    },
    ProfileInfo {
        profile: Profile::E_REPORTING,
        name: "EREPORTING",
        conformance_level: "EREPORTING",
        urn: "urn.cpro.gouv.fr:1p0:ereporting",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_always_compatible() {
        assert!(Profile::UNKNOWN.is_compatible_with(Profile::EXTENDED));
        assert!(Profile::UNKNOWN.is_compatible_with(Profile::COMFORT | Profile::BASIC));
    }

    #[test]
    fn compatibility_is_containment_not_overlap() {
        let declared = Profile::COMFORT | Profile::EXTENDED;
        assert!(declared.is_compatible_with(Profile::COMFORT));
        assert!(declared.is_compatible_with(Profile::COMFORT | Profile::EXTENDED));
        // overlaps on COMFORT but BASIC is not declared
        assert!(!declared.is_compatible_with(Profile::COMFORT | Profile::BASIC));
        assert!(!Profile::EXTENDED.is_compatible_with(Profile::COMFORT));
    }

    #[test]
    fn from_bits_rejects_foreign_bits() {
        assert_eq!(Profile::from_bits(4), Some(Profile::COMFORT));
        assert_eq!(Profile::from_bits(1 << 12), None);
        assert_eq!(Profile::from_bits_truncate((1 << 12) | 8), Profile::EXTENDED);
    }

    #[test]
    fn catalogue_lookups() {
        assert_eq!(Profile::COMFORT.conformance_level(), Some("EN 16931"));
        assert_eq!(Profile::BASIC_WL.urn(), Some("urn:factur-x.eu:1p0:basicwl"));
        assert_eq!(Profile::from_name("extended"), Some(Profile::EXTENDED));
        assert_eq!(
            Profile::from_urn("urn:cen.eu:en16931:2017"),
            Some(Profile::COMFORT)
        );
        // combined masks have no single catalogue entry
        assert_eq!((Profile::COMFORT | Profile::BASIC).name(), None);
    }

    #[test]
    fn catalogue_is_ordered_by_bit() {
        let bits: Vec<u32> = PROFILE_TABLE.iter().map(|i| i.profile.bits()).collect();
        let mut sorted = bits.clone();
        sorted.sort_unstable();
        assert_eq!(bits, sorted);
        assert_eq!(bits.iter().fold(0, |acc, b| acc | b), Profile::ALL.bits());
    }

    #[test]
    fn display_and_parse() {
        let p = Profile::EXTENDED | Profile::COMFORT;
        assert_eq!(p.to_string(), "COMFORT|EXTENDED");
        assert_eq!("comfort | EXTENDED".parse::<Profile>().unwrap(), p);
        assert_eq!("UNKNOWN".parse::<Profile>().unwrap(), Profile::UNKNOWN);
        assert_eq!(Profile::UNKNOWN.to_string(), "UNKNOWN");
        assert_eq!(
            "COMFORT|GOLD".parse::<Profile>().unwrap_err(),
            ParseProfileError("GOLD".into())
        );
    }

    #[test]
    fn iter_yields_single_flags() {
        let flags: Vec<Profile> = (Profile::BASIC | Profile::XRECHNUNG).iter().collect();
        assert_eq!(flags, vec![Profile::BASIC, Profile::XRECHNUNG]);
    }
}
