//! Swiss postal code type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest valid postal code.
pub const ZIP_MIN: i64 = 1000;

/// Highest valid postal code.
pub const ZIP_MAX: i64 = 9999;

/// Error returned when parsing an invalid postal code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid zip code: {reason}")]
pub struct InvalidZip {
    reason: &'static str,
}

/// A four-digit Swiss postal code in the range 1000..=9999.
///
/// Any `Zip` value is valid by construction.
///
/// # Examples
///
/// ```
/// use waste_server::domain::Zip;
///
/// let zip = Zip::parse("8001").unwrap();
/// assert_eq!(zip.get(), 8001);
///
/// assert!(Zip::parse("999").is_err());
/// assert!(Zip::parse("80a1").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Zip(u16);

impl Zip {
    /// Parse a postal code from its decimal representation.
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidZip> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidZip {
                reason: "must be a decimal number",
            });
        }
        let value: i64 = trimmed.parse().map_err(|_| InvalidZip {
            reason: "must be a decimal number",
        })?;
        Self::new(value)
    }

    /// Create a postal code from an integer.
    pub fn new(value: i64) -> Result<Self, InvalidZip> {
        if !(ZIP_MIN..=ZIP_MAX).contains(&value) {
            return Err(InvalidZip {
                reason: "must be between 1000 and 9999",
            });
        }
        Ok(Zip(value as u16))
    }

    /// Returns the numeric value.
    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for Zip {
    type Error = InvalidZip;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Zip::new(value)
    }
}

impl From<Zip> for i64 {
    fn from(zip: Zip) -> Self {
        i64::from(zip.0)
    }
}

impl fmt::Debug for Zip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zip({})", self.0)
    }
}

impl fmt::Display for Zip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every value in range parses and roundtrips
        #[test]
        fn in_range_roundtrip(n in ZIP_MIN..=ZIP_MAX) {
            let zip = Zip::parse(&n.to_string()).unwrap();
            prop_assert_eq!(i64::from(zip), n);
        }

        /// Values outside the range are always rejected
        #[test]
        fn out_of_range_rejected(n in prop_oneof![0i64..ZIP_MIN, (ZIP_MAX + 1)..1_000_000]) {
            prop_assert!(Zip::parse(&n.to_string()).is_err());
        }
    }
}
