//! Station code types.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code {code:?}: {reason}")]
pub struct InvalidStation {
    code: String,
    reason: &'static str,
}

impl InvalidStation {
    fn new(code: &str, reason: &'static str) -> Self {
        Self {
            code: code.to_string(),
            reason,
        }
    }
}

/// A provider-specific station identifier as the caller typed it.
///
/// Codes are opaque: a rail CRS code ("KGX") and a transit stop id
/// ("HSL:1220409") are both valid. The only requirements are that the
/// code is non-empty and contains no whitespace, so it can be echoed back
/// in a fixed-width table and used as a JSON key.
///
/// # Examples
///
/// ```
/// use departure_board::domain::StationCode;
///
/// let kgx = StationCode::parse("KGX").unwrap();
/// assert_eq!(kgx.as_str(), "KGX");
///
/// assert!(StationCode::parse("HSL:1220409").is_ok());
/// assert!(StationCode::parse("").is_err());
/// assert!(StationCode::parse("K X").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StationCode(String);

impl StationCode {
    /// Parse a station code, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStation> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStation::new(s, "must not be empty"));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidStation::new(s, "must not contain whitespace"));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A valid 3-letter CRS (Computer Reservation System) station code.
///
/// CRS codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `Crs` value is valid by construction.
///
/// # Examples
///
/// ```
/// use departure_board::domain::Crs;
///
/// let kgx = Crs::parse("KGX").unwrap();
/// assert_eq!(kgx.as_str(), "KGX");
///
/// // Lowercase is rejected
/// assert!(Crs::parse("kgx").is_err());
///
/// // Wrong length is rejected
/// assert!(Crs::parse("KG").is_err());
/// assert!(Crs::parse("KGXX").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs([u8; 3]);

impl Crs {
    /// Parse a CRS code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidStation> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidStation::new(s, "CRS must be exactly 3 characters"));
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidStation::new(
                    s,
                    "CRS must be uppercase ASCII letters A-Z",
                ));
            }
        }

        Ok(Crs([bytes[0], bytes[1], bytes[2]]))
    }

    /// Interpret a station code as a CRS, accepting lowercase input.
    ///
    /// Darwin itself is case-insensitive about CRS codes, so users typing
    /// `kgx` get the same board as `KGX`.
    pub fn from_station(code: &StationCode) -> Result<Self, InvalidStation> {
        Self::parse(&code.as_str().to_ascii_uppercase())
            .map_err(|e| InvalidStation::new(code.as_str(), e.reason))
    }

    /// Returns the CRS code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Crs({})", self.as_str())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
