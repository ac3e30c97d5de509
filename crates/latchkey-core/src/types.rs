use crate::{
    Result,
    constants::{MAX_UID_LENGTH, MIN_UID_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Device identifier reported to the authorization server.
///
/// A short ASCII name such as `door-control-01`. The value is normalized
/// (trimmed) before validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a new device ID with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidDeviceId` if the ID is empty, longer than
    /// 64 characters, or contains non-printable or non-ASCII characters.
    pub fn new(id: &str) -> Result<Self> {
        let id = id.trim();

        if id.is_empty() || id.len() > 64 {
            return Err(Error::InvalidDeviceId(format!(
                "Device ID must be 1-64 chars, got {}",
                id.len()
            )));
        }

        if !id.chars().all(|c| c.is_ascii_graphic()) {
            return Err(Error::InvalidDeviceId(
                "Device ID must be printable ASCII".to_string(),
            ));
        }

        Ok(DeviceId(id.to_string()))
    }

    /// Get the device ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DeviceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DeviceId::new(s)
    }
}

/// Card unique identifier (4-10 bytes, per ISO 14443).
///
/// Rendered on the wire as colon-separated uppercase hex bytes, e.g.
/// `AA:BB:CC:01`.
///
/// # Security
/// This type implements constant-time comparison so that comparing a
/// presented UID against a known one does not leak the position of the
/// first differing byte.
#[derive(Debug, Clone, Eq)]
pub struct CardUid(Vec<u8>);

impl CardUid {
    /// Create a card UID from raw bytes with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidCardUid` if the length is outside 4-10 bytes.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        let len = bytes.len();
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&len) {
            return Err(Error::InvalidCardUid(format!(
                "UID must be {MIN_UID_LENGTH}-{MAX_UID_LENGTH} bytes, got {len}"
            )));
        }
        Ok(CardUid(bytes))
    }

    /// Parse a UID from a hex string, with or without colon separators.
    ///
    /// Accepts both `AA:BB:CC:01` and `aabbcc01`; the parsed value is
    /// normalized, so both forms compare equal.
    ///
    /// # Errors
    /// Returns `Error::InvalidCardUid` if the string is not valid hex byte
    /// pairs or the decoded length is outside 4-10 bytes.
    pub fn parse(s: &str) -> Result<Self> {
        let compact: String = s.trim().chars().filter(|c| *c != ':').collect();

        if compact.is_empty() || compact.len() % 2 != 0 {
            return Err(Error::InvalidCardUid(format!(
                "UID hex string must contain whole byte pairs: {s:?}"
            )));
        }

        let mut bytes = Vec::with_capacity(compact.len() / 2);
        for pair in compact.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair)
                .map_err(|_| Error::InvalidCardUid(format!("Non-ASCII UID string: {s:?}")))?;
            let byte = u8::from_str_radix(pair, 16)
                .map_err(|_| Error::InvalidCardUid(format!("Invalid hex byte {pair:?} in {s:?}")))?;
            bytes.push(byte);
        }

        CardUid::new(bytes)
    }

    /// Get the raw UID bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Format as colon-separated uppercase hex (the wire format).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for CardUid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CardUid::parse(s)
    }
}

/// Constant-time comparison implementation for CardUid.
///
/// The slice `ct_eq` returns false for mismatched lengths without shortcut
/// evaluation over the bytes themselves.
impl PartialEq for CardUid {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl std::hash::Hash for CardUid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Outcome of one authorization attempt.
///
/// Exactly one variant is produced per decision attempt. `Granted` is the
/// only variant that may unlock the door; the other four exist for
/// observability and all map to the same deny behavior downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationOutcome {
    /// Explicit positive decision from the authority.
    Granted,

    /// Explicit negative decision from the authority.
    Denied,

    /// No network link, or the authority could not be reached at all.
    Unreachable,

    /// The authority did not respond within the decision deadline.
    TimedOut,

    /// The authority responded, but the reply could not be interpreted
    /// (non-200 status or a body without a boolean `granted` field).
    Malformed,
}

impl AuthorizationOutcome {
    /// Returns `true` only for an explicit grant.
    #[inline]
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, AuthorizationOutcome::Granted)
    }

    /// Short lowercase label for structured log fields.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AuthorizationOutcome::Granted => "granted",
            AuthorizationOutcome::Denied => "denied",
            AuthorizationOutcome::Unreachable => "unreachable",
            AuthorizationOutcome::TimedOut => "timed_out",
            AuthorizationOutcome::Malformed => "malformed",
        }
    }
}

impl fmt::Display for AuthorizationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
