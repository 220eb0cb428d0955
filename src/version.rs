//! Content versions and ETags for doors.
//!
//! Every door has a version computed deterministically from its JSON content using
//! SHA-256. The version travels to clients as a weak HTTP ETag, and clients can send
//! it back in `If-Match` to make an update or delete conditional: if the door changed
//! in the meantime the operation is refused with a [`VersionConflict`].
//!
//! Two formats exist and are kept apart at compile time:
//!
//! * [`RawVersion`] - internal format (`abc123`)
//! * [`HttpVersion`] - weak ETag format (`W/"abc123"`)
//!
//! ```rust
//! use doorstore::version::{HttpVersion, RawVersion};
//!
//! let raw = RawVersion::from_content(br#"{"id":"1","name":"Front"}"#);
//! let etag = HttpVersion::from(raw.clone()).to_string();
//! let parsed: HttpVersion = etag.parse().unwrap();
//! assert!(raw == parsed);
//! ```

use crate::door::Door;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::{fmt, marker::PhantomData, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub struct Http;

#[derive(Debug, Clone, Copy)]
pub struct Raw;

/// Opaque version identifier with a compile-time format marker.
#[derive(Debug, Clone, Eq, Hash)]
pub struct DoorVersion<Format> {
    opaque: String,
    _format: PhantomData<Format>,
}

/// Weak ETag format (`W/"abc123"`)
pub type HttpVersion = DoorVersion<Http>;

/// Internal format (`abc123`)
pub type RawVersion = DoorVersion<Raw>;

impl<Format> DoorVersion<Format> {
    /// Hash arbitrary content into a version.
    ///
    /// Uses the first 8 bytes of the SHA-256 digest, base64 encoded.
    pub fn from_content(content: &[u8]) -> RawVersion {
        let hash = Sha256::digest(content);
        DoorVersion {
            opaque: BASE64.encode(&hash[..8]),
            _format: PhantomData,
        }
    }

    /// Version of a door, computed from its serialized form.
    pub fn of(door: &Door) -> Result<RawVersion, serde_json::Error> {
        Ok(Self::from_content(&serde_json::to_vec(door)?))
    }

    pub fn as_str(&self) -> &str {
        &self.opaque
    }
}

impl fmt::Display for DoorVersion<Raw> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opaque)
    }
}

impl fmt::Display for DoorVersion<Http> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W/\"{}\"", self.opaque)
    }
}

impl FromStr for DoorVersion<Raw> {
    type Err = VersionError;

    fn from_str(version_str: &str) -> Result<Self, Self::Err> {
        let trimmed = version_str.trim();
        if trimmed.is_empty() {
            return Err(VersionError::ParseError(
                "Version string cannot be empty".to_string(),
            ));
        }
        Ok(DoorVersion {
            opaque: trimmed.to_string(),
            _format: PhantomData,
        })
    }
}

impl FromStr for DoorVersion<Http> {
    type Err = VersionError;

    fn from_str(etag_header: &str) -> Result<Self, Self::Err> {
        let trimmed = etag_header.trim();
        let etag_value = trimmed.strip_prefix("W/").unwrap_or(trimmed);

        let opaque = etag_value
            .strip_prefix('"')
            .and_then(|value| value.strip_suffix('"'))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| VersionError::InvalidEtagFormat(etag_header.to_string()))?;

        Ok(DoorVersion {
            opaque: opaque.to_string(),
            _format: PhantomData,
        })
    }
}

impl From<DoorVersion<Raw>> for DoorVersion<Http> {
    fn from(raw: DoorVersion<Raw>) -> Self {
        DoorVersion {
            opaque: raw.opaque,
            _format: PhantomData,
        }
    }
}

impl From<DoorVersion<Http>> for DoorVersion<Raw> {
    fn from(http: DoorVersion<Http>) -> Self {
        DoorVersion {
            opaque: http.opaque,
            _format: PhantomData,
        }
    }
}

// Versions are equal when their opaque strings match, whatever the format.
impl<F1, F2> PartialEq<DoorVersion<F2>> for DoorVersion<F1> {
    fn eq(&self, other: &DoorVersion<F2>) -> bool {
        self.opaque == other.opaque
    }
}

impl<Format> Serialize for DoorVersion<Format> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.opaque.serialize(serializer)
    }
}

impl<'de, Format> Deserialize<'de> for DoorVersion<Format> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opaque = String::deserialize(deserializer)?;
        Ok(DoorVersion {
            opaque,
            _format: PhantomData,
        })
    }
}

/// Details of a failed conditional operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionConflict {
    pub expected: RawVersion,
    pub current: RawVersion,
    pub message: String,
}

impl VersionConflict {
    pub fn new(expected: RawVersion, current: RawVersion) -> Self {
        Self {
            message: format!(
                "Door was modified by another request: expected version {}, current version {}",
                expected, current
            ),
            expected,
            current,
        }
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for VersionConflict {}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VersionError {
    #[error("Invalid ETag format: {0}")]
    InvalidEtagFormat(String),

    #[error("Version parse error: {0}")]
    ParseError(String),
}
