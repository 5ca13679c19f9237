//! # Id
//!
//! Globally unique and lexicographically sortable identifiers.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use ulid::Ulid;

/// Monotonic id generation.
pub mod generator;

/// A globally unique and sortable identifier.
///
/// This is a ULID (Universally Unique Lexicographically Sortable Identifier).
/// Its text form is 26 Crockford base32 characters, with the creation time in
/// the leading characters, so comparing two ids as strings orders them by
/// creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u128);

/// Errors that can occur when parsing an `Id` from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    /// The string is not a valid ID format.
    #[error("invalid id string")]
    InvalidString,
}

impl Id {
    /// Creates a new ID from a 128-bit integer.
    #[must_use]
    pub const fn new(id: u128) -> Self {
        Self(id)
    }

    /// Generates a new random sortable ID.
    ///
    /// Ids generated within the same millisecond are not ordered relative to
    /// each other. Use [`generator::IdGenerator`] when that matters.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().0)
    }

    /// Gets the creation time embedded in the ID, with millisecond precision.
    #[must_use]
    pub fn timestamp(self) -> OffsetDateTime {
        self.decode_time_and_random().0
    }

    /// Decodes the ID into time and randomness parts.
    #[must_use]
    pub fn decode_time_and_random(self) -> (OffsetDateTime, u128) {
        let id = Ulid::from(self.0);

        let milliseconds = id.timestamp_ms() as i64;
        let timestamp = OffsetDateTime::UNIX_EPOCH + Duration::milliseconds(milliseconds);

        (timestamp, id.random())
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Ulid(self.0).fmt(f)
    }
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_str(s)
            .map(From::from)
            .map_err(|_| ParseIdError::InvalidString)
    }
}

impl From<Ulid> for Id {
    fn from(ulid: Ulid) -> Self {
        Self(ulid.0)
    }
}
