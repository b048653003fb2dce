//! User key for cart ownership.
//!
//! There is no authentication: the user ID is an opaque string chosen by the
//! client, and each one owns at most one cart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Maximum user ID length accepted by the API.
pub const MAX_USER_ID_LENGTH: usize = 128;

/// Errors that can occur when parsing a user ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdError {
    #[error("user ID cannot be empty")]
    Empty,
    #[error("user ID is too long (max {max} characters, got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// An opaque identifier for the owner of a cart.
///
/// Leading and trailing whitespace is trimmed on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parse and validate a user ID.
    ///
    /// # Errors
    ///
    /// Returns `UserIdError` if the value is blank or too long.
    pub fn parse(s: &str) -> Result<Self, UserIdError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(UserIdError::Empty);
        }

        let len = trimmed.chars().count();
        if len > MAX_USER_ID_LENGTH {
            return Err(UserIdError::TooLong {
                max: MAX_USER_ID_LENGTH,
                actual: len,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the user ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
