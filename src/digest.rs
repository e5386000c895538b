//! SHA-512 digest newtype for package verification.
//!
//! Validates that the value is a 128-character hexadecimal string. Input of
//! either case is accepted and normalised to lowercase at construction, so
//! comparisons between manifest digests and computed digests are
//! case-insensitive by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Expected length of a hex-encoded SHA-512 digest.
const DIGEST_HEX_LEN: usize = 128;

/// Error raised when a digest string fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    /// The string is not a well-formed hex-encoded SHA-512 digest.
    #[error("invalid SHA-512 digest: {reason}")]
    Invalid {
        /// Description of the validation failure.
        reason: String,
    },
}

/// A validated, lowercase hex-encoded SHA-512 digest.
///
/// # Examples
///
/// ```
/// use proton_pass_installer::digest::Sha512Digest;
///
/// let digest = Sha512Digest::try_from("AB".repeat(64).as_str()).unwrap();
/// assert_eq!(digest.as_str(), "ab".repeat(64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha512Digest(String);

impl Sha512Digest {
    /// Return the digest as a lowercase hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Sha512Digest {
    type Error = DigestError;

    fn try_from(value: &str) -> Result<Self, DigestError> {
        validate_sha512(value)?;
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Sha512Digest {
    type Error = DigestError;

    fn try_from(value: String) -> Result<Self, DigestError> {
        validate_sha512(&value)?;
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl From<Sha512Digest> for String {
    fn from(digest: Sha512Digest) -> Self {
        digest.0
    }
}

impl AsRef<str> for Sha512Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha512Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed hex-encoded SHA-512 digest.
fn validate_sha512(value: &str) -> Result<(), DigestError> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(DigestError::Invalid {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(DigestError::Invalid {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_digest() -> String {
        "a".repeat(128)
    }

    #[test]
    fn accepts_valid_hundred_twenty_eight_char_hex() {
        assert!(Sha512Digest::try_from(valid_digest().as_str()).is_ok());
    }

    #[test]
    fn normalises_uppercase_input_to_lowercase() {
        let digest = Sha512Digest::try_from("AB".repeat(64).as_str()).expect("valid digest");
        assert_eq!(digest.as_str(), "ab".repeat(64));
    }

    #[test]
    fn mixed_case_digests_compare_equal_after_construction() {
        let upper = Sha512Digest::try_from("C4".repeat(64).as_str()).expect("valid digest");
        let lower = Sha512Digest::try_from("c4".repeat(64).as_str()).expect("valid digest");
        assert_eq!(upper, lower);
    }

    #[rstest]
    #[case::too_short("abcdef")]
    #[case::empty("")]
    fn rejects_wrong_length(#[case] input: &str) {
        assert!(Sha512Digest::try_from(input).is_err());
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(129);
        assert!(Sha512Digest::try_from(long.as_str()).is_err());
    }

    #[test]
    fn rejects_non_hex_characters() {
        let mut bad = "a".repeat(127);
        bad.push('z');
        assert!(Sha512Digest::try_from(bad.as_str()).is_err());
    }

    #[test]
    fn display_shows_full_digest() {
        let hex = valid_digest();
        let digest = Sha512Digest::try_from(hex.as_str()).expect("known good");
        assert_eq!(format!("{digest}"), hex);
    }

    #[test]
    fn deserializes_from_json_string() {
        let json = format!("\"{}\"", "E1".repeat(64));
        let digest: Sha512Digest = serde_json::from_str(&json).expect("valid digest");
        assert_eq!(digest.as_str(), "e1".repeat(64));
    }
}
