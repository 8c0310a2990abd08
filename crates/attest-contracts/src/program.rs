//! Program and program-hash types.
//!
//! A `Program` is one witness attached to a signable object: the script whose
//! hash the signer committed to, plus the parameters (typically signatures)
//! the script consumes. A `ProgramHash` is that commitment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ProgramHashError;

/// Width in bytes of a `ProgramHash` (RIPEMD-160 output).
pub const PROGRAM_HASH_LEN: usize = 20;

/// A commitment to an authorization script.
///
/// Computed as `RIPEMD-160(SHA-256(code))` by `attest_core::hash::code_hash`.
/// Displays and serializes as 40 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ProgramHash(pub [u8; PROGRAM_HASH_LEN]);

impl ProgramHash {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; PROGRAM_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; PROGRAM_HASH_LEN] {
        &self.0
    }

    /// Build a hash from a slice, returning `None` unless it is exactly
    /// `PROGRAM_HASH_LEN` bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; PROGRAM_HASH_LEN] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ProgramHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ProgramHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgramHash({})", self.to_hex())
    }
}

impl FromStr for ProgramHash {
    type Err = ProgramHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| ProgramHashError {
            reason: format!("invalid hex: {e}"),
        })?;
        Self::from_slice(&bytes).ok_or_else(|| ProgramHashError {
            reason: format!("must be {} bytes, got {}", PROGRAM_HASH_LEN, bytes.len()),
        })
    }
}

impl Serialize for ProgramHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ProgramHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One witness: an authorization script and its runtime parameters.
///
/// `code` is hashed and compared against the signer's claim, then loaded
/// into the engine as the code segment. `parameter` is loaded as a second
/// segment and runs first (for signature contracts it pushes the signatures
/// that `code` consumes). Fields are private so a `Program` cannot change
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    code: Vec<u8>,
    parameter: Vec<u8>,
}

impl Program {
    pub fn new(code: impl Into<Vec<u8>>, parameter: impl Into<Vec<u8>>) -> Self {
        Self {
            code: code.into(),
            parameter: parameter.into(),
        }
    }

    /// The authorization script.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// The parameter segment.
    pub fn parameter(&self) -> &[u8] {
        &self.parameter
    }
}
