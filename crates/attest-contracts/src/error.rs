//! Error types for witness verification.
//!
//! Every verification failure is a definitive statement about the input, not
//! a transient condition: none of these are retryable. Variants that concern
//! one program carry its `index` so callers can report which witness failed.

use serde::Serialize;
use thiserror::Error;

use crate::{program::ProgramHash, vm::VmState};

/// Why a signable object failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationError {
    /// The signable data could not produce its claimed program hashes.
    #[error("could not obtain program hashes: {reason}")]
    ProgramHashes { reason: String },

    /// Hash count and program count differ. Reported before any program is
    /// examined.
    #[error("{hashes} program hashes claimed but {programs} programs attached")]
    LengthMismatch { hashes: usize, programs: usize },

    /// The program's code script is empty and cannot be committed to.
    #[error("program {index} has an empty code script")]
    MalformedProgram { index: usize },

    /// The program's code does not hash to the value the signer claimed.
    #[error("program {index} hashes to {actual}, signer claimed {expected}")]
    HashMismatch {
        index: usize,
        expected: ProgramHash,
        actual: ProgramHash,
    },

    /// The engine finished in a state other than `Halted`.
    #[error("program {index} did not halt (final state: {state})")]
    ExecutionFault { index: usize, state: VmState },

    /// The evaluation stack held something other than exactly one value.
    #[error("program {index} left {depth} values on the evaluation stack, expected 1")]
    StackShapeViolation { index: usize, depth: usize },

    /// The program halted cleanly but evaluated to false.
    #[error("program {index} evaluated to false")]
    ScriptRejected { index: usize },

    /// A direct signature check over the signable data failed.
    #[error("signature verification failed: {source}")]
    SignatureInvalid {
        #[source]
        source: CryptoError,
    },
}

impl VerificationError {
    /// The index of the failing program, for per-program variants.
    pub fn index(&self) -> Option<usize> {
        match self {
            VerificationError::MalformedProgram { index }
            | VerificationError::HashMismatch { index, .. }
            | VerificationError::ExecutionFault { index, .. }
            | VerificationError::StackShapeViolation { index, .. }
            | VerificationError::ScriptRejected { index } => Some(*index),
            VerificationError::ProgramHashes { .. }
            | VerificationError::LengthMismatch { .. }
            | VerificationError::SignatureInvalid { .. } => None,
        }
    }
}

/// Failure reported by a `CryptoProvider`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CryptoError {
    #[error("malformed public key: {reason}")]
    MalformedPublicKey { reason: String },

    #[error("malformed signature: {reason}")]
    MalformedSignature { reason: String },

    #[error("signature does not match the message hash")]
    Mismatch,
}

/// A program hash could not be parsed or derived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("program hash error: {reason}")]
pub struct ProgramHashError {
    pub reason: String,
}

impl From<ProgramHashError> for VerificationError {
    fn from(e: ProgramHashError) -> Self {
        VerificationError::ProgramHashes { reason: e.reason }
    }
}

/// A configuration value is missing, unreadable, or invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration error: {reason}")]
pub struct ConfigError {
    pub reason: String,
}

/// Convenience alias used by the verification entry points.
pub type VerifyResult<T> = Result<T, VerificationError>;
