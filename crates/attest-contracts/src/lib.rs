//! # attest-contracts
//!
//! Shared types and the error taxonomy for program-hash witness verification.
//!
//! All crates in the workspace import from here. No verification logic lives
//! in this crate: only data definitions and error types.

pub mod error;
pub mod outcome;
pub mod program;
pub mod vm;

pub use error::{ConfigError, CryptoError, ProgramHashError, VerificationError, VerifyResult};
pub use outcome::VerificationOutcome;
pub use program::{Program, ProgramHash, PROGRAM_HASH_LEN};
pub use vm::VmState;
