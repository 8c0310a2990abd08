//! # attest-core
//!
//! Verification of program-hash witnesses attached to signable data.
//!
//! This crate provides:
//! - The capability traits at the trust boundary (`SignableData`,
//!   `CryptoProvider`, `StateReader`, `EngineFactory`, `ExecutionEngine`)
//! - `ProgramVerifier`, which checks every attached program against its
//!   claimed hash and runs it on a fresh engine
//! - `verify_signature`, a direct signature check with no VM involved
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attest_core::{ProgramVerifier, SignedPayload};
//!
//! let verifier = ProgramVerifier::with_engine(Box::new(my_engine_factory));
//! let authorized = verifier.verify(&payload)?;
//! ```

pub mod crypto;
pub mod hash;
pub mod payload;
pub mod traits;
pub mod verifier;

pub use crypto::Secp256k1Crypto;
pub use hash::{code_hash, sha256};
pub use payload::SignedPayload;
pub use verifier::{verify_signature, ProgramVerifier};
