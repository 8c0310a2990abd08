//! The program-hash witness verifier.
//!
//! `ProgramVerifier::verify` enforces the authorization protocol for one
//! signable object:
//!
//!   hashes/programs → length check → per program: hash check → execute → state → stack → result
//!
//! Authorization is all-or-nothing. The first failing program stops
//! verification and its classified error is returned; later programs are
//! never examined. Programs are processed strictly in index order so the
//! reported error is reproducible.

use tracing::debug;

use attest_contracts::{VerificationError, VerificationOutcome, VerifyResult};

use crate::crypto::Secp256k1Crypto;
use crate::hash::code_hash;
use crate::traits::{CryptoProvider, EngineFactory, NullStateReader, SignableData, StateReader};

/// Verifies the programs attached to signable data, and direct signatures
/// over it.
///
/// Holds only immutable capabilities, so one verifier can be shared by
/// reference across threads and used for any number of concurrent calls.
pub struct ProgramVerifier {
    engines: Box<dyn EngineFactory>,
    crypto: Box<dyn CryptoProvider>,
    state: Box<dyn StateReader>,
}

impl ProgramVerifier {
    /// Create a verifier from an engine factory and the capabilities every
    /// engine it builds receives.
    pub fn new(
        engines: Box<dyn EngineFactory>,
        crypto: Box<dyn CryptoProvider>,
        state: Box<dyn StateReader>,
    ) -> Self {
        Self {
            engines,
            crypto,
            state,
        }
    }

    /// A verifier using secp256k1 signatures and no ledger state.
    pub fn with_engine(engines: Box<dyn EngineFactory>) -> Self {
        Self::new(engines, Box::new(Secp256k1Crypto), Box::new(NullStateReader))
    }

    /// Verify every program attached to `signable`.
    ///
    /// # Protocol
    ///
    /// 1. Read the claimed hashes and the attached programs
    /// 2. Counts differ → `LengthMismatch`, before any program is touched
    /// 3. For each program `i`, in order:
    ///    - empty code → `MalformedProgram`
    ///    - `code_hash(code) != hashes[i]` → `HashMismatch`; no engine is built
    ///    - build a fresh engine, load code then parameter, execute
    ///    - state not `Halted` → `ExecutionFault`
    ///    - stack depth not 1 → `StackShapeViolation`
    ///    - result false → `ScriptRejected`
    /// 4. Every program passed → `Ok(true)`
    ///
    /// # Errors
    ///
    /// Every failure is returned as a `VerificationError`; this method never
    /// returns `Ok(false)`.
    pub fn verify(&self, signable: &dyn SignableData) -> VerifyResult<bool> {
        let hashes = signable.program_hashes()?;
        let programs = signable.programs();

        if hashes.len() != programs.len() {
            return Err(VerificationError::LengthMismatch {
                hashes: hashes.len(),
                programs: programs.len(),
            });
        }

        for (index, (expected, program)) in hashes.iter().zip(programs).enumerate() {
            if program.code().is_empty() {
                return Err(VerificationError::MalformedProgram { index });
            }

            let actual = code_hash(program.code());
            if actual != *expected {
                return Err(VerificationError::HashMismatch {
                    index,
                    expected: *expected,
                    actual,
                });
            }

            // One engine per program, dropped before the next one is built.
            let mut engine =
                self.engines
                    .create(signable, self.crypto.as_ref(), self.state.as_ref());
            engine.load_code(program.code(), false);
            engine.load_code(program.parameter(), true);
            engine.execute();

            let state = engine.state();
            if !state.is_halted() {
                return Err(VerificationError::ExecutionFault { index, state });
            }

            let depth = engine.stack_count();
            if depth != 1 {
                return Err(VerificationError::StackShapeViolation { index, depth });
            }

            if !engine.execute_result() {
                return Err(VerificationError::ScriptRejected { index });
            }

            debug!(index, program_hash = %actual, "program verified");
        }

        Ok(true)
    }

    /// `verify`, packaged as an outcome record.
    pub fn check(&self, signable: &dyn SignableData) -> VerificationOutcome {
        self.verify(signable).into()
    }

    /// Check `signature` by `pubkey` over the canonical hash of `signable`,
    /// using this verifier's crypto provider. No VM is involved.
    pub fn verify_signature(
        &self,
        signable: &dyn SignableData,
        pubkey: &[u8],
        signature: &[u8],
    ) -> VerifyResult<bool> {
        check_signature(self.crypto.as_ref(), signable, pubkey, signature)
    }
}

/// Check `signature` by `pubkey` over the canonical hash of `signable` with
/// secp256k1 ECDSA.
pub fn verify_signature(
    signable: &dyn SignableData,
    pubkey: &[u8],
    signature: &[u8],
) -> VerifyResult<bool> {
    check_signature(&Secp256k1Crypto, signable, pubkey, signature)
}

fn check_signature(
    crypto: &dyn CryptoProvider,
    signable: &dyn SignableData,
    pubkey: &[u8],
    signature: &[u8],
) -> VerifyResult<bool> {
    let message_hash = signable.canonical_hash();
    crypto
        .verify(pubkey, &message_hash, signature)
        .map_err(|source| VerificationError::SignatureInvalid { source })?;
    Ok(true)
}

// ── Tests ────────────────────────────────────────────────────────────────────
