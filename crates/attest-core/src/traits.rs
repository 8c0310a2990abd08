//! Trait definitions at the verifier's trust boundary.
//!
//! - `SignableData`: the object being authorized (caller-owned, read-only)
//! - `CryptoProvider`: signature primitive, usable by scripts and by the
//!                      direct signature check
//! - `StateReader`: read-only ledger access for engines that need it
//! - `EngineFactory` / `ExecutionEngine`: the deterministic VM contract
//!
//! The verifier depends only on these traits. It assumes nothing about
//! instruction semantics beyond what `ExecutionEngine` exposes.

use attest_contracts::{CryptoError, Program, ProgramHash, ProgramHashError, VmState};

use crate::hash::sha256;

/// An object whose authorization is proven by attached programs.
///
/// Typically a transaction or a block header. `program_hashes()` and
/// `programs()` must be index-aligned: hash `i` is the signer's claim about
/// program `i`.
pub trait SignableData {
    /// The program hashes the signer committed to, in order.
    ///
    /// May fail when the hashes are derived from state the object cannot
    /// resolve (e.g. a transaction whose referenced outputs are unknown).
    fn program_hashes(&self) -> Result<Vec<ProgramHash>, ProgramHashError>;

    /// The attached witnesses, in the same order as `program_hashes()`.
    fn programs(&self) -> &[Program];

    /// The canonical serialization that signatures cover. Must exclude the
    /// programs themselves.
    fn unsigned_bytes(&self) -> Vec<u8>;

    /// The 32-byte message hash that signatures are checked against.
    fn canonical_hash(&self) -> [u8; 32] {
        sha256(&self.unsigned_bytes())
    }
}

/// Signature-checking primitive.
///
/// Implementations must be pure and deterministic: the same inputs always
/// produce the same answer.
pub trait CryptoProvider: Send + Sync {
    fn verify(
        &self,
        pubkey: &[u8],
        message_hash: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError>;
}

/// Read-only access to ledger state for engines whose opcodes need it.
pub trait StateReader: Send + Sync {
    fn read(&self, key: &[u8]) -> Option<Vec<u8>>;
}

/// A `StateReader` for contexts with no ledger attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStateReader;

impl StateReader for NullStateReader {
    fn read(&self, _key: &[u8]) -> Option<Vec<u8>> {
        None
    }
}

/// A single-use deterministic execution context for one program.
///
/// The verifier calls `load_code(code, false)`, `load_code(parameter, true)`,
/// then `execute()` once, then reads the final state. `execute()` must return
/// in bounded time; any step or resource bound is the engine's business.
pub trait ExecutionEngine {
    /// Push a code segment. Called twice per program.
    fn load_code(&mut self, script: &[u8], is_parameter: bool);

    /// Run until the engine halts or faults.
    fn execute(&mut self);

    /// The state after `execute()` returned.
    fn state(&self) -> VmState;

    /// Number of values left on the evaluation stack.
    fn stack_count(&self) -> usize;

    /// The single remaining stack value coerced to a boolean.
    ///
    /// Only meaningful when `state()` is `Halted` and `stack_count()` is 1.
    fn execute_result(&self) -> bool;
}

/// Builds a fresh `ExecutionEngine` for each program the verifier runs.
///
/// The returned engine may borrow the signable data and the capabilities for
/// its whole lifetime; it is dropped before the next program is examined.
pub trait EngineFactory: Send + Sync {
    fn create<'a>(
        &self,
        signable: &'a dyn SignableData,
        crypto: &'a dyn CryptoProvider,
        state: &'a dyn StateReader,
    ) -> Box<dyn ExecutionEngine + 'a>;
}
