//! A bounded engine for signature contracts.
//!
//! `SignatureEngine` implements the `ExecutionEngine` contract from
//! `attest-core` for the standard single- and multi-signature account
//! contracts. Loaded segments form a LIFO invocation stack, so the parameter
//! segment (loaded last) runs first and leaves its signatures on the shared
//! evaluation stack for the code segment to consume.
//!
//! Execution is bounded by `EngineConfig`: a step budget across all segments,
//! a stack depth limit, and an item size limit. Any violation, an unknown
//! opcode, a stack underflow, or a non-push opcode in a parameter segment
//! stops the run in `VmState::Faulted`.

use thiserror::Error;
use tracing::{debug, warn};

use attest_contracts::VmState;
use attest_core::traits::{CryptoProvider, EngineFactory, ExecutionEngine, SignableData, StateReader};

use crate::config::EngineConfig;
use crate::opcode::{self, *};

/// Why an engine run stopped in `VmState::Faulted`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFault {
    #[error("step budget of {limit} exhausted")]
    StepLimit { limit: u64 },

    #[error("evaluation stack exceeded {limit} items")]
    StackOverflow { limit: usize },

    #[error("opcode 0x{op:02x} needs more stack items than are present")]
    StackUnderflow { op: u8 },

    #[error("pushed item of {len} bytes exceeds {limit}")]
    ItemTooLarge { len: usize, limit: usize },

    #[error("push at offset {offset} runs past the end of the segment")]
    TruncatedPush { offset: usize },

    #[error("opcode 0x{op:02x} is not allowed in a parameter segment")]
    NonPushParameter { op: u8 },

    #[error("unknown opcode 0x{op:02x}")]
    UnknownOpcode { op: u8 },

    #[error("CHECKMULTISIG key count {n} outside 1..={max}")]
    InvalidKeyCount { n: i64, max: usize },

    #[error("CHECKMULTISIG threshold {m} outside 1..={n}")]
    InvalidThreshold { m: i64, n: i64 },
}

struct Segment {
    script: Vec<u8>,
    push_only: bool,
}

/// One program's execution context. Built per program, never reused.
pub struct SignatureEngine<'a> {
    config: EngineConfig,
    signable: &'a dyn SignableData,
    crypto: &'a dyn CryptoProvider,
    segments: Vec<Segment>,
    stack: Vec<Vec<u8>>,
    state: VmState,
    steps: u64,
    message_hash: Option<[u8; 32]>,
    fault: Option<EngineFault>,
}

impl<'a> SignatureEngine<'a> {
    pub fn new(
        config: EngineConfig,
        signable: &'a dyn SignableData,
        crypto: &'a dyn CryptoProvider,
    ) -> Self {
        Self {
            config,
            signable,
            crypto,
            segments: Vec::new(),
            stack: Vec::new(),
            state: VmState::Running,
            steps: 0,
            message_hash: None,
            fault: None,
        }
    }

    /// The reason the last run faulted, if it did.
    pub fn fault(&self) -> Option<&EngineFault> {
        self.fault.as_ref()
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn run(&mut self) -> Result<(), EngineFault> {
        while let Some(segment) = self.segments.pop() {
            self.run_segment(&segment)?;
        }
        Ok(())
    }

    fn run_segment(&mut self, segment: &Segment) -> Result<(), EngineFault> {
        let script = segment.script.as_slice();
        let mut pc = 0usize;

        while pc < script.len() {
            self.steps += 1;
            if self.steps > self.config.max_steps {
                return Err(EngineFault::StepLimit {
                    limit: self.config.max_steps,
                });
            }

            let op = script[pc];
            pc += 1;

            if segment.push_only && !opcode::is_push(op) {
                return Err(EngineFault::NonPushParameter { op });
            }

            match op {
                PUSH0 => self.push(Vec::new())?,
                PUSHBYTES1..=PUSHBYTES75 => {
                    let data = read(script, &mut pc, op as usize)?;
                    self.push(data)?;
                }
                PUSHDATA1 => {
                    let len = read(script, &mut pc, 1)?[0] as usize;
                    let data = read(script, &mut pc, len)?;
                    self.push(data)?;
                }
                PUSHDATA2 => {
                    let raw = read(script, &mut pc, 2)?;
                    let len = u16::from_le_bytes([raw[0], raw[1]]) as usize;
                    let data = read(script, &mut pc, len)?;
                    self.push(data)?;
                }
                PUSHM1 => self.push(encode_number(-1))?,
                PUSH1..=PUSH16 => self.push(encode_number((op - PUSH1 + 1) as i64))?,
                NOP => {}
                DROP => {
                    self.pop(op)?;
                }
                DUP => {
                    let top = self.stack.last().cloned().ok_or(EngineFault::StackUnderflow { op })?;
                    self.push(top)?;
                }
                CHECKSIG => {
                    let pubkey = self.pop(op)?;
                    let signature = self.pop(op)?;
                    let ok = self.check_sig(&pubkey, &signature);
                    self.push(encode_bool(ok))?;
                }
                CHECKMULTISIG => {
                    let ok = self.check_multisig()?;
                    self.push(encode_bool(ok))?;
                }
                _ => return Err(EngineFault::UnknownOpcode { op }),
            }
        }

        Ok(())
    }

    fn push(&mut self, item: Vec<u8>) -> Result<(), EngineFault> {
        if item.len() > self.config.max_item_size {
            return Err(EngineFault::ItemTooLarge {
                len: item.len(),
                limit: self.config.max_item_size,
            });
        }
        if self.stack.len() >= self.config.max_stack_size {
            return Err(EngineFault::StackOverflow {
                limit: self.config.max_stack_size,
            });
        }
        self.stack.push(item);
        Ok(())
    }

    fn pop(&mut self, op: u8) -> Result<Vec<u8>, EngineFault> {
        self.stack.pop().ok_or(EngineFault::StackUnderflow { op })
    }

    fn message_hash(&mut self) -> [u8; 32] {
        *self
            .message_hash
            .get_or_insert_with(|| self.signable.canonical_hash())
    }

    fn check_sig(&mut self, pubkey: &[u8], signature: &[u8]) -> bool {
        let hash = self.message_hash();
        self.crypto.verify(pubkey, &hash, signature).is_ok()
    }

    /// Pops `n`, `n` keys, `m`, `m` signatures. Signatures must match keys in
    /// order; a key may satisfy at most one signature.
    fn check_multisig(&mut self) -> Result<bool, EngineFault> {
        let op = CHECKMULTISIG;
        let max = self.config.max_multisig_keys;

        let n = decode_number(&self.pop(op)?);
        if n < 1 || n as usize > max {
            return Err(EngineFault::InvalidKeyCount { n, max });
        }
        let mut keys = (0..n).map(|_| self.pop(op)).collect::<Result<Vec<_>, _>>()?;
        keys.reverse();

        let m = decode_number(&self.pop(op)?);
        if m < 1 || m > n {
            return Err(EngineFault::InvalidThreshold { m, n });
        }
        let mut sigs = (0..m).map(|_| self.pop(op)).collect::<Result<Vec<_>, _>>()?;
        sigs.reverse();

        let hash = self.message_hash();
        let (mut k, mut s) = (0usize, 0usize);
        while s < sigs.len() && k < keys.len() {
            if self.crypto.verify(&keys[k], &hash, &sigs[s]).is_ok() {
                s += 1;
            }
            k += 1;
            // Not enough keys left to cover the remaining signatures.
            if sigs.len() - s > keys.len() - k {
                break;
            }
        }
        Ok(s == sigs.len())
    }
}

impl ExecutionEngine for SignatureEngine<'_> {
    fn load_code(&mut self, script: &[u8], is_parameter: bool) {
        self.segments.push(Segment {
            script: script.to_vec(),
            push_only: is_parameter,
        });
    }

    fn execute(&mut self) {
        if self.state != VmState::Running {
            return;
        }

        match self.run() {
            Ok(()) => {
                self.state = VmState::Halted;
                debug!(steps = self.steps, depth = self.stack.len(), "engine halted");
            }
            Err(fault) => {
                warn!(steps = self.steps, %fault, "engine faulted");
                self.state = VmState::Faulted;
                self.fault = Some(fault);
            }
        }
    }

    fn state(&self) -> VmState {
        self.state
    }

    fn stack_count(&self) -> usize {
        self.stack.len()
    }

    fn execute_result(&self) -> bool {
        self.stack.last().is_some_and(|item| as_bool(item))
    }
}

/// Builds a `SignatureEngine` per program with a fixed `EngineConfig`.
///
/// The state reader is accepted for contract compatibility; no opcode in
/// this engine reads ledger state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureEngineFactory {
    config: EngineConfig,
}

impl SignatureEngineFactory {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl EngineFactory for SignatureEngineFactory {
    fn create<'a>(
        &self,
        signable: &'a dyn SignableData,
        crypto: &'a dyn CryptoProvider,
        _state: &'a dyn StateReader,
    ) -> Box<dyn ExecutionEngine + 'a> {
        Box::new(SignatureEngine::new(self.config, signable, crypto))
    }
}

// ── Item encoding ────────────────────────────────────────────────────────────

fn read(script: &[u8], pc: &mut usize, len: usize) -> Result<Vec<u8>, EngineFault> {
    let start = *pc;
    let end = start
        .checked_add(len)
        .filter(|end| *end <= script.len())
        .ok_or(EngineFault::TruncatedPush { offset: start })?;
    *pc = end;
    Ok(script[start..end].to_vec())
}

/// An item is true if any of its bytes is non-zero.
pub fn as_bool(item: &[u8]) -> bool {
    item.iter().any(|b| *b != 0)
}

fn encode_bool(value: bool) -> Vec<u8> {
    if value {
        vec![1]
    } else {
        Vec::new()
    }
}

/// Little-endian sign-magnitude, minimal length. Zero is the empty item.
fn encode_number(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut bytes = Vec::new();
    while abs > 0 {
        bytes.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    if bytes.last().is_some_and(|b| b & 0x80 != 0) {
        bytes.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        if let Some(last) = bytes.last_mut() {
            *last |= 0x80;
        }
    }
    bytes
}

/// Inverse of `encode_number`. Items wider than 8 bytes decode to -1 so
/// they fail every count check.
fn decode_number(item: &[u8]) -> i64 {
    if item.is_empty() {
        return 0;
    }
    if item.len() > 8 {
        return -1;
    }
    let mut value: u64 = 0;
    for (i, b) in item.iter().enumerate() {
        value |= (*b as u64) << (8 * i);
    }
    let sign_bit = 0x80u64 << (8 * (item.len() - 1));
    if value & sign_bit != 0 {
        -((value & !sign_bit) as i64)
    } else {
        value as i64
    }
}
