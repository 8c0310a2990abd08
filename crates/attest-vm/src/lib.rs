//! # attest-vm
//!
//! A bounded execution engine for signature contracts.
//!
//! This crate provides [`engine::SignatureEngineFactory`], which implements
//! the [`attest_core::traits::EngineFactory`] contract. Each engine it builds
//! runs one program: the push-only parameter segment first, then the code
//! segment, against a shared evaluation stack.
//!
//! Supported contracts:
//!
//! 1. **Single signature**: `<pubkey> CHECKSIG`
//! 2. **Multi signature**: `<m> <pubkeys…> <n> CHECKMULTISIG`
//!
//! Signatures are checked through the injected `CryptoProvider` against the
//! signable data's canonical hash.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use attest_core::ProgramVerifier;
//! use attest_vm::{EngineConfig, SignatureEngineFactory};
//!
//! let config = EngineConfig::from_file(Path::new("engine.toml"))?;
//! let verifier = ProgramVerifier::with_engine(Box::new(SignatureEngineFactory::new(config)));
//! verifier.verify(&payload)?;
//! ```

pub mod config;
pub mod contract;
pub mod engine;
pub mod opcode;

pub use config::EngineConfig;
pub use contract::{multi_sig_contract, signature_parameter, single_sig_contract, ContractError};
pub use engine::{EngineFault, SignatureEngine, SignatureEngineFactory};
