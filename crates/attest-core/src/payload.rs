//! An in-memory `SignableData`.
//!
//! `SignedPayload` pairs an opaque unsigned body with the signer's claimed
//! program hashes and the attached witnesses. It carries no transaction
//! semantics of its own; hosts with real transaction types implement
//! `SignableData` directly.

use attest_contracts::{Program, ProgramHash, ProgramHashError};

use crate::hash::code_hash;
use crate::traits::SignableData;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignedPayload {
    body: Vec<u8>,
    program_hashes: Vec<ProgramHash>,
    programs: Vec<Program>,
}

impl SignedPayload {
    /// A payload with an explicit claim list and witness list.
    ///
    /// The two lists are not required to agree; the verifier reports any
    /// disagreement.
    pub fn new(
        body: impl Into<Vec<u8>>,
        program_hashes: Vec<ProgramHash>,
        programs: Vec<Program>,
    ) -> Self {
        Self {
            body: body.into(),
            program_hashes,
            programs,
        }
    }

    /// A payload whose claims are the hashes of the given programs' code.
    pub fn with_programs(body: impl Into<Vec<u8>>, programs: Vec<Program>) -> Self {
        let program_hashes = programs.iter().map(|p| code_hash(p.code())).collect();
        Self::new(body, program_hashes, programs)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace the witness list, keeping body and claims.
    pub fn set_programs(&mut self, programs: Vec<Program>) {
        self.programs = programs;
    }
}

impl SignableData for SignedPayload {
    fn program_hashes(&self) -> Result<Vec<ProgramHash>, ProgramHashError> {
        Ok(self.program_hashes.clone())
    }

    fn programs(&self) -> &[Program] {
        &self.programs
    }

    fn unsigned_bytes(&self) -> Vec<u8> {
        self.body.clone()
    }
}
