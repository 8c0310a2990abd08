//! Property tests for the verifier's ordering and structural guarantees.

use proptest::prelude::*;

use attest_contracts::{Program, ProgramHash, VerificationError, VmState};
use attest_core::traits::{CryptoProvider, EngineFactory, ExecutionEngine, SignableData, StateReader};
use attest_core::{code_hash, ProgramVerifier, SignedPayload};

/// Halts with one value: true when the first code byte is odd.
struct ParityEngine {
    code: Vec<u8>,
    ran: bool,
}

impl ExecutionEngine for ParityEngine {
    fn load_code(&mut self, script: &[u8], is_parameter: bool) {
        if !is_parameter {
            self.code = script.to_vec();
        }
    }

    fn execute(&mut self) {
        self.ran = true;
    }

    fn state(&self) -> VmState {
        if self.ran {
            VmState::Halted
        } else {
            VmState::Running
        }
    }

    fn stack_count(&self) -> usize {
        1
    }

    fn execute_result(&self) -> bool {
        self.code.first().is_some_and(|b| b % 2 == 1)
    }
}

struct ParityFactory;

impl EngineFactory for ParityFactory {
    fn create<'a>(
        &self,
        _signable: &'a dyn SignableData,
        _crypto: &'a dyn CryptoProvider,
        _state: &'a dyn StateReader,
    ) -> Box<dyn ExecutionEngine + 'a> {
        Box::new(ParityEngine {
            code: vec![],
            ran: false,
        })
    }
}

/// One witness description: first code byte, and whether the claim matches.
type Witness = (u8, bool);

fn build(witnesses: &[Witness]) -> SignedPayload {
    let mut hashes: Vec<ProgramHash> = Vec::new();
    let mut programs = Vec::new();
    for &(byte, claim_ok) in witnesses {
        let code = vec![byte, 0x01];
        hashes.push(if claim_ok {
            code_hash(&code)
        } else {
            code_hash(&[byte, 0x02])
        });
        programs.push(Program::new(code, vec![]));
    }
    SignedPayload::new(b"body".to_vec(), hashes, programs)
}

/// Index of the first witness expected to fail, if any.
fn first_failure(witnesses: &[Witness]) -> Option<usize> {
    witnesses
        .iter()
        .position(|&(byte, claim_ok)| !claim_ok || byte % 2 == 0)
}

fn witnesses_and_shuffle() -> impl Strategy<Value = (Vec<Witness>, Vec<Witness>)> {
    prop::collection::vec((any::<u8>(), any::<bool>()), 0..8)
        .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
}

proptest! {
    /// Reordering hash/program pairs together never changes the aggregate
    /// verdict, only which index is reported.
    #[test]
    fn paired_reorder_preserves_verdict((original, shuffled) in witnesses_and_shuffle()) {
        let verifier = ProgramVerifier::with_engine(Box::new(ParityFactory));

        let a = verifier.verify(&build(&original));
        let b = verifier.verify(&build(&shuffled));
        prop_assert_eq!(a.is_ok(), b.is_ok());
    }

    /// The reported index is the first failing position in iteration order.
    #[test]
    fn reported_index_is_first_failure(witnesses in prop::collection::vec((any::<u8>(), any::<bool>()), 0..8)) {
        let verifier = ProgramVerifier::with_engine(Box::new(ParityFactory));

        let result = verifier.verify(&build(&witnesses));
        match first_failure(&witnesses) {
            None => prop_assert_eq!(result, Ok(true)),
            Some(expected) => {
                let err = result.unwrap_err();
                prop_assert_eq!(err.index(), Some(expected));
                let (_, claim_ok) = witnesses[expected];
                if claim_ok {
                    prop_assert_eq!(err, VerificationError::ScriptRejected { index: expected });
                } else {
                    let is_hash_mismatch = matches!(err, VerificationError::HashMismatch { .. });
                    prop_assert!(is_hash_mismatch);
                }
            }
        }
    }

    /// Any count disagreement is structural, whatever the contents.
    #[test]
    fn count_disagreement_is_length_mismatch(
        hashes in 0usize..6,
        programs in 0usize..6,
    ) {
        prop_assume!(hashes != programs);
        let payload = SignedPayload::new(
            b"body".to_vec(),
            vec![code_hash(&[0x01]); hashes],
            vec![Program::new(vec![0x01], vec![]); programs],
        );

        let verifier = ProgramVerifier::with_engine(Box::new(ParityFactory));
        prop_assert_eq!(
            verifier.verify(&payload),
            Err(VerificationError::LengthMismatch { hashes, programs })
        );
    }
}
