//! Signed payloads verified end to end: real secp256k1 keys, the signature
//! engine, and the program verifier.

use k256::ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey};

use attest_contracts::{Program, VerificationError, VmState};
use attest_core::traits::SignableData;
use attest_core::{code_hash, ProgramVerifier, SignedPayload};
use attest_vm::{
    multi_sig_contract, signature_parameter, single_sig_contract, EngineConfig,
    SignatureEngineFactory,
};

const BODY: &[u8] = b"transfer 25 from alice to bob";

fn key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

fn pubkey(key: &SigningKey) -> Vec<u8> {
    key.verifying_key().to_encoded_point(true).as_bytes().to_vec()
}

fn sign(key: &SigningKey, body: &[u8]) -> Vec<u8> {
    let unsigned = SignedPayload::with_programs(body.to_vec(), vec![]);
    let sig: Signature = key.sign_prehash(&unsigned.canonical_hash()).unwrap();
    sig.to_bytes().to_vec()
}

fn single_sig_program(key: &SigningKey, body: &[u8]) -> Program {
    Program::new(
        single_sig_contract(&pubkey(key)).unwrap(),
        signature_parameter(&[sign(key, body)]).unwrap(),
    )
}

fn verifier() -> ProgramVerifier {
    ProgramVerifier::with_engine(Box::new(SignatureEngineFactory::default()))
}

#[test]
fn single_signature_payload_is_authorized() {
    let payload = SignedPayload::with_programs(BODY.to_vec(), vec![single_sig_program(&key(1), BODY)]);
    assert_eq!(verifier().verify(&payload), Ok(true));
}

#[test]
fn two_signers_are_both_checked() {
    let payload = SignedPayload::with_programs(
        BODY.to_vec(),
        vec![single_sig_program(&key(1), BODY), single_sig_program(&key(2), BODY)],
    );
    assert_eq!(verifier().verify(&payload), Ok(true));
}

#[test]
fn multi_signature_payload_is_authorized() {
    let keys = [key(1), key(2), key(3)];
    let pubkeys: Vec<Vec<u8>> = keys.iter().map(pubkey).collect();
    let program = Program::new(
        multi_sig_contract(2, &pubkeys).unwrap(),
        signature_parameter(&[sign(&keys[0], BODY), sign(&keys[1], BODY)]).unwrap(),
    );
    let payload = SignedPayload::with_programs(BODY.to_vec(), vec![program]);

    assert_eq!(verifier().verify(&payload), Ok(true));
}

#[test]
fn tampered_body_is_rejected_by_script() {
    let program = single_sig_program(&key(1), BODY);
    let payload = SignedPayload::with_programs(b"transfer 9999 from alice to bob".to_vec(), vec![program]);

    assert_eq!(
        verifier().verify(&payload),
        Err(VerificationError::ScriptRejected { index: 0 })
    );
}

#[test]
fn swapped_witness_fails_hash_check() {
    let claimed = code_hash(&single_sig_contract(&pubkey(&key(1))).unwrap());
    let payload = SignedPayload::new(
        BODY.to_vec(),
        vec![claimed],
        vec![single_sig_program(&key(2), BODY)],
    );

    assert!(matches!(
        verifier().verify(&payload),
        Err(VerificationError::HashMismatch { index: 0, .. })
    ));
}

#[test]
fn second_program_hash_mismatch_reports_index_one() {
    let first = single_sig_program(&key(1), BODY);
    let second = single_sig_program(&key(2), BODY);
    let payload = SignedPayload::new(
        BODY.to_vec(),
        vec![code_hash(first.code()), code_hash(first.code())],
        vec![first, second],
    );

    assert!(matches!(
        verifier().verify(&payload),
        Err(VerificationError::HashMismatch { index: 1, .. })
    ));
}

#[test]
fn extra_parameter_value_is_stack_shape_violation() {
    let k = key(1);
    let program = Program::new(
        single_sig_contract(&pubkey(&k)).unwrap(),
        signature_parameter(&[vec![0x07], sign(&k, BODY)]).unwrap(),
    );
    let payload = SignedPayload::with_programs(BODY.to_vec(), vec![program]);

    assert_eq!(
        verifier().verify(&payload),
        Err(VerificationError::StackShapeViolation { index: 0, depth: 2 })
    );
}

#[test]
fn non_push_parameter_is_execution_fault() {
    let k = key(1);
    let mut parameter = signature_parameter(&[sign(&k, BODY)]).unwrap();
    parameter.push(attest_vm::opcode::CHECKSIG);
    let program = Program::new(single_sig_contract(&pubkey(&k)).unwrap(), parameter);
    let payload = SignedPayload::with_programs(BODY.to_vec(), vec![program]);

    assert_eq!(
        verifier().verify(&payload),
        Err(VerificationError::ExecutionFault { index: 0, state: VmState::Faulted })
    );
}

#[test]
fn tight_step_budget_is_execution_fault() {
    let config = EngineConfig::from_toml_str("max_steps = 1").unwrap();
    let verifier = ProgramVerifier::with_engine(Box::new(SignatureEngineFactory::new(config)));
    let payload = SignedPayload::with_programs(BODY.to_vec(), vec![single_sig_program(&key(1), BODY)]);

    assert_eq!(
        verifier.verify(&payload),
        Err(VerificationError::ExecutionFault { index: 0, state: VmState::Faulted })
    );
}

#[test]
fn direct_signature_matches_script_signature() {
    let k = key(4);
    let payload = SignedPayload::with_programs(BODY.to_vec(), vec![single_sig_program(&k, BODY)]);

    assert_eq!(
        verifier().verify_signature(&payload, &pubkey(&k), &sign(&k, BODY)),
        Ok(true)
    );
    assert!(matches!(
        verifier().verify_signature(&payload, &pubkey(&key(5)), &sign(&k, BODY)),
        Err(VerificationError::SignatureInvalid { .. })
    ));
}
