//! Demo scenarios.
//!
//! Each scenario builds signed payloads with fixed demo keys, runs them
//! through the verifier, and reports the outcome next to the expected one.

use k256::ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use attest_contracts::{ConfigError, Program, VerificationOutcome};
use attest_core::traits::SignableData;
use attest_core::{code_hash, ProgramVerifier, SignedPayload};
use attest_vm::{multi_sig_contract, signature_parameter, single_sig_contract, ContractError};

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not build contract: {0}")]
    Contract(#[from] ContractError),

    #[error("key or signature error: {0}")]
    Key(#[from] k256::ecdsa::Error),
}

/// One verification run and whether it came out as expected.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub scenario: &'static str,
    pub case: &'static str,
    pub expected_pass: bool,
    pub outcome: VerificationOutcome,
}

impl ScenarioReport {
    pub fn as_expected(&self) -> bool {
        self.outcome.passed == self.expected_pass
    }
}

const BODY: &[u8] = b"transfer 25 units from account A to account B";

fn demo_key(seed: u8) -> Result<SigningKey, DemoError> {
    Ok(SigningKey::from_slice(&[seed; 32])?)
}

fn pubkey(key: &SigningKey) -> Vec<u8> {
    key.verifying_key().to_encoded_point(true).as_bytes().to_vec()
}

fn sign(key: &SigningKey, body: &[u8]) -> Result<Vec<u8>, DemoError> {
    let unsigned = SignedPayload::with_programs(body.to_vec(), vec![]);
    let sig: Signature = key.sign_prehash(&unsigned.canonical_hash())?;
    Ok(sig.to_bytes().to_vec())
}

fn single_sig_program(key: &SigningKey, body: &[u8]) -> Result<Program, DemoError> {
    Ok(Program::new(
        single_sig_contract(&pubkey(key))?,
        signature_parameter(&[sign(key, body)?])?,
    ))
}

fn report(
    scenario: &'static str,
    case: &'static str,
    expected_pass: bool,
    outcome: VerificationOutcome,
) -> ScenarioReport {
    info!(scenario, case, passed = outcome.passed, "scenario case finished");
    ScenarioReport {
        scenario,
        case,
        expected_pass,
        outcome,
    }
}

/// One signer, one single-signature contract.
pub fn single_sig(verifier: &ProgramVerifier) -> Result<Vec<ScenarioReport>, DemoError> {
    let alice = demo_key(1)?;
    let payload = SignedPayload::with_programs(BODY.to_vec(), vec![single_sig_program(&alice, BODY)?]);

    Ok(vec![report("single-sig", "valid signer", true, verifier.check(&payload))])
}

/// A 2-of-3 multi-signature contract, satisfied and unsatisfied.
pub fn multi_sig(verifier: &ProgramVerifier) -> Result<Vec<ScenarioReport>, DemoError> {
    let keys = [demo_key(1)?, demo_key(2)?, demo_key(3)?];
    let pubkeys: Vec<Vec<u8>> = keys.iter().map(pubkey).collect();
    let code = multi_sig_contract(2, &pubkeys)?;

    let satisfied = Program::new(
        code.clone(),
        signature_parameter(&[sign(&keys[0], BODY)?, sign(&keys[2], BODY)?])?,
    );
    let one_short = Program::new(code, signature_parameter(&[sign(&keys[1], BODY)?])?);

    Ok(vec![
        report(
            "multi-sig",
            "2 of 3 signatures",
            true,
            verifier.check(&SignedPayload::with_programs(BODY.to_vec(), vec![satisfied])),
        ),
        report(
            "multi-sig",
            "1 of 3 signatures",
            false,
            verifier.check(&SignedPayload::with_programs(BODY.to_vec(), vec![one_short])),
        ),
    ])
}

/// Payloads altered after signing, each caught at a different check.
pub fn tampered(verifier: &ProgramVerifier) -> Result<Vec<ScenarioReport>, DemoError> {
    let alice = demo_key(1)?;
    let mallory = demo_key(9)?;

    // Body changed after Alice signed it.
    let altered_body = SignedPayload::with_programs(
        b"transfer 9999 units from account A to account M".to_vec(),
        vec![single_sig_program(&alice, BODY)?],
    );

    // Claim is Alice's contract, witness is Mallory's.
    let alice_hash = code_hash(&single_sig_contract(&pubkey(&alice))?);
    let swapped_witness = SignedPayload::new(
        BODY.to_vec(),
        vec![alice_hash],
        vec![single_sig_program(&mallory, BODY)?],
    );

    // An extra value smuggled in front of the signature.
    let padded = SignedPayload::with_programs(
        BODY.to_vec(),
        vec![Program::new(
            single_sig_contract(&pubkey(&alice))?,
            signature_parameter(&[vec![0x01], sign(&alice, BODY)?])?,
        )],
    );

    // A witness removed after signing.
    let mut missing_witness = SignedPayload::with_programs(
        BODY.to_vec(),
        vec![single_sig_program(&alice, BODY)?, single_sig_program(&mallory, BODY)?],
    );
    missing_witness.set_programs(vec![single_sig_program(&alice, BODY)?]);

    Ok(vec![
        report("tampered", "altered body", false, verifier.check(&altered_body)),
        report("tampered", "swapped witness", false, verifier.check(&swapped_witness)),
        report("tampered", "padded parameter", false, verifier.check(&padded)),
        report("tampered", "missing witness", false, verifier.check(&missing_witness)),
    ])
}

/// Direct signature checks, no engine involved.
pub fn direct_signature(verifier: &ProgramVerifier) -> Result<Vec<ScenarioReport>, DemoError> {
    let alice = demo_key(1)?;
    let payload = SignedPayload::with_programs(BODY.to_vec(), vec![]);
    let sig = sign(&alice, BODY)?;

    let mut flipped = sig.clone();
    flipped[10] ^= 0x01;

    Ok(vec![
        report(
            "direct-signature",
            "valid signature",
            true,
            verifier.verify_signature(&payload, &pubkey(&alice), &sig).into(),
        ),
        report(
            "direct-signature",
            "one bit flipped",
            false,
            verifier.verify_signature(&payload, &pubkey(&alice), &flipped).into(),
        ),
    ])
}
