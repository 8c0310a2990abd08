//! ECDSA over secp256k1, the default `CryptoProvider`.

use k256::ecdsa::{signature::hazmat::PrehashVerifier, Signature, VerifyingKey};

use attest_contracts::CryptoError;

use crate::traits::CryptoProvider;

/// Verifies 64-byte compact (`r || s`) ECDSA signatures against SEC1-encoded
/// secp256k1 public keys. The message is the 32-byte hash itself; no further
/// hashing is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Crypto;

impl CryptoProvider for Secp256k1Crypto {
    fn verify(
        &self,
        pubkey: &[u8],
        message_hash: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        let key = VerifyingKey::from_sec1_bytes(pubkey).map_err(|e| {
            CryptoError::MalformedPublicKey {
                reason: e.to_string(),
            }
        })?;
        let signature =
            Signature::from_slice(signature).map_err(|e| CryptoError::MalformedSignature {
                reason: e.to_string(),
            })?;

        key.verify_prehash(message_hash, &signature)
            .map_err(|_| CryptoError::Mismatch)
    }
}
