//! Canonical hashing.
//!
//! Program commitments are `RIPEMD-160(SHA-256(code))`. Message hashes that
//! signatures cover are plain SHA-256 of the signable object's unsigned
//! serialization.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use attest_contracts::ProgramHash;

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// The commitment a signer makes to an authorization script.
///
/// Infallible: any byte string, including an empty one, has a hash. The
/// verifier rejects empty scripts before hashing them.
pub fn code_hash(code: &[u8]) -> ProgramHash {
    let inner = Sha256::digest(code);
    ProgramHash(Ripemd160::digest(inner).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn code_hash_of_empty_script_matches_known_vector() {
        assert_eq!(
            code_hash(b"").to_hex(),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
    }

    #[test]
    fn code_hash_is_deterministic_and_input_sensitive() {
        let a = code_hash(&[0x51, 0xac]);
        assert_eq!(a, code_hash(&[0x51, 0xac]));
        assert_ne!(a, code_hash(&[0x51, 0xad]));
    }
}
