// Derives the product fingerprint exactly the way the ledger contract keys its records.

use crate::domain::model::{Fingerprint, ProductAttributes};
use sha3::{Digest, Keccak256};

/// Identifier of the encoding below. Bump it (and the known-answer vectors)
/// whenever the contract changes its key derivation.
pub const FINGERPRINT_SCHEME: &str =
    "v1:keccak256(abi.encodePacked(string,string,string,uint256,uint256))";

/// Solidity `abi.encodePacked(name, color, material, price, year)` with the
/// two integers widened to `uint256`.
pub fn encode_packed(attrs: &ProductAttributes) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        attrs.name.len() + attrs.color.len() + attrs.material.len() + 64,
    );
    out.extend_from_slice(attrs.name.as_bytes());
    out.extend_from_slice(attrs.color.as_bytes());
    out.extend_from_slice(attrs.material.as_bytes());
    out.extend_from_slice(&uint256_be(attrs.price));
    out.extend_from_slice(&uint256_be(u64::from(attrs.year)));
    out
}

fn uint256_be(v: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&v.to_be_bytes());
    word
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Total and deterministic: identical attributes always give the same
/// fingerprint, on any machine, without touching the network or registry.
pub fn derive_fingerprint(attrs: &ProductAttributes) -> Fingerprint {
    Fingerprint::from_bytes(keccak256(&encode_packed(attrs)))
}
