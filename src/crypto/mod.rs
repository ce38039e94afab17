pub mod fingerprint;

pub use fingerprint::{derive_fingerprint, encode_packed, keccak256, FINGERPRINT_SCHEME};
