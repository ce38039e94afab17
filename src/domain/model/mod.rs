//! Core value types: fingerprints, product attributes and short codes.

pub mod fingerprint;
pub mod product;
pub mod short_code;

pub use fingerprint::Fingerprint;
pub use product::ProductAttributes;
pub use short_code::{normalize_code, ShortCode, MAX_CODE_LEN, MIN_CODE_LEN};
