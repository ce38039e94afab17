//! Error taxonomy for the verification protocol engine.
//!
//! `fake` verdicts are ordinary return values and never appear here; these
//! enums only describe configuration, storage and transport faults.

use crate::domain::model::Fingerprint;
use std::time::Duration;
use thiserror::Error;

/// Contract artifact / network problems. Fatal to the calling operation only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no usable contract artifact: {0}")]
    NoArtifact(String),
    #[error("artifact has no deployment for network {network_id} and no fallback is enabled")]
    UnknownNetwork { network_id: u64 },
}

/// Failures of the underlying code store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("code store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("code store JSON failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("code store database failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("code store holds corrupt data: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("a short code is already registered for {fingerprint}")]
    AlreadyRegistered { fingerprint: Fingerprint },
    #[error("could not mint a unique short code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },
    #[error("invalid code policy: {0}")]
    InvalidPolicy(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Ledger read failures. The engine degrades every variant to a
/// `verification_unavailable` verdict.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("ledger RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("could not decode ledger response: {0}")]
    Decode(String),
    #[error("ledger read timed out after {0:?}")]
    Timeout(Duration),
}

/// Rejected product attributes (checked before fingerprinting).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    #[error("attribute `{0}` must not be blank")]
    Blank(&'static str),
    #[error("attribute `year` must be non-zero")]
    ZeroYear,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintParseError {
    #[error("fingerprint must start with 0x")]
    MissingPrefix,
    #[error("fingerprint must be 0x + 64 hex characters, got {0} characters")]
    BadLength(usize),
    #[error("fingerprint contains non-hex characters")]
    BadHex,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortCodeError {
    #[error("short code must be 6 to 8 characters, got {0}")]
    BadLength(usize),
    #[error("short code must be ASCII alphanumeric")]
    BadCharacter,
}
