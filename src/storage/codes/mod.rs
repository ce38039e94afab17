//! Keyed storage for the fingerprint -> short code mapping.

pub mod json_file;
pub mod memory;
pub mod postgres;

pub use json_file::JsonFileCodeStore;
pub use memory::MemoryCodeStore;
pub use postgres::PostgresCodeStore;

use crate::domain::model::{Fingerprint, ShortCode};
use crate::error::StoreError;
use async_trait::async_trait;

/// Result of an atomic insert-if-absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Both the fingerprint and the code were free; the pair is committed.
    Inserted,
    /// The fingerprint already has a code; nothing was written.
    FingerprintTaken(ShortCode),
    /// The code belongs to another fingerprint; nothing was written.
    CodeTaken,
}

/// Backing store of the short-code registry.
///
/// `insert_if_absent` must check both keys and commit as one step: two
/// concurrent inserts for the same fingerprint, or with the same code, can
/// never both report `Inserted`. Reads must observe every committed insert.
#[async_trait]
pub trait CodeStore: Send + Sync {
    async fn insert_if_absent(
        &self,
        fingerprint: Fingerprint,
        code: &ShortCode,
    ) -> Result<InsertOutcome, StoreError>;

    async fn code_for(&self, fingerprint: &Fingerprint) -> Result<Option<ShortCode>, StoreError>;

    async fn fingerprint_for(&self, code: &ShortCode) -> Result<Option<Fingerprint>, StoreError>;

    /// Cheap reachability probe used by health checks.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
