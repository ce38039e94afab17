use crate::domain::model::{Fingerprint, ShortCode};
use crate::error::StoreError;
use crate::storage::codes::{CodeStore, InsertOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Indexes {
    by_fingerprint: HashMap<Fingerprint, ShortCode>,
    by_code: HashMap<ShortCode, Fingerprint>,
}

/// Process-local store. Both indexes live behind one lock so the uniqueness
/// check and the insert happen in a single critical section.
#[derive(Default)]
pub struct MemoryCodeStore {
    inner: RwLock<Indexes>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_fingerprint.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn insert_if_absent(
        &self,
        fingerprint: Fingerprint,
        code: &ShortCode,
    ) -> Result<InsertOutcome, StoreError> {
        let mut idx = self.inner.write().await;
        if let Some(existing) = idx.by_fingerprint.get(&fingerprint) {
            return Ok(InsertOutcome::FingerprintTaken(existing.clone()));
        }
        if idx.by_code.contains_key(code) {
            return Ok(InsertOutcome::CodeTaken);
        }
        idx.by_fingerprint.insert(fingerprint, code.clone());
        idx.by_code.insert(code.clone(), fingerprint);
        Ok(InsertOutcome::Inserted)
    }

    async fn code_for(&self, fingerprint: &Fingerprint) -> Result<Option<ShortCode>, StoreError> {
        Ok(self.inner.read().await.by_fingerprint.get(fingerprint).cloned())
    }

    async fn fingerprint_for(&self, code: &ShortCode) -> Result<Option<Fingerprint>, StoreError> {
        Ok(self.inner.read().await.by_code.get(code).copied())
    }
}
