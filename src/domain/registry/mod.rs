//! The short-code registry: one unique code per fingerprint.

pub mod policy;

pub use policy::{CodePolicy, DEFAULT_ALPHABET, DEFAULT_PREFIX};

use crate::domain::model::{Fingerprint, ShortCode};
use crate::error::RegistryError;
use crate::storage::codes::{CodeStore, InsertOutcome};
use std::sync::Arc;

/// Issues and looks up short codes.
///
/// Registration is strict: a fingerprint that already holds a code is
/// refused with `AlreadyRegistered` and the stored code is never replaced.
/// Callers that want the existing code read it back with [`lookup`].
///
/// [`lookup`]: ShortCodeRegistry::lookup
pub struct ShortCodeRegistry {
    store: Arc<dyn CodeStore>,
    policy: CodePolicy,
}

impl ShortCodeRegistry {
    pub fn new(store: Arc<dyn CodeStore>) -> Self {
        Self { store, policy: CodePolicy::default() }
    }

    pub fn with_policy(store: Arc<dyn CodeStore>, policy: CodePolicy) -> Result<Self, RegistryError> {
        policy.validate()?;
        Ok(Self { store, policy })
    }

    pub fn store(&self) -> &Arc<dyn CodeStore> {
        &self.store
    }

    /// Mints and persists a fresh code for `fingerprint`.
    ///
    /// Every candidate goes through the store's atomic insert-if-absent, which
    /// settles both same-fingerprint races and cross-fingerprint code
    /// collisions. Storage faults are returned as-is, never retried here.
    pub async fn register(&self, fingerprint: Fingerprint) -> Result<ShortCode, RegistryError> {
        if self.store.code_for(&fingerprint).await?.is_some() {
            return Err(RegistryError::AlreadyRegistered { fingerprint });
        }

        let mut attempts = 0;
        for length in self.policy.lengths() {
            for _ in 0..self.policy.attempts_per_length {
                attempts += 1;
                let candidate = self.policy.mint(length);
                match self.store.insert_if_absent(fingerprint, &candidate).await? {
                    InsertOutcome::Inserted => {
                        tracing::info!(%fingerprint, attempts, "registered short code");
                        return Ok(candidate);
                    }
                    InsertOutcome::FingerprintTaken(_) => {
                        return Err(RegistryError::AlreadyRegistered { fingerprint });
                    }
                    InsertOutcome::CodeTaken => {
                        tracing::debug!(%fingerprint, length, "short code collision, retrying");
                    }
                }
            }
        }

        tracing::error!(%fingerprint, attempts, "short code space exhausted");
        Err(RegistryError::CodeSpaceExhausted { attempts })
    }

    pub async fn lookup(&self, fingerprint: &Fingerprint) -> Result<Option<ShortCode>, RegistryError> {
        Ok(self.store.code_for(fingerprint).await?)
    }

    /// Reverse lookup of a presented code. Text that cannot be a short code
    /// maps to nothing.
    pub async fn lookup_by_code(&self, code: &str) -> Result<Option<Fingerprint>, RegistryError> {
        match ShortCode::parse(code) {
            Ok(code) => Ok(self.store.fingerprint_for(&code).await?),
            Err(_) => Ok(None),
        }
    }
}
