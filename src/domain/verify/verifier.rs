// Reconciles registry state with ledger state into a verdict.

use crate::domain::artifact::Address;
use crate::domain::ledger::LedgerReader;
use crate::domain::model::{normalize_code, Fingerprint, ProductAttributes, ShortCode};
use crate::domain::registry::ShortCodeRegistry;
use crate::domain::verify::{Verdict, VerdictReason};
use crate::error::{LedgerError, RegistryError};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(5);

/// Stateless per call: nothing is cached between verifications and `verify`
/// never writes, so dropping its future at any await point is safe.
pub struct VerificationEngine {
    registry: Arc<ShortCodeRegistry>,
    ledger: Arc<dyn LedgerReader>,
    contract: Address,
    ledger_timeout: Duration,
}

impl VerificationEngine {
    pub fn new(
        registry: Arc<ShortCodeRegistry>,
        ledger: Arc<dyn LedgerReader>,
        contract: Address,
    ) -> Self {
        Self { registry, ledger, contract, ledger_timeout: DEFAULT_LEDGER_TIMEOUT }
    }

    pub fn with_ledger_timeout(mut self, timeout: Duration) -> Self {
        self.ledger_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<ShortCodeRegistry> {
        &self.registry
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Issues the short code for a product already written to the ledger.
    pub async fn register(&self, fingerprint: Fingerprint) -> Result<ShortCode, RegistryError> {
        self.registry.register(fingerprint).await
    }

    /// Ledger-only read, bounded by the engine's timeout.
    pub async fn read_record(
        &self,
        fingerprint: Fingerprint,
    ) -> Result<Option<ProductAttributes>, LedgerError> {
        let read = self.ledger.read_product(self.contract, fingerprint);
        match tokio::time::timeout(self.ledger_timeout, read).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Timeout(self.ledger_timeout)),
        }
    }

    /// Registry checks run first and fail fast; the ledger is only consulted
    /// once the presented code matches. Only storage faults are errors;
    /// every other outcome is a verdict.
    pub async fn verify(
        &self,
        fingerprint: Fingerprint,
        presented_code: &str,
    ) -> Result<Verdict, RegistryError> {
        let presented = normalize_code(presented_code);

        let stored = match self.registry.lookup(&fingerprint).await? {
            Some(code) => code,
            None => return Ok(Verdict::fake(VerdictReason::NoRegistration)),
        };

        if stored.as_str() != presented {
            if let Some(owner) = self.registry.lookup_by_code(&presented).await? {
                tracing::warn!(
                    %fingerprint,
                    code_owner = %owner,
                    "presented code belongs to a different product"
                );
            }
            return Ok(Verdict::fake(VerdictReason::CodeMismatch));
        }

        // No registry lock is held past this point.
        let verdict = match self.read_record(fingerprint).await {
            Ok(Some(product)) if !product.is_unset() => Verdict::authentic(product),
            Ok(_) => Verdict::fake(VerdictReason::LedgerRecordMissing),
            Err(e) => {
                tracing::warn!(%fingerprint, error = %e, "ledger read failed during verification");
                Verdict::fake(VerdictReason::VerificationUnavailable)
            }
        };
        Ok(verdict)
    }
}
