//! Read-only port onto the ledger that stores product records.

use crate::domain::artifact::Address;
use crate::domain::model::{Fingerprint, ProductAttributes};
use crate::error::LedgerError;
use async_trait::async_trait;

/// Reads a product record by fingerprint through the deployed contract.
///
/// Implementations perform out-of-process I/O and may be slow or fail; the
/// caller bounds every call with a timeout. `Ok(None)` means the ledger
/// positively reports no record (for example an execution revert).
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn read_product(
        &self,
        contract: Address,
        fingerprint: Fingerprint,
    ) -> Result<Option<ProductAttributes>, LedgerError>;
}
