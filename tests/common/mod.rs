//! Shared test doubles.

#![allow(dead_code)]

use async_trait::async_trait;
use authenticity_engine::{
    Address, Fingerprint, LedgerError, LedgerReader, ProductAttributes, ShortCodeRegistry,
    VerificationEngine,
};
use authenticity_engine::storage::codes::{CodeStore, MemoryCodeStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerMode {
    Normal,
    /// Every read fails like an unreachable node.
    Unreachable,
    /// Every read stalls far beyond any test timeout.
    Stalled,
}

/// In-memory ledger keyed by fingerprint.
pub struct StubLedger {
    records: Mutex<HashMap<Fingerprint, ProductAttributes>>,
    mode: Mutex<LedgerMode>,
    reads: AtomicUsize,
}

impl StubLedger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            mode: Mutex::new(LedgerMode::Normal),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn put(&self, fingerprint: Fingerprint, attrs: ProductAttributes) {
        self.records.lock().unwrap().insert(fingerprint, attrs);
    }

    pub fn set_mode(&self, mode: LedgerMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerReader for StubLedger {
    async fn read_product(
        &self,
        _contract: Address,
        fingerprint: Fingerprint,
    ) -> Result<Option<ProductAttributes>, LedgerError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let mode = *self.mode.lock().unwrap();
        match mode {
            LedgerMode::Normal => Ok(self.records.lock().unwrap().get(&fingerprint).cloned()),
            LedgerMode::Unreachable => Err(LedgerError::Rpc {
                code: -32000,
                message: "connection refused".to_string(),
            }),
            LedgerMode::Stalled => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

pub fn contract() -> Address {
    "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap()
}

pub fn bag_a() -> ProductAttributes {
    ProductAttributes::new("Bag A", "Black", "Togo Leather", 1000, Some(2024))
}

pub struct Harness {
    pub store: Arc<MemoryCodeStore>,
    pub ledger: Arc<StubLedger>,
    pub engine: Arc<VerificationEngine>,
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryCodeStore::new());
    let ledger = Arc::new(StubLedger::new());
    let registry = Arc::new(ShortCodeRegistry::new(store.clone() as Arc<dyn CodeStore>));
    let engine = VerificationEngine::new(registry, ledger.clone() as Arc<dyn LedgerReader>, contract())
        .with_ledger_timeout(Duration::from_millis(200));
    Harness { store, ledger, engine: Arc::new(engine) }
}
