//! The authenticity service.
//!
//! Wires configuration into a ready verification engine:
//! 1.  opens the short-code store (Postgres when `DATABASE_URL` is set,
//!     otherwise the JSON file at `CODES_FILE`);
//! 2.  loads the contract artifact and resolves the deployment address for
//!     the ledger's network (or takes `CONTRACT_ADDRESS` verbatim);
//! 3.  builds the JSON-RPC ledger reader and the engine on top.

use crate::domain::artifact::{Address, ArtifactResolver, ContractArtifact};
use crate::domain::ledger::LedgerReader;
use crate::domain::registry::ShortCodeRegistry;
use crate::domain::verify::VerificationEngine;
use crate::infra::artifact_source::load_artifact;
use crate::infra::config::Settings;
use crate::infra::evm::JsonRpcLedgerReader;
use crate::storage::codes::{CodeStore, JsonFileCodeStore, PostgresCodeStore};
use std::sync::Arc;

pub struct AuthenticityService {
    engine: Arc<VerificationEngine>,
    artifact: Option<Arc<ContractArtifact>>,
}

impl AuthenticityService {
    pub fn new(engine: Arc<VerificationEngine>, artifact: Option<Arc<ContractArtifact>>) -> Self {
        Self { engine, artifact }
    }

    pub fn engine(&self) -> &Arc<VerificationEngine> {
        &self.engine
    }

    pub fn artifact(&self) -> Option<&Arc<ContractArtifact>> {
        self.artifact.as_ref()
    }

    pub fn store(&self) -> &Arc<dyn CodeStore> {
        self.engine.registry().store()
    }

    pub async fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn CodeStore>> {
        let store: Arc<dyn CodeStore> = match &settings.database_url {
            Some(url) => {
                tracing::info!("using Postgres short-code store");
                Arc::new(PostgresCodeStore::connect(url).await?)
            }
            None => {
                let store = JsonFileCodeStore::open(&settings.codes_file).await?;
                tracing::info!(path = %store.path().display(), "using JSON-file short-code store");
                Arc::new(store)
            }
        };
        Ok(store)
    }

    /// Address priority: explicit `CONTRACT_ADDRESS`, then the artifact entry
    /// for the active network (with the dev fallback only if enabled).
    pub async fn resolve_contract(
        settings: &Settings,
        artifact: Option<&ContractArtifact>,
        ledger: &JsonRpcLedgerReader,
    ) -> anyhow::Result<Address> {
        if let Some(raw) = &settings.contract_address {
            let address: Address = raw.parse()?;
            tracing::info!(%address, "using CONTRACT_ADDRESS override");
            return Ok(address);
        }

        let network_id = match settings.network_id {
            Some(id) => id,
            None => ledger.chain_id().await?,
        };
        let resolver = match settings.dev_network_fallback {
            Some(dev) => ArtifactResolver::with_fallback(dev),
            None => ArtifactResolver::strict(),
        };
        let address = resolver.resolve(artifact, network_id)?;
        tracing::info!(%address, network_id, "resolved contract address from artifact");
        Ok(address)
    }

    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = Self::open_store(settings).await?;
        let artifact = load_artifact(&settings.contract_artifact).await?;

        let reader = JsonRpcLedgerReader::new(settings.rpc_url.clone(), settings.ledger_timeout)?;
        let contract = Self::resolve_contract(settings, artifact.as_ref(), &reader).await?;

        let registry = Arc::new(ShortCodeRegistry::new(store));
        let ledger: Arc<dyn LedgerReader> = Arc::new(reader);
        let engine = VerificationEngine::new(registry, ledger, contract)
            .with_ledger_timeout(settings.ledger_timeout);

        Ok(Self::new(Arc::new(engine), artifact.map(Arc::new)))
    }
}
