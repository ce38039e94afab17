use crate::domain::artifact::{Address, ContractArtifact};
use crate::error::ResolutionError;

/// Hardhat / Anvil local chain id.
pub const DEFAULT_DEV_NETWORK_ID: u64 = 31337;

/// Picks the deployment address for the caller's network.
///
/// Exact match first. The development fallback is only consulted when it was
/// explicitly enabled, so a production caller on the wrong network fails
/// instead of being pointed at a dev deployment.
#[derive(Clone, Debug, Default)]
pub struct ArtifactResolver {
    fallback_network: Option<u64>,
}

impl ArtifactResolver {
    /// Resolver without any fallback.
    pub fn strict() -> Self {
        Self { fallback_network: None }
    }

    pub fn with_fallback(network_id: u64) -> Self {
        Self { fallback_network: Some(network_id) }
    }

    pub fn resolve(
        &self,
        artifact: Option<&ContractArtifact>,
        network_id: u64,
    ) -> Result<Address, ResolutionError> {
        let artifact = artifact
            .ok_or_else(|| ResolutionError::NoArtifact("artifact was not loaded".to_string()))?;
        if artifact.networks.is_empty() {
            return Err(ResolutionError::NoArtifact(
                "artifact lists no network deployments".to_string(),
            ));
        }

        if let Some(entry) = artifact.deployment(network_id) {
            return entry.address.parse();
        }

        match self.fallback_network {
            Some(fallback) => match artifact.deployment(fallback) {
                Some(entry) => {
                    tracing::warn!(
                        requested = network_id,
                        fallback,
                        "no deployment for requested network; using development fallback"
                    );
                    entry.address.parse()
                }
                None => Err(ResolutionError::UnknownNetwork { network_id }),
            },
            None => Err(ResolutionError::UnknownNetwork { network_id }),
        }
    }
}
