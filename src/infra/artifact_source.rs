use crate::domain::artifact::ContractArtifact;
use anyhow::Context;
use std::path::Path;

/// Loads the contract artifact once at startup.
///
/// A missing file yields `None` (resolution then relies on an explicit
/// contract address); a file that exists but does not parse is an error.
pub async fn load_artifact(path: &Path) -> anyhow::Result<Option<ContractArtifact>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "contract artifact not found");
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("reading artifact {}", path.display()));
        }
    };
    let artifact = ContractArtifact::from_slice(&bytes)
        .with_context(|| format!("parsing artifact {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        networks = ?artifact.networks.keys().collect::<Vec<_>>(),
        "loaded contract artifact"
    );
    Ok(Some(artifact))
}
