pub mod app;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::authenticity_service::AuthenticityService;
pub use crypto::{derive_fingerprint, FINGERPRINT_SCHEME};
pub use domain::artifact::{Address, ArtifactResolver, ContractArtifact};
pub use domain::ledger::LedgerReader;
pub use domain::model::{Fingerprint, ProductAttributes, ShortCode};
pub use domain::registry::{CodePolicy, ShortCodeRegistry};
pub use domain::verify::{Verdict, VerdictReason, VerdictStatus, VerificationEngine};
pub use error::{LedgerError, RegistryError, ResolutionError, StoreError};
pub use infra::config::Settings;
