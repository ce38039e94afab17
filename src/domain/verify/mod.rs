pub mod verdict;
pub mod verifier;

pub use verdict::{Verdict, VerdictReason, VerdictStatus};
pub use verifier::{VerificationEngine, DEFAULT_LEDGER_TIMEOUT};
