use crate::domain::model::ProductAttributes;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Authentic,
    Fake,
}

/// Stable, machine-checkable reason codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    NoRegistration,
    CodeMismatch,
    LedgerRecordMissing,
    /// The ledger could not be read. Not evidence of a counterfeit; callers
    /// may retry.
    VerificationUnavailable,
    OnChainAndCodeMatch,
}

impl VerdictReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictReason::NoRegistration => "no_registration",
            VerdictReason::CodeMismatch => "code_mismatch",
            VerdictReason::LedgerRecordMissing => "ledger_record_missing",
            VerdictReason::VerificationUnavailable => "verification_unavailable",
            VerdictReason::OnChainAndCodeMatch => "on_chain_and_code_match",
        }
    }
}

impl fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one verification. `product` is only set when authentic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub reason: VerdictReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductAttributes>,
}

impl Verdict {
    pub fn fake(reason: VerdictReason) -> Self {
        Self { status: VerdictStatus::Fake, reason, product: None }
    }

    pub fn authentic(product: ProductAttributes) -> Self {
        Self {
            status: VerdictStatus::Authentic,
            reason: VerdictReason::OnChainAndCodeMatch,
            product: Some(product),
        }
    }

    pub fn is_authentic(&self) -> bool {
        self.status == VerdictStatus::Authentic
    }
}
