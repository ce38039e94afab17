//! Verdict table: every registry/ledger combination maps to exactly one
//! (status, reason) pair.

mod common;

use authenticity_engine::storage::codes::CodeStore;
use authenticity_engine::{
    derive_fingerprint, ProductAttributes, ShortCode, VerdictReason, VerdictStatus,
};
use common::{bag_a, harness, LedgerMode};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unregistered_fingerprint_is_fake() {
    let h = harness();
    let fp = derive_fingerprint(&bag_a());
    h.ledger.put(fp, bag_a());

    let verdict = h.engine.verify(fp, "VS2BOF").await.unwrap();
    assert_eq!(verdict.status, VerdictStatus::Fake);
    assert_eq!(verdict.reason, VerdictReason::NoRegistration);
    assert!(verdict.product.is_none());
    assert_eq!(h.ledger.reads(), 0, "ledger must not be read without a registration");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn wrong_code_is_a_mismatch() {
    let h = harness();
    let fp = derive_fingerprint(&bag_a());
    h.ledger.put(fp, bag_a());
    h.store
        .insert_if_absent(fp, &ShortCode::parse("XYZ789").unwrap())
        .await
        .unwrap();

    let verdict = h.engine.verify(fp, "ABC123").await.unwrap();
    assert_eq!(verdict.status, VerdictStatus::Fake);
    assert_eq!(verdict.reason, VerdictReason::CodeMismatch);
    assert_eq!(h.ledger.reads(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn code_of_another_product_is_still_a_mismatch() {
    let h = harness();
    let genuine = derive_fingerprint(&bag_a());
    let other = derive_fingerprint(&ProductAttributes::new("Bag B", "Gold", "Epsom", 900, Some(2023)));
    let genuine_code = h.engine.register(genuine).await.unwrap();
    h.engine.register(other).await.unwrap();

    let verdict = h.engine.verify(other, genuine_code.as_str()).await.unwrap();
    assert_eq!(verdict.reason, VerdictReason::CodeMismatch);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registered_but_absent_on_ledger_is_missing() {
    let h = harness();
    let fp = derive_fingerprint(&bag_a());
    let code = h.engine.register(fp).await.unwrap();

    let verdict = h.engine.verify(fp, code.as_str()).await.unwrap();
    assert_eq!(verdict.status, VerdictStatus::Fake);
    assert_eq!(verdict.reason, VerdictReason::LedgerRecordMissing);
    assert_eq!(h.ledger.reads(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn zero_valued_ledger_record_counts_as_missing() {
    let h = harness();
    let fp = derive_fingerprint(&bag_a());
    h.ledger.put(fp, ProductAttributes::new("", "", "", 0, Some(0)));
    let code = h.engine.register(fp).await.unwrap();

    let verdict = h.engine.verify(fp, code.as_str()).await.unwrap();
    assert_eq!(verdict.reason, VerdictReason::LedgerRecordMissing);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn matching_code_and_record_is_authentic() {
    let h = harness();
    let fp = derive_fingerprint(&bag_a());
    h.ledger.put(fp, bag_a());
    let code = h.engine.register(fp).await.unwrap();

    let verdict = h.engine.verify(fp, code.as_str()).await.unwrap();
    assert!(verdict.is_authentic());
    assert_eq!(verdict.reason, VerdictReason::OnChainAndCodeMatch);
    assert_eq!(verdict.product, Some(bag_a()));

    let json = serde_json::to_value(&verdict).unwrap();
    assert_eq!(json["status"], "authentic");
    assert_eq!(json["reason"], "on_chain_and_code_match");
    assert_eq!(json["product"]["material"], "Togo Leather");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn presented_code_is_case_and_whitespace_insensitive() {
    let h = harness();
    let fp = derive_fingerprint(&bag_a());
    h.ledger.put(fp, bag_a());
    h.store
        .insert_if_absent(fp, &ShortCode::parse("VS2BOF").unwrap())
        .await
        .unwrap();

    let verdict = h.engine.verify(fp, "vs2bof").await.unwrap();
    assert_eq!(verdict.reason, VerdictReason::OnChainAndCodeMatch);

    let verdict = h.engine.verify(fp, "  Vs2BoF\n").await.unwrap();
    assert_eq!(verdict.reason, VerdictReason::OnChainAndCodeMatch);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_ledger_is_unavailable_not_missing() {
    let h = harness();
    let fp = derive_fingerprint(&bag_a());
    h.ledger.put(fp, bag_a());
    let code = h.engine.register(fp).await.unwrap();
    h.ledger.set_mode(LedgerMode::Unreachable);

    let verdict = h.engine.verify(fp, code.as_str()).await.unwrap();
    assert_eq!(verdict.status, VerdictStatus::Fake);
    assert_eq!(verdict.reason, VerdictReason::VerificationUnavailable);
    assert!(verdict.product.is_none());

    // Recovery needs no restart.
    h.ledger.set_mode(LedgerMode::Normal);
    let verdict = h.engine.verify(fp, code.as_str()).await.unwrap();
    assert!(verdict.is_authentic());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stalled_ledger_times_out_as_unavailable() {
    let h = harness();
    let fp = derive_fingerprint(&bag_a());
    let code = h.engine.register(fp).await.unwrap();
    h.ledger.set_mode(LedgerMode::Stalled);

    let started = std::time::Instant::now();
    let verdict = h.engine.verify(fp, code.as_str()).await.unwrap();
    assert_eq!(verdict.reason, VerdictReason::VerificationUnavailable);
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_verifications_agree() {
    let h = harness();
    let fp = derive_fingerprint(&bag_a());
    h.ledger.put(fp, bag_a());
    let code = h.engine.register(fp).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..32 {
        let engine = h.engine.clone();
        let presented = if i % 2 == 0 { code.to_string() } else { "VSNOPE".to_string() };
        handles.push(tokio::spawn(async move { (i, engine.verify(fp, &presented).await) }));
    }
    for handle in handles {
        let (i, verdict) = handle.await.unwrap();
        let verdict = verdict.unwrap();
        if i % 2 == 0 {
            assert!(verdict.is_authentic());
        } else {
            assert_eq!(verdict.reason, VerdictReason::CodeMismatch);
        }
    }
}
