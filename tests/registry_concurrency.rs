//! Short-code registry: atomic per-fingerprint registration and registry-wide
//! code uniqueness, against the in-memory and JSON-file stores.

use authenticity_engine::domain::model::Fingerprint;
use authenticity_engine::storage::codes::{
    CodeStore, InsertOutcome, JsonFileCodeStore, MemoryCodeStore, PostgresCodeStore,
};
use authenticity_engine::{CodePolicy, RegistryError, ShortCode, ShortCodeRegistry, StoreError};
use std::collections::HashSet;
use std::sync::Arc;

fn fp(n: u64) -> Fingerprint {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    Fingerprint::from_bytes(bytes)
}

fn memory_registry() -> Arc<ShortCodeRegistry> {
    Arc::new(ShortCodeRegistry::new(Arc::new(MemoryCodeStore::new())))
}

fn random_fp() -> Fingerprint {
    Fingerprint::from_bytes(rand::random::<[u8; 32]>())
}

async fn race_same_fingerprint(registry: Arc<ShortCodeRegistry>, target: Fingerprint, n: usize) {
    let mut handles = Vec::with_capacity(n);
    for _ in 0..n {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move { registry.register(target).await }));
    }

    let mut winners = Vec::new();
    let mut refused = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(code) => winners.push(code),
            Err(RegistryError::AlreadyRegistered { fingerprint }) => {
                assert_eq!(fingerprint, target);
                refused += 1;
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(winners.len(), 1, "exactly one registration must win");
    assert_eq!(refused, n - 1);
    assert_eq!(registry.lookup(&target).await.unwrap(), Some(winners[0].clone()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_fingerprint_has_one_winner() {
    race_same_fingerprint(memory_registry(), fp(7), 64).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_fingerprint_has_one_winner_on_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileCodeStore::open(dir.path().join("codes.json")).await.unwrap();
    race_same_fingerprint(Arc::new(ShortCodeRegistry::new(Arc::new(store))), fp(7), 16).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_fingerprints_never_share_a_code() {
    let registry = memory_registry();
    let mut handles = Vec::new();
    for i in 0..500u64 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move { registry.register(fp(i)).await }));
    }
    let mut codes = HashSet::new();
    for h in handles {
        let code = h.await.unwrap().unwrap();
        assert_eq!(code.as_str().len(), 6);
        assert!(code.as_str().starts_with("VS"));
        assert!(codes.insert(code), "duplicate short code minted");
    }
    assert_eq!(codes.len(), 500);
}

#[tokio::test]
async fn collisions_grow_the_code_then_exhaust() {
    // A one-letter alphabet forces a collision on every repeat of a length.
    let policy = CodePolicy {
        prefix: "VSAAA".to_string(),
        alphabet: "B".to_string(),
        length: 6,
        max_length: 8,
        attempts_per_length: 2,
    };
    let registry = ShortCodeRegistry::with_policy(Arc::new(MemoryCodeStore::new()), policy).unwrap();

    assert_eq!(registry.register(fp(1)).await.unwrap().as_str(), "VSAAAB");
    assert_eq!(registry.register(fp(2)).await.unwrap().as_str(), "VSAAABB");
    assert_eq!(registry.register(fp(3)).await.unwrap().as_str(), "VSAAABBB");
    match registry.register(fp(4)).await {
        Err(RegistryError::CodeSpaceExhausted { attempts }) => assert_eq!(attempts, 6),
        other => panic!("expected exhaustion, got {:?}", other.map(|c| c.to_string())),
    }
    assert_eq!(registry.lookup(&fp(4)).await.unwrap(), None);
}

#[tokio::test]
async fn invalid_policy_is_rejected() {
    let policy = CodePolicy { prefix: "VSVSVS".to_string(), ..CodePolicy::default() };
    assert!(matches!(
        ShortCodeRegistry::with_policy(Arc::new(MemoryCodeStore::new()), policy),
        Err(RegistryError::InvalidPolicy(_))
    ));
}

#[tokio::test]
async fn reverse_lookup_normalizes_presented_text() {
    let registry = memory_registry();
    let code = registry.register(fp(9)).await.unwrap();

    let lower = format!("  {}  ", code.as_str().to_lowercase());
    assert_eq!(registry.lookup_by_code(&lower).await.unwrap(), Some(fp(9)));
    assert_eq!(registry.lookup_by_code("nope").await.unwrap(), None);
    assert_eq!(registry.lookup_by_code("ZZZZZZ").await.unwrap(), None);
}

async fn assert_conflict_outcomes(
    store: &dyn CodeStore,
    first: Fingerprint,
    second: Fingerprint,
    code: &ShortCode,
    other: &ShortCode,
) {
    assert_eq!(store.insert_if_absent(first, code).await.unwrap(), InsertOutcome::Inserted);
    assert_eq!(
        store.insert_if_absent(first, other).await.unwrap(),
        InsertOutcome::FingerprintTaken(code.clone())
    );
    assert_eq!(store.insert_if_absent(second, code).await.unwrap(), InsertOutcome::CodeTaken);
    assert_eq!(store.code_for(&first).await.unwrap(), Some(code.clone()));
    assert_eq!(store.code_for(&second).await.unwrap(), None);
    assert_eq!(store.fingerprint_for(code).await.unwrap(), Some(first));
    assert_eq!(store.fingerprint_for(other).await.unwrap(), None);
}

#[tokio::test]
async fn store_reports_which_key_conflicted() {
    let store = MemoryCodeStore::new();
    let code = ShortCode::parse("VS2BQF").unwrap();
    let other = ShortCode::parse("VS3CRG").unwrap();

    assert_conflict_outcomes(&store, fp(1), fp(2), &code, &other).await;
    assert_eq!(store.len().await, 1);
}

/// Runs against a real database only when `TEST_DATABASE_URL` is set.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn postgres_store_is_atomic() {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping Postgres store test");
        return;
    };
    let store = Arc::new(PostgresCodeStore::connect(&url).await.unwrap());
    store.ping().await.unwrap();

    // Fresh keys per run: the table outlives the test.
    let raced = random_fp();
    let registry = Arc::new(ShortCodeRegistry::new(store.clone() as Arc<dyn CodeStore>));
    race_same_fingerprint(registry, raced, 16).await;

    let (first, second) = (random_fp(), random_fp());
    let policy = CodePolicy::default();
    let code = policy.mint(8);
    let other = policy.mint(8);
    assert_conflict_outcomes(store.as_ref(), first, second, &code, &other).await;

    for key in [raced, first, second] {
        sqlx::query("DELETE FROM security_codes WHERE fingerprint = $1")
            .bind(key.to_hex())
            .execute(store.pool())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("codes.json");

    let code = {
        let store = JsonFileCodeStore::open(&path).await.unwrap();
        let registry = ShortCodeRegistry::new(Arc::new(store));
        registry.register(fp(42)).await.unwrap()
    };

    let reopened = JsonFileCodeStore::open(&path).await.unwrap();
    assert_eq!(reopened.code_for(&fp(42)).await.unwrap(), Some(code.clone()));
    assert_eq!(reopened.fingerprint_for(&code).await.unwrap(), Some(fp(42)));

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    let entry = &raw[fp(42).to_string()];
    assert_eq!(entry["shortCode"], code.as_str());
    assert!(entry["createdAt"].is_string());
}

#[tokio::test]
async fn file_store_reads_legacy_entries_and_keeps_extra_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("codes.json");
    let legacy = serde_json::json!({
        (fp(1).to_string()): "VS2BQF",
        (fp(2).to_string()): { "shortCode": "vs3crg", "meta": { "color": "Black" } },
    });
    std::fs::write(&path, serde_json::to_vec(&legacy).unwrap()).unwrap();

    let store = JsonFileCodeStore::open(&path).await.unwrap();
    assert_eq!(store.code_for(&fp(1)).await.unwrap().unwrap().as_str(), "VS2BQF");
    assert_eq!(store.code_for(&fp(2)).await.unwrap().unwrap().as_str(), "VS3CRG");

    let new_code = ShortCode::parse("VS4DSH").unwrap();
    assert_eq!(store.insert_if_absent(fp(3), &new_code).await.unwrap(), InsertOutcome::Inserted);

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw[fp(1).to_string()], "VS2BQF");
    assert_eq!(raw[fp(2).to_string()]["meta"]["color"], "Black");
    assert_eq!(raw[fp(3).to_string()]["shortCode"], "VS4DSH");
}

#[tokio::test]
async fn file_store_refuses_inconsistent_files() {
    let dir = tempfile::tempdir().unwrap();

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, b"{ not json").unwrap();
    assert!(matches!(JsonFileCodeStore::open(&garbage).await, Err(StoreError::Json(_))));

    let duplicated = dir.path().join("dup.json");
    let body = serde_json::json!({ (fp(1).to_string()): "VS2BQF", (fp(2).to_string()): "VS2BQF" });
    std::fs::write(&duplicated, serde_json::to_vec(&body).unwrap()).unwrap();
    assert!(matches!(JsonFileCodeStore::open(&duplicated).await, Err(StoreError::Corrupt(_))));
}
