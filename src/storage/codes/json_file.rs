//! JSON-file code store.
//!
//! The file maps `0x…` fingerprints to entries:
//!
//! ```json
//! { "0xab…": { "shortCode": "VS2BQF", "createdAt": "2025-01-01T00:00:00Z" } }
//! ```
//!
//! Older files stored the bare code string (`"0xab…": "VS2BQF"`); both shapes
//! are read, and unknown keys on an entry are kept on rewrite.

use crate::domain::model::{Fingerprint, ShortCode};
use crate::error::StoreError;
use crate::storage::codes::{CodeStore, InsertOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Record {
        #[serde(rename = "shortCode")]
        short_code: String,
        #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
        created_at: Option<DateTime<Utc>>,
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    },
    Legacy(String),
}

impl StoredEntry {
    fn short_code(&self) -> &str {
        match self {
            StoredEntry::Record { short_code, .. } => short_code,
            StoredEntry::Legacy(code) => code,
        }
    }
}

#[derive(Default)]
struct FileState {
    entries: BTreeMap<String, StoredEntry>,
    by_fingerprint: HashMap<Fingerprint, ShortCode>,
    by_code: HashMap<ShortCode, Fingerprint>,
}

/// Durable store backed by one JSON document, rewritten atomically
/// (temp file + rename) on every registration.
pub struct JsonFileCodeStore {
    path: PathBuf,
    state: RwLock<FileState>,
}

impl JsonFileCodeStore {
    /// Opens (or lazily creates) the store at `path`. A missing file is an
    /// empty store; an unreadable or inconsistent file is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(|b| b.is_ascii_whitespace()) => FileState::default(),
            Ok(bytes) => Self::index(serde_json::from_slice(&bytes)?)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileState::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(
            path = %path.display(),
            entries = state.entries.len(),
            "opened short-code file store"
        );
        Ok(Self { path, state: RwLock::new(state) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn index(entries: BTreeMap<String, StoredEntry>) -> Result<FileState, StoreError> {
        let mut state = FileState::default();
        for (key, entry) in &entries {
            let fingerprint: Fingerprint = key
                .parse()
                .map_err(|e| StoreError::Corrupt(format!("key `{}`: {}", key, e)))?;
            let code = ShortCode::parse(entry.short_code())
                .map_err(|e| StoreError::Corrupt(format!("code for {}: {}", key, e)))?;
            if let Some(other) = state.by_code.insert(code.clone(), fingerprint) {
                return Err(StoreError::Corrupt(format!(
                    "code {} assigned to both {} and {}",
                    code, other, fingerprint
                )));
            }
            state.by_fingerprint.insert(fingerprint, code);
        }
        state.entries = entries;
        Ok(state)
    }

    async fn persist(&self, entries: &BTreeMap<String, StoredEntry>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CodeStore for JsonFileCodeStore {
    async fn insert_if_absent(
        &self,
        fingerprint: Fingerprint,
        code: &ShortCode,
    ) -> Result<InsertOutcome, StoreError> {
        // Held across the disk write: readers never see an uncommitted code.
        let mut state = self.state.write().await;
        if let Some(existing) = state.by_fingerprint.get(&fingerprint) {
            return Ok(InsertOutcome::FingerprintTaken(existing.clone()));
        }
        if state.by_code.contains_key(code) {
            return Ok(InsertOutcome::CodeTaken);
        }

        let key = fingerprint.to_hex();
        state.entries.insert(
            key.clone(),
            StoredEntry::Record {
                short_code: code.to_string(),
                created_at: Some(Utc::now()),
                extra: serde_json::Map::new(),
            },
        );
        if let Err(e) = self.persist(&state.entries).await {
            state.entries.remove(&key);
            return Err(e);
        }
        state.by_fingerprint.insert(fingerprint, code.clone());
        state.by_code.insert(code.clone(), fingerprint);
        Ok(InsertOutcome::Inserted)
    }

    async fn code_for(&self, fingerprint: &Fingerprint) -> Result<Option<ShortCode>, StoreError> {
        Ok(self.state.read().await.by_fingerprint.get(fingerprint).cloned())
    }

    async fn fingerprint_for(&self, code: &ShortCode) -> Result<Option<Fingerprint>, StoreError> {
        Ok(self.state.read().await.by_code.get(code).copied())
    }
}
