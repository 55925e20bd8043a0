use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// One session cookie-equivalent, scoped to a domain.
///
/// Immutable once issued; a later import for the same domain replaces the
/// whole set, never merges per-credential. Field names follow the persisted
/// JSON document exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Epoch seconds; `None` means session-lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    #[serde(default)]
    pub secure: bool,
    #[serde(rename = "httpOnly", default)]
    pub http_only: bool,
}

/// Serialize credentials into a single `Cookie` header value:
/// `name=value` pairs joined by `"; "`, storage order preserved.
/// Empty input yields `None` (no header), not an empty header.
pub fn cookie_header(credentials: &[Credential]) -> Option<String> {
    if credentials.is_empty() {
        return None;
    }
    Some(
        credentials
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Durable domain → credential-set mapping backed by one JSON document.
///
/// Loaded once at process start; every mutation rewrites the full document
/// before returning, so a crash after a successful `put` or `clear` cannot
/// lose the write. One gateway process owns the file; in-process writers
/// serialize through the mutex.
pub struct CredentialStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, Vec<Credential>>>,
}

impl CredentialStore {
    /// Load the persisted document. A missing file is an empty store; a
    /// present-but-unparsable file is a `StorageError` so the caller can
    /// decide between degrading and aborting.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents).map_err(|error| StorageError::Malformed {
                path: path.display().to_string(),
                message: error.to_string(),
            })?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Load, degrading a corrupt document to an empty store with a logged
    /// warning. The server boot path uses this; explicit cookie commands
    /// use `load` and surface the error instead.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(store) => store,
            Err(error) => {
                tracing::warn!(
                    store = %path.display(),
                    %error,
                    "credential store unreadable; starting with an empty store"
                );
                Self {
                    path,
                    entries: Mutex::new(HashMap::new()),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Credentials for a domain (exact, case-sensitive key). Absent domains
    /// yield an empty vec; this never fails.
    pub async fn get(&self, domain: &str) -> Vec<Credential> {
        self.entries
            .lock()
            .await
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the domain's entire credential set and persist the full
    /// document before returning.
    pub async fn put(
        &self,
        domain: &str,
        credentials: Vec<Credential>,
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        entries.insert(domain.to_string(), credentials);
        Self::persist(&self.path, &entries)
    }

    /// Remove one domain's entries, or empty the whole store when no domain
    /// is given. Persists before returning.
    pub async fn clear(&self, domain: Option<&str>) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        match domain {
            Some(domain) => {
                entries.remove(domain);
            }
            None => entries.clear(),
        }
        Self::persist(&self.path, &entries)
    }

    /// All stored domains with their credential counts, for `cookies list`.
    pub async fn summary(&self) -> Vec<(String, usize)> {
        let entries = self.entries.lock().await;
        let mut summary: Vec<_> = entries
            .iter()
            .map(|(domain, creds)| (domain.clone(), creds.len()))
            .collect();
        summary.sort();
        summary
    }

    fn persist(
        path: &Path,
        entries: &HashMap<String, Vec<Credential>>,
    ) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let document = serde_json::to_string_pretty(entries).map_err(|error| {
            StorageError::Malformed {
                path: path.display().to_string(),
                message: error.to_string(),
            }
        })?;
        fs::write(path, document)?;
        Ok(())
    }
}
