//! Registry of published batch artifacts, looked up by download handlers.

pub mod handlers;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Spreadsheet,
    Bundle,
}

impl ArtifactKind {
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Spreadsheet => "Excel file",
            ArtifactKind::Bundle => "ZIP file",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
struct ArtifactEntry {
    path: PathBuf,
    kind: ArtifactKind,
    created_at: DateTime<Utc>,
}

/// A resolved, on-disk artifact ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub size: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("{kind} not found: {name}")]
    NotFound { name: String, kind: ArtifactKind },
    #[error("{kind} is no longer available: {name}")]
    Stale { name: String, kind: ArtifactKind },
}

/// Process-wide map from published filename to its location.
///
/// Shared through `AppState`; every operation takes the single lock for its
/// whole duration, so a `put` is never observed half-done.
pub struct ArtifactRegistry {
    root: PathBuf,
    ttl: Option<Duration>,
    entries: Mutex<HashMap<String, ArtifactEntry>>,
}

impl ArtifactRegistry {
    /// `ttl` of `None` keeps artifacts until the process exits.
    pub fn new(root: impl Into<PathBuf>, ttl: Option<Duration>) -> Self {
        Self {
            root: root.into(),
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Directory batches work in and publish to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn put(&self, name: &str, path: PathBuf, kind: ArtifactKind) {
        debug!("Registering {} '{}' at {}", kind.label(), name, path.display());
        self.entries.lock().insert(
            name.to_string(),
            ArtifactEntry {
                path,
                kind,
                created_at: Utc::now(),
            },
        );
    }

    /// Resolve `name` to an existing, non-empty file of the given kind.
    ///
    /// Exact names are tried first. Bundles additionally accept any part of
    /// a registered bundle name, preferring the newest match. An entry whose
    /// file has vanished or is empty is dropped and reported as stale.
    pub fn get(&self, name: &str, kind: ArtifactKind) -> Result<Artifact, ArtifactError> {
        let mut entries = self.entries.lock();

        let resolved = match entries.get(name) {
            Some(entry) if entry.kind == kind => Some(name.to_string()),
            _ if kind == ArtifactKind::Bundle && !name.is_empty() => entries
                .iter()
                .filter(|(key, entry)| entry.kind == kind && key.contains(name))
                .max_by_key(|(_, entry)| entry.created_at)
                .map(|(key, _)| key.clone()),
            _ => None,
        };

        let key = resolved.ok_or_else(|| ArtifactError::NotFound {
            name: name.to_string(),
            kind,
        })?;
        let entry = entries
            .get(&key)
            .cloned()
            .ok_or_else(|| ArtifactError::NotFound {
                name: key.clone(),
                kind,
            })?;

        match fs::metadata(&entry.path) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(Artifact {
                name: key,
                path: entry.path,
                kind,
                size: meta.len(),
            }),
            _ => {
                warn!("Dropping stale {} '{}' ({})", kind.label(), key, entry.path.display());
                entries.remove(&key);
                Err(ArtifactError::Stale { name: key, kind })
            }
        }
    }

    /// Remove entries older than the TTL and delete their files.
    /// Returns how many entries were evicted.
    pub fn sweep_expired(&self) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let cutoff = Utc::now() - ttl;

        let expired: Vec<(String, PathBuf)> = {
            let mut entries = self.entries.lock();
            let names: Vec<String> = entries
                .iter()
                .filter(|(_, entry)| entry.created_at <= cutoff)
                .map(|(name, _)| name.clone())
                .collect();
            names
                .into_iter()
                .filter_map(|name| entries.remove(&name).map(|entry| (name, entry.path)))
                .collect()
        };

        for (name, path) in &expired {
            match fs::remove_file(path) {
                Ok(()) => debug!("Deleted expired artifact '{}'", name),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to delete expired artifact '{}': {}", name, e),
            }
        }

        if !expired.is_empty() {
            info!("Evicted {} expired artifact(s)", expired.len());
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_exact_lookup_respects_kind() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ArtifactRegistry::new(dir.path(), None);
        let path = write(dir.path(), "report.xlsx", b"xlsx");
        registry.put("report.xlsx", path.clone(), ArtifactKind::Spreadsheet);

        let found = registry.get("report.xlsx", ArtifactKind::Spreadsheet).unwrap();
        assert_eq!(found.path, path);
        assert_eq!(found.size, 4);

        assert!(matches!(
            registry.get("report.xlsx", ArtifactKind::Bundle),
            Err(ArtifactError::NotFound { .. })
        ));
    }

    #[test]
    fn test_spreadsheet_has_no_alias_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ArtifactRegistry::new(dir.path(), None);
        let path = write(dir.path(), "Hasil_Ekstraksi_SKTT.xlsx", b"x");
        registry.put("Hasil_Ekstraksi_SKTT.xlsx", path, ArtifactKind::Spreadsheet);

        assert!(registry.get("Hasil_Ekstraksi", ArtifactKind::Spreadsheet).is_err());
    }

    #[test]
    fn test_missing_file_is_evicted() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ArtifactRegistry::new(dir.path(), None);
        registry.put("gone.zip", dir.path().join("gone.zip"), ArtifactKind::Bundle);

        assert_eq!(
            registry.get("gone.zip", ArtifactKind::Bundle),
            Err(ArtifactError::Stale {
                name: "gone.zip".to_string(),
                kind: ArtifactKind::Bundle
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sweep_without_ttl_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ArtifactRegistry::new(dir.path(), None);
        let path = write(dir.path(), "a.zip", b"zip");
        registry.put("a.zip", path.clone(), ArtifactKind::Bundle);

        assert_eq!(registry.sweep_expired(), 0);
        assert_eq!(registry.len(), 1);
        assert!(path.exists());
    }

    #[test]
    fn test_sweep_with_zero_age_evicts_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ArtifactRegistry::new(dir.path(), Some(Duration::ZERO));
        let path = write(dir.path(), "a.zip", b"zip");
        registry.put("a.zip", path.clone(), ArtifactKind::Bundle);

        assert_eq!(registry.sweep_expired(), 1);
        assert!(registry.is_empty());
        assert!(!path.exists());
    }
}
