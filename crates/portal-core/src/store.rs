use crate::incident::Incident;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to serialize incidents: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store lock poisoned")]
    Poisoned,
}

/// Durable home of the full incident collection.
///
/// Reads are fail-soft: whatever cannot be loaded is treated as an empty
/// collection. Writes replace the whole collection and report failure.
pub trait IncidentStore: Send + Sync {
    fn load(&self) -> Vec<Incident>;

    fn save(&self, incidents: &[Incident]) -> Result<(), StoreError>;
}

/// One pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store at `path`, writing an empty array if nothing exists yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };

        // Create parent directory if needed
        if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| store.write_error(source))?;
        }

        if !store.path.exists() {
            store.save(&[])?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl IncidentStore for JsonFileStore {
    fn load(&self) -> Vec<Incident> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Error reading incidents from {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(incidents) => incidents,
            Err(e) => {
                tracing::warn!("Error parsing incidents from {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    fn save(&self, incidents: &[Incident]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(incidents)?;

        // Write beside the target and rename, so readers never see half a file
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|source| self.write_error(source))?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            self.write_error(source)
        })
    }
}

/// Keeps the collection in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    incidents: RwLock<Vec<Incident>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IncidentStore for MemoryStore {
    fn load(&self) -> Vec<Incident> {
        self.incidents
            .read()
            .map(|incidents| incidents.clone())
            .unwrap_or_default()
    }

    fn save(&self, incidents: &[Incident]) -> Result<(), StoreError> {
        let mut guard = self.incidents.write().map_err(|_| StoreError::Poisoned)?;
        *guard = incidents.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::IncidentClock;
    use crate::incident::Submission;
    use tempfile::tempdir;

    fn incident(clock: &IncidentClock, title: &str) -> Incident {
        let stamp = clock.next();
        Submission {
            title: Some(title.to_string()),
            incident_type: Some("Emergency".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap()
        .into_incident(stamp.id, stamp.created_at, None)
    }

    #[test]
    fn test_open_initializes_empty_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("incidents.json");
        let store = JsonFileStore::open(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_open_keeps_existing_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("incidents.json");
        let clock = IncidentClock::new();
        let first = JsonFileStore::open(&path).unwrap();
        first.save(&[incident(&clock, "kept")]).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        let loaded = reopened.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "kept");
    }

    #[test]
    fn test_save_replaces_whole_collection() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("incidents.json")).unwrap();
        let clock = IncidentClock::new();
        let (a, b) = (incident(&clock, "a"), incident(&clock, "b"));

        store.save(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(store.load(), vec![a.clone(), b]);

        store.save(&[a.clone()]).unwrap();
        assert_eq!(store.load(), vec![a]);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("incidents.json");
        let store = JsonFileStore::open(&path).unwrap();

        fs::write(&path, "{ not json").unwrap();
        assert!(store.load().is_empty());

        fs::remove_file(&path).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_failure_propagates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("incidents.json");
        let store = JsonFileStore::open(&path).unwrap();

        // A directory where the temp file should go makes the write fail
        fs::create_dir(store.temp_path()).unwrap();
        let err = store.save(&[]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        let clock = IncidentClock::new();
        assert!(store.load().is_empty());

        let a = incident(&clock, "a");
        store.save(&[a.clone()]).unwrap();
        assert_eq!(store.load(), vec![a]);
    }
}
