//! Incident record persistence.
//!
//! The global incident list is a single JSON file, newest first.

use std::fs;
use std::path::{Path, PathBuf};

use super::models::Incident;
use super::StoreError;

const INCIDENTS_FILE: &str = "incidents.json";

/// Store for the global incident list.
#[derive(Debug, Clone)]
pub struct IncidentStore {
    path: PathBuf,
}

impl IncidentStore {
    /// Create a store persisting to `incidents.json` under the given
    /// directory, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            path: dir.as_ref().join(INCIDENTS_FILE),
        })
    }

    /// Load the incident list.
    ///
    /// A missing file is an empty list; read and parse failures are
    /// reported to the caller.
    pub fn load(&self) -> Result<Vec<Incident>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load the incident list, recovering unreadable data as empty.
    pub fn load_or_default(&self) -> Vec<Incident> {
        match self.load() {
            Ok(incidents) => incidents,
            Err(e) => {
                tracing::warn!("IncidentStore: starting fresh after read failure: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist the incident list.
    pub fn save(&self, incidents: &[Incident]) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(incidents)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{IncidentStatus, Severity};
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = tempdir().unwrap();
        let store = IncidentStore::new(tmp.path()).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = tempdir().unwrap();
        let store = IncidentStore::new(tmp.path()).unwrap();

        let incidents = vec![Incident {
            id: "inc-1700000000000-api".to_string(),
            title: "API is experiencing issues".to_string(),
            service: "API".to_string(),
            status: IncidentStatus::Investigating,
            severity: Severity::Major,
            created_at: Utc::now(),
            resolved_at: None,
            updates: Vec::new(),
        }];
        store.save(&incidents).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].service, "API");
        assert_eq!(loaded[0].status, IncidentStatus::Investigating);
    }

    #[test]
    fn test_corrupt_file_recovers_as_empty() {
        let tmp = tempdir().unwrap();
        let store = IncidentStore::new(tmp.path()).unwrap();

        fs::write(tmp.path().join(INCIDENTS_FILE), "[{]").unwrap();
        assert!(store.load().is_err());
        assert!(store.load_or_default().is_empty());
    }
}
