//! Per-site history files.
//!
//! Each site's checks live as a JSON array in their own file under the
//! history directory, keyed by the sanitized site name. Sequences are
//! append-only and chronologically ordered; the oldest entries are
//! evicted once the retention cap is reached.

use std::fs;
use std::path::{Path, PathBuf};

use super::models::{HistoryEntry, Status};
use super::StoreError;

/// Maximum entries kept per site: 90 days at a 5-minute cadence.
pub const MAX_HISTORY_ENTRIES: usize = 12 * 24 * 90;

/// Entries exposed to the chart view: 24 hours at a 5-minute cadence.
pub const RECENT_WINDOW: usize = 288;

/// Store for per-site check history.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    /// Create a store rooted at the given directory, creating it if
    /// needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Load a site's history.
    ///
    /// A missing file is an empty history; read and parse failures are
    /// reported to the caller.
    pub fn load(&self, key: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        let raw = match fs::read_to_string(self.file_path(key)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load a site's history, recovering unreadable data as empty.
    pub fn load_or_default(&self, key: &str) -> Vec<HistoryEntry> {
        match self.load(key) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("HistoryStore: starting {} fresh after read failure: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Append an entry to a site's history, evict past the retention cap,
    /// and persist the result.
    ///
    /// Returns the trimmed sequence for immediate metric calculations.
    pub fn append(&self, key: &str, entry: HistoryEntry) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut history = self.load_or_default(key);
        history.push(entry);
        evict(&mut history);
        self.save(key, &history)?;
        Ok(history)
    }

    /// Status of the most recent entry, or `up` when no usable history
    /// exists. A brand-new site is never treated as already down.
    pub fn latest_status(&self, key: &str) -> Status {
        self.load_or_default(key)
            .last()
            .map(|entry| entry.status)
            .unwrap_or(Status::Up)
    }

    /// The last `n` entries for a site, oldest first.
    pub fn recent_window(&self, key: &str, n: usize) -> Vec<HistoryEntry> {
        let history = self.load_or_default(key);
        let skip = history.len().saturating_sub(n);
        history.into_iter().skip(skip).collect()
    }

    fn save(&self, key: &str, history: &[HistoryEntry]) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(history)?;
        fs::write(self.file_path(key), raw)?;
        Ok(())
    }
}

/// Drop entries from the front until the sequence fits the retention cap.
fn evict(history: &mut Vec<HistoryEntry>) {
    if history.len() > MAX_HISTORY_ENTRIES {
        let excess = history.len() - MAX_HISTORY_ENTRIES;
        history.drain(..excess);
    }
}
