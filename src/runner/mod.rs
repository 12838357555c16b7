//! Run orchestration.
//!
//! One [`Runner::run`] call is one full polling cycle: every configured
//! site is probed in order, history and incidents are brought up to
//! date, and the summary artifacts are rewritten for the status page.

mod lock;

pub use lock::*;

use std::collections::BTreeMap;
use std::fs;

use chrono::Utc;
use thiserror::Error;

use crate::config::{Config, Settings};
use crate::incident::IncidentEngine;
use crate::metrics;
use crate::probe;
use crate::store::{
    CombinedHistory, HistoryEntry, HistoryStore, ServiceSummary, Status, StoreError, Summary,
    RECENT_WINDOW,
};

/// Name of the summary artifact under the API directory.
const SUMMARY_FILE: &str = "status.json";

/// Name of the combined-view artifact under the history directory.
const COMBINED_FILE: &str = "history.json";

/// Run error types.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("another run is already in progress")]
    Overlapping,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Drives one polling cycle across all configured sites.
pub struct Runner {
    settings: Settings,
    config: Config,
    history: HistoryStore,
    engine: IncidentEngine,
}

impl Runner {
    /// Create a runner over explicit configuration and stores.
    pub fn new(
        settings: Settings,
        config: Config,
        history: HistoryStore,
        engine: IncidentEngine,
    ) -> Self {
        Self {
            settings,
            config,
            history,
            engine,
        }
    }

    /// Execute one cycle and return the summary handed to the
    /// presentation layer.
    ///
    /// Sites are checked sequentially in config order. Check failures
    /// fold into the normal pipeline as `down` results; a write failure
    /// aborts the run.
    pub async fn run(mut self) -> Result<Summary, RunError> {
        let mut run_lock = RunLock::open(&self.settings.lock_path)?;
        let _guard = run_lock.try_acquire()?;

        let client = probe::build_client()?;

        let mut summary = Summary {
            last_updated: Utc::now(),
            overall: Status::Up,
            services: Vec::new(),
        };

        for site in &self.config.sites {
            let key = site.storage_key();
            let previous = self.history.latest_status(&key);

            let result = probe::check_endpoint(&client, site).await;
            let history = self.history.append(&key, HistoryEntry::from(&result))?;

            let uptime = metrics::uptime(&history);
            let avg_response_time = metrics::avg_response_time(&history);

            self.engine.handle_transition(
                &site.name,
                result.status,
                previous,
                result.response_time,
                result.timestamp,
            )?;

            tracing::info!(
                "{}: {} ({}ms, code {})",
                site.name,
                result.status,
                result.response_time,
                result.code
            );

            summary.services.push(ServiceSummary {
                name: site.name.clone(),
                url: site.url.clone(),
                status: result.status,
                code: result.code,
                response_time: result.response_time,
                uptime,
                avg_response_time,
            });
        }

        summary.overall = overall_status(&summary.services);

        self.write_summary(&summary)?;
        self.write_combined_history()?;

        Ok(summary)
    }

    /// Overwrite the summary artifact for this cycle.
    fn write_summary(&self, summary: &Summary) -> Result<(), RunError> {
        fs::create_dir_all(&self.settings.api_dir)?;
        let raw = serde_json::to_string_pretty(summary).map_err(StoreError::from)?;
        fs::write(self.settings.api_dir.join(SUMMARY_FILE), raw)?;
        Ok(())
    }

    /// Regenerate the combined view: the recent window per site key plus
    /// the full incident list.
    fn write_combined_history(&self) -> Result<(), RunError> {
        let mut services = BTreeMap::new();
        for site in &self.config.sites {
            let key = site.storage_key();
            let window = self.history.recent_window(&key, RECENT_WINDOW);
            services.insert(key, window);
        }

        let combined = CombinedHistory {
            services,
            incidents: self.engine.incidents().to_vec(),
        };
        let raw = serde_json::to_string_pretty(&combined).map_err(StoreError::from)?;
        fs::write(self.settings.history_dir.join(COMBINED_FILE), raw)?;
        Ok(())
    }
}

/// Overall status across all sites: `up` when everything is up, `down`
/// when at least one site exists and none is up, `degraded` in between.
/// No sites counts as up.
pub fn overall_status(services: &[ServiceSummary]) -> Status {
    if services.iter().all(|s| s.status == Status::Up) {
        Status::Up
    } else if services.iter().all(|s| s.status != Status::Up) {
        Status::Down
    } else {
        Status::Degraded
    }
}
