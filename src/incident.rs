//! Automatic incident lifecycle management.
//!
//! Incidents are opened, updated, and resolved purely from check
//! outcomes; there is no manual editing path. At most one active
//! incident exists per service, enforced by a lookup before creation.

use chrono::{DateTime, Duration, Utc};

use crate::config::storage_key;
use crate::store::{
    Incident, IncidentStatus, IncidentStore, IncidentUpdate, Severity, Status, StoreError,
};

/// Maximum incidents kept in the global list.
pub const MAX_INCIDENTS: usize = 50;

/// Minimum gap between periodic updates on an ongoing incident.
const REUPDATE_AFTER_MINUTES: i64 = 30;

/// State machine driving incident records from status transitions.
///
/// Owns the global incident list, newest first; every mutation is
/// persisted immediately.
pub struct IncidentEngine {
    store: IncidentStore,
    incidents: Vec<Incident>,
}

impl IncidentEngine {
    /// Create an engine over the given store, loading the current list.
    pub fn new(store: IncidentStore) -> Self {
        let incidents = store.load_or_default();
        Self { store, incidents }
    }

    /// The current incident list, newest first.
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Apply one check outcome for a service and persist the result.
    ///
    /// `now` is the capture instant of the check driving the transition.
    pub fn handle_transition(
        &mut self,
        service: &str,
        current: Status,
        previous: Status,
        response_time: u64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        // First match in list order wins if the at-most-one-active
        // invariant was ever violated externally.
        let active = self
            .incidents
            .iter()
            .position(|i| i.service == service && i.is_active());

        match current {
            Status::Down if previous == Status::Up && active.is_none() => {
                let incident = new_incident(service, now);
                tracing::info!("IncidentEngine: opened {} for {}", incident.id, service);
                self.incidents.insert(0, incident);
            }
            Status::Down => {
                if let Some(idx) = active {
                    let incident = &mut self.incidents[idx];
                    if now - last_update_time(incident) > Duration::minutes(REUPDATE_AFTER_MINUTES) {
                        incident.updates.push(IncidentUpdate {
                            timestamp: now,
                            status: IncidentStatus::Monitoring,
                            message: format!("Still monitoring. Response time: {}ms", response_time),
                        });
                        incident.status = IncidentStatus::Monitoring;
                    }
                }
            }
            Status::Up => {
                if let Some(idx) = active {
                    let incident = &mut self.incidents[idx];
                    incident.status = IncidentStatus::Resolved;
                    incident.resolved_at = Some(now);
                    incident.updates.push(IncidentUpdate {
                        timestamp: now,
                        status: IncidentStatus::Resolved,
                        message: format!("{} is back online and operating normally.", service),
                    });
                    tracing::info!("IncidentEngine: resolved {} for {}", incident.id, service);
                }
            }
            // Checks never produce this value; nothing to drive.
            Status::Degraded => {}
        }

        self.incidents.truncate(MAX_INCIDENTS);
        self.store.save(&self.incidents)
    }
}

/// Build a fresh incident for a service that just went down.
fn new_incident(service: &str, now: DateTime<Utc>) -> Incident {
    Incident {
        id: format!("inc-{}-{}", now.timestamp_millis(), storage_key(service)),
        title: format!("{} is experiencing issues", service),
        service: service.to_string(),
        status: IncidentStatus::Investigating,
        severity: Severity::Major,
        created_at: now,
        resolved_at: None,
        updates: vec![IncidentUpdate {
            timestamp: now,
            status: IncidentStatus::Investigating,
            message: format!(
                "{} is not responding as expected. Our team is investigating.",
                service
            ),
        }],
    }
}

/// Timestamp of the incident's most recent update, falling back to its
/// creation time.
fn last_update_time(incident: &Incident) -> DateTime<Utc> {
    incident
        .updates
        .last()
        .map(|u| u.timestamp)
        .unwrap_or(incident.created_at)
}
