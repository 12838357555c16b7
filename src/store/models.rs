//! Persisted record types.
//!
//! All fields serialize in camelCase so the artifacts match what the
//! status page frontend consumes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health of a service.
///
/// Individual checks only ever report `up` or `down`; `degraded` exists
/// for the overall status of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Up,
    Down,
    Degraded,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Up => write!(f, "up"),
            Status::Down => write!(f, "down"),
            Status::Degraded => write!(f, "degraded"),
        }
    }
}

/// Outcome of checking a single site once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub name: String,
    pub url: String,
    pub status: Status,
    /// HTTP status code, or 0 when the request never produced a response.
    pub code: u16,
    /// Elapsed milliseconds; the full timeout value for timed-out checks.
    pub response_time: u64,
    pub timestamp: DateTime<Utc>,
}

/// The persisted projection of a check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub status: Status,
    pub code: u16,
    pub response_time: u64,
}

impl From<&CheckResult> for HistoryEntry {
    fn from(result: &CheckResult) -> Self {
        Self {
            timestamp: result.timestamp,
            status: result.status,
            code: result.code,
            response_time: result.response_time,
        }
    }
}

/// Lifecycle state of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Investigating,
    Identified,
    Monitoring,
    Resolved,
}

/// Severity of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

/// A single update appended to an incident. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentUpdate {
    pub timestamp: DateTime<Utc>,
    pub status: IncidentStatus,
    pub message: String,
}

/// An automatically managed incident record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub title: String,
    /// Name of the site this incident belongs to.
    pub service: String,
    pub status: IncidentStatus,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub updates: Vec<IncidentUpdate>,
}

impl Incident {
    /// Whether this incident is still open.
    pub fn is_active(&self) -> bool {
        self.status != IncidentStatus::Resolved
    }
}

/// Per-site entry in the cycle summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub name: String,
    pub url: String,
    pub status: Status,
    pub code: u16,
    pub response_time: u64,
    pub uptime: f64,
    pub avg_response_time: u64,
}

/// Aggregate produced by one run over all sites. Fully rewritten each
/// cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub last_updated: DateTime<Utc>,
    pub overall: Status,
    pub services: Vec<ServiceSummary>,
}

/// Denormalized view consumed by the status page: recent history per site
/// key plus the full incident list.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedHistory {
    #[serde(flatten)]
    pub services: BTreeMap<String, Vec<HistoryEntry>>,
    pub incidents: Vec<Incident>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&Status::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&Status::Degraded).unwrap(), "\"degraded\"");

        let status: Status = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(status, Status::Down);
    }

    #[test]
    fn test_history_entry_camel_case() {
        let entry = HistoryEntry {
            timestamp: Utc::now(),
            status: Status::Up,
            code: 200,
            response_time: 45,
        };
        let raw = serde_json::to_string(&entry).unwrap();
        assert!(raw.contains("\"responseTime\":45"));
        assert!(!raw.contains("response_time"));
    }

    #[test]
    fn test_incident_resolved_at_omitted_while_open() {
        let incident = Incident {
            id: "inc-1".to_string(),
            title: "API is experiencing issues".to_string(),
            service: "API".to_string(),
            status: IncidentStatus::Investigating,
            severity: Severity::Major,
            created_at: Utc::now(),
            resolved_at: None,
            updates: Vec::new(),
        };
        let raw = serde_json::to_string(&incident).unwrap();
        assert!(!raw.contains("resolvedAt"));
        assert!(raw.contains("\"createdAt\""));

        let parsed: Incident = serde_json::from_str(&raw).unwrap();
        assert!(parsed.is_active());
        assert!(parsed.resolved_at.is_none());
    }
}
