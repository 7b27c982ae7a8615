pub mod queries;
pub mod sqlite;

use crate::intake::{IntakeError, ReportDraft};
use crate::model::Report;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

pub use sqlite::SqliteSlot;

/// One durable key-value entry holding the serialized report sequence.
pub trait ReportSlot {
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, value: &str) -> Result<()>;
}

/// In-memory report sequence mirrored into a [`ReportSlot`].
///
/// Reports are kept newest-first by insertion. Storage is best effort: read
/// failures load as an empty sequence and write failures are logged, never
/// returned.
pub struct ReportStore<S = SqliteSlot> {
    slot: S,
    reports: Vec<Report>,
}

impl<S: ReportSlot> ReportStore<S> {
    pub fn load(slot: S) -> Self {
        let reports = match slot.read() {
            Ok(Some(raw)) => parse_reports(&raw),
            Ok(None) => {
                debug!("no stored reports found");
                Vec::new()
            }
            Err(error) => {
                warn!(error = %error, "failed to read stored reports, starting empty");
                Vec::new()
            }
        };

        info!(count = reports.len(), "report store loaded");
        Self { slot, reports }
    }

    /// Prepends `report` and persists the whole sequence.
    pub fn append(&mut self, report: Report) -> &Report {
        info!(id = %report.id, "check-in recorded");
        self.reports.insert(0, report);
        self.persist();
        &self.reports[0]
    }

    /// Validates a draft and appends the resulting report.
    ///
    /// A rejected draft leaves the sequence untouched.
    pub fn submit(
        &mut self,
        draft: &ReportDraft,
        now: DateTime<Utc>,
    ) -> Result<&Report, IntakeError> {
        let report = draft.validate()?.into_report(now);
        Ok(self.append(report))
    }

    pub fn snapshot(&self) -> &[Report] {
        &self.reports
    }

    pub fn recent(&self, limit: usize) -> &[Report] {
        &self.reports[..limit.min(self.reports.len())]
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    fn persist(&self) {
        let written = serde_json::to_string(&self.reports)
            .context("Failed to serialize reports")
            .and_then(|payload| self.slot.write(&payload));

        if let Err(error) = written {
            warn!(
                error = %error,
                count = self.reports.len(),
                "failed to persist reports, write skipped"
            );
        }
    }
}

fn parse_reports(raw: &str) -> Vec<Report> {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("stored reports are not a JSON array, starting empty");
            return Vec::new();
        }
        Err(error) => {
            warn!(error = %error, "stored reports are malformed, starting empty");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value::<Report>(entry)
                .map_err(|error| {
                    warn!(index, error = %error, "skipping unreadable stored report");
                })
                .ok()
        })
        .collect()
}
