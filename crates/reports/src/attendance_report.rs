//! Attendance and summary report data

use crate::exporters::ReportData;
use chrono::{Local, NaiveDateTime};
use rollcall_attendance::AttendanceSummary;
use rollcall_core::{format_timestamp, AttendanceRecord};
use std::collections::HashSet;

/// One exported check-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    pub participant_id: String,
    pub display_name: String,
    pub secondary_token: String,
    pub timestamp: String,
    /// Empty for day-scoped records
    pub session_id: String,
}

impl From<&AttendanceRecord> for AttendanceRow {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            participant_id: record.participant_id.clone(),
            display_name: record.display_name.clone(),
            secondary_token: record.secondary_token.clone(),
            timestamp: format_timestamp(&record.recorded_at),
            session_id: record
                .scope_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Check-in rows for an attendance filter
#[derive(Debug, Clone)]
pub struct AttendanceReport {
    pub title: String,
    pub rows: Vec<AttendanceRow>,
    pub generated_at: NaiveDateTime,
}

impl AttendanceReport {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
            generated_at: Local::now().naive_local(),
        }
    }

    pub fn from_records(title: &str, records: &[AttendanceRecord]) -> Self {
        let mut report = Self::new(title);
        report.rows = records.iter().map(AttendanceRow::from).collect();
        report
    }

    pub fn with_generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = at;
        self
    }

    pub fn distinct_participants(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.participant_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

impl ReportData for AttendanceReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        ["Student ID", "Name", "MAC", "Timestamp", "Session ID"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.participant_id.clone(),
                    r.display_name.clone(),
                    r.secondary_token.clone(),
                    r.timestamp.clone(),
                    r.session_id.clone(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Total Records".to_string(), self.rows.len().to_string()),
            (
                "Distinct Participants".to_string(),
                self.distinct_participants().to_string(),
            ),
            (
                "Generated At".to_string(),
                format_timestamp(&self.generated_at),
            ),
        ]
    }
}

/// Present/absent counts for one scope, as a two-column table
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub title: String,
    pub summary: AttendanceSummary,
}

impl SummaryReport {
    pub fn new(summary: AttendanceSummary) -> Self {
        let title = match (summary.session_id, summary.date) {
            (Some(id), _) => format!("Attendance Summary - Session {}", id),
            (None, Some(date)) => format!("Attendance Summary - {}", date.format("%Y-%m-%d")),
            (None, None) => "Attendance Summary".to_string(),
        };
        Self { title, summary }
    }
}

impl ReportData for SummaryReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        vec!["Metric".to_string(), "Value".to_string()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let s = &self.summary;
        [
            ("Total Participants", s.total_participants),
            ("Present", s.present),
            ("Present On Roster", s.present_on_roster),
            ("Absent", s.absent),
            ("Present Not On Roster", s.unrostered_present),
        ]
        .iter()
        .map(|(k, v)| vec![k.to_string(), v.to_string()])
        .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("Scope".to_string(), self.summary.scope.to_string())];
        if let Some(id) = self.summary.session_id {
            pairs.push(("Session".to_string(), id.to_string()));
        }
        if let Some(date) = self.summary.date {
            pairs.push(("Date".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}
