//! # Rollcall Reports
//!
//! Attendance exports in CSV, JSON and Markdown.
//!
//! ## Exporters
//!
//! - [`CsvExporter`] - CSV via the `csv` crate
//! - [`JsonExporter`] - pretty-printed JSON
//! - [`MarkdownExporter`] - Markdown tables for documentation
//!
//! ## Reports
//!
//! - [`AttendanceReport`] - check-in rows for a filter
//! - [`SummaryReport`] - present/absent counts for one scope
//!
//! ## Example
//!
//! ```rust,ignore
//! use rollcall_reports::{AttendanceReport, ExportFormat};
//!
//! let report = AttendanceReport::from_records("Attendance", &records);
//! let exporter = ExportFormat::parse("md").exporter();
//! let output = exporter.export(&report);
//! ```

pub mod attendance_report;
pub mod exporters;

pub use attendance_report::{AttendanceReport, AttendanceRow, SummaryReport};
pub use exporters::{
    CsvExporter, ExportFormat, JsonExporter, MarkdownExporter, ReportData, ReportExporter,
};
