//! Roster CSV reader/writer
//!
//! Accepted header layouts (case-insensitive, whitespace trimmed):
//!
//! - `Name`, `Student ID`
//! - `first_name`, `last_name`, `student_id` (name is joined with a space)
//! - fallback: `name` / `full_name` and `student_id` / `id`
//!
//! A `MAC`, `MAC Address` or `mac_address` column supplies the secondary token.
//! Rows missing a name or an identifier are skipped.

use rollcall_core::Participant;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

const ID_HEADERS: [&str; 3] = ["student id", "student_id", "studentid"];
const FIRST_NAME_HEADERS: [&str; 2] = ["first_name", "first name"];
const LAST_NAME_HEADERS: [&str; 2] = ["last_name", "last name"];
const FALLBACK_NAME_HEADERS: [&str; 3] = ["name", "full_name", "full name"];
const FALLBACK_ID_HEADERS: [&str; 4] = ["student_id", "student id", "studentid", "id"];
const TOKEN_HEADERS: [&str; 3] = ["mac", "mac address", "mac_address"];

#[derive(Debug, Error)]
pub enum RosterFileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    NameAndId { name: usize, id: usize },
    FirstLast { first: usize, last: usize, id: usize },
    Fallback { name: Option<usize>, id: Option<usize> },
}

struct Columns {
    layout: Layout,
    token: Option<usize>,
}

fn normalize(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn position(headers: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|c| headers.iter().position(|h| h == c))
}

fn detect_columns(headers: &[String]) -> Columns {
    let id = position(headers, &ID_HEADERS);
    let name = position(headers, &["name"]);
    let first = position(headers, &FIRST_NAME_HEADERS);
    let last = position(headers, &LAST_NAME_HEADERS);

    let layout = match (name, first, last, id) {
        (Some(name), _, _, Some(id)) => Layout::NameAndId { name, id },
        (None, Some(first), Some(last), Some(id)) => Layout::FirstLast { first, last, id },
        _ => Layout::Fallback {
            name: position(headers, &FALLBACK_NAME_HEADERS),
            id: position(headers, &FALLBACK_ID_HEADERS),
        },
    };
    let token = position(headers, &TOKEN_HEADERS);

    Columns { layout, token }
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim()
}

/// Parse roster CSV from any reader
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<Participant>, RosterFileError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(normalize).collect();
    let columns = detect_columns(&headers);

    let mut participants = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let (name, id) = match columns.layout {
            Layout::NameAndId { name, id } => (
                field(&record, Some(name)).to_string(),
                field(&record, Some(id)),
            ),
            Layout::FirstLast { first, last, id } => (
                format!("{} {}", field(&record, Some(first)), field(&record, Some(last)))
                    .trim()
                    .to_string(),
                field(&record, Some(id)),
            ),
            Layout::Fallback { name, id } => {
                (field(&record, name).to_string(), field(&record, id))
            }
        };

        if name.is_empty() || id.is_empty() {
            continue;
        }
        participants
            .push(Participant::new(id, &name).with_token(field(&record, columns.token)));
    }

    Ok(participants)
}

/// Load the roster file; a missing file is an empty roster.
pub fn load_roster_file(path: &Path) -> Result<Vec<Participant>, RosterFileError> {
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "roster file not found; check-ins will be rejected until a roster is loaded"
        );
        return Ok(Vec::new());
    }

    let participants = parse_roster(File::open(path)?)?;
    tracing::info!(path = %path.display(), participants = participants.len(), "roster file loaded");
    Ok(participants)
}

/// Write the roster as `Name,Student ID,MAC`, replacing the file
pub fn write_roster_file(path: &Path, participants: &[Participant]) -> Result<(), RosterFileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Name", "Student ID", "MAC"])?;
    for p in participants {
        writer.write_record([p.display_name.as_str(), p.id.as_str(), p.token_or_empty()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_name_and_id_layout() {
        let csv = "Name,Student ID,MAC Address\nAnn Lee,S1,aa:bb\nBob Tran,S2,\n";
        let roster = parse_roster(csv.as_bytes()).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0], Participant::new("S1", "Ann Lee").with_token("aa:bb"));
        assert_eq!(roster[1].secondary_token, None);
    }

    #[test]
    fn test_token_column_needs_exact_header() {
        let csv = "Name,Student ID,Machine\nAnn Lee,S1,lab-3\n";
        let roster = parse_roster(csv.as_bytes()).unwrap();
        assert_eq!(roster[0].secondary_token, None);

        let csv = "Machine,name,id,mac_address\nlab-3,Ann Lee,S1,AA:BB\n";
        let roster = parse_roster(csv.as_bytes()).unwrap();
        assert_eq!(roster[0].secondary_token.as_deref(), Some("AA:BB"));
    }

    #[test]
    fn test_first_last_layout() {
        let csv = "student_id,first_name,last_name\nS1,Ann,Lee\nS2,Bob,\n";
        let roster = parse_roster(csv.as_bytes()).unwrap();

        assert_eq!(roster[0].display_name, "Ann Lee");
        assert_eq!(roster[1].display_name, "Bob");
    }

    #[test]
    fn test_fallback_layout_and_header_noise() {
        let csv = "\u{feff} Full_Name , ID \nAnn Lee,S1\n,S2\nCara Vu,\n";
        let roster = parse_roster(csv.as_bytes()).unwrap();

        assert_eq!(roster, vec![Participant::new("S1", "Ann Lee")]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let roster = load_roster_file(&dir.path().join("missing.csv")).unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("roster.csv");
        let participants = vec![
            Participant::new("S1", "Lee, Ann").with_token("AA:BB"),
            Participant::new("S2", "Bob Tran"),
        ];

        write_roster_file(&path, &participants).unwrap();
        assert_eq!(load_roster_file(&path).unwrap(), participants);
    }
}
