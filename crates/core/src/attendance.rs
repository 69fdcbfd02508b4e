//! # Attendance Module
//!
//! Check-in records, the scope they are deduplicated under, and the outcome
//! handed back to callers of validation.

use crate::participant::Participant;
use crate::session::Session;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniqueness boundary for a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One record per participant per session
    Session(i64),
    /// One record per participant per calendar day, when no session is open
    Day(NaiveDate),
}

impl Scope {
    pub fn session_id(&self) -> Option<i64> {
        match self {
            Scope::Session(id) => Some(*id),
            Scope::Day(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scope::Session(_) => "session",
            Scope::Day(_) => "day",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Session(id) => write!(f, "session {}", id),
            Scope::Day(date) => write!(f, "day {}", date.format("%Y-%m-%d")),
        }
    }
}

/// Caller-facing scope, serialized as
/// `{"scope":"session","session":{..}}` or `{"scope":"day","date":"YYYY-MM-DD"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum ScopeDescriptor {
    Session { session: Session },
    Day { date: NaiveDate },
}

impl ScopeDescriptor {
    pub fn scope(&self) -> Scope {
        match self {
            ScopeDescriptor::Session { session } => Scope::Session(session.id),
            ScopeDescriptor::Day { date } => Scope::Day(*date),
        }
    }
}

/// A stored check-in. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub participant_id: String,
    pub display_name: String,
    /// Empty when neither caller nor roster supplied one
    pub secondary_token: String,
    pub recorded_at: NaiveDateTime,
    /// Session id, or `None` for a day-scoped record
    pub scope_id: Option<i64>,
}

impl AttendanceRecord {
    pub fn scope(&self) -> Scope {
        match self.scope_id {
            Some(id) => Scope::Session(id),
            None => Scope::Day(self.recorded_at.date()),
        }
    }
}

/// Insert payload for the attendance ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub participant_id: String,
    pub display_name: String,
    pub secondary_token: String,
    pub scope: Scope,
    pub recorded_at: NaiveDateTime,
}

impl NewAttendance {
    /// Build from a roster match. The caller's token wins over the stored one.
    pub fn for_participant(
        participant: &Participant,
        supplied_token: Option<&str>,
        scope: Scope,
        recorded_at: NaiveDateTime,
    ) -> Self {
        let token = supplied_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| participant.token_or_empty());
        Self {
            participant_id: participant.id.clone(),
            display_name: participant.display_name.clone(),
            secondary_token: token.to_string(),
            scope,
            recorded_at,
        }
    }
}

/// Why a validated check-in was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotLoggedReason {
    AlreadyLoggedToday,
    AlreadyLoggedInSession,
}

impl NotLoggedReason {
    pub fn for_scope(scope: &Scope) -> Self {
        match scope {
            Scope::Session(_) => NotLoggedReason::AlreadyLoggedInSession,
            Scope::Day(_) => NotLoggedReason::AlreadyLoggedToday,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotLoggedReason::AlreadyLoggedToday => "already_logged_today",
            NotLoggedReason::AlreadyLoggedInSession => "already_logged_in_session",
        }
    }
}

impl fmt::Display for NotLoggedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a check-in against a resolved participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIn {
    pub participant: Participant,
    pub logged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NotLoggedReason>,
    #[serde(flatten)]
    pub scope: ScopeDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
}

impl CheckIn {
    pub fn logged(participant: Participant, scope: ScopeDescriptor, at: NaiveDateTime) -> Self {
        Self {
            participant,
            logged: true,
            reason: None,
            scope,
            timestamp: Some(at),
        }
    }

    pub fn duplicate(participant: Participant, scope: ScopeDescriptor) -> Self {
        let reason = NotLoggedReason::for_scope(&scope.scope());
        Self {
            participant,
            logged: false,
            reason: Some(reason),
            scope,
            timestamp: None,
        }
    }
}

/// Outcome of `validate`. "Not found" and "already logged" are both normal
/// outcomes rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// No roster match; nothing was written
    Invalid,
    Valid(CheckIn),
}

impl ValidationOutcome {
    pub fn is_logged(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(c) if c.logged)
    }

    pub fn check_in(&self) -> Option<&CheckIn> {
        match self {
            ValidationOutcome::Valid(c) => Some(c),
            ValidationOutcome::Invalid => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_scope_descriptor_json() {
        let day = ScopeDescriptor::Day {
            date: at(9).date(),
        };
        assert_eq!(
            serde_json::to_value(&day).unwrap(),
            serde_json::json!({"scope": "day", "date": "2026-10-19"})
        );

        let session = ScopeDescriptor::Session {
            session: Session {
                id: 1,
                label: "Lecture 1".to_string(),
                opened_at: at(9),
                closed_at: None,
            },
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["scope"], "session");
        assert_eq!(json["session"]["id"], 1);
        assert_eq!(session.scope(), Scope::Session(1));
    }

    #[test]
    fn test_check_in_json_shape() {
        let participant = Participant::new("S1", "Ann Lee");
        let scope = ScopeDescriptor::Day { date: at(9).date() };

        let logged = CheckIn::logged(participant.clone(), scope.clone(), at(9));
        let json = serde_json::to_value(&logged).unwrap();
        assert_eq!(json["logged"], true);
        assert_eq!(json["scope"], "day");
        assert_eq!(json["timestamp"], "2026-10-19T09:00:00");
        assert!(json.get("reason").is_none());

        let dup = CheckIn::duplicate(participant, scope);
        let json = serde_json::to_value(&dup).unwrap();
        assert_eq!(json["logged"], false);
        assert_eq!(json["reason"], "already_logged_today");
    }

    #[test]
    fn test_token_fallback() {
        let participant = Participant::new("S1", "Ann Lee").with_token("AA:BB");
        let scope = Scope::Day(at(9).date());

        let supplied = NewAttendance::for_participant(&participant, Some("CC:DD"), scope, at(9));
        assert_eq!(supplied.secondary_token, "CC:DD");

        let stored = NewAttendance::for_participant(&participant, Some(" "), scope, at(9));
        assert_eq!(stored.secondary_token, "AA:BB");
    }

    #[test]
    fn test_record_scope() {
        let record = AttendanceRecord {
            id: 7,
            participant_id: "S1".to_string(),
            display_name: "Ann Lee".to_string(),
            secondary_token: String::new(),
            recorded_at: at(10),
            scope_id: None,
        };
        assert_eq!(record.scope(), Scope::Day(at(10).date()));
        assert_eq!(Scope::Session(3).to_string(), "session 3");
        assert_eq!(NotLoggedReason::for_scope(&Scope::Session(3)).as_str(), "already_logged_in_session");
    }
}
