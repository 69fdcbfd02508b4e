//! # Rollcall Core
//!
//! Domain types for attendance check-ins.
//!
//! ## Model
//!
//! ```text
//! Participant ──┐
//!               ├──► AttendanceRecord (scope: Session(id) | Day(date))
//! Session ──────┘
//! ```
//!
//! A check-in is unique per participant within its [`Scope`]: either the
//! session open at recording time, or the calendar day when no session is
//! open.

pub mod attendance;
pub mod clock;
pub mod error;
pub mod participant;
pub mod session;

pub use attendance::{
    AttendanceRecord, CheckIn, NewAttendance, NotLoggedReason, Scope, ScopeDescriptor,
    ValidationOutcome,
};
pub use clock::{format_timestamp, parse_timestamp, Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use participant::{Participant, RosterQuery};
pub use session::Session;
