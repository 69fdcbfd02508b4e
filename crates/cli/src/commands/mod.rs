//! Command handlers

pub mod attendance;
pub mod roster;
pub mod session;
