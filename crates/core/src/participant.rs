//! # Participant Module
//!
//! Roster entries and the query used to resolve a check-in attempt.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// A known individual eligible to check in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier (student ID)
    pub id: String,
    /// Display name as printed on the roster
    pub display_name: String,
    /// Secondary token (device MAC address, badge number, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_token: Option<String>,
}

impl Participant {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.trim().to_string(),
            display_name: display_name.trim().to_string(),
            secondary_token: None,
        }
    }

    /// Attach a secondary token. Blank tokens are dropped.
    pub fn with_token(mut self, token: &str) -> Self {
        let token = token.trim();
        self.secondary_token = (!token.is_empty()).then(|| token.to_string());
        self
    }

    /// Token as stored, or empty string
    pub fn token_or_empty(&self) -> &str {
        self.secondary_token.as_deref().unwrap_or("")
    }

    /// Both identifier and display name must be present.
    pub fn validate(&self) -> CoreResult<()> {
        if self.id.is_empty() {
            return Err(CoreError::Validation(
                "participant identifier is required".to_string(),
            ));
        }
        if self.display_name.is_empty() {
            return Err(CoreError::Validation(format!(
                "participant {} has no display name",
                self.id
            )));
        }
        Ok(())
    }
}

/// Raw identification attempt.
///
/// Fields are trimmed on construction; blank fields become `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterQuery {
    pub identifier: Option<String>,
    pub display_name: Option<String>,
    pub secondary_token: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl RosterQuery {
    pub fn new(
        identifier: Option<&str>,
        display_name: Option<&str>,
        secondary_token: Option<&str>,
    ) -> Self {
        Self {
            identifier: non_blank(identifier),
            display_name: non_blank(display_name),
            secondary_token: non_blank(secondary_token),
        }
    }

    pub fn by_id(identifier: &str) -> Self {
        Self::new(Some(identifier), None, None)
    }

    pub fn by_name(display_name: &str) -> Self {
        Self::new(None, Some(display_name), None)
    }

    pub fn by_token(token: &str) -> Self {
        Self::new(None, None, Some(token))
    }

    pub fn is_empty(&self) -> bool {
        self.identifier.is_none() && self.display_name.is_none() && self.secondary_token.is_none()
    }

    /// Reject a query with no identifying field.
    pub fn ensure_not_empty(&self) -> CoreResult<()> {
        if self.is_empty() {
            Err(CoreError::InvalidInput)
        } else {
            Ok(())
        }
    }
}
