//! Roster store
//!
//! Known participants held as an immutable, versioned snapshot behind an
//! [`ArcSwap`]. Lookups never block; `reload` and `add` publish a whole new
//! snapshot, so a reader sees either the old roster or the new one in full.

use arc_swap::ArcSwap;
use rollcall_core::{CoreError, CoreResult, Participant, RosterQuery};
use std::sync::{Arc, Mutex};

/// One matching rule: `(query, entry) -> matched`
type MatchStrategy = fn(&RosterQuery, &Participant) -> bool;

/// Tried in order; the first strategy with any hit decides, scanning the
/// roster in file order.
const MATCH_STRATEGIES: [(&str, MatchStrategy); 3] = [
    ("identifier", match_identifier),
    ("display_name", match_display_name),
    ("secondary_token", match_secondary_token),
];

fn match_identifier(query: &RosterQuery, entry: &Participant) -> bool {
    query.identifier.as_deref() == Some(entry.id.as_str())
}

fn match_display_name(query: &RosterQuery, entry: &Participant) -> bool {
    query
        .display_name
        .as_deref()
        .map_or(false, |name| name.to_lowercase() == entry.display_name.to_lowercase())
}

fn match_secondary_token(query: &RosterQuery, entry: &Participant) -> bool {
    match (query.secondary_token.as_deref(), entry.secondary_token.as_deref()) {
        (Some(wanted), Some(stored)) if !stored.is_empty() => {
            wanted.to_lowercase() == stored.to_lowercase()
        }
        _ => false,
    }
}

/// Immutable view of the roster at one version
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    version: u64,
    participants: Vec<Participant>,
}

impl RosterSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.participants.iter().any(|p| p.id == id)
    }

    /// Participant list with `participant` appended; the snapshot is unchanged
    pub fn with_added(&self, participant: Participant) -> CoreResult<Vec<Participant>> {
        participant.validate()?;
        if self.contains_id(&participant.id) {
            return Err(CoreError::DuplicateParticipant(participant.id));
        }

        let mut participants = self.participants.clone();
        participants.push(participant);
        Ok(participants)
    }

    /// Resolve a query against this snapshot
    pub fn find(&self, query: &RosterQuery) -> Option<&Participant> {
        MATCH_STRATEGIES.iter().find_map(|(name, strategy)| {
            let hit = self.participants.iter().find(|p| strategy(query, p));
            if let Some(p) = hit {
                tracing::trace!(strategy = *name, participant = %p.id, "roster match");
            }
            hit
        })
    }
}

/// Shared roster with atomic wholesale replacement
pub struct RosterStore {
    current: ArcSwap<RosterSnapshot>,
    /// Serializes writers; readers never take it
    write_lock: Mutex<()>,
}

impl RosterStore {
    /// Empty roster at version 0
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(RosterSnapshot::default()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_participants(participants: Vec<Participant>) -> CoreResult<Self> {
        let store = Self::new();
        store.reload(participants)?;
        Ok(store)
    }

    /// Current snapshot; count and entries always agree
    pub fn snapshot(&self) -> Arc<RosterSnapshot> {
        self.current.load_full()
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Resolve an identification attempt.
    ///
    /// Fails with `InvalidInput` before scanning when every field is blank.
    pub fn lookup(&self, query: &RosterQuery) -> CoreResult<Option<Participant>> {
        query.ensure_not_empty()?;
        Ok(self.current.load().find(query).cloned())
    }

    /// Replace the whole roster. Nothing is published if any entry is invalid.
    pub fn reload(&self, participants: Vec<Participant>) -> CoreResult<u64> {
        for participant in &participants {
            participant.validate()?;
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let version = self.current.load().version + 1;
        let count = participants.len();
        self.current.store(Arc::new(RosterSnapshot {
            version,
            participants,
        }));

        tracing::info!(version, participants = count, "roster reloaded");
        Ok(version)
    }

    /// Append one participant, rejecting a duplicate identifier
    pub fn add(&self, participant: Participant) -> CoreResult<Arc<RosterSnapshot>> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let current = self.current.load_full();
        let participants = current.with_added(participant)?;
        let next = Arc::new(RosterSnapshot {
            version: current.version + 1,
            participants,
        });
        self.current.store(Arc::clone(&next));
        Ok(next)
    }
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new()
    }
}
