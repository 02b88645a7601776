use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Actor, ActorId, DonationId, DonationRecord, DonationStatus};

/// Storage abstraction for donation records.
///
/// `transition` is the engine's single mutation path for status changes and
/// carries the atomicity contract: the status check and the write must be one
/// atomic unit per record, so that of two racing transitions from the same
/// status exactly one observes the expected status and wins. Implementations
/// run `apply` inside their per-record critical section.
pub trait DonationStore: Send + Sync {
    fn insert(&self, record: DonationRecord) -> Result<DonationRecord, StoreError>;
    fn fetch(&self, id: &DonationId) -> Result<Option<DonationRecord>, StoreError>;
    /// Point-in-time copy of every record. Reads never block writers.
    fn snapshot(&self) -> Result<Vec<DonationRecord>, StoreError>;
    /// Compare-and-swap on `status`: apply the mutation only while the record
    /// still sits at `from`, returning the updated record.
    fn transition(
        &self,
        id: &DonationId,
        from: DonationStatus,
        apply: &dyn Fn(&mut DonationRecord),
    ) -> Result<DonationRecord, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("donation already exists")]
    Conflict,
    #[error("donation not found")]
    NotFound,
    #[error("donation is {found}, expected {expected}")]
    StatusMismatch {
        expected: DonationStatus,
        found: DonationStatus,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Identity collaborator. The engine performs no authentication; it only
/// resolves ids to actors, chiefly to validate the cook on assignment.
pub trait ActorDirectory: Send + Sync {
    fn find(&self, id: &ActorId) -> Option<Actor>;
}

/// Which lifecycle operation produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalAction {
    Created,
    Claimed,
    Assigned,
}

impl JournalAction {
    pub const fn label(self) -> &'static str {
        match self {
            JournalAction::Created => "created",
            JournalAction::Claimed => "claimed",
            JournalAction::Assigned => "assigned",
        }
    }
}

/// One successful transition, recorded for per-actor history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub actor_id: ActorId,
    pub action: JournalAction,
    pub donation_id: DonationId,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only audit trail of successful transitions. Appends are best-effort
/// relative to the store: a failed `record` never rolls back the transition
/// it describes, though reads still surface journal outages.
pub trait TransitionJournal: Send + Sync {
    fn record(&self, entry: JournalEntry) -> Result<(), JournalError>;
    /// Newest-first tail of an actor's own entries.
    fn recent(&self, actor_id: &ActorId, limit: usize) -> Result<Vec<JournalEntry>, JournalError>;
}

/// Journal dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("journal unavailable: {0}")]
    Unavailable(String),
}
