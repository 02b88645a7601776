use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{
    Actor, ActorId, DonationDraft, DonationId, DonationRecord, DonationStatus, Role,
    ValidationError,
};
use super::stats::{self, Counter};
use super::store::{
    ActorDirectory, DonationStore, JournalAction, JournalEntry, JournalError, StoreError,
    TransitionJournal,
};
use super::visibility;

/// The lifecycle engine: validates and applies status changes, enforcing the
/// role and ownership gates. Reads (`feed`, `stats`, `history`) are pure
/// projections over a store snapshot.
pub struct DonationEngine<S, D, J> {
    store: Arc<S>,
    directory: Arc<D>,
    journal: Arc<J>,
}

static DONATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_donation_id() -> DonationId {
    let id = DONATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DonationId(format!("don-{id:06}"))
}

impl<S, D, J> DonationEngine<S, D, J>
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, journal: Arc<J>) -> Self {
        Self {
            store,
            directory,
            journal,
        }
    }

    /// Resolve an actor id through the directory. Used by transports to turn
    /// an authenticated id into the current actor.
    pub fn authenticate(&self, id: &ActorId) -> Option<Actor> {
        self.directory.find(id)
    }

    /// Publish a new donation. Producer-only; the draft must pass field
    /// validation. The record starts out Available.
    pub fn create(
        &self,
        actor: &Actor,
        draft: DonationDraft,
    ) -> Result<DonationRecord, DonationError> {
        require_role(actor, Role::Producer)?;
        draft.validate()?;

        let record = DonationRecord {
            id: next_donation_id(),
            producer_id: actor.id.clone(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            quantity: draft.quantity,
            harvest_date: draft.harvest_date,
            expiry_date: draft.expiry_date,
            status: DonationStatus::Available,
            distributor_id: None,
            cook_id: None,
            created_at: Utc::now(),
        };

        let stored = self.store.insert(record)?;
        self.journal_entry(actor, JournalAction::Created, &stored.id);
        info!(donation = %stored.id, producer = %actor.id, "donation published");
        Ok(stored)
    }

    /// Claim an Available donation for physical collection. Distributor-only;
    /// of two racing claims exactly one succeeds, the other sees
    /// `InvalidTransition`.
    pub fn claim(&self, actor: &Actor, id: &DonationId) -> Result<DonationRecord, DonationError> {
        require_role(actor, Role::Distributor)?;

        let claimed = self
            .store
            .transition(id, DonationStatus::Available, &|record| {
                record.status = DonationStatus::Collected;
                record.distributor_id = Some(actor.id.clone());
            })
            .map_err(|err| transition_error(id, err))?;

        self.journal_entry(actor, JournalAction::Claimed, id);
        info!(donation = %id, distributor = %actor.id, "donation collected");
        Ok(claimed)
    }

    /// Deliver a Collected donation to a cook. Only the claiming distributor
    /// may assign, and the target must resolve to a cook.
    pub fn assign(
        &self,
        actor: &Actor,
        id: &DonationId,
        cook_id: &ActorId,
    ) -> Result<DonationRecord, DonationError> {
        require_role(actor, Role::Distributor)?;

        let current = self
            .store
            .fetch(id)?
            .ok_or_else(|| DonationError::DonationNotFound { id: id.clone() })?;
        if current.status != DonationStatus::Collected {
            debug!(donation = %id, status = %current.status, "assign rejected: status precondition");
            return Err(DonationError::InvalidTransition {
                id: id.clone(),
                expected: DonationStatus::Collected,
                found: current.status,
            });
        }
        // distributor_id is immutable once set, so this check cannot go stale
        // between here and the compare-and-swap below.
        if current.distributor_id.as_ref() != Some(&actor.id) {
            return Err(DonationError::NotClaimHolder { id: id.clone() });
        }

        let cook = self
            .directory
            .find(cook_id)
            .filter(|candidate| candidate.role == Role::Cook)
            .ok_or_else(|| DonationError::CookNotFound {
                id: cook_id.clone(),
            })?;

        let delivered = self
            .store
            .transition(id, DonationStatus::Collected, &|record| {
                record.status = DonationStatus::Delivered;
                record.cook_id = Some(cook.id.clone());
            })
            .map_err(|err| transition_error(id, err))?;

        self.journal_entry(actor, JournalAction::Assigned, id);
        info!(donation = %id, distributor = %actor.id, cook = %cook.id, "donation delivered");
        Ok(delivered)
    }

    /// Role-scoped feed: the subset of records the actor may see, most
    /// recently created first.
    pub fn feed(&self, actor: &Actor) -> Result<Vec<DonationRecord>, DonationError> {
        let records = self.store.snapshot()?;
        Ok(visibility::visible(actor, records))
    }

    /// Role-dependent counters derived on demand from the current record set.
    pub fn stats(&self, actor: &Actor) -> Result<BTreeMap<Counter, u64>, DonationError> {
        let records = self.store.snapshot()?;
        Ok(stats::stats(actor, &records))
    }

    /// Newest-first tail of the actor's own transition history.
    pub fn history(
        &self,
        actor: &Actor,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, DonationError> {
        Ok(self.journal.recent(&actor.id, limit)?)
    }

    // Called after the store write has committed, so a journal failure must
    // not turn a persisted transition into an error. History is best-effort
    // relative to the store.
    fn journal_entry(&self, actor: &Actor, action: JournalAction, donation_id: &DonationId) {
        let entry = JournalEntry {
            actor_id: actor.id.clone(),
            action,
            donation_id: donation_id.clone(),
            recorded_at: Utc::now(),
        };
        if let Err(err) = self.journal.record(entry) {
            warn!(donation = %donation_id, error = %err, "journal write failed");
        }
    }
}

fn require_role(actor: &Actor, required: Role) -> Result<(), DonationError> {
    if actor.role == required {
        Ok(())
    } else {
        Err(DonationError::RoleRequired { required })
    }
}

fn transition_error(id: &DonationId, err: StoreError) -> DonationError {
    match err {
        StoreError::NotFound => DonationError::DonationNotFound { id: id.clone() },
        StoreError::StatusMismatch { expected, found } => DonationError::InvalidTransition {
            id: id.clone(),
            expected,
            found,
        },
        other => DonationError::Store(other),
    }
}

/// Error raised by the lifecycle engine. Every variant is returned to the
/// caller; none is fatal to the engine and none triggers an automatic retry.
#[derive(Debug, thiserror::Error)]
pub enum DonationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("donation {id} is {found}, expected {expected}")]
    InvalidTransition {
        id: DonationId,
        expected: DonationStatus,
        found: DonationStatus,
    },
    #[error("operation requires the {required} role")]
    RoleRequired { required: Role },
    #[error("donation {id} is held by another distributor")]
    NotClaimHolder { id: DonationId },
    #[error("donation {id} not found")]
    DonationNotFound { id: DonationId },
    #[error("cook {id} not found")]
    CookNotFound { id: ActorId },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Journal(#[from] JournalError),
}
