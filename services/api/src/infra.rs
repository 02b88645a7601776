use chrono::NaiveDate;
use foodbridge::donations::{
    Actor, ActorDirectory, ActorId, DonationId, DonationRecord, DonationStatus, DonationStore,
    JournalEntry, JournalError, Role, StoreError, TransitionJournal,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-per-map store. The lock makes every `transition` a serialized
/// check-then-write, which is what the engine's at-most-one-winner guarantee
/// requires.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDonationStore {
    records: Arc<Mutex<HashMap<DonationId, DonationRecord>>>,
}

impl DonationStore for InMemoryDonationStore {
    fn insert(&self, record: DonationRecord) -> Result<DonationRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &DonationId) -> Result<Option<DonationRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn snapshot(&self) -> Result<Vec<DonationRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn transition(
        &self,
        id: &DonationId,
        from: DonationStatus,
        apply: &dyn Fn(&mut DonationRecord),
    ) -> Result<DonationRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        if record.status != from {
            return Err(StoreError::StatusMismatch {
                expected: from,
                found: record.status,
            });
        }
        apply(record);
        Ok(record.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryActorDirectory {
    actors: Arc<Mutex<HashMap<ActorId, Actor>>>,
}

impl InMemoryActorDirectory {
    pub(crate) fn register(&self, actor: Actor) {
        self.actors
            .lock()
            .expect("directory mutex poisoned")
            .insert(actor.id.clone(), actor);
    }
}

impl ActorDirectory for InMemoryActorDirectory {
    fn find(&self, id: &ActorId) -> Option<Actor> {
        self.actors
            .lock()
            .expect("directory mutex poisoned")
            .get(id)
            .cloned()
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTransitionJournal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl TransitionJournal for InMemoryTransitionJournal {
    fn record(&self, entry: JournalEntry) -> Result<(), JournalError> {
        self.entries
            .lock()
            .expect("journal mutex poisoned")
            .push(entry);
        Ok(())
    }

    fn recent(&self, actor_id: &ActorId, limit: usize) -> Result<Vec<JournalEntry>, JournalError> {
        let guard = self.entries.lock().expect("journal mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|entry| &entry.actor_id == actor_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

fn sample_actor(id: &str, role: Role, name: &str, location: &str) -> Actor {
    Actor {
        id: ActorId(id.to_string()),
        role,
        display_name: name.to_string(),
        location: location.to_string(),
    }
}

/// Directory pre-populated with one actor per role (plus a second distributor
/// and cook) so the service is usable out of the box. A real deployment
/// replaces this with the auth collaborator's directory.
pub(crate) fn seeded_directory() -> InMemoryActorDirectory {
    let directory = InMemoryActorDirectory::default();
    for actor in [
        sample_actor("prod-1", Role::Producer, "Green Valley Farm", "Campinas, SP"),
        sample_actor("prod-2", Role::Producer, "Hilltop Orchard", "Holambra, SP"),
        sample_actor("dist-1", Role::Distributor, "City Relief Vans", "São Paulo, SP"),
        sample_actor("dist-2", Role::Distributor, "Harbor Logistics", "Santos, SP"),
        sample_actor("cook-1", Role::Cook, "Community Kitchen", "São Paulo, SP"),
        sample_actor("cook-2", Role::Cook, "Shelter Canteen", "São Paulo, SP"),
    ] {
        directory.register(actor);
    }
    directory
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
