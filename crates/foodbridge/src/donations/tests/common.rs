use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::donations::domain::{
    Actor, ActorId, Category, DonationDraft, DonationId, DonationRecord, DonationStatus, Quantity,
    QuantityUnit, Role,
};
use crate::donations::engine::DonationEngine;
use crate::donations::store::{
    ActorDirectory, DonationStore, JournalEntry, JournalError, StoreError, TransitionJournal,
};

pub(super) fn actor(id: &str, role: Role, name: &str) -> Actor {
    Actor {
        id: ActorId(id.to_string()),
        role,
        display_name: name.to_string(),
        location: "Campinas, SP".to_string(),
    }
}

pub(super) fn producer() -> Actor {
    actor("prod-1", Role::Producer, "Green Valley Farm")
}

pub(super) fn other_producer() -> Actor {
    actor("prod-2", Role::Producer, "Hilltop Orchard")
}

pub(super) fn distributor() -> Actor {
    actor("dist-1", Role::Distributor, "City Relief Vans")
}

pub(super) fn other_distributor() -> Actor {
    actor("dist-2", Role::Distributor, "Harbor Logistics")
}

pub(super) fn cook() -> Actor {
    actor("cook-1", Role::Cook, "Community Kitchen")
}

pub(super) fn other_cook() -> Actor {
    actor("cook-2", Role::Cook, "Shelter Canteen")
}

pub(super) fn draft() -> DonationDraft {
    DonationDraft {
        title: "Organic tomatoes".to_string(),
        description: "Fresh from today's harvest, ideal for sauces and salads.".to_string(),
        category: Category::Vegetable,
        quantity: Quantity {
            value: 15,
            unit: QuantityUnit::Kg,
        },
        harvest_date: NaiveDate::from_ymd_opt(2024, 1, 20).expect("valid date"),
        expiry_date: NaiveDate::from_ymd_opt(2024, 1, 22).expect("valid date"),
    }
}

pub(super) fn timestamp(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 20, hour, 0, 0).single().expect("valid timestamp")
}

pub(super) fn record_at(id: &str, owner: &Actor, created_at: DateTime<Utc>) -> DonationRecord {
    DonationRecord {
        id: DonationId(id.to_string()),
        producer_id: owner.id.clone(),
        title: format!("Donation {id}"),
        description: "Surplus produce".to_string(),
        category: Category::Mixed,
        quantity: Quantity {
            value: 5,
            unit: QuantityUnit::Boxes,
        },
        harvest_date: NaiveDate::from_ymd_opt(2024, 1, 18).expect("valid date"),
        expiry_date: NaiveDate::from_ymd_opt(2024, 1, 25).expect("valid date"),
        status: DonationStatus::Available,
        distributor_id: None,
        cook_id: None,
        created_at,
    }
}

pub(super) fn collected(mut record: DonationRecord, holder: &Actor) -> DonationRecord {
    record.status = DonationStatus::Collected;
    record.distributor_id = Some(holder.id.clone());
    record
}

pub(super) fn delivered(record: DonationRecord, holder: &Actor, target: &Actor) -> DonationRecord {
    let mut record = collected(record, holder);
    record.status = DonationStatus::Delivered;
    record.cook_id = Some(target.id.clone());
    record
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<HashMap<DonationId, DonationRecord>>>,
}

impl DonationStore for MemoryStore {
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
pub(super) struct MemoryDirectory {
    actors: Arc<Mutex<HashMap<ActorId, Actor>>>,
}

impl MemoryDirectory {
    pub(super) fn register(&self, actor: Actor) {
        self.actors
            .lock()
            .expect("directory mutex poisoned")
            .insert(actor.id.clone(), actor);
    }
}

impl ActorDirectory for MemoryDirectory {
    fn find(&self, id: &ActorId) -> Option<Actor> {
        self.actors
            .lock()
            .expect("directory mutex poisoned")
            .get(id)
            .cloned()
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryJournal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl MemoryJournal {
    pub(super) fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().expect("journal mutex poisoned").clone()
    }
}

impl TransitionJournal for MemoryJournal {
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

pub(super) struct UnavailableStore;

impl DonationStore for UnavailableStore {
    fn insert(&self, _record: DonationRecord) -> Result<DonationRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &DonationId) -> Result<Option<DonationRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn snapshot(&self) -> Result<Vec<DonationRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn transition(
        &self,
        _id: &DonationId,
        _from: DonationStatus,
        _apply: &dyn Fn(&mut DonationRecord),
    ) -> Result<DonationRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct FailingJournal;

impl TransitionJournal for FailingJournal {
    fn record(&self, _entry: JournalEntry) -> Result<(), JournalError> {
        Err(JournalError::Unavailable("journal offline".to_string()))
    }

    fn recent(&self, _actor_id: &ActorId, _limit: usize) -> Result<Vec<JournalEntry>, JournalError> {
        Err(JournalError::Unavailable("journal offline".to_string()))
    }
}

pub(super) fn directory() -> MemoryDirectory {
    let directory = MemoryDirectory::default();
    for actor in [
        producer(),
        other_producer(),
        distributor(),
        other_distributor(),
        cook(),
        other_cook(),
    ] {
        directory.register(actor);
    }
    directory
}

pub(super) type TestEngine = DonationEngine<MemoryStore, MemoryDirectory, MemoryJournal>;

pub(super) fn build_engine() -> (Arc<TestEngine>, Arc<MemoryStore>, Arc<MemoryJournal>) {
    let store = Arc::new(MemoryStore::default());
    let journal = Arc::new(MemoryJournal::default());
    let engine = Arc::new(DonationEngine::new(
        store.clone(),
        Arc::new(directory()),
        journal.clone(),
    ));
    (engine, store, journal)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
