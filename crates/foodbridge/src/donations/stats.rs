//! Per-actor counters derived on demand from the full record set. Nothing is
//! persisted, so the numbers are always consistent with current record state.

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Actor, DonationRecord, DonationStatus, Role};

/// Named counters exposed on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    ActiveDonations,
    TotalDonated,
    Collected,
    PendingDelivery,
    IngredientsReceived,
    DeliveriesInProgress,
}

impl Counter {
    pub const fn label(self) -> &'static str {
        match self {
            Counter::ActiveDonations => "active_donations",
            Counter::TotalDonated => "total_donated",
            Counter::Collected => "collected",
            Counter::PendingDelivery => "pending_delivery",
            Counter::IngredientsReceived => "ingredients_received",
            Counter::DeliveriesInProgress => "deliveries_in_progress",
        }
    }
}

type CounterRule = fn(&Actor, &DonationRecord) -> bool;

const fn counters_for(role: Role) -> &'static [(Counter, CounterRule)] {
    match role {
        Role::Producer => &[
            (Counter::ActiveDonations, active_donations),
            (Counter::TotalDonated, total_donated),
        ],
        Role::Distributor => &[
            (Counter::Collected, collected),
            (Counter::PendingDelivery, pending_delivery),
        ],
        Role::Cook => &[
            (Counter::IngredientsReceived, ingredients_received),
            (Counter::DeliveriesInProgress, deliveries_in_progress),
        ],
    }
}

fn active_donations(actor: &Actor, record: &DonationRecord) -> bool {
    record.producer_id == actor.id && record.status == DonationStatus::Available
}

fn total_donated(actor: &Actor, record: &DonationRecord) -> bool {
    record.producer_id == actor.id
}

fn collected(actor: &Actor, record: &DonationRecord) -> bool {
    record.distributor_id.as_ref() == Some(&actor.id)
}

fn pending_delivery(actor: &Actor, record: &DonationRecord) -> bool {
    record.distributor_id.as_ref() == Some(&actor.id)
        && record.status == DonationStatus::Collected
}

fn ingredients_received(actor: &Actor, record: &DonationRecord) -> bool {
    record.cook_id.as_ref() == Some(&actor.id)
}

fn deliveries_in_progress(_actor: &Actor, record: &DonationRecord) -> bool {
    record.status == DonationStatus::Collected
}

/// Compute the actor's role-dependent counters over a snapshot.
pub fn stats(actor: &Actor, records: &[DonationRecord]) -> BTreeMap<Counter, u64> {
    let mut counters = BTreeMap::new();
    for (counter, rule) in counters_for(actor.role) {
        let count = records.iter().filter(|record| rule(actor, record)).count();
        counters.insert(*counter, count as u64);
    }
    counters
}
