//! Role-scoped visibility: which records an actor may observe on any read.
//!
//! One rule per role, selected from a table so each rule stays independently
//! testable. Cooks deliberately see every Collected record, not just their
//! eventual assignment: the assignee is unknown until `assign` completes, and
//! the in-flight preview lets kitchens anticipate incoming ingredients.

use super::domain::{Actor, DonationRecord, DonationStatus, Role};

type VisibilityRule = fn(&Actor, &DonationRecord) -> bool;

const fn rule_for(role: Role) -> VisibilityRule {
    match role {
        Role::Producer => own_records,
        Role::Distributor => all_records,
        Role::Cook => deliveries_and_previews,
    }
}

/// Producers see their own history, any status.
fn own_records(actor: &Actor, record: &DonationRecord) -> bool {
    record.producer_id == actor.id
}

/// Distributors see everything: Available records to claim, plus the
/// Collected ones they hold to assign.
fn all_records(_actor: &Actor, _record: &DonationRecord) -> bool {
    true
}

/// Cooks see confirmed deliveries addressed to them plus every claimed
/// record still in flight.
fn deliveries_and_previews(actor: &Actor, record: &DonationRecord) -> bool {
    (record.status == DonationStatus::Delivered && record.cook_id.as_ref() == Some(&actor.id))
        || (record.status == DonationStatus::Collected && record.distributor_id.is_some())
}

/// Filter and order a snapshot for one actor: most recently created first,
/// ties broken on id so the ordering is stable.
pub fn visible(actor: &Actor, mut records: Vec<DonationRecord>) -> Vec<DonationRecord> {
    let rule = rule_for(actor.role);
    records.retain(|record| rule(actor, record));
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    records
}
