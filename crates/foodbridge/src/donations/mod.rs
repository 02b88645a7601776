//! Donation lifecycle: entity model, state machine, visibility, statistics.
//!
//! The state machine is strictly forward-only:
//! `Available --claim(distributor)--> Collected --assign(distributor, cook)--> Delivered`.
//! Both transitions reject reapplication rather than no-op, so racing callers
//! can detect that they lost. Expiry dates are advisory metadata; no
//! transition is ever driven by the calendar.

pub mod domain;
pub mod engine;
pub mod router;
pub mod stats;
pub mod store;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use domain::{
    Actor, ActorId, Category, DonationDraft, DonationFeedView, DonationId, DonationRecord,
    DonationStatus, Quantity, QuantityUnit, Role, ValidationError,
};
pub use engine::{DonationEngine, DonationError};
pub use router::{donation_router, ACTOR_HEADER};
pub use stats::{stats, Counter};
pub use store::{
    ActorDirectory, DonationStore, JournalAction, JournalEntry, JournalError, StoreError,
    TransitionJournal,
};
pub use visibility::visible;
