use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for actors. Identity is owned by an external auth
/// collaborator; the engine trusts ids and roles as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed role of an actor. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Producer,
    Distributor,
    Cook,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Distributor => "distributor",
            Role::Cook => "cook",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An authenticated participant. `display_name` and `location` are
/// descriptive only and carry no authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub role: Role,
    pub display_name: String,
    pub location: String,
}

/// Identifier wrapper for donation records, assigned at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DonationId(pub String);

impl fmt::Display for DonationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fruit,
    Vegetable,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityUnit {
    Kg,
    Boxes,
    Units,
}

impl QuantityUnit {
    pub const fn label(self) -> &'static str {
        match self {
            QuantityUnit::Kg => "kg",
            QuantityUnit::Boxes => "boxes",
            QuantityUnit::Units => "units",
        }
    }
}

/// Declared amount of food, e.g. "15 kg" or "8 boxes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: u32,
    pub unit: QuantityUnit,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.label())
    }
}

/// Lifecycle position of a donation. Only ever advances forward:
/// `Available -> Collected -> Delivered`. Delivered is terminal and the
/// record is retained for history and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Available,
    Collected,
    Delivered,
}

impl DonationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DonationStatus::Available => "available",
            DonationStatus::Collected => "collected",
            DonationStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Producer-supplied input for a new donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub quantity: Quantity,
    pub harvest_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

impl DonationDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if self.quantity.value == 0 {
            return Err(ValidationError::QuantityNotPositive);
        }
        if self.harvest_date > self.expiry_date {
            return Err(ValidationError::HarvestAfterExpiry {
                harvest: self.harvest_date,
                expiry: self.expiry_date,
            });
        }
        Ok(())
    }
}

/// Field-level rejection of a create request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("quantity must be positive")]
    QuantityNotPositive,
    #[error("harvest date {harvest} falls after expiry date {expiry}")]
    HarvestAfterExpiry { harvest: NaiveDate, expiry: NaiveDate },
}

/// The central entity: one donation tracked through its lifecycle.
///
/// Invariants maintained by the engine and store:
/// - `producer_id` never changes after creation.
/// - `distributor_id` is set exactly once, on the Collected transition.
/// - `cook_id` is set exactly once, on the Delivered transition, by the
///   distributor holding the record.
/// - `status` never regresses or skips a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRecord {
    pub id: DonationId,
    pub producer_id: ActorId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub quantity: Quantity,
    pub harvest_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: DonationStatus,
    pub distributor_id: Option<ActorId>,
    pub cook_id: Option<ActorId>,
    pub created_at: DateTime<Utc>,
}

impl DonationRecord {
    /// Signed day count until the advisory expiry date. Negative once past.
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }

    /// Expiry is metadata for highlighting only; it never gates a transition.
    pub fn expiring_soon(&self, today: NaiveDate) -> bool {
        self.days_until_expiry(today) <= 2
    }

    pub fn feed_view(&self, today: NaiveDate) -> DonationFeedView {
        DonationFeedView {
            id: self.id.clone(),
            producer_id: self.producer_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            quantity: self.quantity,
            harvest_date: self.harvest_date,
            expiry_date: self.expiry_date,
            status: self.status.label(),
            distributor_id: self.distributor_id.clone(),
            cook_id: self.cook_id.clone(),
            created_at: self.created_at,
            days_until_expiry: self.days_until_expiry(today),
            expiring_soon: self.expiring_soon(today),
        }
    }
}

/// Outward representation of a record as served in role-scoped feeds.
#[derive(Debug, Clone, Serialize)]
pub struct DonationFeedView {
    pub id: DonationId,
    pub producer_id: ActorId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub quantity: Quantity,
    pub harvest_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor_id: Option<ActorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_id: Option<ActorId>,
    pub created_at: DateTime<Utc>,
    pub days_until_expiry: i64,
    pub expiring_soon: bool,
}
