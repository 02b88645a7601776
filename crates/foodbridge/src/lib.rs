//! Donation lifecycle engine for a three-party surplus food marketplace.
//!
//! Producers publish surplus items, distributors claim and move them, cooks
//! receive what is assigned to them. This crate owns the entity model, the
//! status state machine, the role-scoped visibility rules, and the derived
//! statistics. Persistence, identity, and transport are collaborators behind
//! traits so the engine can be exercised without any particular backend.

pub mod config;
pub mod donations;
pub mod error;
pub mod telemetry;
