//! Homewatch domain logic.
//!
//! Pure rule evaluation and the trait seams the rules read from. Nothing in
//! this crate talks to PostgreSQL or the network directly; adapters live in
//! `homewatch-db` and `homewatch-integrations`.

pub mod clock;
pub mod error;
pub mod notification;
pub mod rules;
pub mod sensor;
pub mod sources;
pub mod types;
