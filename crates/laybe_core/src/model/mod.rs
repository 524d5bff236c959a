//! Argumentation graph domain model.
//!
//! # Responsibility
//! - Define the Proposition and Argument records persisted by core.
//! - Define the closed value sets for proposition, connective and argument kinds.
//!
//! # Invariants
//! - `id` is `None` until the first successful persist and never changes afterward.
//! - Entity equality is identity equality (see `Proposition`/`Argument` `PartialEq`).
//! - Back-relations are derived queries, never stored on the entity.

pub mod argument;
pub mod kinds;
pub mod proposition;
