//! Core use-case services.
//!
//! # Responsibility
//! - Enforce cross-entity invariants above the repository layer.
//! - Keep boundary adapters decoupled from storage details.

pub mod graph_service;
