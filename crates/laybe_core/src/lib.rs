//! Core domain logic for the Laybe argument graph.
//! This crate is the single source of truth for referential-integrity rules
//! between propositions and arguments.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::argument::{Argument, ArgumentId};
pub use model::kinds::{ArgumentType, ConnectionType, DecodeError, PropositionType};
pub use model::proposition::{Proposition, PropositionId, PropositionValidationError};
pub use repo::argument_repo::{ArgumentRepository, SqliteArgumentRepository};
pub use repo::page::{
    ArgumentSortField, Page, PageRequest, PropositionSortField, SortDirection, SortField,
};
pub use repo::proposition_repo::{PropositionRepository, SqlitePropositionRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::graph_service::{GraphResult, GraphService, GraphServiceError, ReferenceRole};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
