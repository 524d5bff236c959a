//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Own durable storage and lookup of Proposition and Argument records.
//! - Keep SQL details away from the graph service.
//!
//! # Invariants
//! - `id` is assigned by the store on create and never rewritten.
//! - Updates replace every stored field of the record.
//! - Cross-entity rules (existence of referenced propositions, cycles,
//!   delete policy) are not checked here; see `service::graph_service`.

use crate::db::DbError;
use crate::model::kinds::DecodeError;
use crate::model::proposition::PropositionValidationError;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod argument_repo;
pub mod page;
pub mod proposition_repo;
mod schema;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity family addressed by a repository error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Proposition,
    Argument,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Proposition => f.write_str("proposition"),
            Self::Argument => f.write_str("argument"),
        }
    }
}

/// Errors from repository persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Create was called on a record that already carries an id.
    AlreadyIdentified(EntityKind),
    /// Update was called on a record without an id.
    MissingId(EntityKind),
    /// Update targets an id with no stored record.
    NotFound { entity: EntityKind, id: i64 },
    /// Record shape rejected before persistence.
    Validation(PropositionValidationError),
    /// Stored enumeration token is outside its closed value set.
    Decode(DecodeError),
    /// Page request cannot be served (for example `page_size == 0`).
    InvalidPageRequest(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyIdentified(entity) => {
                write!(f, "a new {entity} cannot already have an id")
            }
            Self::MissingId(entity) => write!(f, "{entity} update requires an id"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "invalid persisted data: {err}"),
            Self::InvalidPageRequest(message) => write!(f, "invalid page request: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<DecodeError> for RepoError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<PropositionValidationError> for RepoError {
    fn from(value: PropositionValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Runs multi-statement reads against one consistent snapshot.
///
/// Reuses the caller's transaction when one is already open.
pub(crate) fn with_read_snapshot<T, F>(conn: &Connection, read: F) -> RepoResult<T>
where
    F: FnOnce(&Connection) -> RepoResult<T>,
{
    if !conn.is_autocommit() {
        return read(conn);
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Deferred)?;
    let value = read(&tx)?;
    tx.commit()?;
    Ok(value)
}
