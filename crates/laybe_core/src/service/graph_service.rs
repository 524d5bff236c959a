//! Graph access service over propositions and arguments.
//!
//! # Responsibility
//! - Route saves to create/update by presence of `id`.
//! - Check referenced propositions exist before any write.
//! - Keep the operand graph acyclic.
//! - Apply the reject-if-referenced delete policy for propositions.
//!
//! # Invariants
//! - Every write runs in one IMMEDIATE transaction covering its validation
//!   reads, so a referenced proposition cannot vanish between check and write.
//! - A failed write leaves the store unchanged.
//! - Lookups return `Ok(None)` for unknown ids.

use crate::model::argument::{Argument, ArgumentId};
use crate::model::kinds::DecodeError;
use crate::model::proposition::{Proposition, PropositionId, PropositionValidationError};
use crate::repo::argument_repo::{ArgumentRepository, SqliteArgumentRepository};
use crate::repo::page::{ArgumentSortField, Page, PageRequest, PropositionSortField};
use crate::repo::proposition_repo::{PropositionRepository, SqlitePropositionRepository};
use crate::repo::{EntityKind, RepoError};
use log::{debug, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type GraphResult<T> = Result<T, GraphServiceError>;

/// Slot through which an entity references a proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRole {
    Operand1,
    Operand2,
    Premise,
    Conclusion,
}

impl Display for ReferenceRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operand1 => f.write_str("proposition1"),
            Self::Operand2 => f.write_str("proposition2"),
            Self::Premise => f.write_str("premise"),
            Self::Conclusion => f.write_str("conclusion"),
        }
    }
}

/// Errors from graph service operations.
#[derive(Debug)]
pub enum GraphServiceError {
    /// Create called on an entity that already carries an id.
    AlreadyIdentified(EntityKind),
    /// Update called on an entity without an id.
    MissingId(EntityKind),
    /// Update targets an unknown id.
    NotFound { entity: EntityKind, id: i64 },
    /// Referenced proposition does not exist.
    DanglingReference {
        role: ReferenceRole,
        proposition_id: PropositionId,
    },
    /// Update would make the proposition its own (transitive) operand.
    CompositionCycle(PropositionId),
    /// Delete rejected while arguments or compositions still reference it.
    PropositionInUse {
        id: PropositionId,
        arguments: usize,
        compositions: usize,
    },
    /// Proposition shape is invalid for its kind.
    Validation(PropositionValidationError),
    /// Stored enumeration token could not be decoded.
    Decode(DecodeError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl GraphServiceError {
    /// Stable snake_case code for logs and boundary mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyIdentified(_) => "already_identified",
            Self::MissingId(_) => "missing_id",
            Self::NotFound { .. } => "not_found",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::CompositionCycle(_) => "composition_cycle",
            Self::PropositionInUse { .. } => "proposition_in_use",
            Self::Validation(_) => "validation_failed",
            Self::Decode(_) => "decode_failed",
            Self::Repo(_) => "repository_failure",
        }
    }

    /// Whether the caller supplied a request that violates a precondition.
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, Self::Decode(_) | Self::Repo(_))
    }
}

impl Display for GraphServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyIdentified(entity) => {
                write!(f, "a new {entity} cannot already have an id")
            }
            Self::MissingId(entity) => write!(f, "{entity} update requires an id"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DanglingReference {
                role,
                proposition_id,
            } => write!(f, "{role} references missing proposition {proposition_id}"),
            Self::CompositionCycle(id) => {
                write!(f, "proposition {id} would become its own operand")
            }
            Self::PropositionInUse {
                id,
                arguments,
                compositions,
            } => write!(
                f,
                "proposition {id} is still referenced by {arguments} argument(s) and {compositions} connection(s)"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GraphServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for GraphServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::AlreadyIdentified(entity) => Self::AlreadyIdentified(entity),
            RepoError::MissingId(entity) => Self::MissingId(entity),
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Decode(err) => Self::Decode(err),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for GraphServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl From<PropositionValidationError> for GraphServiceError {
    fn from(value: PropositionValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Graph access facade over one migrated SQLite connection.
pub struct GraphService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> GraphService<'conn> {
    /// Creates service after checking both tables are migrated.
    pub fn try_new(conn: &'conn Connection) -> GraphResult<Self> {
        SqlitePropositionRepository::try_new(conn)?;
        SqliteArgumentRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    /// Creates or updates a proposition depending on `id`.
    pub fn save_proposition(&self, proposition: &Proposition) -> GraphResult<Proposition> {
        if proposition.is_persisted() {
            self.update_proposition(proposition)
        } else {
            self.create_proposition(proposition)
        }
    }

    /// Persists a transient proposition whose operands exist.
    pub fn create_proposition(&self, proposition: &Proposition) -> GraphResult<Proposition> {
        self.write("proposition_create", |conn| {
            if proposition.is_persisted() {
                return Err(GraphServiceError::AlreadyIdentified(EntityKind::Proposition));
            }
            proposition.validate()?;

            let propositions = SqlitePropositionRepository::on_checked(conn);
            ensure_operands_exist(&propositions, proposition)?;
            Ok(propositions.create_proposition(proposition)?)
        })
    }

    /// Replaces an existing proposition.
    ///
    /// # Errors
    /// - `MissingId` / `NotFound` for unknown targets.
    /// - `DanglingReference` for missing operands.
    /// - `CompositionCycle` when the new operands reach the proposition itself.
    pub fn update_proposition(&self, proposition: &Proposition) -> GraphResult<Proposition> {
        self.write("proposition_update", |conn| {
            let id = proposition
                .id
                .ok_or(GraphServiceError::MissingId(EntityKind::Proposition))?;
            proposition.validate()?;

            let propositions = SqlitePropositionRepository::on_checked(conn);
            if propositions.get_proposition(id)?.is_none() {
                return Err(GraphServiceError::NotFound {
                    entity: EntityKind::Proposition,
                    id,
                });
            }
            ensure_operands_exist(&propositions, proposition)?;
            ensure_acyclic(&propositions, id, proposition)?;
            Ok(propositions.update_proposition(proposition)?)
        })
    }

    /// Creates or updates an argument depending on `id`.
    pub fn save_argument(&self, argument: &Argument) -> GraphResult<Argument> {
        if argument.is_persisted() {
            self.update_argument(argument)
        } else {
            self.create_argument(argument)
        }
    }

    /// Persists a transient argument whose premise and conclusion exist.
    pub fn create_argument(&self, argument: &Argument) -> GraphResult<Argument> {
        self.write("argument_create", |conn| {
            if argument.is_persisted() {
                return Err(GraphServiceError::AlreadyIdentified(EntityKind::Argument));
            }

            let propositions = SqlitePropositionRepository::on_checked(conn);
            ensure_endpoints_exist(&propositions, argument)?;
            Ok(SqliteArgumentRepository::on_checked(conn).create_argument(argument)?)
        })
    }

    /// Replaces an existing argument.
    pub fn update_argument(&self, argument: &Argument) -> GraphResult<Argument> {
        self.write("argument_update", |conn| {
            let id = argument
                .id
                .ok_or(GraphServiceError::MissingId(EntityKind::Argument))?;

            let arguments = SqliteArgumentRepository::on_checked(conn);
            if arguments.get_argument(id)?.is_none() {
                return Err(GraphServiceError::NotFound {
                    entity: EntityKind::Argument,
                    id,
                });
            }
            ensure_endpoints_exist(&SqlitePropositionRepository::on_checked(conn), argument)?;
            Ok(arguments.update_argument(argument)?)
        })
    }

    /// Deletes a proposition nothing references. Unknown ids succeed.
    pub fn delete_proposition(&self, id: PropositionId) -> GraphResult<()> {
        self.write("proposition_delete", |conn| {
            let propositions = SqlitePropositionRepository::on_checked(conn);
            let arguments = SqliteArgumentRepository::on_checked(conn);

            let argument_refs: HashSet<ArgumentId> = arguments
                .find_by_premise(id)?
                .into_iter()
                .chain(arguments.find_by_conclusion(id)?)
                .filter_map(|argument| argument.id)
                .collect();
            let composition_refs = propositions.find_compositions_using(id)?.len();

            if !argument_refs.is_empty() || composition_refs > 0 {
                return Err(GraphServiceError::PropositionInUse {
                    id,
                    arguments: argument_refs.len(),
                    compositions: composition_refs,
                });
            }

            propositions.delete_proposition(id)?;
            Ok(())
        })
    }

    /// Deletes an argument. Unknown ids succeed.
    pub fn delete_argument(&self, id: ArgumentId) -> GraphResult<()> {
        self.write("argument_delete", |conn| {
            SqliteArgumentRepository::on_checked(conn).delete_argument(id)?;
            Ok(())
        })
    }

    pub fn get_proposition(&self, id: PropositionId) -> GraphResult<Option<Proposition>> {
        Ok(self.propositions().get_proposition(id)?)
    }

    pub fn get_argument(&self, id: ArgumentId) -> GraphResult<Option<Argument>> {
        Ok(self.arguments().get_argument(id)?)
    }

    pub fn list_propositions(
        &self,
        request: &PageRequest<PropositionSortField>,
    ) -> GraphResult<Page<Proposition>> {
        Ok(self.propositions().page_propositions(request)?)
    }

    pub fn list_arguments(
        &self,
        request: &PageRequest<ArgumentSortField>,
    ) -> GraphResult<Page<Argument>> {
        Ok(self.arguments().page_arguments(request)?)
    }

    /// Arguments that use `id` as their premise.
    pub fn arguments_with_premise(&self, id: PropositionId) -> GraphResult<Vec<Argument>> {
        Ok(self.arguments().find_by_premise(id)?)
    }

    /// Arguments that use `id` as their conclusion.
    pub fn arguments_with_conclusion(&self, id: PropositionId) -> GraphResult<Vec<Argument>> {
        Ok(self.arguments().find_by_conclusion(id)?)
    }

    /// CONNECTION propositions that use `id` as an operand.
    pub fn compositions_using(&self, id: PropositionId) -> GraphResult<Vec<Proposition>> {
        Ok(self.propositions().find_compositions_using(id)?)
    }

    fn propositions(&self) -> SqlitePropositionRepository<'conn> {
        SqlitePropositionRepository::on_checked(self.conn)
    }

    fn arguments(&self) -> SqliteArgumentRepository<'conn> {
        SqliteArgumentRepository::on_checked(self.conn)
    }

    fn write<T, F>(&self, event: &'static str, op: F) -> GraphResult<T>
    where
        F: FnOnce(&Connection) -> GraphResult<T>,
    {
        let started_at = Instant::now();
        debug!("event={event} module=graph status=start");

        let result = if self.conn.is_autocommit() {
            run_in_transaction(self.conn, op)
        } else {
            op(self.conn)
        };

        match &result {
            Ok(_) => info!(
                "event={event} module=graph status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event={event} module=graph status=error duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }
}

fn run_in_transaction<T, F>(conn: &Connection, op: F) -> GraphResult<T>
where
    F: FnOnce(&Connection) -> GraphResult<T>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = op(&tx)?;
    tx.commit()?;
    Ok(value)
}

fn ensure_operands_exist(
    propositions: &impl PropositionRepository,
    proposition: &Proposition,
) -> GraphResult<()> {
    let operands = [
        (ReferenceRole::Operand1, proposition.proposition1),
        (ReferenceRole::Operand2, proposition.proposition2),
    ];
    ensure_references_exist(propositions, &operands)
}

fn ensure_endpoints_exist(
    propositions: &impl PropositionRepository,
    argument: &Argument,
) -> GraphResult<()> {
    let endpoints = [
        (ReferenceRole::Premise, argument.premise),
        (ReferenceRole::Conclusion, argument.conclusion),
    ];
    ensure_references_exist(propositions, &endpoints)
}

fn ensure_references_exist(
    propositions: &impl PropositionRepository,
    references: &[(ReferenceRole, Option<PropositionId>)],
) -> GraphResult<()> {
    for &(role, reference) in references {
        let Some(proposition_id) = reference else {
            continue;
        };
        if propositions.get_proposition(proposition_id)?.is_none() {
            return Err(GraphServiceError::DanglingReference {
                role,
                proposition_id,
            });
        }
    }
    Ok(())
}

/// Walks stored operand links from the new operands; reaching `id` means a cycle.
fn ensure_acyclic(
    propositions: &impl PropositionRepository,
    id: PropositionId,
    proposition: &Proposition,
) -> GraphResult<()> {
    let mut visited = HashSet::new();
    let mut pending: Vec<PropositionId> = proposition.operands().collect();

    while let Some(current) = pending.pop() {
        if current == id {
            return Err(GraphServiceError::CompositionCycle(id));
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(operand) = propositions.get_proposition(current)? {
            pending.extend(operand.operands());
        }
    }
    Ok(())
}
