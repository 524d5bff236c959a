//! Proposition repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/get/page/delete over `propositions`.
//! - Answer derived back-relation queries (compositions using an operand).
//!
//! # Invariants
//! - Write paths call `Proposition::validate()` before SQL mutations.
//! - Operand references are stored as given; existence and acyclicity are
//!   the graph service's responsibility (foreign keys still apply).
//! - Read paths reject unknown enumeration tokens instead of masking them.

use super::page::{Page, PageRequest, PropositionSortField};
use super::schema::ensure_table_ready;
use super::{with_read_snapshot, EntityKind, RepoError, RepoResult};
use crate::model::kinds::{ConnectionType, PropositionType};
use crate::model::proposition::{Proposition, PropositionId};
use rusqlite::{params, Connection, Row};

const PROPOSITION_SELECT_SQL: &str = "SELECT
    id,
    type,
    text,
    connection_type,
    proposition1_id,
    proposition2_id
FROM propositions";

const PROPOSITION_COLUMNS: &[&str] = &[
    "id",
    "type",
    "text",
    "connection_type",
    "proposition1_id",
    "proposition2_id",
];

/// Repository interface for proposition storage.
pub trait PropositionRepository {
    /// Persists a transient proposition and returns it with `id` assigned.
    fn create_proposition(&self, proposition: &Proposition) -> RepoResult<Proposition>;
    /// Replaces every stored field of an existing proposition.
    fn update_proposition(&self, proposition: &Proposition) -> RepoResult<Proposition>;
    /// Exact lookup by id.
    fn get_proposition(&self, id: PropositionId) -> RepoResult<Option<Proposition>>;
    /// Returns one ordered slice plus the total row count.
    fn page_propositions(
        &self,
        request: &PageRequest<PropositionSortField>,
    ) -> RepoResult<Page<Proposition>>;
    /// Removes one proposition. Missing ids are a no-op.
    fn delete_proposition(&self, id: PropositionId) -> RepoResult<()>;
    /// Lists CONNECTION propositions that use `id` as operand 1 or 2.
    fn find_compositions_using(&self, id: PropositionId) -> RepoResult<Vec<Proposition>>;
}

/// SQLite-backed proposition repository.
pub struct SqlitePropositionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePropositionRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "propositions", PROPOSITION_COLUMNS)?;
        Ok(Self { conn })
    }

    /// Wraps a connection whose schema was already checked.
    pub(crate) fn on_checked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PropositionRepository for SqlitePropositionRepository<'_> {
    fn create_proposition(&self, proposition: &Proposition) -> RepoResult<Proposition> {
        if proposition.id.is_some() {
            return Err(RepoError::AlreadyIdentified(EntityKind::Proposition));
        }
        proposition.validate()?;

        self.conn.execute(
            "INSERT INTO propositions (
                type,
                text,
                connection_type,
                proposition1_id,
                proposition2_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                proposition.kind.as_str(),
                proposition.text.as_deref(),
                proposition.connection_type.map(ConnectionType::as_str),
                proposition.proposition1,
                proposition.proposition2,
            ],
        )?;

        let mut stored = proposition.clone();
        stored.id = Some(self.conn.last_insert_rowid());
        Ok(stored)
    }

    fn update_proposition(&self, proposition: &Proposition) -> RepoResult<Proposition> {
        let id = proposition
            .id
            .ok_or(RepoError::MissingId(EntityKind::Proposition))?;
        proposition.validate()?;

        let changed = self.conn.execute(
            "UPDATE propositions
             SET
                type = ?1,
                text = ?2,
                connection_type = ?3,
                proposition1_id = ?4,
                proposition2_id = ?5
             WHERE id = ?6;",
            params![
                proposition.kind.as_str(),
                proposition.text.as_deref(),
                proposition.connection_type.map(ConnectionType::as_str),
                proposition.proposition1,
                proposition.proposition2,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Proposition,
                id,
            });
        }

        Ok(proposition.clone())
    }

    fn get_proposition(&self, id: PropositionId) -> RepoResult<Option<Proposition>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROPOSITION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_proposition_row(row)?));
        }
        Ok(None)
    }

    fn page_propositions(
        &self,
        request: &PageRequest<PropositionSortField>,
    ) -> RepoResult<Page<Proposition>> {
        let page_size = request.effective_page_size()?;
        let sql = format!(
            "{PROPOSITION_SELECT_SQL} {} LIMIT ?1 OFFSET ?2;",
            request.order_by_sql()
        );

        with_read_snapshot(self.conn, |conn| {
            let total_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM propositions;", [], |row| row.get(0))?;

            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params![
                i64::from(page_size),
                request.offset(page_size)
            ])?;
            let mut items = Vec::new();
            while let Some(row) = rows.next()? {
                items.push(parse_proposition_row(row)?);
            }

            Ok(Page {
                items,
                total_count: u64::try_from(total_count).unwrap_or_default(),
                page_index: request.page_index,
                page_size,
            })
        })
    }

    fn delete_proposition(&self, id: PropositionId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM propositions WHERE id = ?1;", [id])?;
        Ok(())
    }

    fn find_compositions_using(&self, id: PropositionId) -> RepoResult<Vec<Proposition>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROPOSITION_SELECT_SQL}
             WHERE proposition1_id = ?1
                OR proposition2_id = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_proposition_row(row)?);
        }
        Ok(items)
    }
}

fn parse_proposition_row(row: &Row<'_>) -> RepoResult<Proposition> {
    let kind = row.get::<_, String>("type")?.parse::<PropositionType>()?;
    let connection_type = row
        .get::<_, Option<String>>("connection_type")?
        .map(|value| value.parse::<ConnectionType>())
        .transpose()?;

    Ok(Proposition {
        id: Some(row.get("id")?),
        kind,
        text: row.get("text")?,
        connection_type,
        proposition1: row.get("proposition1_id")?,
        proposition2: row.get("proposition2_id")?,
    })
}
