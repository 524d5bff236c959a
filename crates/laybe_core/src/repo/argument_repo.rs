//! Argument repository contracts and SQLite implementation.
//!
//! Mirrors the proposition store: identity is assigned on create, updates
//! replace every field, and deletes of missing ids succeed silently.
//! Premise/conclusion lookups replace stored inverse collections.

use super::page::{ArgumentSortField, Page, PageRequest};
use super::schema::ensure_table_ready;
use super::{with_read_snapshot, EntityKind, RepoError, RepoResult};
use crate::model::argument::{Argument, ArgumentId};
use crate::model::kinds::ArgumentType;
use crate::model::proposition::PropositionId;
use rusqlite::{params, Connection, Row};

const ARGUMENT_SELECT_SQL: &str = "SELECT
    id,
    type,
    premise_id,
    conclusion_id
FROM arguments";

const ARGUMENT_COLUMNS: &[&str] = &["id", "type", "premise_id", "conclusion_id"];

/// Repository interface for argument storage.
pub trait ArgumentRepository {
    fn create_argument(&self, argument: &Argument) -> RepoResult<Argument>;
    fn update_argument(&self, argument: &Argument) -> RepoResult<Argument>;
    fn get_argument(&self, id: ArgumentId) -> RepoResult<Option<Argument>>;
    fn page_arguments(&self, request: &PageRequest<ArgumentSortField>)
        -> RepoResult<Page<Argument>>;
    fn delete_argument(&self, id: ArgumentId) -> RepoResult<()>;
    /// Arguments whose premise is `id`, ordered by argument id.
    fn find_by_premise(&self, id: PropositionId) -> RepoResult<Vec<Argument>>;
    /// Arguments whose conclusion is `id`, ordered by argument id.
    fn find_by_conclusion(&self, id: PropositionId) -> RepoResult<Vec<Argument>>;
}

/// SQLite-backed argument repository.
pub struct SqliteArgumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArgumentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "arguments", ARGUMENT_COLUMNS)?;
        Ok(Self { conn })
    }

    pub(crate) fn on_checked(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn list_where(&self, column: &str, id: PropositionId) -> RepoResult<Vec<Argument>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARGUMENT_SELECT_SQL} WHERE {column} = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_argument_row(row)?);
        }
        Ok(items)
    }
}

impl ArgumentRepository for SqliteArgumentRepository<'_> {
    fn create_argument(&self, argument: &Argument) -> RepoResult<Argument> {
        if argument.id.is_some() {
            return Err(RepoError::AlreadyIdentified(EntityKind::Argument));
        }

        self.conn.execute(
            "INSERT INTO arguments (type, premise_id, conclusion_id) VALUES (?1, ?2, ?3);",
            params![argument.kind.as_str(), argument.premise, argument.conclusion],
        )?;

        let mut stored = argument.clone();
        stored.id = Some(self.conn.last_insert_rowid());
        Ok(stored)
    }

    fn update_argument(&self, argument: &Argument) -> RepoResult<Argument> {
        let id = argument
            .id
            .ok_or(RepoError::MissingId(EntityKind::Argument))?;

        let changed = self.conn.execute(
            "UPDATE arguments
             SET
                type = ?1,
                premise_id = ?2,
                conclusion_id = ?3
             WHERE id = ?4;",
            params![
                argument.kind.as_str(),
                argument.premise,
                argument.conclusion,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Argument,
                id,
            });
        }

        Ok(argument.clone())
    }

    fn get_argument(&self, id: ArgumentId) -> RepoResult<Option<Argument>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARGUMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_argument_row(row)?));
        }
        Ok(None)
    }

    fn page_arguments(
        &self,
        request: &PageRequest<ArgumentSortField>,
    ) -> RepoResult<Page<Argument>> {
        let page_size = request.effective_page_size()?;
        let sql = format!(
            "{ARGUMENT_SELECT_SQL} {} LIMIT ?1 OFFSET ?2;",
            request.order_by_sql()
        );

        with_read_snapshot(self.conn, |conn| {
            let total_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM arguments;", [], |row| row.get(0))?;

            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params![
                i64::from(page_size),
                request.offset(page_size)
            ])?;
            let mut items = Vec::new();
            while let Some(row) = rows.next()? {
                items.push(parse_argument_row(row)?);
            }

            Ok(Page {
                items,
                total_count: u64::try_from(total_count).unwrap_or_default(),
                page_index: request.page_index,
                page_size,
            })
        })
    }

    fn delete_argument(&self, id: ArgumentId) -> RepoResult<()> {
        self.conn.execute("DELETE FROM arguments WHERE id = ?1;", [id])?;
        Ok(())
    }

    fn find_by_premise(&self, id: PropositionId) -> RepoResult<Vec<Argument>> {
        self.list_where("premise_id", id)
    }

    fn find_by_conclusion(&self, id: PropositionId) -> RepoResult<Vec<Argument>> {
        self.list_where("conclusion_id", id)
    }
}

fn parse_argument_row(row: &Row<'_>) -> RepoResult<Argument> {
    let kind = row.get::<_, String>("type")?.parse::<ArgumentType>()?;
    Ok(Argument {
        id: Some(row.get("id")?),
        kind,
        premise: row.get("premise_id")?,
        conclusion: row.get("conclusion_id")?,
    })
}
