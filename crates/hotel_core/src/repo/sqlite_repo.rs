//! SQLite repository backend.
//!
//! # Responsibility
//! - Store one collection per table, keyed by `id INTEGER PRIMARY KEY`.
//! - Keep SQL text generation inside the persistence boundary.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT`: the next id is one past the largest id
//!   the table ever held, so deleted ids are never handed out again.
//! - Update touches only the columns present in the patch and reports
//!   absence through the affected-row count.
//! - `list` returns rows in ascending id order.
//!
//! No transaction wraps the update and its read-back; concurrent writers to
//! the same row race the same way they do on the JSON backend.

use super::{RepoError, RepoResult, Repository, SqlRecord};
use crate::db::migrations::{current_user_version, latest_version};
use crate::model::EntityId;
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, OptionalExtension};
use std::marker::PhantomData;

/// SQLite-backed repository for one entity table.
pub struct SqliteRepository<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: SqlRecord> SqliteRepository<'conn, E> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the table shape
    ///   is not the one this binary writes.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready::<E>(conn)?;
        Ok(Self {
            conn,
            _entity: PhantomData,
        })
    }

    /// SQLite reports `SQLITE_FULL` once `i64::MAX` has been assigned.
    fn insert_error(&self, err: rusqlite::Error) -> RepoError {
        let full = matches!(
            &err,
            rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::DiskFull
        );
        if full && self.high_water().ok() == Some(EntityId::MAX) {
            return RepoError::InvalidData("id space exhausted".to_string());
        }
        RepoError::from(err)
    }

    fn high_water(&self) -> RepoResult<EntityId> {
        let seq = self
            .conn
            .query_row(
                "SELECT seq FROM sqlite_sequence WHERE name = ?1;",
                [E::COLLECTION],
                |row| row.get::<_, EntityId>(0),
            )
            .optional()?;
        Ok(seq.unwrap_or(0))
    }

    fn select_sql() -> String {
        format!("SELECT id, {} FROM {}", E::COLUMNS.join(", "), E::COLLECTION)
    }
}

impl<E: SqlRecord> Repository<E> for SqliteRepository<'_, E> {
    fn list(&self) -> RepoResult<Vec<E>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id ASC;", Self::select_sql()))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(E::from_row(row)?);
        }

        debug!(
            "event=repo_list module=repo backend=sqlite entity={} status=ok count={}",
            E::NAME,
            records.len()
        );
        Ok(records)
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE id = ?1;", Self::select_sql()))?;
        let mut rows = stmt.query([id])?;
        let found = match rows.next()? {
            Some(row) => Some(E::from_row(row)?),
            None => None,
        };

        debug!(
            "event=repo_get module=repo backend=sqlite entity={} status=ok id={} found={}",
            E::NAME,
            id,
            found.is_some()
        );
        Ok(found)
    }

    fn create(&self, draft: &E::Draft) -> RepoResult<E> {
        let placeholders = (1..=E::COLUMNS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders}) RETURNING id;",
            E::COLLECTION,
            E::COLUMNS.join(", "),
        );

        let id: EntityId = self
            .conn
            .query_row(&sql, params_from_iter(E::draft_values(draft)), |row| {
                row.get(0)
            })
            .map_err(|err| self.insert_error(err))?;

        info!(
            "event=repo_create module=repo backend=sqlite entity={} status=ok id={}",
            E::NAME,
            id
        );
        Ok(E::from_draft(id, draft.clone()))
    }

    fn update(&self, id: EntityId, patch: &E::Patch) -> RepoResult<Option<E>> {
        let changes = E::patch_values(patch);
        if changes.is_empty() {
            return self.get_by_id(id);
        }

        let assignments = changes
            .iter()
            .enumerate()
            .map(|(index, (column, _))| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let column_count = changes.len();
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{};",
            E::COLLECTION,
            column_count + 1
        );
        let mut bind_values: Vec<Value> = changes.into_iter().map(|(_, value)| value).collect();
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            debug!(
                "event=repo_update module=repo backend=sqlite entity={} status=absent id={}",
                E::NAME,
                id
            );
            return Ok(None);
        }

        let merged = self.get_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "{} {id} disappeared between update and read-back",
                E::NAME
            ))
        })?;

        info!(
            "event=repo_update module=repo backend=sqlite entity={} status=ok id={} columns={}",
            E::NAME,
            id,
            column_count
        );
        Ok(Some(merged))
    }

    fn delete(&self, id: EntityId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", E::COLLECTION),
            [id],
        )?;

        if changed == 0 {
            debug!(
                "event=repo_delete module=repo backend=sqlite entity={} status=absent id={}",
                E::NAME,
                id
            );
            return Ok(false);
        }

        info!(
            "event=repo_delete module=repo backend=sqlite entity={} status=ok id={}",
            E::NAME,
            id
        );
        Ok(true)
    }
}

fn ensure_connection_ready<E: SqlRecord>(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, E::COLLECTION)? {
        return Err(RepoError::MissingRequiredTable(E::COLLECTION));
    }

    for column in std::iter::once("id").chain(E::COLUMNS.iter().copied()) {
        if !table_has_column(conn, E::COLLECTION, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: E::COLLECTION,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists = conn
        .query_row(
            "SELECT 1
             FROM sqlite_master
             WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
