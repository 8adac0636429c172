//! Machine repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD statements over the `machines` table.
//! - Decode rows into typed `Machine` records.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - Lists are ordered by `id DESC`.
//! - `created_at` is never written by this module.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::machine::{Machine, MachineFields, MachineId, MachineStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MACHINE_SELECT_SQL: &str = "SELECT
    id,
    name,
    line,
    status,
    created_at
FROM machines";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for machine persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(MachineId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "machine not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted machine data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
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

/// Repository interface for machine CRUD operations.
pub trait MachineRepository {
    fn insert_machine(&self, fields: &MachineFields) -> RepoResult<MachineId>;
    fn update_machine(&self, id: MachineId, fields: &MachineFields) -> RepoResult<()>;
    fn delete_machine(&self, id: MachineId) -> RepoResult<()>;
    fn get_machine(&self, id: MachineId) -> RepoResult<Option<Machine>>;
    fn list_machines(&self) -> RepoResult<Vec<Machine>>;
}

/// SQLite-backed machine repository.
pub struct SqliteMachineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMachineRepository<'conn> {
    /// Wraps a connection after checking that the schema is provisioned.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_machine_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MachineRepository for SqliteMachineRepository<'_> {
    fn insert_machine(&self, fields: &MachineFields) -> RepoResult<MachineId> {
        self.conn.execute(
            "INSERT INTO machines (name, line, status) VALUES (?1, ?2, ?3);",
            params![
                fields.name.as_str(),
                fields.line.as_str(),
                fields.status.as_str()
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_machine(&self, id: MachineId, fields: &MachineFields) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE machines
             SET
                name = ?1,
                line = ?2,
                status = ?3
             WHERE id = ?4;",
            params![
                fields.name.as_str(),
                fields.line.as_str(),
                fields.status.as_str(),
                id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_machine(&self, id: MachineId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM machines WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_machine(&self, id: MachineId) -> RepoResult<Option<Machine>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MACHINE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_machine_row(row)?));
        }

        Ok(None)
    }

    fn list_machines(&self) -> RepoResult<Vec<Machine>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MACHINE_SELECT_SQL} ORDER BY id DESC;"))?;
        let mut rows = stmt.query([])?;
        let mut machines = Vec::new();

        while let Some(row) = rows.next()? {
            machines.push(parse_machine_row(row)?);
        }

        Ok(machines)
    }
}

fn parse_machine_row(row: &Row<'_>) -> RepoResult<Machine> {
    let id: MachineId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in machines.id"
        )));
    }

    let status_text: String = row.get("status")?;
    let status = MachineStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in machines.status (id={id})"
        ))
    })?;

    let created_at: String = row.get("created_at")?;
    if created_at.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty machines.created_at (id={id})"
        )));
    }

    let machine = Machine {
        id,
        name: row.get("name")?,
        line: row.get("line")?,
        status,
        created_at,
    };
    machine
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("{err} (id={id})")))?;
    Ok(machine)
}

fn ensure_machine_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'machines';",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(RepoError::InvalidData(
            "missing required table `machines`".to_string(),
        ));
    }

    Ok(())
}
