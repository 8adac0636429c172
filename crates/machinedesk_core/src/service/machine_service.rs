//! Machine use-case service.
//!
//! # Responsibility
//! - Validate raw form input before touching the store.
//! - Run each operation on its own short-lived connection and transaction.
//! - Map persistence failures into a small tagged error set for callers.
//!
//! # Invariants
//! - Validation failures never open a connection.
//! - Every write is one statement committed in one transaction; failures roll
//!   back.
//! - `get_machine` reports absence as `Ok(None)`, not as an error.

use crate::db::{DbError, MachineStore};
use crate::model::machine::{Machine, MachineFields, MachineId, MachineValidationError};
use crate::repo::machine_repo::{
    MachineRepository, RepoError, RepoResult, SqliteMachineRepository,
};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error returned by every machine operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before reaching the store.
    Validation(MachineValidationError),
    /// Update/delete target does not exist.
    NotFound(MachineId),
    /// Store open/read/write failure.
    Store(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(_) => f.write_str("Machine not found."),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<MachineValidationError> for ServiceError {
    fn from(value: MachineValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Store(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(RepoError::from(value))
    }
}

/// Use-case service for machine CRUD over a `MachineStore`.
pub struct MachineService {
    store: MachineStore,
}

impl MachineService {
    /// Creates a service over an opened store.
    pub fn new(store: MachineStore) -> Self {
        Self { store }
    }

    /// Validates raw input, returning trimmed fields.
    ///
    /// # Errors
    /// - `ServiceError::Validation` when `name` or `line` is blank, or
    ///   `status` is not one of the enumerated values.
    pub fn validate(name: &str, line: &str, status: &str) -> ServiceResult<MachineFields> {
        Ok(MachineFields::parse(name, line, status)?)
    }

    /// Lists all machines, newest (`id DESC`) first.
    pub fn list_machines(&self) -> ServiceResult<Vec<Machine>> {
        let started_at = Instant::now();
        let result = self.read(|repo| repo.list_machines());
        match &result {
            Ok(machines) => debug!(
                "event=machine_list module=service status=ok count={} duration_ms={}",
                machines.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("machine_list", None, started_at, err),
        }
        result
    }

    /// Creates a machine and returns its store-assigned id.
    ///
    /// Duplicate name/line/status combinations are allowed.
    pub fn create_machine(
        &self,
        name: &str,
        line: &str,
        status: &str,
    ) -> ServiceResult<MachineId> {
        let started_at = Instant::now();
        let fields = Self::validate(name, line, status)
            .inspect_err(|err| log_failure("machine_create", None, started_at, err))?;

        let result = self.write(|repo| repo.insert_machine(&fields));
        match &result {
            Ok(id) => info!(
                "event=machine_create module=service status=ok machine_id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("machine_create", None, started_at, err),
        }
        result
    }

    /// Overwrites `name`, `line` and `status` of machine `id`.
    ///
    /// # Errors
    /// - `ServiceError::Validation` for invalid input (store untouched).
    /// - `ServiceError::NotFound` when no machine has `id`.
    pub fn update_machine(
        &self,
        id: MachineId,
        name: &str,
        line: &str,
        status: &str,
    ) -> ServiceResult<()> {
        let started_at = Instant::now();
        let fields = Self::validate(name, line, status)
            .inspect_err(|err| log_failure("machine_update", Some(id), started_at, err))?;

        let result = self.write(|repo| repo.update_machine(id, &fields));
        match &result {
            Ok(()) => info!(
                "event=machine_update module=service status=ok machine_id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("machine_update", Some(id), started_at, err),
        }
        result
    }

    /// Deletes machine `id`.
    ///
    /// # Errors
    /// - `ServiceError::NotFound` when no machine has `id`.
    pub fn delete_machine(&self, id: MachineId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.write(|repo| repo.delete_machine(id));
        match &result {
            Ok(()) => info!(
                "event=machine_delete module=service status=ok machine_id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("machine_delete", Some(id), started_at, err),
        }
        result
    }

    /// Loads machine `id`, or `None` when it does not exist.
    pub fn get_machine(&self, id: MachineId) -> ServiceResult<Option<Machine>> {
        let started_at = Instant::now();
        let result = self.read(|repo| repo.get_machine(id));
        match &result {
            Ok(found) => debug!(
                "event=machine_get module=service status=ok machine_id={} found={} duration_ms={}",
                id,
                found.is_some(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("machine_get", Some(id), started_at, err),
        }
        result
    }

    /// Returns the underlying store handle.
    pub fn store(&self) -> &MachineStore {
        &self.store
    }

    /// Closes the underlying store handle.
    pub fn close(self) {
        self.store.close();
    }

    fn read<T>(
        &self,
        op: impl FnOnce(&SqliteMachineRepository<'_>) -> RepoResult<T>,
    ) -> ServiceResult<T> {
        let conn = self.store.open_connection()?;
        let repo = SqliteMachineRepository::try_new(&conn)?;
        Ok(op(&repo)?)
    }

    fn write<T>(
        &self,
        op: impl FnOnce(&SqliteMachineRepository<'_>) -> RepoResult<T>,
    ) -> ServiceResult<T> {
        let mut conn = self.store.open_connection()?;
        let tx = conn.transaction()?;
        let value = {
            let repo = SqliteMachineRepository::try_new(&tx)?;
            op(&repo)?
        };
        tx.commit()?;
        Ok(value)
    }
}

fn log_failure(event: &str, id: Option<MachineId>, started_at: Instant, err: &ServiceError) {
    let machine_id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    let duration_ms = started_at.elapsed().as_millis();
    match err {
        ServiceError::Validation(_) => warn!(
            "event={event} module=service status=error machine_id={machine_id} duration_ms={duration_ms} error_code=validation_failed"
        ),
        ServiceError::NotFound(_) => warn!(
            "event={event} module=service status=error machine_id={machine_id} duration_ms={duration_ms} error_code=not_found"
        ),
        ServiceError::Store(store_err) => error!(
            "event={event} module=service status=error machine_id={machine_id} duration_ms={duration_ms} error_code=store_failed error={store_err}"
        ),
    }
}
