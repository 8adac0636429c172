//! Core domain logic for MachineDesk.
//! This crate is the single source of truth for machine invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{default_store_path, DbError, DbResult, MachineStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::machine::{
    valid_status_list, Machine, MachineFields, MachineId, MachineStatus, MachineValidationError,
};
pub use repo::machine_repo::{MachineRepository, RepoError, RepoResult, SqliteMachineRepository};
pub use service::machine_service::{MachineService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
