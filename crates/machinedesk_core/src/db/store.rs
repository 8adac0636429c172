//! Explicit store handle.
//!
//! # Responsibility
//! - Remember where the store file lives and provision it once at startup.
//! - Hand out short-lived, configured connections to service operations.
//!
//! # Invariants
//! - A `MachineStore` value only exists after `initialize()` succeeded.
//! - No connection is cached; every `open_connection()` call opens a new one.

use super::open::{open_configured, open_db};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File name of the store inside the installation directory.
pub const STORE_FILE_NAME: &str = "data.db";

/// Handle over the single local store file.
///
/// Lifecycle is `open` (provisions schema) -> `open_connection` any number of
/// times -> `close`.
#[derive(Debug)]
pub struct MachineStore {
    path: PathBuf,
}

impl MachineStore {
    /// Opens the store at `path`, creating the parent directory and the
    /// schema when missing.
    ///
    /// # Errors
    /// - `DbError::Io` when the parent directory cannot be created.
    /// - `DbError::Sqlite` when the file cannot be opened or provisioned.
    /// - `DbError::UnsupportedSchemaVersion` for stores written by a newer build.
    pub fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self { path };
        store.initialize()?;
        Ok(store)
    }

    /// Ensures the `machines` table exists.
    ///
    /// Idempotent: an already provisioned store keeps its schema and rows.
    pub fn initialize(&self) -> DbResult<()> {
        let started_at = Instant::now();
        match open_db(&self.path) {
            Ok(_conn) => {
                info!(
                    "event=store_init module=db status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_init module=db status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Opens a new connection to the provisioned store.
    ///
    /// Rows read through it are addressable by column name
    /// (`row.get("name")`). The caller drops it when the operation is done.
    pub fn open_connection(&self) -> DbResult<Connection> {
        open_configured(&self.path)
    }

    /// Returns the store file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ends the handle lifecycle.
    pub fn close(self) {
        info!("event=store_close module=db status=ok");
    }
}

/// Resolves the default store location: `data.db` in the directory that
/// contains the running executable.
pub fn default_store_path() -> DbResult<PathBuf> {
    let exe = std::env::current_exe()?;
    let install_dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(install_dir.join(STORE_FILE_NAME))
}
