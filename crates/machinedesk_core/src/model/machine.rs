//! Machine domain model.
//!
//! # Responsibility
//! - Define the persisted `Machine` record and unsaved `MachineFields` input.
//! - Define the closed `MachineStatus` enumeration.
//! - Validate raw form input into trimmed, typed fields.
//!
//! # Invariants
//! - `name` and `line` are non-empty after trimming.
//! - `status` is one of `operational | maintenance | offline`.
//! - `id` and `created_at` are assigned by the store and never change.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned machine identifier (`machines.id`).
pub type MachineId = i64;

/// Operational state of a machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    /// Running normally.
    #[default]
    Operational,
    /// Taken out of production for service.
    Maintenance,
    /// Not running.
    Offline,
}

impl MachineStatus {
    /// Every status, in form display order.
    pub const ALL: [MachineStatus; 3] = [Self::Operational, Self::Maintenance, Self::Offline];

    /// Returns the stored/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Maintenance => "maintenance",
            Self::Offline => "offline",
        }
    }

    /// Parses the exact stored representation. Matching is case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "operational" => Some(Self::Operational),
            "maintenance" => Some(Self::Maintenance),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }
}

impl Display for MachineStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineStatus {
    type Err = MachineValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| MachineValidationError::InvalidStatus(value.to_string()))
    }
}

/// Validation failure for machine input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineValidationError {
    /// `name` is empty or whitespace-only.
    MissingName,
    /// `line` is empty or whitespace-only.
    MissingLine,
    /// `status` is outside the enumeration; carries the rejected value.
    InvalidStatus(String),
}

impl Display for MachineValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => f.write_str("Machine name is required."),
            Self::MissingLine => f.write_str("Production line is required."),
            Self::InvalidStatus(_) => {
                write!(f, "Status must be one of: {}", valid_status_list())
            }
        }
    }
}

impl Error for MachineValidationError {}

/// Returns valid status values sorted alphabetically and comma-joined.
pub fn valid_status_list() -> String {
    let mut values = MachineStatus::ALL.map(MachineStatus::as_str);
    values.sort_unstable();
    values.join(", ")
}

/// Validated, trimmed machine input that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineFields {
    pub name: String,
    pub line: String,
    pub status: MachineStatus,
}

impl MachineFields {
    /// Validates raw input and returns trimmed fields.
    ///
    /// Checks run in order `name`, `line`, `status`; the first failure is
    /// returned.
    pub fn parse(name: &str, line: &str, status: &str) -> Result<Self, MachineValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MachineValidationError::MissingName);
        }
        let line = line.trim();
        if line.is_empty() {
            return Err(MachineValidationError::MissingLine);
        }
        let status = status.parse::<MachineStatus>()?;

        Ok(Self {
            name: name.to_string(),
            line: line.to_string(),
            status,
        })
    }
}

/// Persisted machine record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    /// Production line label.
    pub line: String,
    pub status: MachineStatus,
    /// Store timestamp, `YYYY-MM-DD HH:MM:SS` in UTC.
    pub created_at: String,
}

impl Machine {
    /// Checks text invariants of a decoded record.
    pub fn validate(&self) -> Result<(), MachineValidationError> {
        if self.name.trim().is_empty() {
            return Err(MachineValidationError::MissingName);
        }
        if self.line.trim().is_empty() {
            return Err(MachineValidationError::MissingLine);
        }
        Ok(())
    }
}
