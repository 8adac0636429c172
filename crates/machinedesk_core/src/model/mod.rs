//! Domain model for tracked machines.
//!
//! # Responsibility
//! - Define the canonical machine record used by core business logic.
//! - Own field validation rules shared by write paths and row decoding.
//!
//! # Invariants
//! - Every persisted machine is identified by a store-assigned `MachineId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod machine;
