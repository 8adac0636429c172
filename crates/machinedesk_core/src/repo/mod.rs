//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for machine rows.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes take already validated `MachineFields`.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod machine_repo;
