//! Audit logging for budgetcap
//!
//! Every create, update and delete made through a service is recorded in an
//! append-only JSONL log with before/after snapshots of the record.
//!
//! - `AuditEntry`: one log line, built from any `Auditable` record
//! - `AuditLogger`: appends and reads entries
//! - `generate_diff`: one-line summary of the fields an update changed

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, Auditable, EntityType, Operation};
pub use logger::AuditLogger;
