//! Service layer for budgetcap
//!
//! The services hold the budget rules on top of a `BudgetStore`: every write
//! is validated, checked against the caps and persisted inside the store's
//! write gate, then recorded in the audit log.

pub mod category;
pub mod expense;
pub mod income;

pub use category::{CategoryDeletion, CategoryService, ALLOCATION_LIMIT};
pub use expense::ExpenseService;
pub use income::{IncomeService, RecordedIncome};

use crate::audit::AuditEntry;
use crate::storage::BudgetStore;

/// Append audit entries for a write that has already been persisted.
///
/// The write stands even if the audit log cannot be appended to, so a
/// failure here is only logged.
pub(crate) fn record_audit<S: BudgetStore>(store: &S, entries: &[AuditEntry]) {
    if let Err(e) = store.record_audit(entries) {
        tracing::warn!(error = %e, count = entries.len(), "failed to write audit log");
    }
}
