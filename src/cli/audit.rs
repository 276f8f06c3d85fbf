//! Audit log CLI command

use crate::error::BudgetCapResult;
use crate::models::OwnerId;
use crate::storage::Storage;

/// Print the owner's most recent audit entries, oldest first
pub fn handle_audit_command(
    storage: &Storage,
    owner: &OwnerId,
    recent: usize,
) -> BudgetCapResult<()> {
    let Some(logger) = storage.audit_log() else {
        println!("Audit logging is disabled (audit_enabled = false in config.json).");
        return Ok(());
    };

    let entries = logger.read_recent(owner, recent)?;
    if entries.is_empty() {
        println!("No audit entries in {}", logger.path().display());
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
