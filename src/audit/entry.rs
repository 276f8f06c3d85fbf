//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::diff::generate_diff;
use crate::models::{Category, Expense, IncomeEntry, OwnerId};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Category,
    Income,
    Expense,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Category => write!(f, "Category"),
            EntityType::Income => write!(f, "Income"),
            EntityType::Expense => write!(f, "Expense"),
        }
    }
}

/// A record that can appear in the audit log
pub trait Auditable: Serialize {
    const ENTITY: EntityType;

    fn audit_id(&self) -> String;
    fn audit_owner(&self) -> &OwnerId;
    fn audit_name(&self) -> String;
}

impl Auditable for Category {
    const ENTITY: EntityType = EntityType::Category;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_owner(&self) -> &OwnerId {
        &self.owner
    }

    fn audit_name(&self) -> String {
        self.title.clone()
    }
}

impl Auditable for IncomeEntry {
    const ENTITY: EntityType = EntityType::Income;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_owner(&self) -> &OwnerId {
        &self.owner
    }

    fn audit_name(&self) -> String {
        format!("{} on {}", self.amount, self.date)
    }
}

impl Auditable for Expense {
    const ENTITY: EntityType = EntityType::Expense;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_owner(&self) -> &OwnerId {
        &self.owner
    }

    fn audit_name(&self) -> String {
        self.description.clone()
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Owner of the affected record
    pub owner: OwnerId,

    /// Human-readable description of the entity (title, description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Record before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Record after the operation (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn blank<T: Auditable>(operation: Operation, record: &T) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type: T::ENTITY,
            entity_id: record.audit_id(),
            owner: record.audit_owner().clone(),
            entity_name: Some(record.audit_name()),
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly created record
    pub fn created<T: Auditable>(record: &T) -> Self {
        let mut entry = Self::blank(Operation::Create, record);
        entry.after = serde_json::to_value(record).ok();
        entry
    }

    /// Entry for an update, with a field-level diff summary
    pub fn updated<T: Auditable>(before: &T, after: &T) -> Self {
        let mut entry = Self::blank(Operation::Update, after);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        entry.diff_summary = match (&entry.before, &entry.after) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };
        entry
    }

    /// Entry for a deleted record
    pub fn deleted<T: Auditable>(record: &T) -> Self {
        let mut entry = Self::blank(Operation::Delete, record);
        entry.before = serde_json::to_value(record).ok();
        entry
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} by {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id,
            self.owner
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
