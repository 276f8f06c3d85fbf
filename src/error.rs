//! Custom error types for budgetcap
//!
//! Every failure of the budget engine is a typed, recoverable value. A failed
//! write never leaves partial state behind, and each variant carries enough
//! context to be re-displayed next to the offending field.

use thiserror::Error;

use crate::models::{CategoryId, Money};

/// The main error type for budgetcap operations
#[derive(Error, Debug)]
pub enum BudgetCapError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Field-level validation errors (required, range, type)
    #[error("Validation error on '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Active category percentages would exceed the limit
    #[error(
        "Cannot allocate {requested}%: active categories already use {current_total}% (limit {limit}%)"
    )]
    CategoryCapExceeded {
        current_total: u32,
        requested: u8,
        limit: u32,
    },

    /// An expense would push a category over its cap
    #[error(
        "Expense of {requested} exceeds the cap of {cap} for category '{category}' (already spent {spent})"
    )]
    ExpenseCapExceeded {
        category: String,
        cap: Money,
        spent: Money,
        requested: Money,
    },

    /// Referenced category is missing, owned by someone else, or inactive
    #[error("Invalid category {category_id}: {reason}")]
    InvalidCategory {
        category_id: CategoryId,
        reason: &'static str,
    },

    /// Categories selected for auto-distribution do not total 100%
    #[error("Distribution categories total {total}%, expected exactly 100%")]
    DistributionMismatch { total: u32 },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The store rejected a write (constraint violation)
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetCapError {
    /// Create a validation error for a field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for income entries
    pub fn income_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Income entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// The form field this error should be displayed against, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::CategoryCapExceeded { .. } | Self::DistributionMismatch { .. } => {
                Some("percentage")
            }
            Self::ExpenseCapExceeded { .. } => Some("amount"),
            Self::InvalidCategory { .. } => Some("category_id"),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if a category or expense cap was violated
    pub fn is_cap_exceeded(&self) -> bool {
        matches!(
            self,
            Self::CategoryCapExceeded { .. } | Self::ExpenseCapExceeded { .. }
        )
    }
}

impl From<std::io::Error> for BudgetCapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetCapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for budgetcap operations
pub type BudgetCapResult<T> = Result<T, BudgetCapError>;
