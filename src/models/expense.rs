//! Expense model
//!
//! Every expense is tagged with exactly one category. Expenses written by the
//! income distributor remember the entry they came from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, ExpenseId, IncomeId};
use super::income::MAX_DESCRIPTION_LEN;
use super::money::Money;
use super::owner::OwnerId;

/// How an expense came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpenseOrigin {
    /// Entered by the user and checked against the category cap
    #[default]
    Manual,
    /// Generated when an income entry was distributed across categories
    Distribution { income_id: IncomeId },
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub owner: OwnerId,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub category_id: CategoryId,
    #[serde(default)]
    pub origin: ExpenseOrigin,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new manual expense
    pub fn new(
        owner: OwnerId,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        category_id: CategoryId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            owner,
            description: description.into(),
            amount,
            date,
            category_id,
            origin: ExpenseOrigin::Manual,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a manual expense from a draft
    pub fn from_draft(owner: OwnerId, draft: &ExpenseDraft) -> Self {
        Self::new(
            owner,
            draft.description.trim(),
            draft.amount,
            draft.date,
            draft.category_id,
        )
    }

    /// Overwrite description, amount, date and category.
    ///
    /// Id, owner, origin and creation time never change after creation.
    pub fn apply(&mut self, draft: &ExpenseDraft) {
        self.description = draft.description.trim().to_string();
        self.amount = draft.amount;
        self.date = draft.date;
        self.category_id = draft.category_id;
        self.updated_at = Utc::now();
    }

    /// The income entry this expense was generated from, if any
    pub fn source_income(&self) -> Option<IncomeId> {
        match self.origin {
            ExpenseOrigin::Distribution { income_id } => Some(income_id),
            ExpenseOrigin::Manual => None,
        }
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_fields(&self.description, self.amount)
    }
}

/// Editable fields of an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub category_id: CategoryId,
}

impl ExpenseDraft {
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        category_id: CategoryId,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
            category_id,
        }
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_fields(&self.description, self.amount)
    }
}

impl From<&Expense> for ExpenseDraft {
    fn from(expense: &Expense) -> Self {
        Self {
            description: expense.description.clone(),
            amount: expense.amount,
            date: expense.date,
            category_id: expense.category_id,
        }
    }
}

fn validate_fields(description: &str, amount: Money) -> Result<(), ExpenseValidationError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ExpenseValidationError::EmptyDescription);
    }
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(ExpenseValidationError::DescriptionTooLong(len));
    }
    if !amount.is_positive() {
        return Err(ExpenseValidationError::NonPositiveAmount);
    }
    if amount > Money::MAX_AMOUNT {
        return Err(ExpenseValidationError::AmountTooLarge);
    }
    Ok(())
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyDescription,
    DescriptionTooLong(usize),
    NonPositiveAmount,
    AmountTooLarge,
}

impl ExpenseValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyDescription | Self::DescriptionTooLong(_) => "description",
            Self::NonPositiveAmount | Self::AmountTooLarge => "amount",
        }
    }
}

impl std::fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
            Self::NonPositiveAmount => write!(f, "Expense amount must be greater than zero"),
            Self::AmountTooLarge => {
                write!(f, "Expense amount cannot exceed {}", Money::MAX_AMOUNT)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 26).unwrap()
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut expense = Expense::new(
            OwnerId::from("u1"),
            "Lunch",
            Money::from_units(10),
            today(),
            CategoryId::new(),
        );
        let id = expense.id;
        let created = expense.created_at;
        let other_category = CategoryId::new();

        expense.apply(&ExpenseDraft::new(" Dinner ", Money::from_units(25), today(), other_category));

        assert_eq!(expense.id, id);
        assert_eq!(expense.created_at, created);
        assert_eq!(expense.owner.as_str(), "u1");
        assert_eq!(expense.description, "Dinner");
        assert_eq!(expense.category_id, other_category);
        assert_eq!(expense.origin, ExpenseOrigin::Manual);
    }

    #[test]
    fn test_validation() {
        let cat = CategoryId::new();
        assert!(ExpenseDraft::new("Bus", Money::from_cents(1), today(), cat).validate().is_ok());
        assert_eq!(
            ExpenseDraft::new(" ", Money::from_cents(1), today(), cat).validate(),
            Err(ExpenseValidationError::EmptyDescription)
        );
        let err = ExpenseDraft::new("Bus", Money::zero(), today(), cat)
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "amount");

        let err = ExpenseDraft::new("Bus", Money::MAX_AMOUNT + Money::from_cents(1), today(), cat)
            .validate()
            .unwrap_err();
        assert_eq!(err, ExpenseValidationError::AmountTooLarge);
        assert_eq!(err.field(), "amount");
    }

    #[test]
    fn test_origin_serialization() {
        let income_id = IncomeId::new();
        let mut expense = Expense::new(
            OwnerId::from("u1"),
            "Share",
            Money::from_units(1),
            today(),
            CategoryId::new(),
        );
        expense.origin = ExpenseOrigin::Distribution { income_id };

        let json = serde_json::to_string(&expense).unwrap();
        assert!(json.contains("\"kind\":\"distribution\""));
        let back: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source_income(), Some(income_id));
    }
}
