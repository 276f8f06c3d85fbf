//! Income entry model
//!
//! Income entries carry no cross-entity invariant of their own, but their sum
//! is the base every category cap is computed from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::IncomeId;
use super::money::Money;
use super::owner::OwnerId;

/// Maximum length of an income or expense description, in characters
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Validation errors for income entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    NonPositiveAmount,
    AmountTooLarge,
    DescriptionTooLong(usize),
}

impl IncomeValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount | Self::AmountTooLarge => "amount",
            Self::DescriptionTooLong(_) => "description",
        }
    }
}

impl std::fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Income amount must be greater than zero"),
            Self::AmountTooLarge => {
                write!(f, "Income amount cannot exceed {}", Money::MAX_AMOUNT)
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for IncomeValidationError {}

/// A recorded income entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: IncomeId,
    pub owner: OwnerId,
    #[serde(default)]
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IncomeEntry {
    /// Create a new income entry
    pub fn new(owner: OwnerId, amount: Money, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: IncomeId::new(),
            owner,
            description: String::new(),
            amount,
            date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build an entry from a draft, dating it `today` when the draft has no date
    pub fn from_draft(owner: OwnerId, draft: &IncomeDraft, today: NaiveDate) -> Self {
        let mut entry = Self::new(owner, draft.amount, draft.date.unwrap_or(today));
        entry.description = draft.description.trim().to_string();
        entry
    }

    /// Overwrite the editable fields; a draft without a date keeps the old one
    pub fn apply(&mut self, draft: &IncomeDraft) {
        self.description = draft.description.trim().to_string();
        self.amount = draft.amount;
        if let Some(date) = draft.date {
            self.date = date;
        }
        self.updated_at = Utc::now();
    }

    /// Validate the income entry
    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        validate_fields(self.amount, &self.description)
    }
}

/// Editable fields of an income entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeDraft {
    pub description: String,
    pub amount: Money,
    pub date: Option<NaiveDate>,
}

impl IncomeDraft {
    pub fn new(description: impl Into<String>, amount: Money) -> Self {
        Self {
            description: description.into(),
            amount,
            date: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        validate_fields(self.amount, &self.description)
    }
}

fn validate_fields(amount: Money, description: &str) -> Result<(), IncomeValidationError> {
    if !amount.is_positive() {
        return Err(IncomeValidationError::NonPositiveAmount);
    }
    if amount > Money::MAX_AMOUNT {
        return Err(IncomeValidationError::AmountTooLarge);
    }
    let len = description.trim().chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(IncomeValidationError::DescriptionTooLong(len));
    }
    Ok(())
}
