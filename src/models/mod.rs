//! Core data models for budgetcap
//!
//! Categories with percentage caps, income entries and expenses, plus the
//! value types (money, percentages, ids, owner keys) they are built from.

pub mod category;
pub mod expense;
pub mod ids;
pub mod income;
pub mod money;
pub mod owner;
pub mod percentage;

pub use category::{Category, CategoryDraft, CategoryValidationError};
pub use expense::{Expense, ExpenseDraft, ExpenseOrigin, ExpenseValidationError};
pub use ids::{CategoryId, ExpenseId, IncomeId};
pub use income::{IncomeDraft, IncomeEntry, IncomeValidationError};
pub use money::{Money, MoneyParseError};
pub use owner::OwnerId;
pub use percentage::{Percentage, PercentageError};
