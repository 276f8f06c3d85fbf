//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Arguments arrive as
//! strings and are turned into typed values here, so a bad amount or date is
//! reported against the field it belongs to.

pub mod audit;
pub mod category;
pub mod expense;
pub mod income;
pub mod report;

pub use audit::handle_audit_command;
pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use report::{handle_report_command, ReportCommands};

use chrono::NaiveDate;

use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::{Money, Percentage};

/// Parse an amount such as `10`, `10.50` or `$10.50`
pub fn parse_amount(s: &str) -> BudgetCapResult<Money> {
    Money::parse(s).map_err(|e| BudgetCapError::validation("amount", format!("Invalid amount: {}", e)))
}

/// Parse a `YYYY-MM-DD` date for the given field
pub fn parse_date(field: &'static str, s: &str) -> BudgetCapResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        BudgetCapError::validation(field, format!("Invalid date '{}', expected YYYY-MM-DD", s))
    })
}

/// Parse an optional date argument
pub fn parse_optional_date(
    field: &'static str,
    s: Option<&str>,
) -> BudgetCapResult<Option<NaiveDate>> {
    s.map(|s| parse_date(field, s)).transpose()
}

/// Check a whole-number percentage
pub fn parse_percentage(value: u32) -> BudgetCapResult<Percentage> {
    u8::try_from(value)
        .ok()
        .and_then(|v| Percentage::new(v).ok())
        .ok_or_else(|| {
            BudgetCapError::validation(
                "percentage",
                format!("Percentage must be between 0 and 100 (got {})", value),
            )
        })
}
