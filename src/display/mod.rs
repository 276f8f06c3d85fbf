//! Display formatting for terminal output
//!
//! Turns categories, income entries and expenses into plain-text tables,
//! using the currency symbol and date format from the user's settings.

pub mod category;
pub mod expense;
pub mod income;

pub use category::{format_category_details, format_category_list};
pub use expense::{format_expense_details, format_expense_list};
pub use income::format_income_list;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::models::Money;

/// Currency and date presentation preferences
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub date_format: String,
}

impl DisplayOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", head)
}
