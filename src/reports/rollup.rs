//! All-time, month-to-date, week-to-date and today spending

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::BudgetCapResult;
use crate::models::{Money, OwnerId};
use crate::storage::BudgetStore;

/// Spending totals relative to a reference day.
///
/// The windows only have a lower bound, so expenses dated after `today`
/// count toward all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendingRollup {
    pub today: NaiveDate,
    pub total: Money,
    /// Since the first day of the current month
    pub monthly: Money,
    /// Since the Monday of the current week
    pub weekly: Money,
    /// Dated exactly `today`
    pub daily: Money,
}

impl SpendingRollup {
    pub fn generate<S: BudgetStore>(
        store: &S,
        owner: &OwnerId,
        today: NaiveDate,
    ) -> BudgetCapResult<Self> {
        let month_start = today.with_day(1).unwrap_or(today);
        let week_start = today - Duration::days(today.weekday().num_days_from_monday() as i64);

        let mut rollup = Self {
            today,
            total: Money::zero(),
            monthly: Money::zero(),
            weekly: Money::zero(),
            daily: Money::zero(),
        };

        for expense in store.list_expenses(owner)? {
            rollup.total += expense.amount;
            if expense.date >= month_start {
                rollup.monthly += expense.amount;
            }
            if expense.date >= week_start {
                rollup.weekly += expense.amount;
            }
            if expense.date == today {
                rollup.daily += expense.amount;
            }
        }

        Ok(rollup)
    }

    pub fn format_terminal(&self) -> String {
        let mut output = format!("Spending as of {}\n", self.today);
        output.push_str(&"=".repeat(36));
        output.push('\n');
        output.push_str(&format!("{:<16} {:>19}\n", "Today", self.daily));
        output.push_str(&format!("{:<16} {:>19}\n", "This week", self.weekly));
        output.push_str(&format!("{:<16} {:>19}\n", "This month", self.monthly));
        output.push_str(&format!("{:<16} {:>19}\n", "All time", self.total));
        output
    }
}
