//! Monthly spending series

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::error::BudgetCapResult;
use crate::models::{Money, OwnerId};
use crate::storage::BudgetStore;

use super::filter::ReportFilter;

/// Spending of one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total: Money,
}

impl MonthlyTotal {
    /// `MM/YYYY`
    pub fn label(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }
}

/// Filtered spending grouped by month, oldest month first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySeries {
    pub filter: ReportFilter,
    pub months: Vec<MonthlyTotal>,
}

impl MonthlySeries {
    pub fn generate<S: BudgetStore>(
        store: &S,
        owner: &OwnerId,
        filter: ReportFilter,
    ) -> BudgetCapResult<Self> {
        let mut by_month: BTreeMap<(i32, u32), Money> = BTreeMap::new();

        for expense in store.list_expenses(owner)?.iter().filter(|e| filter.matches(e)) {
            *by_month
                .entry((expense.date.year(), expense.date.month()))
                .or_insert_with(Money::zero) += expense.amount;
        }

        let months = by_month
            .into_iter()
            .map(|((year, month), total)| MonthlyTotal { year, month, total })
            .collect();

        Ok(Self { filter, months })
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::from("Monthly Spending\n");
        output.push_str(&"=".repeat(30));
        output.push('\n');

        if self.months.is_empty() {
            output.push_str("No expenses.\n");
            return output;
        }

        for month in &self.months {
            output.push_str(&format!("{:<10} {:>19}\n", month.label(), month.total));
        }
        output
    }
}
