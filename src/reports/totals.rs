//! Income, expense and balance totals over an optional date range

use chrono::NaiveDate;

use crate::error::BudgetCapResult;
use crate::models::{Money, OwnerId};
use crate::storage::BudgetStore;

/// Income and expense totals for one owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsReport {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub income: Money,
    pub expense: Money,
    /// `income - expense`
    pub balance: Money,
}

impl TotalsReport {
    /// Sum income and expenses dated within `from..=to` (either bound optional)
    pub fn generate<S: BudgetStore>(
        store: &S,
        owner: &OwnerId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> BudgetCapResult<Self> {
        let in_range =
            |date: NaiveDate| from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t);

        let income: Money = store
            .list_income(owner)?
            .iter()
            .filter(|e| in_range(e.date))
            .map(|e| e.amount)
            .sum();

        let expense: Money = store
            .list_expenses(owner)?
            .iter()
            .filter(|e| in_range(e.date))
            .map(|e| e.amount)
            .sum();

        Ok(Self {
            from,
            to,
            income,
            expense,
            balance: income - expense,
        })
    }

    pub fn format_terminal(&self) -> String {
        let range = match (self.from, self.to) {
            (None, None) => "all time".to_string(),
            (Some(f), None) => format!("since {}", f),
            (None, Some(t)) => format!("until {}", t),
            (Some(f), Some(t)) => format!("{} to {}", f, t),
        };

        let mut output = format!("Totals ({})\n", range);
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!("{:<20} {:>15}\n", "Income", self.income));
        output.push_str(&format!("{:<20} {:>15}\n", "Expenses", self.expense));
        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!("{:<20} {:>15}\n", "Balance", self.balance));
        output
    }
}
