//! Current-month overview: income, expenses, balance and spend by category

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::error::BudgetCapResult;
use crate::models::{Money, OwnerId};
use crate::storage::BudgetStore;

/// Home screen figures for the month containing `today`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub year: i32,
    pub month: u32,
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
    /// (category title, spent this month), ordered by title
    pub by_category: Vec<(String, Money)>,
}

impl Dashboard {
    pub fn generate<S: BudgetStore>(
        store: &S,
        owner: &OwnerId,
        today: NaiveDate,
    ) -> BudgetCapResult<Self> {
        let (year, month) = (today.year(), today.month());
        let in_month = |date: NaiveDate| date.year() == year && date.month() == month;

        let income: Money = store
            .list_income(owner)?
            .iter()
            .filter(|e| in_month(e.date))
            .map(|e| e.amount)
            .sum();

        let categories = store.list_categories(owner)?;
        let mut by_title: BTreeMap<String, Money> = BTreeMap::new();
        let mut expense = Money::zero();

        for e in store.list_expenses(owner)?.iter().filter(|e| in_month(e.date)) {
            expense += e.amount;
            if let Some(category) = categories.iter().find(|c| c.id == e.category_id) {
                *by_title
                    .entry(category.title.clone())
                    .or_insert_with(Money::zero) += e.amount;
            }
        }

        Ok(Self {
            year,
            month,
            income,
            expense,
            balance: income - expense,
            by_category: by_title.into_iter().collect(),
        })
    }

    pub fn format_terminal(&self) -> String {
        let mut output = format!("Dashboard {:02}/{}\n", self.month, self.year);
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!("{:<20} {:>19}\n", "Income", self.income));
        output.push_str(&format!("{:<20} {:>19}\n", "Expenses", self.expense));
        output.push_str(&format!("{:<20} {:>19}\n", "Balance", self.balance));

        if !self.by_category.is_empty() {
            output.push_str("\nBy category\n");
            output.push_str(&"-".repeat(40));
            output.push('\n');
            for (title, spent) in &self.by_category {
                output.push_str(&format!("{:<20} {:>19}\n", title, spent));
            }
        }
        output
    }
}
