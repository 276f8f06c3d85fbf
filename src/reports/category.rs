//! Spending per category against each category's cap
//!
//! Expenses are grouped by category title. The cap of a row is the share of
//! total income its active category allows; titles with no active category
//! get a cap of zero.

use std::collections::BTreeMap;

use crate::error::BudgetCapResult;
use crate::models::{Money, OwnerId, Percentage};
use crate::storage::BudgetStore;

use super::filter::ReportFilter;

/// One category line of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReportRow {
    pub title: String,
    pub total_spent: Money,
    /// Percentage of the active category with this title, zero if none
    pub percentage: Percentage,
    /// `percentage` of total income, rounded to whole cents
    pub cap_allowed: Money,
    pub exceeded: bool,
}

/// Spending by category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub filter: ReportFilter,
    /// All-time income the caps are computed from
    pub total_income: Money,
    /// Rows ordered by title
    pub rows: Vec<CategoryReportRow>,
}

impl CategoryReport {
    pub fn generate<S: BudgetStore>(
        store: &S,
        owner: &OwnerId,
        filter: ReportFilter,
    ) -> BudgetCapResult<Self> {
        let categories = store.list_categories(owner)?;
        let total_income = store.total_income(owner)?;

        let title_of = |id| {
            categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.title.clone())
        };

        let mut spent_by_title: BTreeMap<String, Money> = BTreeMap::new();
        for expense in store.list_expenses(owner)?.iter().filter(|e| filter.matches(e)) {
            let Some(title) = title_of(expense.category_id) else {
                continue;
            };
            *spent_by_title.entry(title).or_insert_with(Money::zero) += expense.amount;
        }

        let rows = spent_by_title
            .into_iter()
            .map(|(title, total_spent)| {
                let points: u32 = categories
                    .iter()
                    .filter(|c| c.active && c.title == title)
                    .map(|c| c.percentage.value() as u32)
                    .sum();
                let percentage = Percentage::new(points.min(100) as u8).unwrap_or(Percentage::FULL);
                let cap_allowed = percentage.of(total_income);

                CategoryReportRow {
                    title,
                    total_spent,
                    percentage,
                    cap_allowed,
                    exceeded: total_spent > cap_allowed,
                }
            })
            .collect();

        Ok(Self {
            filter,
            total_income,
            rows,
        })
    }

    /// Sum spent across all rows
    pub fn total_spent(&self) -> Money {
        self.rows.iter().map(|r| r.total_spent).sum()
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::from("Spending by Category\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!("Total income: {}\n\n", self.total_income));

        output.push_str(&format!(
            "{:<30} {:>12} {:>6} {:>12} {:>8}\n",
            "Category", "Spent", "%", "Cap", ""
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<30} {:>12} {:>6} {:>12} {:>8}\n",
                row.title,
                row.total_spent,
                row.percentage,
                row.cap_allowed,
                if row.exceeded { "OVER" } else { "" }
            ));
        }

        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!("{:<30} {:>12}\n", "TOTAL", self.total_spent()));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryId, Expense, IncomeEntry};
    use crate::storage::Storage;
    use chrono::NaiveDate;

    fn owner() -> OwnerId {
        OwnerId::from("ana")
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn category(title: &str, pct: u8, active: bool) -> Category {
        let mut c = Category::new(owner(), title, Percentage::new(pct).unwrap());
        c.active = active;
        c
    }

    fn spend(storage: &Storage, category: CategoryId, cents: i64, date: NaiveDate) {
        storage
            .insert_expense(&Expense::new(owner(), "x", Money::from_cents(cents), date, category))
            .unwrap();
    }

    #[test]
    fn test_rows_caps_and_exceeded() {
        let storage = Storage::in_memory();
        let rent = category("Rent", 50, true);
        let food = category("Food", 25, true);
        let old = category("Old", 25, false);
        for c in [&rent, &food, &old] {
            storage.insert_category(c).unwrap();
        }
        storage
            .insert_income(&IncomeEntry::new(owner(), Money::from_cents(100_001), day(1, 1)))
            .unwrap();

        spend(&storage, rent.id, 40_000, day(1, 2));
        spend(&storage, food.id, 30_000, day(1, 3));
        spend(&storage, old.id, 100, day(1, 4));

        let report = CategoryReport::generate(&storage, &owner(), ReportFilter::all()).unwrap();
        let titles: Vec<_> = report.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Food", "Old", "Rent"]);

        let food_row = &report.rows[0];
        // 25% of 1000.01 is 250.0025, rounded to 250.00
        assert_eq!(food_row.cap_allowed, Money::from_cents(25_000));
        assert!(food_row.exceeded);

        let old_row = &report.rows[1];
        assert_eq!(old_row.percentage, Percentage::ZERO);
        assert_eq!(old_row.cap_allowed, Money::zero());
        assert!(old_row.exceeded);

        let rent_row = &report.rows[2];
        assert_eq!(rent_row.cap_allowed, Money::from_cents(50_001));
        assert!(!rent_row.exceeded);

        assert_eq!(report.total_spent(), Money::from_cents(70_100));
    }

    #[test]
    fn test_filters_narrow_rows() {
        let storage = Storage::in_memory();
        let rent = category("Rent", 50, true);
        let food = category("Food", 50, true);
        storage.insert_category(&rent).unwrap();
        storage.insert_category(&food).unwrap();

        spend(&storage, rent.id, 100, day(1, 10));
        spend(&storage, food.id, 200, day(2, 10));
        spend(&storage, food.id, 300, day(3, 10));

        let by_category = CategoryReport::generate(
            &storage,
            &owner(),
            ReportFilter::all().category(food.id),
        )
        .unwrap();
        assert_eq!(by_category.rows.len(), 1);
        assert_eq!(by_category.rows[0].total_spent, Money::from_cents(500));

        let by_date = CategoryReport::generate(
            &storage,
            &owner(),
            ReportFilter::all().from(day(2, 1)).to(day(2, 28)),
        )
        .unwrap();
        assert_eq!(by_date.rows.len(), 1);
        assert_eq!(by_date.rows[0].title, "Food");
        assert_eq!(by_date.rows[0].total_spent, Money::from_cents(200));
    }

    #[test]
    fn test_generating_twice_is_identical() {
        let storage = Storage::in_memory();
        let rent = category("Rent", 50, true);
        storage.insert_category(&rent).unwrap();
        spend(&storage, rent.id, 100, day(1, 10));

        let first = CategoryReport::generate(&storage, &owner(), ReportFilter::all()).unwrap();
        let second = CategoryReport::generate(&storage, &owner(), ReportFilter::all()).unwrap();
        assert_eq!(first, second);
    }
}
