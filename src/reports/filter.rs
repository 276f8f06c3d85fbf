//! Expense filter shared by the category and monthly reports

use chrono::NaiveDate;

use crate::models::{CategoryId, Expense};

/// Narrows the expenses a report looks at. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub category_id: Option<CategoryId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ReportFilter {
    /// No filtering at all
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    /// Whether `date` falls inside the date bounds
    pub fn includes_date(&self, date: NaiveDate) -> bool {
        self.date_from.map_or(true, |from| date >= from)
            && self.date_to.map_or(true, |to| date <= to)
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.category_id.map_or(true, |id| expense.category_id == id)
            && self.includes_date(expense.date)
    }
}
