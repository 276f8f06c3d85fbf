//! Storage layer for budgetcap
//!
//! `BudgetStore` is the persistence seam the services are written against.
//! `Storage` implements it with one JSON file per record set (atomic writes)
//! or, for tests, purely in memory.

pub mod file_io;
pub mod repository;

pub use file_io::{read_json, write_json_atomic};
pub use repository::{Record, Repository};

use std::sync::Mutex;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::BudgetCapPaths;
use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::{
    Category, CategoryId, Expense, ExpenseId, IncomeEntry, IncomeId, Money, OwnerId,
};

/// Owner-scoped persistence for categories, income entries and expenses
///
/// Lookups always take the owner: a record that belongs to someone else is
/// reported exactly like a missing one. The expense to category foreign key
/// is enforced here, so an expense can never point at an unknown category.
pub trait BudgetStore {
    /// Run `f` while holding the store-wide write gate.
    ///
    /// Read-check-write sequences go through here so two writers cannot
    /// both pass a check before either one writes. The gate is not
    /// reentrant: `f` must not call `serialized` again.
    ///
    /// For `Storage` the gate is an in-process `Mutex`. Separate processes
    /// sharing one data directory are not serialized against each other:
    /// each works on the records it loaded, and the last file write wins.
    fn serialized<T, F>(&self, f: F) -> BudgetCapResult<T>
    where
        F: FnOnce() -> BudgetCapResult<T>;

    fn list_categories(&self, owner: &OwnerId) -> BudgetCapResult<Vec<Category>>;
    fn get_category(&self, owner: &OwnerId, id: CategoryId) -> BudgetCapResult<Option<Category>>;
    fn insert_category(&self, category: &Category) -> BudgetCapResult<()>;
    fn update_category(&self, category: &Category) -> BudgetCapResult<()>;
    /// Fails with `PersistenceFailure` while expenses still reference it
    fn delete_category(&self, owner: &OwnerId, id: CategoryId) -> BudgetCapResult<bool>;

    fn list_income(&self, owner: &OwnerId) -> BudgetCapResult<Vec<IncomeEntry>>;
    fn get_income(&self, owner: &OwnerId, id: IncomeId) -> BudgetCapResult<Option<IncomeEntry>>;
    fn insert_income(&self, entry: &IncomeEntry) -> BudgetCapResult<()>;
    fn update_income(&self, entry: &IncomeEntry) -> BudgetCapResult<()>;
    fn delete_income(&self, owner: &OwnerId, id: IncomeId) -> BudgetCapResult<bool>;

    fn list_expenses(&self, owner: &OwnerId) -> BudgetCapResult<Vec<Expense>>;
    fn get_expense(&self, owner: &OwnerId, id: ExpenseId) -> BudgetCapResult<Option<Expense>>;
    /// Fails with `PersistenceFailure` if the category is unknown to the owner
    fn insert_expense(&self, expense: &Expense) -> BudgetCapResult<()>;
    /// Fails with `PersistenceFailure` if the category is unknown to the owner
    fn update_expense(&self, expense: &Expense) -> BudgetCapResult<()>;
    fn delete_expense(&self, owner: &OwnerId, id: ExpenseId) -> BudgetCapResult<bool>;

    /// Append an entry to the audit trail, if the store keeps one
    fn record_audit(&self, _entries: &[AuditEntry]) -> BudgetCapResult<()> {
        Ok(())
    }

    /// Sum of every income entry of the owner
    fn total_income(&self, owner: &OwnerId) -> BudgetCapResult<Money> {
        Ok(self.list_income(owner)?.iter().map(|e| e.amount).sum())
    }

    /// The owner's expenses in one category
    fn expenses_in_category(
        &self,
        owner: &OwnerId,
        category_id: CategoryId,
    ) -> BudgetCapResult<Vec<Expense>> {
        Ok(self
            .list_expenses(owner)?
            .into_iter()
            .filter(|e| e.category_id == category_id)
            .collect())
    }

    /// Sum spent in one category, leaving out `excluding` when given
    fn category_spend(
        &self,
        owner: &OwnerId,
        category_id: CategoryId,
        excluding: Option<ExpenseId>,
    ) -> BudgetCapResult<Money> {
        Ok(self
            .expenses_in_category(owner, category_id)?
            .iter()
            .filter(|e| Some(e.id) != excluding)
            .map(|e| e.amount)
            .sum())
    }
}

/// JSON-file (or in-memory) implementation of `BudgetStore`
pub struct Storage {
    categories: Repository<Category>,
    income: Repository<IncomeEntry>,
    expenses: Repository<Expense>,
    audit: Option<AuditLogger>,
    write_gate: Mutex<()>,
}

impl Storage {
    /// Open the file-backed store under `paths`, loading every record set
    pub fn open(paths: BudgetCapPaths, audit_enabled: bool) -> BudgetCapResult<Self> {
        paths.ensure_directories()?;

        let storage = Self {
            categories: Repository::new(paths.categories_file()),
            income: Repository::new(paths.income_file()),
            expenses: Repository::new(paths.expenses_file()),
            audit: audit_enabled.then(|| AuditLogger::new(paths.audit_log())),
            write_gate: Mutex::new(()),
        };

        storage.categories.load()?;
        storage.income.load()?;
        storage.expenses.load()?;

        tracing::debug!(
            categories = storage.categories.count()?,
            income = storage.income.count()?,
            expenses = storage.expenses.count()?,
            "storage loaded"
        );

        Ok(storage)
    }

    /// A store with no files and no audit log
    pub fn in_memory() -> Self {
        Self {
            categories: Repository::in_memory(),
            income: Repository::in_memory(),
            expenses: Repository::in_memory(),
            audit: None,
            write_gate: Mutex::new(()),
        }
    }

    /// The audit log, when enabled
    pub fn audit_log(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    fn require_category(&self, expense: &Expense) -> BudgetCapResult<()> {
        if self
            .categories
            .get(&expense.owner, expense.category_id)?
            .is_none()
        {
            return Err(BudgetCapError::PersistenceFailure(format!(
                "expense {} references unknown category {}",
                expense.id, expense.category_id
            )));
        }
        Ok(())
    }
}

impl BudgetStore for Storage {
    fn serialized<T, F>(&self, f: F) -> BudgetCapResult<T>
    where
        F: FnOnce() -> BudgetCapResult<T>,
    {
        let _guard = self
            .write_gate
            .lock()
            .map_err(|e| BudgetCapError::Storage(format!("Failed to acquire write gate: {}", e)))?;
        f()
    }

    fn list_categories(&self, owner: &OwnerId) -> BudgetCapResult<Vec<Category>> {
        self.categories.list(owner)
    }

    fn get_category(&self, owner: &OwnerId, id: CategoryId) -> BudgetCapResult<Option<Category>> {
        self.categories.get(owner, id)
    }

    fn insert_category(&self, category: &Category) -> BudgetCapResult<()> {
        self.categories.insert(category)
    }

    fn update_category(&self, category: &Category) -> BudgetCapResult<()> {
        self.categories.update(category)
    }

    fn delete_category(&self, owner: &OwnerId, id: CategoryId) -> BudgetCapResult<bool> {
        let referenced = self
            .expenses
            .list(owner)?
            .iter()
            .filter(|e| e.category_id == id)
            .count();
        if referenced > 0 {
            return Err(BudgetCapError::PersistenceFailure(format!(
                "category {} is still referenced by {} expense(s)",
                id, referenced
            )));
        }
        self.categories.delete(owner, id)
    }

    fn list_income(&self, owner: &OwnerId) -> BudgetCapResult<Vec<IncomeEntry>> {
        self.income.list(owner)
    }

    fn get_income(&self, owner: &OwnerId, id: IncomeId) -> BudgetCapResult<Option<IncomeEntry>> {
        self.income.get(owner, id)
    }

    fn insert_income(&self, entry: &IncomeEntry) -> BudgetCapResult<()> {
        self.income.insert(entry)
    }

    fn update_income(&self, entry: &IncomeEntry) -> BudgetCapResult<()> {
        self.income.update(entry)
    }

    fn delete_income(&self, owner: &OwnerId, id: IncomeId) -> BudgetCapResult<bool> {
        self.income.delete(owner, id)
    }

    fn list_expenses(&self, owner: &OwnerId) -> BudgetCapResult<Vec<Expense>> {
        self.expenses.list(owner)
    }

    fn get_expense(&self, owner: &OwnerId, id: ExpenseId) -> BudgetCapResult<Option<Expense>> {
        self.expenses.get(owner, id)
    }

    fn insert_expense(&self, expense: &Expense) -> BudgetCapResult<()> {
        self.require_category(expense)?;
        self.expenses.insert(expense)
    }

    fn update_expense(&self, expense: &Expense) -> BudgetCapResult<()> {
        self.require_category(expense)?;
        self.expenses.update(expense)
    }

    fn delete_expense(&self, owner: &OwnerId, id: ExpenseId) -> BudgetCapResult<bool> {
        self.expenses.delete(owner, id)
    }

    fn record_audit(&self, entries: &[AuditEntry]) -> BudgetCapResult<()> {
        match &self.audit {
            Some(logger) => logger.log_batch(entries),
            None => Ok(()),
        }
    }
}
