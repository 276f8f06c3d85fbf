//! End-to-end engine behaviour against the in-memory store and a store that
//! fails on demand.

use std::cell::Cell;

use chrono::NaiveDate;

use budgetcap::config::{DistributionSelector, DistributionSettings};
use budgetcap::models::{
    Category, CategoryDraft, CategoryId, Expense, ExpenseDraft, ExpenseId, IncomeDraft,
    IncomeEntry, IncomeId, Money, OwnerId, Percentage,
};
use budgetcap::reports::{CategoryReport, MonthlySeries, ReportFilter, SpendingRollup, TotalsReport};
use budgetcap::services::{CategoryService, ExpenseService, IncomeService};
use budgetcap::storage::{BudgetStore, Storage};
use budgetcap::{BudgetCapError, BudgetCapResult};

fn owner() -> OwnerId {
    OwnerId::from("u")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn pct(value: u8) -> Percentage {
    Percentage::new(value).unwrap()
}

fn category<S: BudgetStore>(store: &S, title: &str, percentage: u8) -> Category {
    CategoryService::new(store)
        .create(&owner(), &CategoryDraft::new(title, pct(percentage)))
        .unwrap()
}

fn income<S: BudgetStore>(store: &S, units: i64, date: NaiveDate) -> IncomeEntry {
    IncomeService::new(store)
        .with_today(date)
        .record_income(&owner(), &IncomeDraft::new("Salary", Money::from_units(units)))
        .unwrap()
        .entry
}

fn expense_draft(units: i64, date: NaiveDate, category: &Category) -> ExpenseDraft {
    ExpenseDraft::new("Groceries", Money::from_units(units), date, category.id)
}

#[test]
fn expense_within_cap_is_accepted() {
    let store = Storage::in_memory();
    let food = category(&store, "Food", 50);
    income(&store, 100, day(2025, 6, 1));

    let expense = ExpenseService::new(&store)
        .create(&owner(), &expense_draft(10, day(2025, 6, 2), &food))
        .unwrap();

    assert_eq!(expense.amount, Money::from_units(10));
    assert_eq!(store.category_spend(&owner(), food.id, None).unwrap(), Money::from_units(10));
}

#[test]
fn expense_over_cap_is_rejected() {
    let store = Storage::in_memory();
    let food = category(&store, "Food", 50);
    income(&store, 10, day(2025, 6, 1));

    let err = ExpenseService::new(&store)
        .create(&owner(), &expense_draft(10, day(2025, 6, 2), &food))
        .unwrap_err();

    assert!(err.is_cap_exceeded());
    assert_eq!(err.field(), Some("amount"));
    assert!(store.list_expenses(&owner()).unwrap().is_empty());
}

#[test]
fn allocation_over_one_hundred_is_rejected() {
    let store = Storage::in_memory();
    category(&store, "A", 30);

    let err = CategoryService::new(&store)
        .create(&owner(), &CategoryDraft::new("B", pct(71)))
        .unwrap_err();

    assert!(matches!(
        err,
        BudgetCapError::CategoryCapExceeded {
            current_total: 30,
            requested: 71,
            ..
        }
    ));
    assert_eq!(store.list_categories(&owner()).unwrap().len(), 1);
}

#[test]
fn full_allocation_leaves_no_room_for_one_more_percent() {
    let store = Storage::in_memory();
    category(&store, "Everything", 100);

    let service = CategoryService::new(&store);
    assert_eq!(service.allocated_total(&owner()).unwrap(), 100);
    assert!(service
        .create(&owner(), &CategoryDraft::new("Extra", pct(1)))
        .unwrap_err()
        .is_cap_exceeded());
}

#[test]
fn deactivated_category_frees_its_percentage() {
    let store = Storage::in_memory();
    let rent = category(&store, "Rent", 70);
    let service = CategoryService::new(&store);

    service
        .update(
            &owner(),
            rent.id,
            &CategoryDraft::new("Rent", pct(70)).with_active(false),
        )
        .unwrap();

    assert_eq!(service.allocated_total(&owner()).unwrap(), 0);
    service
        .create(&owner(), &CategoryDraft::new("Food", pct(100)))
        .unwrap();
}

#[test]
fn full_percentage_caps_at_total_income() {
    let income = Money::from_cents(123_457);
    assert_eq!(Percentage::FULL.of(income), income);
}

#[test]
fn oversized_income_is_rejected() {
    let store = Storage::in_memory();

    let err = IncomeService::new(&store)
        .record_income(
            &owner(),
            &IncomeDraft::new("Windfall", Money::from_cents(50_000_000_000_000_000)),
        )
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.field(), Some("amount"));
    assert!(store.list_income(&owner()).unwrap().is_empty());
}

#[test]
fn huge_stored_income_does_not_break_cap_checks() {
    let store = Storage::in_memory();
    let food = category(&store, "Food", 50);
    // Records written before amounts were bounded can still sum past i64
    for _ in 0..2 {
        store
            .insert_income(&IncomeEntry::new(
                owner(),
                Money::from_cents(i64::MAX / 2 + 1),
                day(2025, 6, 1),
            ))
            .unwrap();
    }

    let expense = ExpenseService::new(&store)
        .create(&owner(), &expense_draft(1, day(2025, 6, 2), &food))
        .unwrap();
    assert_eq!(expense.amount, Money::from_units(1));

    let totals = TotalsReport::generate(&store, &owner(), None, None).unwrap();
    assert_eq!(totals.income, Money::from_cents(i64::MAX));
    CategoryReport::generate(&store, &owner(), ReportFilter::all()).unwrap();
}

#[test]
fn totals_report_balances_income_and_spending() {
    let store = Storage::in_memory();
    let today = day(2025, 6, 20);
    let food = category(&store, "Food", 50);
    income(&store, 500, today);
    ExpenseService::new(&store)
        .create(&owner(), &expense_draft(200, today, &food))
        .unwrap();

    let totals = TotalsReport::generate(&store, &owner(), None, None).unwrap();

    assert_eq!(totals.income, Money::from_units(500));
    assert_eq!(totals.expense, Money::from_units(200));
    assert_eq!(totals.balance, Money::from_units(300));
}

#[test]
fn rollup_windows_nest() {
    let store = Storage::in_memory();
    let today = day(2025, 6, 20);
    let all = category(&store, "All", 100);
    income(&store, 1000, day(2025, 6, 1));

    let expenses = ExpenseService::new(&store);
    for (units, date) in [(300, day(2025, 6, 2)), (200, day(2025, 6, 10)), (100, today)] {
        expenses
            .create(&owner(), &expense_draft(units, date, &all))
            .unwrap();
    }

    let rollup = SpendingRollup::generate(&store, &owner(), today).unwrap();

    assert_eq!(rollup.total, Money::from_units(600));
    assert_eq!(rollup.daily, Money::from_units(100));
    assert!(rollup.monthly >= rollup.daily);
    assert!(rollup.weekly >= rollup.daily);
    assert_eq!(rollup.monthly, Money::from_units(600));

    let series = MonthlySeries::generate(&store, &owner(), ReportFilter::all()).unwrap();
    assert_eq!(series.months.len(), 1);
    assert_eq!(series.months[0].total, Money::from_units(600));
}

#[test]
fn reports_are_idempotent() {
    let store = Storage::in_memory();
    let food = category(&store, "Food", 40);
    category(&store, "Rent", 60);
    income(&store, 2000, day(2025, 6, 1));
    ExpenseService::new(&store)
        .create(&owner(), &expense_draft(150, day(2025, 6, 3), &food))
        .unwrap();

    let first = CategoryReport::generate(&store, &owner(), ReportFilter::all()).unwrap();
    let second = CategoryReport::generate(&store, &owner(), ReportFilter::all()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.rows.len(), 1);
    assert_eq!(first.rows[0].cap_allowed, Money::from_units(800));
    assert!(!first.rows[0].exceeded);
}

#[test]
fn category_round_trips_through_file_store() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let paths = budgetcap::config::BudgetCapPaths::with_base_dir(temp_dir.path().to_path_buf());

    let created = {
        let store = Storage::open(paths.clone(), false).unwrap();
        CategoryService::new(&store)
            .create(
                &owner(),
                &CategoryDraft::new("Travel", pct(15)).with_description("Trips"),
            )
            .unwrap()
    };

    let store = Storage::open(paths, false).unwrap();
    let loaded = CategoryService::new(&store)
        .get(&owner(), created.id)
        .unwrap()
        .unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.description.as_deref(), Some("Trips"));
}

#[test]
fn concurrent_allocations_cannot_both_pass_the_check() {
    let store = Storage::in_memory();

    let results: Vec<BudgetCapResult<Category>> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["Left", "Right"]
            .into_iter()
            .map(|title| {
                let store = &store;
                scope.spawn(move || {
                    CategoryService::new(store).create(&owner(), &CategoryDraft::new(title, pct(60)))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(CategoryService::new(&store).allocated_total(&owner()).unwrap(), 60);
}

#[test]
fn distribution_splits_income_without_losing_cents() {
    let store = Storage::in_memory();
    category(&store, "Needs", 50);
    category(&store, "Wants", 30);
    category(&store, "Savings", 20);

    let recorded = IncomeService::new(&store)
        .with_today(day(2025, 6, 1))
        .with_distribution(DistributionSettings {
            enabled: true,
            selector: DistributionSelector::Active,
        })
        .record_income(&owner(), &IncomeDraft::new("Bonus", Money::from_cents(100_001)))
        .unwrap();

    let distributed: Money = recorded.generated.iter().map(|e| e.amount).sum();
    assert_eq!(distributed, Money::from_cents(100_001));
    assert_eq!(recorded.generated.len(), 3);
}

/// Delegates to an in-memory store but refuses expense inserts once armed
struct FailingStore {
    inner: Storage,
    fail_expense_inserts_after: Cell<Option<usize>>,
    fail_income_deletes: Cell<bool>,
}

impl FailingStore {
    fn new() -> Self {
        Self {
            inner: Storage::in_memory(),
            fail_expense_inserts_after: Cell::new(None),
            fail_income_deletes: Cell::new(false),
        }
    }

    fn fail_after(&self, successful_inserts: usize) {
        self.fail_expense_inserts_after.set(Some(successful_inserts));
    }
}

impl BudgetStore for FailingStore {
    fn serialized<T, F>(&self, f: F) -> BudgetCapResult<T>
    where
        F: FnOnce() -> BudgetCapResult<T>,
    {
        self.inner.serialized(f)
    }

    fn list_categories(&self, owner: &OwnerId) -> BudgetCapResult<Vec<Category>> {
        self.inner.list_categories(owner)
    }

    fn get_category(&self, owner: &OwnerId, id: CategoryId) -> BudgetCapResult<Option<Category>> {
        self.inner.get_category(owner, id)
    }

    fn insert_category(&self, category: &Category) -> BudgetCapResult<()> {
        self.inner.insert_category(category)
    }

    fn update_category(&self, category: &Category) -> BudgetCapResult<()> {
        self.inner.update_category(category)
    }

    fn delete_category(&self, owner: &OwnerId, id: CategoryId) -> BudgetCapResult<bool> {
        self.inner.delete_category(owner, id)
    }

    fn list_income(&self, owner: &OwnerId) -> BudgetCapResult<Vec<IncomeEntry>> {
        self.inner.list_income(owner)
    }

    fn get_income(&self, owner: &OwnerId, id: IncomeId) -> BudgetCapResult<Option<IncomeEntry>> {
        self.inner.get_income(owner, id)
    }

    fn insert_income(&self, entry: &IncomeEntry) -> BudgetCapResult<()> {
        self.inner.insert_income(entry)
    }

    fn update_income(&self, entry: &IncomeEntry) -> BudgetCapResult<()> {
        self.inner.update_income(entry)
    }

    fn delete_income(&self, owner: &OwnerId, id: IncomeId) -> BudgetCapResult<bool> {
        if self.fail_income_deletes.get() {
            return Err(BudgetCapError::PersistenceFailure("disk full".into()));
        }
        self.inner.delete_income(owner, id)
    }

    fn list_expenses(&self, owner: &OwnerId) -> BudgetCapResult<Vec<Expense>> {
        self.inner.list_expenses(owner)
    }

    fn get_expense(&self, owner: &OwnerId, id: ExpenseId) -> BudgetCapResult<Option<Expense>> {
        self.inner.get_expense(owner, id)
    }

    fn insert_expense(&self, expense: &Expense) -> BudgetCapResult<()> {
        match self.fail_expense_inserts_after.get() {
            Some(0) => Err(BudgetCapError::PersistenceFailure("disk full".into())),
            Some(n) => {
                self.fail_expense_inserts_after.set(Some(n - 1));
                self.inner.insert_expense(expense)
            }
            None => self.inner.insert_expense(expense),
        }
    }

    fn update_expense(&self, expense: &Expense) -> BudgetCapResult<()> {
        self.inner.update_expense(expense)
    }

    fn delete_expense(&self, owner: &OwnerId, id: ExpenseId) -> BudgetCapResult<bool> {
        self.inner.delete_expense(owner, id)
    }
}

#[test]
fn failed_expense_write_surfaces_persistence_failure() {
    let store = FailingStore::new();
    let food = category(&store, "Food", 50);
    income(&store, 100, day(2025, 6, 1));
    store.fail_after(0);

    let err = ExpenseService::new(&store)
        .create(&owner(), &expense_draft(10, day(2025, 6, 2), &food))
        .unwrap_err();

    assert!(matches!(err, BudgetCapError::PersistenceFailure(_)));
    assert!(store.list_expenses(&owner()).unwrap().is_empty());
}

#[test]
fn failed_distribution_leaves_nothing_behind() {
    let store = FailingStore::new();
    category(&store, "Needs", 50);
    category(&store, "Wants", 50);
    store.fail_after(1);

    let err = IncomeService::new(&store)
        .with_today(day(2025, 6, 1))
        .with_distribution(DistributionSettings {
            enabled: true,
            selector: DistributionSelector::Active,
        })
        .record_income(&owner(), &IncomeDraft::new("Salary", Money::from_units(1000)))
        .unwrap_err();

    assert!(matches!(err, BudgetCapError::PersistenceFailure(_)));
    assert!(store.list_income(&owner()).unwrap().is_empty());
    assert!(store.list_expenses(&owner()).unwrap().is_empty());
}

#[test]
fn failed_income_delete_restores_distributed_expenses() {
    let store = FailingStore::new();
    category(&store, "Needs", 50);
    category(&store, "Wants", 50);

    let recorded = IncomeService::new(&store)
        .with_today(day(2025, 6, 1))
        .with_distribution(DistributionSettings {
            enabled: true,
            selector: DistributionSelector::Active,
        })
        .record_income(&owner(), &IncomeDraft::new("Salary", Money::from_units(1000)))
        .unwrap();
    assert_eq!(recorded.generated.len(), 2);

    store.fail_income_deletes.set(true);
    let err = IncomeService::new(&store)
        .delete_with_distribution(&owner(), recorded.entry.id)
        .unwrap_err();

    assert!(matches!(err, BudgetCapError::PersistenceFailure(_)));
    assert_eq!(store.list_income(&owner()).unwrap().len(), 1);

    let mut kept: Vec<ExpenseId> = store
        .list_expenses(&owner())
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    let mut generated: Vec<ExpenseId> = recorded.generated.iter().map(|e| e.id).collect();
    kept.sort();
    generated.sort();
    assert_eq!(kept, generated);
}
