//! Expense service
//!
//! Every manual expense must fit under its category's cap: the category's
//! percentage of the owner's total recorded income.

use tracing::{info, warn};

use crate::audit::AuditEntry;
use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::{CategoryId, Expense, ExpenseDraft, ExpenseId, Money, OwnerId};
use crate::storage::BudgetStore;

use super::record_audit;

/// Service for expense management
pub struct ExpenseService<'a, S: BudgetStore> {
    store: &'a S,
}

impl<'a, S: BudgetStore> ExpenseService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validate a draft against its category's cap and persist it.
    ///
    /// `existing` names the expense being edited; its own amount is left out
    /// of the category spend so an edit is checked against the other
    /// expenses only.
    pub fn validate_and_save(
        &self,
        owner: &OwnerId,
        draft: &ExpenseDraft,
        existing: Option<ExpenseId>,
    ) -> BudgetCapResult<Expense> {
        draft
            .validate()
            .map_err(|e| BudgetCapError::validation(e.field(), e.to_string()))?;

        self.store.serialized(|| {
            let before = match existing {
                Some(id) => Some(
                    self.store
                        .get_expense(owner, id)?
                        .ok_or_else(|| BudgetCapError::expense_not_found(id.to_string()))?,
                ),
                None => None,
            };

            let category = self
                .store
                .get_category(owner, draft.category_id)?
                .ok_or(BudgetCapError::InvalidCategory {
                    category_id: draft.category_id,
                    reason: "category does not exist",
                })?;

            if !category.active {
                return Err(BudgetCapError::InvalidCategory {
                    category_id: category.id,
                    reason: "category is inactive",
                });
            }

            let total_income = self.store.total_income(owner)?;
            let spent = self.store.category_spend(owner, category.id, existing)?;

            if !category.percentage.allows(spent + draft.amount, total_income) {
                warn!(
                    owner = %owner,
                    category = %category.title,
                    spent = %spent,
                    requested = %draft.amount,
                    "expense over cap rejected"
                );
                return Err(BudgetCapError::ExpenseCapExceeded {
                    category: category.title,
                    cap: category.percentage.of(total_income),
                    spent,
                    requested: draft.amount,
                });
            }

            let expense = match before {
                Some(previous) => {
                    let mut updated = previous.clone();
                    updated.apply(draft);
                    self.store.update_expense(&updated)?;
                    record_audit(self.store, &[AuditEntry::updated(&previous, &updated)]);
                    info!(owner = %owner, id = %updated.id, "expense updated");
                    updated
                }
                None => {
                    let created = Expense::from_draft(owner.clone(), draft);
                    self.store.insert_expense(&created)?;
                    record_audit(self.store, &[AuditEntry::created(&created)]);
                    info!(owner = %owner, id = %created.id, "expense created");
                    created
                }
            };

            Ok(expense)
        })
    }

    /// Record a new expense
    pub fn create(&self, owner: &OwnerId, draft: &ExpenseDraft) -> BudgetCapResult<Expense> {
        self.validate_and_save(owner, draft, None)
    }

    /// Edit an existing expense
    pub fn update(
        &self,
        owner: &OwnerId,
        id: ExpenseId,
        draft: &ExpenseDraft,
    ) -> BudgetCapResult<Expense> {
        self.validate_and_save(owner, draft, Some(id))
    }

    pub fn get(&self, owner: &OwnerId, id: ExpenseId) -> BudgetCapResult<Option<Expense>> {
        self.store.get_expense(owner, id)
    }

    /// All expenses of the owner, newest first
    pub fn list(&self, owner: &OwnerId) -> BudgetCapResult<Vec<Expense>> {
        let mut expenses = self.store.list_expenses(owner)?;
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Expenses of one category, newest first
    pub fn list_in_category(
        &self,
        owner: &OwnerId,
        category_id: CategoryId,
    ) -> BudgetCapResult<Vec<Expense>> {
        let mut expenses = self.store.expenses_in_category(owner, category_id)?;
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Find an expense by id (full or short form)
    pub fn find(&self, owner: &OwnerId, identifier: &str) -> BudgetCapResult<Option<Expense>> {
        Ok(self
            .store
            .list_expenses(owner)?
            .into_iter()
            .find(|e| e.id.matches(identifier)))
    }

    /// How much can still be spent in a category before hitting its cap.
    ///
    /// Inactive categories have no cap, so anything spent there shows up as
    /// a negative remainder.
    pub fn remaining_in_category(
        &self,
        owner: &OwnerId,
        category_id: CategoryId,
    ) -> BudgetCapResult<Money> {
        let category = self
            .store
            .get_category(owner, category_id)?
            .ok_or_else(|| BudgetCapError::category_not_found(category_id.to_string()))?;

        let cap = if category.active {
            category.percentage.of(self.store.total_income(owner)?)
        } else {
            Money::zero()
        };

        Ok(cap - self.store.category_spend(owner, category_id, None)?)
    }

    pub fn delete(&self, owner: &OwnerId, id: ExpenseId) -> BudgetCapResult<Expense> {
        self.store.serialized(|| {
            let expense = self
                .store
                .get_expense(owner, id)?
                .ok_or_else(|| BudgetCapError::expense_not_found(id.to_string()))?;

            self.store.delete_expense(owner, id)?;
            record_audit(self.store, &[AuditEntry::deleted(&expense)]);
            info!(owner = %owner, id = %id, "expense deleted");

            Ok(expense)
        })
    }
}

pub(crate) fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryDraft, IncomeEntry, Percentage};
    use crate::services::CategoryService;
    use crate::storage::Storage;
    use chrono::NaiveDate;

    fn owner() -> OwnerId {
        OwnerId::from("ana")
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    /// Store with `income` cents recorded and one category at `percentage`
    fn setup(income: i64, percentage: u8) -> (Storage, Category) {
        let storage = Storage::in_memory();
        storage
            .insert_income(&IncomeEntry::new(owner(), cents(income), day(1)))
            .unwrap();
        let category = CategoryService::new(&storage)
            .create(
                &owner(),
                &CategoryDraft::new("Food", Percentage::new(percentage).unwrap()),
            )
            .unwrap();
        (storage, category)
    }

    #[test]
    fn test_expense_within_cap() {
        let (storage, food) = setup(100_000, 50);
        let service = ExpenseService::new(&storage);

        let expense = service
            .create(&owner(), &ExpenseDraft::new("Groceries", cents(30_000), day(2), food.id))
            .unwrap();
        assert_eq!(expense.amount, cents(30_000));

        // Exactly reaching the cap is allowed
        service
            .create(&owner(), &ExpenseDraft::new("More", cents(20_000), day(3), food.id))
            .unwrap();
        assert_eq!(
            service.remaining_in_category(&owner(), food.id).unwrap(),
            Money::zero()
        );
    }

    #[test]
    fn test_move_to_other_category_checks_new_cap() {
        let (storage, food) = setup(100_000, 50);
        let rent = CategoryService::new(&storage)
            .create(&owner(), &CategoryDraft::new("Rent", Percentage::new(30).unwrap()))
            .unwrap();
        let service = ExpenseService::new(&storage);

        let groceries = service
            .create(&owner(), &ExpenseDraft::new("Groceries", cents(25_000), day(2), food.id))
            .unwrap();
        let deposit = service
            .create(&owner(), &ExpenseDraft::new("Deposit", cents(10_000), day(2), rent.id))
            .unwrap();

        // 10_000 already in Rent + 25_000 moved in > 30_000
        let mut moved = ExpenseDraft::from(&groceries);
        moved.category_id = rent.id;
        let err = service.update(&owner(), groceries.id, &moved).unwrap_err();
        match err {
            BudgetCapError::ExpenseCapExceeded { category, spent, .. } => {
                assert_eq!(category, "Rent");
                assert_eq!(spent, cents(10_000));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            service.get(&owner(), groceries.id).unwrap().unwrap().category_id,
            food.id
        );

        moved.amount = cents(20_000);
        service.update(&owner(), groceries.id, &moved).unwrap();
        assert_eq!(storage.category_spend(&owner(), food.id, None).unwrap(), Money::zero());
        assert_eq!(storage.category_spend(&owner(), rent.id, None).unwrap(), cents(30_000));

        // Only the edited expense itself is left out of the spend
        let mut grown = ExpenseDraft::from(&deposit);
        grown.amount = cents(10_001);
        assert!(service
            .update(&owner(), deposit.id, &grown)
            .unwrap_err()
            .is_cap_exceeded());
        service
            .update(&owner(), deposit.id, &ExpenseDraft::from(&deposit))
            .unwrap();

        let twin = ExpenseDraft::new("Deposit", cents(10_000), day(2), rent.id);
        assert!(service.create(&owner(), &twin).unwrap_err().is_cap_exceeded());
    }

    #[test]
    fn test_expense_over_cap() {
        let (storage, food) = setup(100_000, 50);
        let service = ExpenseService::new(&storage);

        service
            .create(&owner(), &ExpenseDraft::new("Groceries", cents(30_000), day(2), food.id))
            .unwrap();

        let err = service
            .create(&owner(), &ExpenseDraft::new("Feast", cents(25_000), day(3), food.id))
            .unwrap_err();

        match err {
            BudgetCapError::ExpenseCapExceeded {
                category,
                cap,
                spent,
                requested,
            } => {
                assert_eq!(category, "Food");
                assert_eq!(cap, cents(50_000));
                assert_eq!(spent, cents(30_000));
                assert_eq!(requested, cents(25_000));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(service.list(&owner()).unwrap().len(), 1);
    }

    #[test]
    fn test_no_income_means_zero_cap() {
        let storage = Storage::in_memory();
        let food = CategoryService::new(&storage)
            .create(&owner(), &CategoryDraft::new("Food", Percentage::FULL))
            .unwrap();

        let err = ExpenseService::new(&storage)
            .create(&owner(), &ExpenseDraft::new("Lunch", cents(1), day(2), food.id))
            .unwrap_err();
        assert!(err.is_cap_exceeded());
    }

    #[test]
    fn test_fractional_cap_compared_exactly() {
        // 33% of $10.01 is 330.33 cents
        let (storage, food) = setup(1_001, 33);
        let service = ExpenseService::new(&storage);

        service
            .create(&owner(), &ExpenseDraft::new("Snack", cents(330), day(2), food.id))
            .unwrap();
        assert!(service
            .create(&owner(), &ExpenseDraft::new("Crumb", cents(1), day(2), food.id))
            .is_err());
    }

    #[test]
    fn test_update_excludes_own_amount() {
        let (storage, food) = setup(10_000, 50);
        let service = ExpenseService::new(&storage);

        let expense = service
            .create(&owner(), &ExpenseDraft::new("Groceries", cents(4_000), day(2), food.id))
            .unwrap();

        let updated = service
            .update(
                &owner(),
                expense.id,
                &ExpenseDraft::new("Groceries", cents(5_000), day(2), food.id),
            )
            .unwrap();
        assert_eq!(updated.id, expense.id);
        assert_eq!(updated.created_at, expense.created_at);
        assert_eq!(updated.amount, cents(5_000));

        assert!(service
            .update(
                &owner(),
                expense.id,
                &ExpenseDraft::new("Groceries", cents(5_001), day(2), food.id),
            )
            .is_err());
    }

    #[test]
    fn test_inactive_category_rejected() {
        let (storage, food) = setup(10_000, 50);
        CategoryService::new(&storage)
            .update(
                &owner(),
                food.id,
                &CategoryDraft::new("Food", Percentage::new(50).unwrap()).with_active(false),
            )
            .unwrap();

        let err = ExpenseService::new(&storage)
            .create(&owner(), &ExpenseDraft::new("Lunch", cents(100), day(2), food.id))
            .unwrap_err();
        assert!(matches!(
            err,
            BudgetCapError::InvalidCategory {
                reason: "category is inactive",
                ..
            }
        ));
        assert_eq!(err.field(), Some("category_id"));
    }

    #[test]
    fn test_foreign_category_rejected() {
        let (storage, food) = setup(10_000, 50);

        let err = ExpenseService::new(&storage)
            .create(
                &OwnerId::from("ben"),
                &ExpenseDraft::new("Lunch", cents(100), day(2), food.id),
            )
            .unwrap_err();
        assert!(matches!(err, BudgetCapError::InvalidCategory { .. }));
    }

    #[test]
    fn test_field_validation() {
        let (storage, food) = setup(10_000, 50);
        let service = ExpenseService::new(&storage);

        let err = service
            .create(&owner(), &ExpenseDraft::new("", cents(100), day(2), food.id))
            .unwrap_err();
        assert_eq!(err.field(), Some("description"));

        let err = service
            .create(&owner(), &ExpenseDraft::new("Lunch", cents(0), day(2), food.id))
            .unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn test_update_and_delete_missing() {
        let (storage, food) = setup(10_000, 50);
        let service = ExpenseService::new(&storage);

        let err = service
            .update(
                &owner(),
                ExpenseId::new(),
                &ExpenseDraft::new("Lunch", cents(100), day(2), food.id),
            )
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(service.delete(&owner(), ExpenseId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_newest_first_and_delete() {
        let (storage, food) = setup(10_000, 50);
        let service = ExpenseService::new(&storage);

        let early = service
            .create(&owner(), &ExpenseDraft::new("Early", cents(100), day(2), food.id))
            .unwrap();
        service
            .create(&owner(), &ExpenseDraft::new("Late", cents(100), day(9), food.id))
            .unwrap();

        let listed = service.list(&owner()).unwrap();
        assert_eq!(listed[0].description, "Late");
        assert_eq!(service.list_in_category(&owner(), food.id).unwrap().len(), 2);

        service.delete(&owner(), early.id).unwrap();
        assert!(service.get(&owner(), early.id).unwrap().is_none());
        assert_eq!(
            service.find(&owner(), &listed[0].id.to_string()).unwrap().unwrap().description,
            "Late"
        );
    }
}
