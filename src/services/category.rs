//! Category service
//!
//! Gates every category write so that, per owner, the percentages of the
//! active categories never add up to more than 100.

use tracing::{info, warn};

use crate::audit::AuditEntry;
use crate::config::CategoryDeletePolicy;
use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::percentage::total_of;
use crate::models::{Category, CategoryDraft, CategoryId, Expense, OwnerId};
use crate::storage::BudgetStore;

use super::record_audit;

/// Upper bound for the sum of active category percentages
pub const ALLOCATION_LIMIT: u32 = 100;

/// Outcome of deleting a category
#[derive(Debug, Clone)]
pub struct CategoryDeletion {
    pub category: Category,
    /// Expenses removed along with the category (cascade policy only)
    pub removed_expenses: Vec<Expense>,
}

/// Service for category management
pub struct CategoryService<'a, S: BudgetStore> {
    store: &'a S,
    delete_policy: CategoryDeletePolicy,
}

impl<'a, S: BudgetStore> CategoryService<'a, S> {
    /// Create a new category service with the default (restrict) delete policy
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            delete_policy: CategoryDeletePolicy::default(),
        }
    }

    pub fn with_delete_policy(mut self, policy: CategoryDeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// Validate a draft against the allocation limit and persist it.
    ///
    /// `existing` names the category being edited; `None` creates a new one.
    /// New categories always start out active.
    pub fn validate_and_save(
        &self,
        owner: &OwnerId,
        draft: &CategoryDraft,
        existing: Option<CategoryId>,
    ) -> BudgetCapResult<Category> {
        draft
            .validate()
            .map_err(|e| BudgetCapError::validation(e.field(), e.to_string()))?;

        self.store.serialized(|| {
            let categories = self.store.list_categories(owner)?;

            let (candidate, before) = match existing {
                Some(id) => {
                    let current = categories
                        .iter()
                        .find(|c| c.id == id)
                        .cloned()
                        .ok_or_else(|| BudgetCapError::category_not_found(id.to_string()))?;
                    let mut updated = current.clone();
                    updated.apply(draft);
                    (updated, Some(current))
                }
                None => {
                    let mut created = Category::from_draft(owner.clone(), draft);
                    created.active = true;
                    (created, None)
                }
            };

            let current_total = total_of(
                categories
                    .iter()
                    .filter(|c| c.id != candidate.id && c.counts_toward_allocation())
                    .map(|c| c.percentage),
            );

            if candidate.counts_toward_allocation()
                && current_total + candidate.percentage.value() as u32 > ALLOCATION_LIMIT
            {
                warn!(
                    owner = %owner,
                    title = %candidate.title,
                    current_total,
                    requested = candidate.percentage.value(),
                    "category allocation rejected"
                );
                return Err(BudgetCapError::CategoryCapExceeded {
                    current_total,
                    requested: candidate.percentage.value(),
                    limit: ALLOCATION_LIMIT,
                });
            }

            match &before {
                Some(previous) => {
                    self.store.update_category(&candidate)?;
                    record_audit(self.store, &[AuditEntry::updated(previous, &candidate)]);
                    info!(owner = %owner, id = %candidate.id, "category updated");
                }
                None => {
                    self.store.insert_category(&candidate)?;
                    record_audit(self.store, &[AuditEntry::created(&candidate)]);
                    info!(owner = %owner, id = %candidate.id, "category created");
                }
            }

            Ok(candidate)
        })
    }

    /// Create a new (active) category
    pub fn create(&self, owner: &OwnerId, draft: &CategoryDraft) -> BudgetCapResult<Category> {
        self.validate_and_save(owner, draft, None)
    }

    /// Replace the editable fields of an existing category
    pub fn update(
        &self,
        owner: &OwnerId,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> BudgetCapResult<Category> {
        self.validate_and_save(owner, draft, Some(id))
    }

    pub fn get(&self, owner: &OwnerId, id: CategoryId) -> BudgetCapResult<Option<Category>> {
        self.store.get_category(owner, id)
    }

    /// All categories of the owner, sorted by title
    pub fn list(&self, owner: &OwnerId) -> BudgetCapResult<Vec<Category>> {
        let mut categories = self.store.list_categories(owner)?;
        categories.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(categories)
    }

    pub fn list_active(&self, owner: &OwnerId) -> BudgetCapResult<Vec<Category>> {
        Ok(self
            .list(owner)?
            .into_iter()
            .filter(|c| c.active)
            .collect())
    }

    /// Find a category by title (case-insensitive) or id
    pub fn find(&self, owner: &OwnerId, identifier: &str) -> BudgetCapResult<Option<Category>> {
        let identifier = identifier.trim();
        let categories = self.list(owner)?;

        if let Some(category) = categories
            .iter()
            .find(|c| c.title.eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(category.clone()));
        }

        Ok(categories.into_iter().find(|c| c.id.matches(identifier)))
    }

    /// Sum of the percentages of the owner's active categories
    pub fn allocated_total(&self, owner: &OwnerId) -> BudgetCapResult<u32> {
        Ok(total_of(
            self.store
                .list_categories(owner)?
                .iter()
                .filter(|c| c.active)
                .map(|c| c.percentage),
        ))
    }

    /// Percentage points still available for active categories
    pub fn remaining(&self, owner: &OwnerId) -> BudgetCapResult<u32> {
        Ok(ALLOCATION_LIMIT.saturating_sub(self.allocated_total(owner)?))
    }

    /// Delete a category, honoring the configured delete policy
    pub fn delete(&self, owner: &OwnerId, id: CategoryId) -> BudgetCapResult<CategoryDeletion> {
        self.store.serialized(|| {
            let category = self
                .store
                .get_category(owner, id)?
                .ok_or_else(|| BudgetCapError::category_not_found(id.to_string()))?;

            let expenses = self.store.expenses_in_category(owner, id)?;

            if !expenses.is_empty() && self.delete_policy == CategoryDeletePolicy::Restrict {
                warn!(owner = %owner, id = %id, count = expenses.len(), "category delete refused");
                return Err(BudgetCapError::PersistenceFailure(format!(
                    "Category '{}' still has {} expense(s)",
                    category.title,
                    expenses.len()
                )));
            }

            let mut removed = Vec::with_capacity(expenses.len());
            for expense in expenses {
                if let Err(e) = self.store.delete_expense(owner, expense.id) {
                    self.restore(&removed);
                    return Err(e);
                }
                removed.push(expense);
            }

            if let Err(e) = self.store.delete_category(owner, id) {
                self.restore(&removed);
                return Err(e);
            }

            let mut entries: Vec<AuditEntry> = removed.iter().map(AuditEntry::deleted).collect();
            entries.push(AuditEntry::deleted(&category));
            record_audit(self.store, &entries);

            info!(owner = %owner, id = %id, cascaded = removed.len(), "category deleted");

            Ok(CategoryDeletion {
                category,
                removed_expenses: removed,
            })
        })
    }

    /// Put back expenses removed by a cascade that could not finish
    fn restore(&self, removed: &[Expense]) {
        for expense in removed {
            if let Err(e) = self.store.insert_expense(expense) {
                warn!(id = %expense.id, error = %e, "failed to restore expense");
            }
        }
    }
}
