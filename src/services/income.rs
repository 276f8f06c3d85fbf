//! Income service
//!
//! Records income entries and, when auto-distribution is switched on, splits
//! each new entry across the selected categories as generated expenses.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::audit::AuditEntry;
use crate::config::DistributionSettings;
use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::income::MAX_DESCRIPTION_LEN;
use crate::models::percentage::total_of;
use crate::models::{Expense, ExpenseOrigin, IncomeDraft, IncomeEntry, IncomeId, Money, OwnerId};
use crate::storage::BudgetStore;

use super::record_audit;

/// A stored income entry and the expenses distributed from it
#[derive(Debug, Clone)]
pub struct RecordedIncome {
    pub entry: IncomeEntry,
    pub generated: Vec<Expense>,
}

/// Service for income entries
pub struct IncomeService<'a, S: BudgetStore> {
    store: &'a S,
    distribution: DistributionSettings,
    today: NaiveDate,
}

impl<'a, S: BudgetStore> IncomeService<'a, S> {
    /// Create a service with distribution disabled, dating undated entries today
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            distribution: DistributionSettings::default(),
            today: Local::now().date_naive(),
        }
    }

    pub fn with_distribution(mut self, distribution: DistributionSettings) -> Self {
        self.distribution = distribution;
        self
    }

    /// Date used for drafts that carry none
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Store a new income entry, distributing it if enabled.
    ///
    /// All or nothing: if the distribution cannot be planned or one of the
    /// generated expenses cannot be written, no entry is left behind.
    pub fn record_income(
        &self,
        owner: &OwnerId,
        draft: &IncomeDraft,
    ) -> BudgetCapResult<RecordedIncome> {
        draft
            .validate()
            .map_err(|e| BudgetCapError::validation(e.field(), e.to_string()))?;

        self.store.serialized(|| {
            let entry = IncomeEntry::from_draft(owner.clone(), draft, self.today);

            let planned = if self.distribution.enabled {
                self.plan_distribution(&entry)?
            } else {
                Vec::new()
            };

            self.store.insert_income(&entry)?;

            let mut generated = Vec::with_capacity(planned.len());
            for expense in planned {
                if let Err(e) = self.store.insert_expense(&expense) {
                    warn!(owner = %owner, income = %entry.id, error = %e, "distribution failed, rolling back");
                    self.roll_back(&entry, &generated);
                    return Err(e);
                }
                generated.push(expense);
            }

            let mut entries = vec![AuditEntry::created(&entry)];
            entries.extend(generated.iter().map(AuditEntry::created));
            record_audit(self.store, &entries);

            info!(
                owner = %owner,
                id = %entry.id,
                amount = %entry.amount,
                generated = generated.len(),
                "income recorded"
            );

            Ok(RecordedIncome { entry, generated })
        })
    }

    /// Work out the expenses an entry distributes into, without writing
    fn plan_distribution(&self, entry: &IncomeEntry) -> BudgetCapResult<Vec<Expense>> {
        let selector = self.distribution.selector;

        let mut categories: Vec<_> = self
            .store
            .list_categories(&entry.owner)?
            .into_iter()
            .filter(|c| selector.selects(c.active) && !c.percentage.is_zero())
            .collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

        let total = total_of(categories.iter().map(|c| c.percentage));
        if total != 100 {
            warn!(owner = %entry.owner, total, "distribution categories do not total 100%");
            return Err(BudgetCapError::DistributionMismatch { total });
        }

        let mut shares: Vec<Money> = categories
            .iter()
            .map(|c| c.percentage.share_of(entry.amount))
            .collect();

        // Truncated shares can fall a few cents short; the largest share takes them
        let remainder = entry.amount - shares.iter().sum::<Money>();
        let largest = categories
            .iter()
            .enumerate()
            .max_by(|(i, a), (j, b)| a.percentage.cmp(&b.percentage).then_with(|| j.cmp(i)))
            .map(|(i, _)| i);
        if let Some(i) = largest {
            shares[i] += remainder;
        }

        let description = distribution_description(entry);

        let planned: Vec<Expense> = categories
            .iter()
            .zip(shares)
            .filter(|(_, share)| share.is_positive())
            .map(|(category, share)| {
                let mut expense = Expense::new(
                    entry.owner.clone(),
                    description.clone(),
                    share,
                    entry.date,
                    category.id,
                );
                expense.origin = ExpenseOrigin::Distribution { income_id: entry.id };
                expense
            })
            .collect();

        debug!(income = %entry.id, expenses = planned.len(), "distribution planned");
        Ok(planned)
    }

    /// Put back generated expenses removed by a delete that could not finish
    fn restore(&self, removed: &[Expense]) {
        for expense in removed {
            if let Err(e) = self.store.insert_expense(expense) {
                warn!(id = %expense.id, error = %e, "failed to restore expense");
            }
        }
    }

    fn roll_back(&self, entry: &IncomeEntry, generated: &[Expense]) {
        for expense in generated {
            if let Err(e) = self.store.delete_expense(&expense.owner, expense.id) {
                warn!(id = %expense.id, error = %e, "failed to remove generated expense");
            }
        }
        if let Err(e) = self.store.delete_income(&entry.owner, entry.id) {
            warn!(id = %entry.id, error = %e, "failed to remove income entry");
        }
    }

    pub fn get(&self, owner: &OwnerId, id: IncomeId) -> BudgetCapResult<Option<IncomeEntry>> {
        self.store.get_income(owner, id)
    }

    /// All income entries of the owner, newest first
    pub fn list(&self, owner: &OwnerId) -> BudgetCapResult<Vec<IncomeEntry>> {
        let mut entries = self.store.list_income(owner)?;
        entries.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(entries)
    }

    /// Find an entry by id (full or short form)
    pub fn find(&self, owner: &OwnerId, identifier: &str) -> BudgetCapResult<Option<IncomeEntry>> {
        Ok(self
            .store
            .list_income(owner)?
            .into_iter()
            .find(|e| e.id.matches(identifier)))
    }

    /// Sum of all income of the owner
    pub fn total(&self, owner: &OwnerId) -> BudgetCapResult<Money> {
        self.store.total_income(owner)
    }

    /// Edit an entry; distribution is not re-run
    pub fn update(
        &self,
        owner: &OwnerId,
        id: IncomeId,
        draft: &IncomeDraft,
    ) -> BudgetCapResult<IncomeEntry> {
        draft
            .validate()
            .map_err(|e| BudgetCapError::validation(e.field(), e.to_string()))?;

        self.store.serialized(|| {
            let before = self
                .store
                .get_income(owner, id)?
                .ok_or_else(|| BudgetCapError::income_not_found(id.to_string()))?;

            let mut entry = before.clone();
            entry.apply(draft);
            self.store.update_income(&entry)?;

            record_audit(self.store, &[AuditEntry::updated(&before, &entry)]);
            info!(owner = %owner, id = %id, "income updated");

            Ok(entry)
        })
    }

    /// Delete an entry; expenses generated from it stay
    pub fn delete(&self, owner: &OwnerId, id: IncomeId) -> BudgetCapResult<IncomeEntry> {
        self.store.serialized(|| {
            let entry = self
                .store
                .get_income(owner, id)?
                .ok_or_else(|| BudgetCapError::income_not_found(id.to_string()))?;

            self.store.delete_income(owner, id)?;
            record_audit(self.store, &[AuditEntry::deleted(&entry)]);
            info!(owner = %owner, id = %id, "income deleted");

            Ok(entry)
        })
    }

    /// Delete an entry together with the expenses distributed from it
    pub fn delete_with_distribution(
        &self,
        owner: &OwnerId,
        id: IncomeId,
    ) -> BudgetCapResult<RecordedIncome> {
        self.store.serialized(|| {
            let entry = self
                .store
                .get_income(owner, id)?
                .ok_or_else(|| BudgetCapError::income_not_found(id.to_string()))?;

            let generated: Vec<Expense> = self
                .store
                .list_expenses(owner)?
                .into_iter()
                .filter(|e| e.source_income() == Some(id))
                .collect();

            let mut removed = Vec::with_capacity(generated.len());
            for expense in generated {
                if let Err(e) = self.store.delete_expense(owner, expense.id) {
                    warn!(owner = %owner, income = %id, error = %e, "delete failed, restoring expenses");
                    self.restore(&removed);
                    return Err(e);
                }
                removed.push(expense);
            }

            if let Err(e) = self.store.delete_income(owner, id) {
                warn!(owner = %owner, income = %id, error = %e, "delete failed, restoring expenses");
                self.restore(&removed);
                return Err(e);
            }

            let mut entries: Vec<AuditEntry> = removed.iter().map(AuditEntry::deleted).collect();
            entries.push(AuditEntry::deleted(&entry));
            record_audit(self.store, &entries);

            info!(owner = %owner, id = %id, removed = removed.len(), "income deleted with distribution");

            Ok(RecordedIncome {
                entry,
                generated: removed,
            })
        })
    }
}

fn distribution_description(entry: &IncomeEntry) -> String {
    let description = if entry.description.is_empty() {
        format!("Distribution of income {}", entry.id)
    } else {
        format!("Distribution of income {}: {}", entry.id, entry.description)
    };
    description.chars().take(MAX_DESCRIPTION_LEN).collect()
}
