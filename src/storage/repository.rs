//! Generic owner-scoped record repository
//!
//! Each record set lives in memory behind an `RwLock` and, when backed by a
//! file, is written back atomically after every mutation. A mutation whose
//! write fails is rolled back in memory so callers never observe half a write.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::{Category, CategoryId, Expense, ExpenseId, IncomeEntry, IncomeId, OwnerId};

use super::file_io::{read_json, write_json_atomic};

/// A persisted record keyed by id and owned by one user
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Ord + Hash + Display;

    /// Name used in persistence error messages
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;
    fn owner(&self) -> &OwnerId;
}

impl Record for Category {
    type Id = CategoryId;
    const ENTITY: &'static str = "category";

    fn id(&self) -> CategoryId {
        self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

impl Record for IncomeEntry {
    type Id = IncomeId;
    const ENTITY: &'static str = "income entry";

    fn id(&self) -> IncomeId {
        self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

impl Record for Expense {
    type Id = ExpenseId;
    const ENTITY: &'static str = "expense";

    fn id(&self) -> ExpenseId {
        self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

/// On-disk layout of one record file
#[derive(Debug, Serialize, Deserialize)]
struct RecordFile<T> {
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

impl<T> Default for RecordFile<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

/// Repository for one record set
pub struct Repository<T: Record> {
    path: Option<PathBuf>,
    records: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> Repository<T> {
    /// Create a repository backed by a JSON file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Create a repository that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> BudgetCapResult<RwLockReadGuard<'_, HashMap<T::Id, T>>> {
        self.records
            .read()
            .map_err(|e| BudgetCapError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> BudgetCapResult<RwLockWriteGuard<'_, HashMap<T::Id, T>>> {
        self.records
            .write()
            .map_err(|e| BudgetCapError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load records from disk, replacing whatever is in memory
    pub fn load(&self) -> BudgetCapResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file_data: RecordFile<T> = read_json(path)?;

        let mut records = self.write()?;
        records.clear();
        for record in file_data.records {
            records.insert(record.id(), record);
        }

        Ok(())
    }

    fn persist(&self, records: &HashMap<T::Id, T>) -> BudgetCapResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut list: Vec<_> = records.values().cloned().collect();
        list.sort_by_key(|r| r.id());

        write_json_atomic(path, &RecordFile { records: list })
    }

    /// Number of records across all owners
    pub fn count(&self) -> BudgetCapResult<usize> {
        Ok(self.read()?.len())
    }

    /// All records of one owner, in no particular order
    pub fn list(&self, owner: &OwnerId) -> BudgetCapResult<Vec<T>> {
        let records = self.read()?;
        Ok(records
            .values()
            .filter(|r| r.owner() == owner)
            .cloned()
            .collect())
    }

    /// One record, if it exists and belongs to `owner`
    pub fn get(&self, owner: &OwnerId, id: T::Id) -> BudgetCapResult<Option<T>> {
        let records = self.read()?;
        Ok(records.get(&id).filter(|r| r.owner() == owner).cloned())
    }

    /// Insert a new record; an existing id is rejected
    pub fn insert(&self, record: &T) -> BudgetCapResult<()> {
        let mut records = self.write()?;

        if records.contains_key(&record.id()) {
            return Err(BudgetCapError::PersistenceFailure(format!(
                "{} {} already exists",
                T::ENTITY,
                record.id()
            )));
        }

        records.insert(record.id(), record.clone());
        if let Err(e) = self.persist(&records) {
            records.remove(&record.id());
            return Err(e);
        }

        Ok(())
    }

    /// Replace an existing record of the same owner
    pub fn update(&self, record: &T) -> BudgetCapResult<()> {
        let mut records = self.write()?;

        let previous = match records.get(&record.id()) {
            Some(existing) if existing.owner() == record.owner() => existing.clone(),
            _ => {
                return Err(BudgetCapError::PersistenceFailure(format!(
                    "{} {} does not exist",
                    T::ENTITY,
                    record.id()
                )))
            }
        };

        records.insert(record.id(), record.clone());
        if let Err(e) = self.persist(&records) {
            records.insert(previous.id(), previous);
            return Err(e);
        }

        Ok(())
    }

    /// Remove a record of `owner`; returns whether anything was removed
    pub fn delete(&self, owner: &OwnerId, id: T::Id) -> BudgetCapResult<bool> {
        let mut records = self.write()?;

        if !records.get(&id).is_some_and(|r| r.owner() == owner) {
            return Ok(false);
        }

        let Some(removed) = records.remove(&id) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&records) {
            records.insert(id, removed);
            return Err(e);
        }

        Ok(true)
    }
}
