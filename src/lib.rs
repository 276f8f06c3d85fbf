//! budgetcap - percentage-capped personal budgeting
//!
//! Every category of a user claims a share of that user's total income. The
//! engine keeps three rules intact across every write:
//!
//! - active category percentages never add up to more than 100%
//! - spending in a category never exceeds its share of total income
//! - distributed income is split across categories without losing a cent
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Categories, income entries, expenses and their value types
//! - `storage`: The `BudgetStore` trait with JSON-file and in-memory stores
//! - `services`: Category allocation, expense cap validation, income distribution
//! - `reports`: Read-only aggregation over income and expenses
//! - `audit`: Audit logging system
//! - `display`, `cli`: Terminal presentation
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetcap::models::{CategoryDraft, OwnerId, Percentage};
//! use budgetcap::services::CategoryService;
//! use budgetcap::storage::Storage;
//!
//! let store = Storage::in_memory();
//! let owner = OwnerId::from("u1");
//! let food = CategoryService::new(&store)
//!     .create(&owner, &CategoryDraft::new("Food", Percentage::new(30)?))?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetCapError, BudgetCapResult};
