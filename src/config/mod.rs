//! Configuration module for budgetcap
//!
//! - Path resolution for data, settings and the audit log
//! - User settings persistence, including the engine's policy switches

pub mod paths;
pub mod settings;

pub use paths::BudgetCapPaths;
pub use settings::{CategoryDeletePolicy, DistributionSelector, DistributionSettings, Settings};
