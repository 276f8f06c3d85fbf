//! User settings for budgetcap
//!
//! Display preferences, the default owner, and the two policies the engine
//! leaves to configuration: which categories receive auto-distributed income
//! and what happens to expenses when their category is deleted.

use serde::{Deserialize, Serialize};

use super::paths::BudgetCapPaths;
use crate::error::BudgetCapError;

/// Which categories an income entry is distributed across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistributionSelector {
    /// Categories flagged active (default)
    #[default]
    Active,
    /// Categories flagged inactive, i.e. reserved for distribution only
    Inactive,
}

impl DistributionSelector {
    /// Whether a category with the given active flag is selected
    pub fn selects(&self, active: bool) -> bool {
        match self {
            Self::Active => active,
            Self::Inactive => !active,
        }
    }
}

/// Auto-distribution of income across categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DistributionSettings {
    /// Whether recording income also generates category expenses
    #[serde(default)]
    pub enabled: bool,

    /// Which categories take part
    #[serde(default)]
    pub selector: DistributionSelector,
}

/// What deleting a category does to the expenses that reference it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryDeletePolicy {
    /// Refuse to delete a category that still has expenses
    #[default]
    Restrict,
    /// Delete the category's expenses along with it
    Cascade,
}

/// User settings for budgetcap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Owner used when neither `--user` nor `BUDGETCAP_USER` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,

    #[serde(default)]
    pub distribution: DistributionSettings,

    #[serde(default)]
    pub category_delete_policy: CategoryDeletePolicy,

    /// Whether writes are recorded in the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_owner: None,
            distribution: DistributionSettings::default(),
            category_delete_policy: CategoryDeletePolicy::default(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &BudgetCapPaths) -> Result<Self, BudgetCapError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller decides to save
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BudgetCapError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| BudgetCapError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetCapPaths) -> Result<(), BudgetCapError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetCapError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetCapError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
