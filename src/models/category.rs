//! Budget category model
//!
//! A category reserves a percentage of the owner's total income. Only active
//! categories count toward the 100% allocation limit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::owner::OwnerId;
use super::percentage::Percentage;

/// Maximum length of a category title, in characters
pub const MAX_TITLE_LEN: usize = 100;

/// A budget category owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Owning user
    pub owner: OwnerId,

    /// Display title
    pub title: String,

    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Share of total income this category may spend
    pub percentage: Percentage,

    /// Whether the category counts toward allocation and accepts expenses
    pub active: bool,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new, active category
    pub fn new(owner: OwnerId, title: impl Into<String>, percentage: Percentage) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            owner,
            title: title.into(),
            description: None,
            percentage,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a category from a draft
    pub fn from_draft(owner: OwnerId, draft: &CategoryDraft) -> Self {
        let mut category = Self::new(owner, draft.title.trim(), draft.percentage);
        category.description = draft.normalized_description();
        category.active = draft.active;
        category
    }

    /// Overwrite the editable fields from a draft
    pub fn apply(&mut self, draft: &CategoryDraft) {
        self.title = draft.title.trim().to_string();
        self.description = draft.normalized_description();
        self.percentage = draft.percentage;
        self.active = draft.active;
        self.updated_at = Utc::now();
    }

    /// Whether this category takes part in the allocation total
    pub fn counts_toward_allocation(&self) -> bool {
        self.active && !self.percentage.is_zero()
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_title(&self.title)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Editable fields of a category, as submitted by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub title: String,
    pub description: Option<String>,
    pub percentage: Percentage,
    pub active: bool,
}

impl CategoryDraft {
    /// A draft for an active category
    pub fn new(title: impl Into<String>, percentage: Percentage) -> Self {
        Self {
            title: title.into(),
            description: None,
            percentage,
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_title(&self.title)
    }

    fn normalized_description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }
}

impl From<&Category> for CategoryDraft {
    fn from(category: &Category) -> Self {
        Self {
            title: category.title.clone(),
            description: category.description.clone(),
            percentage: category.percentage,
            active: category.active,
        }
    }
}

fn validate_title(title: &str) -> Result<(), CategoryValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CategoryValidationError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(CategoryValidationError::TitleTooLong(len));
    }
    Ok(())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyTitle,
    TitleTooLong(usize),
}

impl CategoryValidationError {
    pub fn field(&self) -> &'static str {
        "title"
    }
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Category title cannot be empty"),
            Self::TitleTooLong(len) => write!(
                f,
                "Category title too long ({} chars, max {})",
                len, MAX_TITLE_LEN
            ),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
