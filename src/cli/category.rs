//! Category CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_category_details, format_category_list, DisplayOptions};
use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::{Category, CategoryDraft, OwnerId};
use crate::services::{CategoryService, ExpenseService};
use crate::storage::BudgetStore;

use super::parse_percentage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Show category details
    Show {
        /// Category title or ID
        category: String,
    },

    /// Create a new (active) category
    Create {
        /// Category title
        title: String,
        /// Share of total income this category may spend (0-100)
        #[arg(short, long)]
        percentage: u32,
        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Edit a category
    Edit {
        /// Category title or ID
        category: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New percentage (0-100)
        #[arg(short, long)]
        percentage: Option<u32>,
        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,
        /// Mark the category active
        #[arg(long, conflicts_with = "deactivate")]
        activate: bool,
        /// Mark the category inactive
        #[arg(long)]
        deactivate: bool,
    },

    /// Delete a category
    Delete {
        /// Category title or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command<S: BudgetStore>(
    store: &S,
    settings: &Settings,
    owner: &OwnerId,
    cmd: CategoryCommands,
) -> BudgetCapResult<()> {
    let service = CategoryService::new(store).with_delete_policy(settings.category_delete_policy);
    let options = DisplayOptions::from_settings(settings);

    let find = |identifier: &str| -> BudgetCapResult<Category> {
        service
            .find(owner, identifier)?
            .ok_or_else(|| BudgetCapError::category_not_found(identifier))
    };

    match cmd {
        CategoryCommands::List => {
            let categories = service.list(owner)?;
            print!(
                "{}",
                format_category_list(&categories, service.allocated_total(owner)?)
            );
        }

        CategoryCommands::Show { category } => {
            let category = find(&category)?;
            let spent = store.category_spend(owner, category.id, None)?;
            let remaining = ExpenseService::new(store).remaining_in_category(owner, category.id)?;
            print!(
                "{}",
                format_category_details(&category, spent, remaining, &options)
            );
        }

        CategoryCommands::Create {
            title,
            percentage,
            description,
        } => {
            let mut draft = CategoryDraft::new(title, parse_percentage(percentage)?);
            draft.description = description;

            let category = service.create(owner, &draft)?;
            println!("Created category: {}", category.title);
            println!("  Percentage: {}", category.percentage);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Edit {
            category,
            title,
            percentage,
            description,
            activate,
            deactivate,
        } => {
            let existing = find(&category)?;

            if title.is_none()
                && percentage.is_none()
                && description.is_none()
                && !activate
                && !deactivate
            {
                println!(
                    "No changes specified. Use --title, --percentage, --description, --activate or --deactivate."
                );
                return Ok(());
            }

            let mut draft = CategoryDraft::from(&existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(percentage) = percentage {
                draft.percentage = parse_percentage(percentage)?;
            }
            if let Some(description) = description {
                draft.description = Some(description);
            }
            if activate {
                draft.active = true;
            }
            if deactivate {
                draft.active = false;
            }

            let updated = service.update(owner, existing.id, &draft)?;
            println!("Updated category: {}", updated.title);
        }

        CategoryCommands::Delete { category } => {
            let existing = find(&category)?;
            let deletion = service.delete(owner, existing.id)?;

            println!("Deleted category: {}", deletion.category.title);
            if !deletion.removed_expenses.is_empty() {
                println!(
                    "  Also deleted {} expense(s)",
                    deletion.removed_expenses.len()
                );
            }
        }
    }

    Ok(())
}
