//! Expense CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_list, DisplayOptions};
use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::{Category, Expense, ExpenseDraft, OwnerId};
use crate::services::{CategoryService, ExpenseService};
use crate::storage::BudgetStore;

use super::{parse_amount, parse_date, parse_optional_date};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// List expenses, newest first
    List {
        /// Only this category (title or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// Number of expenses to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show expense details
    Show {
        /// Expense ID
        id: String,
    },

    /// Record an expense, checked against the category cap
    Add {
        /// Amount (e.g., "12.50")
        amount: String,
        /// Category title or ID
        #[arg(short, long)]
        category: String,
        /// Description
        #[arg(short, long)]
        description: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Edit an expense
    Edit {
        /// Expense ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category (title or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command<S: BudgetStore>(
    store: &S,
    settings: &Settings,
    owner: &OwnerId,
    cmd: ExpenseCommands,
) -> BudgetCapResult<()> {
    let service = ExpenseService::new(store);
    let categories = CategoryService::new(store);
    let options = DisplayOptions::from_settings(settings);

    let find_category = |identifier: &str| -> BudgetCapResult<Category> {
        categories
            .find(owner, identifier)?
            .ok_or_else(|| BudgetCapError::category_not_found(identifier))
    };
    let find = |identifier: &str| -> BudgetCapResult<Expense> {
        service
            .find(owner, identifier)?
            .ok_or_else(|| BudgetCapError::expense_not_found(identifier))
    };

    match cmd {
        ExpenseCommands::List { category, limit } => {
            let mut expenses = match category {
                Some(c) => service.list_in_category(owner, find_category(&c)?.id)?,
                None => service.list(owner)?,
            };
            if let Some(limit) = limit {
                expenses.truncate(limit);
            }
            print!(
                "{}",
                format_expense_list(&expenses, &categories.list(owner)?, &options)
            );
        }

        ExpenseCommands::Show { id } => {
            let expense = find(&id)?;
            print!(
                "{}",
                format_expense_details(&expense, &categories.list(owner)?, &options)
            );
        }

        ExpenseCommands::Add {
            amount,
            category,
            description,
            date,
        } => {
            let category = find_category(&category)?;
            let date = parse_optional_date("date", date.as_deref())?
                .unwrap_or_else(|| chrono::Local::now().date_naive());

            let draft = ExpenseDraft::new(description, parse_amount(&amount)?, date, category.id);
            let expense = service.create(owner, &draft)?;

            println!(
                "Recorded expense: {} in {}",
                options.money(expense.amount),
                category.title
            );
            println!("  ID: {}", expense.id);
            println!(
                "  Remaining in category: {}",
                options.money(service.remaining_in_category(owner, category.id)?)
            );
        }

        ExpenseCommands::Edit {
            id,
            amount,
            category,
            description,
            date,
        } => {
            let existing = find(&id)?;

            if amount.is_none() && category.is_none() && description.is_none() && date.is_none() {
                println!(
                    "No changes specified. Use --amount, --category, --description or --date."
                );
                return Ok(());
            }

            let mut draft = ExpenseDraft::from(&existing);
            if let Some(amount) = amount {
                draft.amount = parse_amount(&amount)?;
            }
            if let Some(category) = category {
                draft.category_id = find_category(&category)?.id;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(date) = date {
                draft.date = parse_date("date", &date)?;
            }

            let updated = service.update(owner, existing.id, &draft)?;
            println!(
                "Updated expense {}: {}",
                updated.id,
                options.money(updated.amount)
            );
        }

        ExpenseCommands::Delete { id } => {
            let existing = find(&id)?;
            let removed = service.delete(owner, existing.id)?;
            println!("Deleted expense: {}", removed.description);
        }
    }

    Ok(())
}
