//! Income CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_expense_list, format_income_list, DisplayOptions};
use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::{IncomeDraft, IncomeEntry, OwnerId};
use crate::services::IncomeService;
use crate::storage::BudgetStore;

use super::{parse_amount, parse_date, parse_optional_date};

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// List income entries, newest first
    List,

    /// Record income (distributed across categories if enabled)
    Add {
        /// Amount (e.g., "1500" or "1500.00")
        amount: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Edit an income entry
    Edit {
        /// Income ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an income entry
    Delete {
        /// Income ID
        id: String,
        /// Also delete the expenses distributed from it
        #[arg(long)]
        with_distribution: bool,
    },
}

/// Handle an income command
pub fn handle_income_command<S: BudgetStore>(
    store: &S,
    settings: &Settings,
    owner: &OwnerId,
    cmd: IncomeCommands,
) -> BudgetCapResult<()> {
    let service = IncomeService::new(store).with_distribution(settings.distribution);
    let options = DisplayOptions::from_settings(settings);

    let find = |identifier: &str| -> BudgetCapResult<IncomeEntry> {
        service
            .find(owner, identifier)?
            .ok_or_else(|| BudgetCapError::income_not_found(identifier))
    };

    match cmd {
        IncomeCommands::List => {
            print!("{}", format_income_list(&service.list(owner)?, &options));
        }

        IncomeCommands::Add {
            amount,
            description,
            date,
        } => {
            let mut draft = IncomeDraft::new(description, parse_amount(&amount)?);
            draft.date = parse_optional_date("date", date.as_deref())?;

            let recorded = service.record_income(owner, &draft)?;
            println!(
                "Recorded income: {} on {}",
                options.money(recorded.entry.amount),
                options.date(recorded.entry.date)
            );
            println!("  ID: {}", recorded.entry.id);

            if !recorded.generated.is_empty() {
                let categories = store.list_categories(owner)?;
                println!();
                println!("Distributed into {} expense(s):", recorded.generated.len());
                print!(
                    "{}",
                    format_expense_list(&recorded.generated, &categories, &options)
                );
            }
        }

        IncomeCommands::Edit {
            id,
            amount,
            description,
            date,
        } => {
            let existing = find(&id)?;

            if amount.is_none() && description.is_none() && date.is_none() {
                println!("No changes specified. Use --amount, --description or --date.");
                return Ok(());
            }

            let mut draft = IncomeDraft::new(
                description.unwrap_or_else(|| existing.description.clone()),
                match amount {
                    Some(a) => parse_amount(&a)?,
                    None => existing.amount,
                },
            );
            if let Some(date) = date {
                draft.date = Some(parse_date("date", &date)?);
            }

            let updated = service.update(owner, existing.id, &draft)?;
            println!(
                "Updated income {}: {} on {}",
                updated.id,
                options.money(updated.amount),
                options.date(updated.date)
            );
        }

        IncomeCommands::Delete {
            id,
            with_distribution,
        } => {
            let existing = find(&id)?;

            if with_distribution {
                let removed = service.delete_with_distribution(owner, existing.id)?;
                println!(
                    "Deleted income {} and {} distributed expense(s)",
                    removed.entry.id,
                    removed.generated.len()
                );
            } else {
                let removed = service.delete(owner, existing.id)?;
                println!("Deleted income {}", removed.id);
            }
        }
    }

    Ok(())
}
