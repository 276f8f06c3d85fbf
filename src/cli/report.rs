//! Report CLI commands

use chrono::Local;
use clap::{Args, Subcommand};

use crate::error::{BudgetCapError, BudgetCapResult};
use crate::models::OwnerId;
use crate::reports::{
    CategoryReport, Dashboard, MonthlySeries, ReportFilter, SpendingRollup, TotalsReport,
};
use crate::services::CategoryService;
use crate::storage::BudgetStore;

use super::parse_optional_date;

/// Category and date-range filter arguments
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only this category (title or ID)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Start date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<String>,
    /// End date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<String>,
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expenses and balance
    Totals {
        /// Start date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<String>,
    },

    /// Spending per category against its cap
    Categories(FilterArgs),

    /// Spending per month
    Monthly(FilterArgs),

    /// Spending today, this week, this month and all time
    Rollup,

    /// This month's income, expenses and spending by category
    Dashboard,
}

fn build_filter<S: BudgetStore>(
    store: &S,
    owner: &OwnerId,
    args: &FilterArgs,
) -> BudgetCapResult<ReportFilter> {
    let category_id = match &args.category {
        Some(identifier) => Some(
            CategoryService::new(store)
                .find(owner, identifier)?
                .ok_or_else(|| BudgetCapError::category_not_found(identifier.as_str()))?
                .id,
        ),
        None => None,
    };

    Ok(ReportFilter {
        category_id,
        date_from: parse_optional_date("from", args.from.as_deref())?,
        date_to: parse_optional_date("to", args.to.as_deref())?,
    })
}

/// Handle a report command
pub fn handle_report_command<S: BudgetStore>(
    store: &S,
    owner: &OwnerId,
    cmd: ReportCommands,
) -> BudgetCapResult<()> {
    let today = Local::now().date_naive();

    let output = match cmd {
        ReportCommands::Totals { from, to } => TotalsReport::generate(
            store,
            owner,
            parse_optional_date("from", from.as_deref())?,
            parse_optional_date("to", to.as_deref())?,
        )?
        .format_terminal(),

        ReportCommands::Categories(args) => {
            let filter = build_filter(store, owner, &args)?;
            CategoryReport::generate(store, owner, filter)?.format_terminal()
        }

        ReportCommands::Monthly(args) => {
            let filter = build_filter(store, owner, &args)?;
            MonthlySeries::generate(store, owner, filter)?.format_terminal()
        }

        ReportCommands::Rollup => SpendingRollup::generate(store, owner, today)?.format_terminal(),

        ReportCommands::Dashboard => Dashboard::generate(store, owner, today)?.format_terminal(),
    };

    print!("{}", output);
    Ok(())
}
