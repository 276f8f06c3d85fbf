use anyhow::Result;
use clap::{Parser, Subcommand};

use budgetcap::cli::{
    handle_audit_command, handle_category_command, handle_expense_command,
    handle_income_command, handle_report_command,
};
use budgetcap::config::{BudgetCapPaths, Settings};
use budgetcap::models::OwnerId;
use budgetcap::storage::Storage;
use budgetcap::BudgetCapError;

#[derive(Parser)]
#[command(
    name = "budgetcap",
    author = "Kaylee Beyene",
    version,
    about = "Percentage-capped personal budgeting",
    long_about = "budgetcap gives every spending category a percentage of your total \
                  income and refuses any expense that would push a category past its \
                  share."
)]
struct Cli {
    /// Owner whose budget to work on
    #[arg(short, long, global = true, env = "BUDGETCAP_USER")]
    user: Option<String>,

    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(budgetcap::cli::CategoryCommands),

    /// Income commands
    #[command(subcommand)]
    Income(budgetcap::cli::IncomeCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(budgetcap::cli::ExpenseCommands),

    /// Reports over income and spending
    #[command(subcommand)]
    Report(budgetcap::cli::ReportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        recent: usize,
    },

    /// Initialize the data directory and settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() {
    if let Err(err) = run() {
        match err.downcast_ref::<BudgetCapError>() {
            Some(e) => match e.field() {
                Some(field) => eprintln!("Error ({}): {}", field, e),
                None => eprintln!("Error: {}", e),
            },
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    budgetcap::logging::init(cli.verbose);

    let paths = BudgetCapPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!("budgetcap is already initialized at: {}", paths.base_dir().display());
                return Ok(());
            }
            println!("Initializing budgetcap at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'budgetcap category create <title> -p <percent>' to add a category.");
            return Ok(());
        }
        Some(Commands::Config) => {
            println!("budgetcap Configuration");
            println!("=======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:        {}", settings.currency_symbol);
            println!("  Date format:            {}", settings.date_format);
            println!(
                "  Default owner:          {}",
                settings.default_owner.as_deref().unwrap_or("(none)")
            );
            println!(
                "  Income distribution:    {} ({:?} categories)",
                if settings.distribution.enabled {
                    "enabled"
                } else {
                    "disabled"
                },
                settings.distribution.selector
            );
            println!(
                "  Category delete policy: {:?}",
                settings.category_delete_policy
            );
            println!("  Audit log enabled:      {}", settings.audit_enabled);
            return Ok(());
        }
        Some(command) => command,
        None => {
            println!("budgetcap - percentage-capped personal budgeting");
            println!();
            println!("Run 'budgetcap --help' for usage information.");
            return Ok(());
        }
    };

    let owner = resolve_owner(cli.user, &settings)?;
    let storage = Storage::open(paths, settings.audit_enabled)?;

    match command {
        Commands::Category(cmd) => handle_category_command(&storage, &settings, &owner, cmd)?,
        Commands::Income(cmd) => handle_income_command(&storage, &settings, &owner, cmd)?,
        Commands::Expense(cmd) => handle_expense_command(&storage, &settings, &owner, cmd)?,
        Commands::Report(cmd) => handle_report_command(&storage, &owner, cmd)?,
        Commands::Audit { recent } => handle_audit_command(&storage, &owner, recent)?,
        Commands::Init | Commands::Config => {}
    }

    Ok(())
}

/// `--user` / `BUDGETCAP_USER` first, then the configured default owner
fn resolve_owner(user: Option<String>, settings: &Settings) -> Result<OwnerId, BudgetCapError> {
    user.or_else(|| settings.default_owner.clone())
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .map(OwnerId::new)
        .ok_or_else(|| {
            BudgetCapError::Config(
                "No user given. Pass --user, set BUDGETCAP_USER, or set default_owner in config.json"
                    .into(),
            )
        })
}
