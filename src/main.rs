use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use moneymaster::cli::ledger::NewTransaction;
use moneymaster::core::calculator::Calculator;
use moneymaster::core::ledger::{Category, TransactionKind};
use moneymaster::core::log::init_logging;
use uuid::Uuid;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the financial calculators
    Tools,
    /// Run a financial calculator
    Calc {
        /// Print the result as JSON
        #[arg(long, global = true)]
        json: bool,

        #[command(subcommand)]
        calculator: Calculator,
    },
    /// Record and browse income and expenses
    #[command(subcommand)]
    Tx(TxCommands),
    /// Display income and expense summary
    Summary,
    /// Ask the AI advisor about your finances
    Ask {
        /// Your question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TxCommands {
    /// Record a transaction (an expense unless --income is given)
    Add {
        title: String,
        amount: f64,
        /// Record as income
        #[arg(long)]
        income: bool,
        /// Category, e.g. "Food & Dining" (defaults to Others)
        #[arg(long)]
        category: Option<Category>,
        /// Let the advisor pick the category of an expense
        #[arg(long, conflicts_with = "category")]
        auto_category: bool,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Only income
        #[arg(long, conflicts_with = "expense")]
        income: bool,
        /// Only expenses
        #[arg(long)]
        expense: bool,
        /// Show at most this many
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete a transaction by id
    Remove { id: Uuid },
    /// Delete every transaction
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

impl From<TxCommands> for moneymaster::AppCommand {
    fn from(cmd: TxCommands) -> moneymaster::AppCommand {
        match cmd {
            TxCommands::Add {
                title,
                amount,
                income,
                category,
                auto_category,
                notes,
            } => moneymaster::AppCommand::AddTransaction(NewTransaction {
                title,
                amount,
                kind: if income {
                    TransactionKind::Income
                } else {
                    TransactionKind::Expense
                },
                category,
                auto_category,
                notes,
            }),
            TxCommands::List {
                income,
                expense,
                limit,
            } => moneymaster::AppCommand::ListTransactions {
                kind: match (income, expense) {
                    (true, _) => Some(TransactionKind::Income),
                    (_, true) => Some(TransactionKind::Expense),
                    _ => None,
                },
                limit,
            },
            TxCommands::Remove { id } => moneymaster::AppCommand::RemoveTransaction(id),
            TxCommands::Clear { yes } => {
                moneymaster::AppCommand::ClearTransactions { confirmed: yes }
            }
        }
    }
}

impl From<Commands> for moneymaster::AppCommand {
    fn from(cmd: Commands) -> moneymaster::AppCommand {
        match cmd {
            Commands::Tools => moneymaster::AppCommand::Tools,
            Commands::Calc { json, calculator } => {
                moneymaster::AppCommand::Calc { calculator, json }
            }
            Commands::Tx(tx) => tx.into(),
            Commands::Summary => moneymaster::AppCommand::Summary,
            Commands::Ask { question } => moneymaster::AppCommand::Ask(question.join(" ")),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => moneymaster::cli::setup::setup_at_path(path),
            None => moneymaster::cli::setup::setup(),
        },
        Some(cmd) => moneymaster::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
