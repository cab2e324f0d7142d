pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::ledger::NewTransaction;
use crate::cli::ui::MoneyFormat;
use crate::core::advisor::AdviceProvider;
use crate::core::calculator::Calculator;
use crate::core::config::AppConfig;
use crate::core::ledger::TransactionKind;
use crate::providers::GeminiProvider;
use crate::store::{DiskStore, TransactionStore};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Tools,
    Calc {
        calculator: Calculator,
        json: bool,
    },
    AddTransaction(NewTransaction),
    ListTransactions {
        kind: Option<TransactionKind>,
        limit: Option<usize>,
    },
    RemoveTransaction(Uuid),
    ClearTransactions {
        confirmed: bool,
    },
    Summary,
    Ask(String),
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load().context("No configuration found. Run `moneymaster setup` first")?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

fn money_format(config: &AppConfig) -> MoneyFormat {
    MoneyFormat {
        currency: config.currency,
        privacy: config.privacy_mode,
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Money Master starting...");

    match command {
        AppCommand::Tools => {
            println!("{}", cli::tools::render());
        }
        AppCommand::Calc { calculator, json } => {
            let config = AppConfig::load_or_default(config_path)?;
            println!("{}", cli::calc::run(&calculator, json, money_format(&config))?);
        }
        AppCommand::AddTransaction(entry) => {
            let config = load_config(config_path)?;
            let store = DiskStore::for_config(&config)?;
            let provider = if entry.auto_category && entry.category.is_none() {
                GeminiProvider::from_config(&config.advisor)
                    .inspect_err(|e| warn!("Auto-categorization unavailable: {e}"))
                    .ok()
            } else {
                None
            };
            cli::ledger::add(
                entry,
                &store,
                provider.as_ref().map(|p| p as &dyn AdviceProvider),
                money_format(&config),
            )
            .await?;
        }
        AppCommand::ListTransactions { kind, limit } => {
            let config = load_config(config_path)?;
            let store = DiskStore::for_config(&config)?;
            println!(
                "{}",
                cli::ledger::list(&store, kind, limit, money_format(&config))?
            );
        }
        AppCommand::RemoveTransaction(id) => {
            let config = load_config(config_path)?;
            let store = DiskStore::for_config(&config)?;
            cli::ledger::remove(&store, &id)?;
        }
        AppCommand::ClearTransactions { confirmed } => {
            let config = load_config(config_path)?;
            let store = DiskStore::for_config(&config)?;
            cli::ledger::clear(&store, confirmed)?;
        }
        AppCommand::Summary => {
            let config = load_config(config_path)?;
            let store = DiskStore::for_config(&config)?;
            let transactions = store.list()?;
            println!(
                "{}",
                cli::summary::render(&transactions, money_format(&config))
            );
        }
        AppCommand::Ask(question) => {
            let config = load_config(config_path)?;
            let provider = GeminiProvider::from_config(&config.advisor)?;
            let store = DiskStore::for_config(&config)?;
            let answer = cli::advice::ask(&question, &config, &store, &provider).await?;
            println!("{answer}");
        }
    }
    Ok(())
}
