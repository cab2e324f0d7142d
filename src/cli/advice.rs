use super::ui;
use crate::core::advisor::{self, AdviceProvider};
use crate::core::config::AppConfig;
use crate::store::TransactionStore;
use anyhow::{Result, bail};
use tracing::{debug, info};

/// Sends `question` with the user's latest activity to the advisor.
pub async fn ask(
    question: &str,
    config: &AppConfig,
    store: &dyn TransactionStore,
    provider: &dyn AdviceProvider,
) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        bail!("Ask a question, for example: moneymaster ask \"How can I save more?\"");
    }

    let transactions = store.list()?;
    let context = advisor::build_context(&config.profile.name, config.currency, &transactions)?;
    debug!("Advisor context: {context}");
    info!("Asking advisor about {} transactions", transactions.len());

    let pb = ui::new_spinner("Thinking...");
    let answer = provider.advise(question, &context).await;
    pb.finish_and_clear();

    Ok(answer?)
}
