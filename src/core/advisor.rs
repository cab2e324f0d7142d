//! Financial advice from a language model.
use crate::core::currency::CurrencyCode;
use crate::core::ledger::{self, Category, Transaction};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Answer used when the model returns no text.
pub const EMPTY_ANSWER: &str = "I couldn't generate a response at this time.";

/// Number of transactions shared with the model.
pub const CONTEXT_TRANSACTIONS: usize = 5;

#[async_trait]
pub trait AdviceProvider: Send + Sync {
    /// Answers `question` given a rendered summary of the user's data.
    async fn advise(&self, question: &str, context: &str) -> Result<String>;

    /// Suggests a category for an expense title.
    async fn categorize(&self, title: &str) -> Result<Category>;
}

/// Instructions sent with every advice request.
pub fn system_instruction(context: &str) -> String {
    format!(
        r#"You are 'Money Master Brain', an elite financial strategist for the 'Money Master Pro' app.

YOUR STYLE:
- **Concise & Punchy:** No fluff. Get straight to the numbers.
- **Structured:** Use formatting like **Bold** headers and lists.
- **Realistic:** Always account for inflation and realistic market conditions.
- **Emoji Use:** Use 1-2 relevant emojis to make it engaging but professional.

YOUR TASK:
Analyze the user's data and answer their question.

IF ASKED FOR A SUMMARY:
Provide a "Financial Health Card":
1. **Net Flow:** (Income - Expense) status.
2. **Spending Alert:** Identify the biggest expense category.
3. **Action Item:** One specific thing they should do today.

DATA CONTEXT provided by app:
{context}

Keep the response under 150 words. Use the user's specific currency symbol."#
    )
}

pub fn categorize_prompt(title: &str) -> String {
    let names: Vec<&str> = Category::for_kind(ledger::TransactionKind::Expense)
        .map(|c| c.label())
        .collect();
    format!(
        "Categorize this expense title into one of these exact categories: {}. \
         Return ONLY the category name. Title: \"{title}\"",
        names.join(", ")
    )
}

/// Renders the user's profile and latest activity for the model.
pub fn build_context(
    profile_name: &str,
    currency: CurrencyCode,
    transactions: &[Transaction],
) -> Result<String> {
    let balance: f64 = transactions.iter().map(Transaction::signed_amount).sum();
    let recent = ledger::recent(transactions, CONTEXT_TRANSACTIONS);
    let recent_json = serde_json::to_string(&recent)?;
    Ok(format!(
        "User: {profile_name}, Currency: {currency}. Total Balance: {balance}. \
         Recent Txs: {recent_json}"
    ))
}

/// Asks the provider for a category, settling on `Others` when it fails or
/// answers with something that is not an expense category.
pub async fn categorize_or_default(provider: &dyn AdviceProvider, title: &str) -> Category {
    match provider.categorize(title).await {
        Ok(category) if category.allows(ledger::TransactionKind::Expense) => {
            debug!("Categorized '{title}' as {category}");
            category
        }
        Ok(category) => {
            debug!("Ignoring non-expense category {category} for '{title}'");
            Category::Others
        }
        Err(e) => {
            warn!("Categorization failed for '{title}': {e}");
            Category::Others
        }
    }
}
