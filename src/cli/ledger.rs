use super::ui::{self, MoneyFormat};
use crate::core::advisor::{self, AdviceProvider};
use crate::core::ledger::{Category, Transaction, TransactionKind};
use crate::store::TransactionStore;
use anyhow::{Result, bail};
use comfy_table::Cell;
use tracing::info;
use uuid::Uuid;

/// A transaction as entered on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: Option<Category>,
    pub auto_category: bool,
    pub notes: Option<String>,
}

pub async fn add(
    entry: NewTransaction,
    store: &dyn TransactionStore,
    provider: Option<&dyn AdviceProvider>,
    money: MoneyFormat,
) -> Result<Transaction> {
    let category = match (entry.category, provider) {
        (Some(category), _) => category,
        (None, Some(provider)) if entry.auto_category && entry.kind == TransactionKind::Expense => {
            advisor::categorize_or_default(provider, &entry.title).await
        }
        (None, _) => Category::Others,
    };

    let mut tx = Transaction::new(&entry.title, entry.amount, entry.kind, category)?;
    if let Some(notes) = entry.notes {
        tx = tx.with_notes(notes);
    }
    store.add(&tx)?;
    info!("Recorded {} {} ({})", tx.kind, tx.id, tx.category);

    println!(
        "Added {} '{}' of {} in {} [{}]",
        tx.kind,
        tx.title,
        money.amount(tx.amount),
        tx.category,
        tx.id
    );
    Ok(tx)
}

pub fn display_transactions(txs: &[Transaction], money: MoneyFormat) -> String {
    if txs.is_empty() {
        return ui::style_text("No transactions yet.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Title"),
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
        ui::header_cell("Notes"),
        ui::header_cell("Id"),
    ]);
    for tx in txs {
        table.add_row(vec![
            Cell::new(tx.date.format("%Y-%m-%d")),
            Cell::new(&tx.title),
            Cell::new(tx.category),
            ui::amount_cell(tx.signed_amount(), money),
            Cell::new(tx.notes.as_deref().unwrap_or("")),
            Cell::new(tx.id),
        ]);
    }
    table.to_string()
}

pub fn list(
    store: &dyn TransactionStore,
    kind: Option<TransactionKind>,
    limit: Option<usize>,
    money: MoneyFormat,
) -> Result<String> {
    let txs: Vec<Transaction> = store
        .list()?
        .into_iter()
        .filter(|tx| kind.is_none_or(|k| tx.kind == k))
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    Ok(display_transactions(&txs, money))
}

pub fn remove(store: &dyn TransactionStore, id: &Uuid) -> Result<()> {
    if !store.remove(id)? {
        bail!("No transaction with id {id}");
    }
    info!("Removed transaction {id}");
    println!("Removed transaction {id}");
    Ok(())
}

pub fn clear(store: &dyn TransactionStore, confirmed: bool) -> Result<usize> {
    if !confirmed {
        bail!("Refusing to delete all transactions without --yes");
    }
    let count = store.clear()?;
    info!("Cleared {count} transactions");
    println!("Deleted {count} transactions");
    Ok(count)
}
