//! Income and expense transactions and the summaries built from them.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("transaction title must not be empty")]
    EmptyTitle,
    #[error("transaction amount must be a positive number, got {0}")]
    InvalidAmount(f64),
    #[error("category '{category}' cannot be used for {kind} transactions")]
    CategoryMismatch {
        category: Category,
        kind: TransactionKind,
    },
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

macro_rules! categories {
    ($($variant:ident => $label:literal, $income:literal, $expense:literal;)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Category {
            $( #[serde(rename = $label)] $variant, )*
        }

        impl Category {
            pub const ALL: &'static [Category] = &[ $( Category::$variant, )* ];

            pub fn label(&self) -> &'static str {
                match self {
                    $( Category::$variant => $label, )*
                }
            }

            pub fn allows(&self, kind: TransactionKind) -> bool {
                match (self, kind) {
                    $( (Category::$variant, TransactionKind::Income) => $income,
                       (Category::$variant, TransactionKind::Expense) => $expense, )*
                }
            }
        }
    };
}

categories! {
    Salary => "Salary", true, false;
    Freelance => "Freelance", true, false;
    Business => "Business", true, false;
    Investments => "Investments", true, false;
    RentalIncome => "Rental Income", true, false;
    Dividends => "Dividends", true, false;
    Interest => "Interest", true, false;
    Refunds => "Refunds", true, false;
    Gifts => "Gifts", true, false;
    Bonus => "Bonus", true, false;
    Grants => "Grants", true, false;
    Food => "Food & Dining", false, true;
    Groceries => "Groceries", false, true;
    Travel => "Travel", false, true;
    Shopping => "Shopping", false, true;
    Housing => "Housing & Rent", false, true;
    Bills => "Bills & Utilities", false, true;
    Healthcare => "Healthcare", false, true;
    Entertainment => "Entertainment", false, true;
    Education => "Education", false, true;
    PersonalCare => "Personal Care", false, true;
    Insurance => "Insurance", false, true;
    Debt => "Debt & EMI", false, true;
    Taxes => "Taxes", false, true;
    Charity => "Charity", false, true;
    Others => "Others", true, true;
}

impl Category {
    pub fn for_kind(kind: TransactionKind) -> impl Iterator<Item = Category> {
        Category::ALL.iter().copied().filter(move |c| c.allows(kind))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    /// Matches the label case-insensitively, ignoring surrounding quotes and
    /// punctuation that language models like to add.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '*')
            .trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(cleaned))
            .ok_or_else(|| LedgerError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Category,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn new(
        title: &str,
        amount: f64,
        kind: TransactionKind,
        category: Category,
    ) -> Result<Self, LedgerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LedgerError::EmptyTitle);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if !category.allows(kind) {
            return Err(LedgerError::CategoryMismatch { category, kind });
        }

        Ok(Transaction {
            id: Uuid::new_v4(),
            title: title.to_string(),
            amount,
            kind,
            category,
            date: Utc::now(),
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = (!notes.trim().is_empty()).then_some(notes);
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Contribution to the balance: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LedgerSummary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    pub savings_rate: f64,
    pub transaction_count: usize,
    pub income_by_category: Vec<CategoryTotal>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub monthly: Vec<MonthlyTotal>,
}

impl LedgerSummary {
    /// The category with the largest expense total.
    pub fn top_expense_category(&self) -> Option<&CategoryTotal> {
        self.expense_by_category.first()
    }
}

fn sorted_totals(totals: HashMap<Category, f64>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.label().cmp(b.category.label()))
    });
    totals
}

pub fn savings_rate(income: f64, expense: f64) -> f64 {
    if income > 0.0 {
        ((income - expense) / income * 100.0).max(0.0)
    } else {
        0.0
    }
}

pub fn summarize(transactions: &[Transaction]) -> LedgerSummary {
    let mut income = 0.0;
    let mut expense = 0.0;
    let mut income_by_category = HashMap::new();
    let mut expense_by_category = HashMap::new();
    let mut monthly: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for tx in transactions {
        let month = monthly
            .entry(tx.date.format("%Y-%m").to_string())
            .or_default();
        match tx.kind {
            TransactionKind::Income => {
                income += tx.amount;
                month.0 += tx.amount;
                *income_by_category.entry(tx.category).or_insert(0.0) += tx.amount;
            }
            TransactionKind::Expense => {
                expense += tx.amount;
                month.1 += tx.amount;
                *expense_by_category.entry(tx.category).or_insert(0.0) += tx.amount;
            }
        }
    }
    debug!(
        "Summarized {} transactions: income={income}, expense={expense}",
        transactions.len()
    );

    LedgerSummary {
        income,
        expense,
        balance: income - expense,
        savings_rate: savings_rate(income, expense),
        transaction_count: transactions.len(),
        income_by_category: sorted_totals(income_by_category),
        expense_by_category: sorted_totals(expense_by_category),
        monthly: monthly
            .into_iter()
            .map(|(month, (income, expense))| MonthlyTotal {
                month,
                income,
                expense,
            })
            .collect(),
    }
}

/// The `n` newest transactions, newest first.
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tx(
        title: &str,
        amount: f64,
        kind: TransactionKind,
        category: Category,
        day: (i32, u32, u32),
    ) -> Transaction {
        Transaction::new(title, amount, kind, category)
            .unwrap()
            .with_date(Utc.with_ymd_and_hms(day.0, day.1, day.2, 12, 0, 0).unwrap())
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("Salary", 5000.0, TransactionKind::Income, Category::Salary, (2025, 1, 1)),
            tx("Rent", 1500.0, TransactionKind::Expense, Category::Housing, (2025, 1, 3)),
            tx("Dinner", 80.0, TransactionKind::Expense, Category::Food, (2025, 1, 10)),
            tx("Salary", 5000.0, TransactionKind::Income, Category::Salary, (2025, 2, 1)),
            tx("Gig", 700.0, TransactionKind::Income, Category::Freelance, (2025, 2, 5)),
            tx("Rent", 1500.0, TransactionKind::Expense, Category::Housing, (2025, 2, 3)),
            tx("Groceries", 320.0, TransactionKind::Expense, Category::Groceries, (2025, 2, 8)),
        ]
    }

    #[test]
    fn test_new_transaction_validation() {
        assert_eq!(
            Transaction::new("  ", 10.0, TransactionKind::Expense, Category::Food),
            Err(LedgerError::EmptyTitle)
        );
        assert_eq!(
            Transaction::new("Coffee", 0.0, TransactionKind::Expense, Category::Food),
            Err(LedgerError::InvalidAmount(0.0))
        );
        assert!(
            Transaction::new("Coffee", f64::NAN, TransactionKind::Expense, Category::Food).is_err()
        );
        assert_eq!(
            Transaction::new("Coffee", 4.0, TransactionKind::Income, Category::Food),
            Err(LedgerError::CategoryMismatch {
                category: Category::Food,
                kind: TransactionKind::Income
            })
        );

        let a =
            Transaction::new(" Coffee ", 4.5, TransactionKind::Expense, Category::Others).unwrap();
        let b = Transaction::new("Coffee", 4.5, TransactionKind::Income, Category::Others).unwrap();
        assert_eq!(a.title, "Coffee");
        assert_ne!(a.id, b.id);
        assert_eq!(a.signed_amount(), -4.5);
        assert_eq!(b.signed_amount(), 4.5);
        assert_eq!(a.with_notes("  ").notes, None);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample());
        assert_eq!(summary.income, 10_700.0);
        assert_eq!(summary.expense, 3_400.0);
        assert_eq!(summary.balance, 7_300.0);
        assert!((summary.savings_rate - 68.224_299).abs() < 1e-5);
        assert_eq!(summary.transaction_count, 7);

        assert_eq!(summary.expense_by_category[0].category, Category::Housing);
        assert_eq!(summary.expense_by_category[0].total, 3000.0);
        assert_eq!(summary.expense_by_category.len(), 3);
        assert_eq!(summary.income_by_category[0].category, Category::Salary);

        assert_eq!(
            summary.monthly,
            vec![
                MonthlyTotal { month: "2025-01".into(), income: 5000.0, expense: 1580.0 },
                MonthlyTotal { month: "2025-02".into(), income: 5700.0, expense: 1820.0 },
            ]
        );
    }

    #[test]
    fn test_savings_rate_never_negative() {
        assert_eq!(savings_rate(0.0, 100.0), 0.0);
        assert_eq!(savings_rate(100.0, 150.0), 0.0);
        assert_eq!(savings_rate(100.0, 25.0), 75.0);
        assert_eq!(summarize(&[]), LedgerSummary::default());
    }

    #[test]
    fn test_recent_and_top_category() {
        let txs = sample();
        let latest = recent(&txs, 2);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].title, "Groceries");
        assert_eq!(latest[1].title, "Gig");
        assert_eq!(recent(&txs, 100).len(), 7);

        let summary = summarize(&txs);
        assert_eq!(
            summary.top_expense_category().map(|t| t.category),
            Some(Category::Housing)
        );
        assert!(summarize(&txs[..1]).top_expense_category().is_none());
    }

    #[test]
    fn test_category_parsing_and_kinds() {
        assert_eq!("food & dining".parse::<Category>(), Ok(Category::Food));
        assert_eq!(" \"Travel\". ".parse::<Category>(), Ok(Category::Travel));
        assert!("Spaceships".parse::<Category>().is_err());

        assert!(Category::Others.allows(TransactionKind::Income));
        assert!(Category::Others.allows(TransactionKind::Expense));
        assert_eq!(Category::for_kind(TransactionKind::Income).count(), 12);
        assert_eq!(Category::for_kind(TransactionKind::Expense).count(), 15);
    }

    #[test]
    fn test_serde_uses_labels() {
        let t = tx("Rent", 1500.0, TransactionKind::Expense, Category::Housing, (2025, 1, 3));
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["category"], "Housing & Rent");
        assert_eq!(json["type"], "EXPENSE");
        assert!(json.get("notes").is_none());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }
}
