//! Core business logic abstractions

pub mod advisor;
pub mod calculator;
pub mod config;
pub mod currency;
pub mod error;
pub mod formula;
pub mod ledger;
pub mod log;
pub mod report;

// Re-export main types for cleaner imports
pub use advisor::AdviceProvider;
pub use calculator::{Calculator, Tool, ToolGroup, ToolKind};
pub use currency::CurrencyCode;
pub use error::{CalcError, CalcResult, DomainError, InputError};
pub use ledger::{Category, Transaction, TransactionKind};
pub use report::{Figure, Report, Unit};
