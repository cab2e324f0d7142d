//! Terminal presentation for each command.

pub mod advice;
pub mod calc;
pub mod ledger;
pub mod setup;
pub mod summary;
pub mod tools;
pub mod ui;
