//! Expense records and owner inputs.

pub mod types;

pub use types::{CreateExpenseInput, Expense, UpdateExpenseInput};
