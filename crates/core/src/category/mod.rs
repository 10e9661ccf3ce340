//! Expense category forest.
//!
//! # Modules
//!
//! - `types` - Category record
//! - `error` - Category-specific error types
//! - `arena` - Id-indexed arena with acyclicity validation

pub mod arena;
pub mod error;
pub mod types;

pub use arena::CategoryArena;
pub use error::CategoryError;
pub use types::Category;
