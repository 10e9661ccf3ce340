//! Expense category types.

use serde::{Deserialize, Serialize};
use spendra_shared::types::CategoryId;

/// An expense category.
///
/// Categories form a forest: each category has at most one parent,
/// referenced by id. Inactive categories are excluded from new
/// assignments but retained on historical records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// Optional parent category.
    pub parent_id: Option<CategoryId>,
    /// Display name.
    pub name: String,
    /// Whether the category accepts new assignments.
    pub is_active: bool,
}

impl Category {
    /// Creates a new active category.
    #[must_use]
    pub fn new(name: impl Into<String>, parent_id: Option<CategoryId>) -> Self {
        Self {
            id: CategoryId::new(),
            parent_id,
            name: name.into(),
            is_active: true,
        }
    }
}
