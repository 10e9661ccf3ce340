//! Id-indexed category arena.
//!
//! Categories are held in a map keyed by id with parent references as
//! ids, never pointers. Acyclicity is validated whenever a parent link
//! is introduced: the new parent's ancestor chain must not include the
//! child.

use std::collections::{HashMap, HashSet};

use spendra_shared::types::CategoryId;

use super::error::CategoryError;
use super::types::Category;

/// Arena of categories forming a forest.
#[derive(Debug, Clone, Default)]
pub struct CategoryArena {
    categories: HashMap<CategoryId, Category>,
}

impl CategoryArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of categories in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True if the arena holds no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Looks up a category by id.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// True if the category exists and accepts new assignments.
    #[must_use]
    pub fn is_assignable(&self, id: CategoryId) -> bool {
        self.categories.get(&id).is_some_and(|c| c.is_active)
    }

    /// Inserts a new category.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the id is already present, `ParentNotFound`
    /// if the parent does not exist, or `CycleDetected` if the parent's
    /// ancestor chain would include the child.
    pub fn insert(&mut self, category: Category) -> Result<(), CategoryError> {
        if self.categories.contains_key(&category.id) {
            return Err(CategoryError::Duplicate(category.id));
        }
        if let Some(parent_id) = category.parent_id {
            self.check_link(category.id, parent_id)?;
        }
        self.categories.insert(category.id, category);
        Ok(())
    }

    /// Moves a category under a new parent (or to the root).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist, `ParentNotFound`
    /// if the new parent does not exist, or `CycleDetected` if the new
    /// parent's ancestor chain includes the category.
    pub fn reparent(
        &mut self,
        id: CategoryId,
        new_parent: Option<CategoryId>,
    ) -> Result<(), CategoryError> {
        if !self.categories.contains_key(&id) {
            return Err(CategoryError::NotFound(id));
        }
        if let Some(parent_id) = new_parent {
            self.check_link(id, parent_id)?;
        }
        if let Some(category) = self.categories.get_mut(&id) {
            category.parent_id = new_parent;
        }
        Ok(())
    }

    /// Marks a category inactive. Historical records keep referencing it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist.
    pub fn deactivate(&mut self, id: CategoryId) -> Result<(), CategoryError> {
        match self.categories.get_mut(&id) {
            Some(category) => {
                category.is_active = false;
                Ok(())
            }
            None => Err(CategoryError::NotFound(id)),
        }
    }

    /// Returns the ancestor chain of a category, nearest parent first.
    #[must_use]
    pub fn ancestors(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.categories.get(&id).and_then(|c| c.parent_id);
        while let Some(ancestor) = current {
            // A well-formed arena has no cycles; the seen-set guards
            // traversal against externally corrupted data.
            if !seen.insert(ancestor) {
                break;
            }
            chain.push(ancestor);
            current = self.categories.get(&ancestor).and_then(|c| c.parent_id);
        }
        chain
    }

    /// Iterates over all categories.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    fn check_link(&self, child: CategoryId, parent: CategoryId) -> Result<(), CategoryError> {
        if !self.categories.contains_key(&parent) {
            return Err(CategoryError::ParentNotFound(parent));
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(CategoryError::CycleDetected { child, parent });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with_chain() -> (CategoryArena, Category, Category, Category) {
        // root -> mid -> leaf
        let mut arena = CategoryArena::new();
        let root = Category::new("Operations", None);
        let mid = Category::new("Travel", Some(root.id));
        let leaf = Category::new("Flights", Some(mid.id));
        arena.insert(root.clone()).unwrap();
        arena.insert(mid.clone()).unwrap();
        arena.insert(leaf.clone()).unwrap();
        (arena, root, mid, leaf)
    }

    #[test]
    fn test_insert_and_get() {
        let (arena, root, ..) = arena_with_chain();
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.get(root.id).unwrap().name, "Operations");
    }

    #[test]
    fn test_insert_duplicate_fails() {
        let (mut arena, root, ..) = arena_with_chain();
        let result = arena.insert(root);
        assert!(matches!(result, Err(CategoryError::Duplicate(_))));
    }

    #[test]
    fn test_insert_with_missing_parent_fails() {
        let mut arena = CategoryArena::new();
        let orphan = Category::new("Orphan", Some(CategoryId::new()));
        let result = arena.insert(orphan);
        assert!(matches!(result, Err(CategoryError::ParentNotFound(_))));
    }

    #[test]
    fn test_reparent_rejects_cycle() {
        let (mut arena, root, _, leaf) = arena_with_chain();
        // root under leaf would close the loop root -> mid -> leaf -> root.
        let result = arena.reparent(root.id, Some(leaf.id));
        assert!(matches!(result, Err(CategoryError::CycleDetected { .. })));
    }

    #[test]
    fn test_reparent_rejects_self_parent() {
        let (mut arena, root, ..) = arena_with_chain();
        let result = arena.reparent(root.id, Some(root.id));
        assert!(matches!(result, Err(CategoryError::CycleDetected { .. })));
    }

    #[test]
    fn test_reparent_to_root_allowed() {
        let (mut arena, _, _, leaf) = arena_with_chain();
        arena.reparent(leaf.id, None).unwrap();
        assert_eq!(arena.get(leaf.id).unwrap().parent_id, None);
        assert!(arena.ancestors(leaf.id).is_empty());
    }

    #[test]
    fn test_ancestors_ordering() {
        let (arena, root, mid, leaf) = arena_with_chain();
        assert_eq!(arena.ancestors(leaf.id), vec![mid.id, root.id]);
        assert_eq!(arena.ancestors(root.id), Vec::<CategoryId>::new());
    }

    #[test]
    fn test_deactivate_excludes_from_assignment() {
        let (mut arena, _, mid, _) = arena_with_chain();
        assert!(arena.is_assignable(mid.id));
        arena.deactivate(mid.id).unwrap();
        assert!(!arena.is_assignable(mid.id));
        // Still present for historical records.
        assert!(arena.get(mid.id).is_some());
    }

    #[test]
    fn test_deactivate_missing_fails() {
        let mut arena = CategoryArena::new();
        let result = arena.deactivate(CategoryId::new());
        assert!(matches!(result, Err(CategoryError::NotFound(_))));
    }
}
