//! Expansion and selection bookkeeping for a category picking view
//!
//! Two independent sets over category ids: which interior nodes show their
//! children, and which categories are attached to the entity being edited.
//! Selecting a parent implies nothing about its children and vice versa.
//! Pure client-side view state, empty on construction, persisted only through
//! an explicit association call made by the consuming form.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    expanded: HashSet<i64>,
    selected: HashSet<i64>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip whether `id` shows its children.
    pub fn toggle_expand(&mut self, id: i64) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    /// Flip whether `id` is selected.
    pub fn toggle_select(&mut self, id: i64) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Expand `id` regardless of its current state (used to reveal a freshly
    /// created child without further user action).
    pub fn expand(&mut self, id: i64) {
        self.expanded.insert(id);
    }

    pub fn select(&mut self, id: i64) {
        self.selected.insert(id);
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded.contains(&id)
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in ascending order
    pub fn selected_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_expand_round_trips() {
        let mut state = SelectionState::new();

        state.toggle_expand(1);
        assert!(state.is_expanded(1));
        state.toggle_expand(1);
        assert!(!state.is_expanded(1));
    }

    #[test]
    fn test_expand_and_select_are_independent() {
        let mut state = SelectionState::new();

        state.toggle_expand(1);
        assert!(!state.is_selected(1));

        state.toggle_select(1);
        state.toggle_expand(1);
        assert!(state.is_selected(1));
        assert!(!state.is_expanded(1));
    }

    #[test]
    fn test_selection_does_not_cascade() {
        let mut state = SelectionState::new();

        // Selecting a parent leaves children alone; ids are independent.
        state.toggle_select(1);
        assert!(state.is_selected(1));
        assert!(!state.is_selected(2));

        state.toggle_select(2);
        state.toggle_select(1);
        assert_eq!(state.selected_ids(), vec![2]);
    }

    #[test]
    fn test_clear_empties_both_sets() {
        let mut state = SelectionState::new();
        state.toggle_expand(1);
        state.toggle_select(2);

        state.clear();

        assert!(!state.is_expanded(1));
        assert!(state.selected_ids().is_empty());
    }
}
