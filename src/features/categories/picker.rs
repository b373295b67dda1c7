//! Stateful coordinator behind a category picking view
//!
//! Owns the flat snapshot, the forest derived from it, and the
//! expansion/selection state, and orchestrates the create-then-reveal flow.
//! Every mutation goes through a full re-fetch-and-rebuild; the forest is
//! never patched incrementally, so view state can never tear against a stale
//! snapshot.

use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::dtos::NewCategory;
use crate::features::categories::models::{Category, CategoryNode};
use crate::features::categories::selection::SelectionState;
use crate::features::categories::services::CategoryService;
use crate::features::categories::tree::build_tree;
use crate::modules::store::DataStore;

pub struct CategoryPicker {
    service: CategoryService,
    categories: Vec<Category>,
    forest: Vec<CategoryNode>,
    state: SelectionState,
}

impl CategoryPicker {
    /// A fresh picker with empty snapshot and view state; call
    /// [`refresh`](Self::refresh) to load.
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            service: CategoryService::new(store),
            categories: Vec::new(),
            forest: Vec::new(),
            state: SelectionState::new(),
        }
    }

    /// Discard the snapshot and forest and rebuild both from the store.
    pub async fn refresh(&mut self) -> Result<()> {
        let categories = self.service.list().await?;
        self.forest = build_tree(&categories);
        self.categories = categories;
        Ok(())
    }

    pub fn forest(&self) -> &[CategoryNode] {
        &self.forest
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn toggle_expand(&mut self, id: i64) {
        self.state.toggle_expand(id);
    }

    pub fn toggle_select(&mut self, id: i64) {
        self.state.toggle_select(id);
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.state.is_expanded(id)
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.state.is_selected(id)
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        self.state.selected_ids()
    }

    /// Create a category and make it visible.
    ///
    /// Only after a confirmed round trip: the snapshot is re-fetched and the
    /// forest rebuilt, the parent is expanded so the new node shows without
    /// further user action, and with `auto_select` the new id joins the
    /// selection. On failure nothing local changes.
    pub async fn add_category(
        &mut self,
        name: &str,
        parent: Option<i64>,
        auto_select: bool,
    ) -> Result<i64> {
        let id = self.service.create(NewCategory::named(name, parent)).await?;

        self.refresh().await?;
        if let Some(parent) = parent {
            self.state.expand(parent);
        }
        if auto_select {
            self.state.select(id);
        }

        Ok(id)
    }
}
