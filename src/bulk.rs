use crate::backend::BackendClient;
use crate::error::CatalogError;
use crate::model::Translation;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Multi-select state over the currently displayed translation sequence.
///
/// Indices refer to positions in the displayed (possibly filtered) list, not
/// to backend ids. The set starts empty, is mutated by toggling, and is
/// cleared by a successful bulk action or a scope-exit signal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    indices: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of one index.
    pub fn toggle(&mut self, index: usize) {
        if !self.indices.remove(&index) {
            self.indices.insert(index);
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

/// Multi-select bulk delete over a displayed translation sequence.
///
/// Deletion is optimistic: the local list is updated and the selection
/// cleared before the backend confirms, and the pre-delete snapshot is
/// restored if the batched call fails.
pub struct BulkMutationCoordinator {
    backend: Arc<BackendClient>,
    items: Vec<Translation>,
    selection: SelectionSet,
}

impl BulkMutationCoordinator {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self {
            backend,
            items: Vec::new(),
            selection: SelectionSet::new(),
        }
    }

    /// Replace the displayed sequence. Any existing selection is dropped,
    /// since its indices pointed into the old sequence.
    pub fn set_items(&mut self, items: Vec<Translation>) {
        self.items = items;
        self.selection.clear();
    }

    pub fn items(&self) -> &[Translation] {
        &self.items
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Toggle selection of one displayed translation. Out-of-range indices
    /// are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index < self.items.len() {
            self.selection.toggle(index);
        }
    }

    /// Scope-exit signal (the caller's focus left the selection container):
    /// deselect everything.
    pub fn scope_exited(&mut self) {
        self.selection.clear();
    }

    /// Delete all selected translations in one batched backend call.
    ///
    /// Returns the deleted ids. On failure the displayed sequence is restored
    /// from the pre-delete snapshot and the error is surfaced; the selection
    /// stays cleared either way.
    pub async fn delete_selected(&mut self) -> Result<Vec<String>, CatalogError> {
        if self.selection.is_empty() {
            return Ok(Vec::new());
        }

        let snapshot = self.items.clone();

        // Unsaved translations carry no id and cannot be deleted remotely.
        let ids: Vec<String> = self
            .selection
            .indices()
            .filter_map(|index| self.items.get(index))
            .filter_map(|translation| translation.id.clone())
            .collect();

        // Optimistic update: drop the rows and the selection before the
        // backend answers.
        let selected: BTreeSet<usize> = self.selection.indices().collect();
        self.items = std::mem::take(&mut self.items)
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !selected.contains(index))
            .map(|(_, translation)| translation)
            .collect();
        self.selection.clear();

        match self.backend.delete_translations_bulk(&ids).await {
            Ok(()) => {
                info!("Bulk-deleted {} translations", ids.len());
                Ok(ids)
            }
            Err(e) => {
                warn!("Bulk delete failed ({}), restoring snapshot", e);
                self.items = snapshot;
                Err(e)
            }
        }
    }
}
