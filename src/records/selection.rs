//! Selection set bookkeeping for batch deletion.

use std::collections::BTreeSet;

use super::{EngineError, Record, RecordId};

/// Message shown when a delete is requested with nothing selected.
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one row to delete.";

/// Record identifiers chosen in the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }

    /// Toggle a row; rows without an id are ignored.
    pub fn toggle(&mut self, id: Option<&RecordId>) {
        let Some(id) = id else {
            return;
        };
        if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
    }

    pub fn set(&mut self, id: Option<&RecordId>, selected: bool) {
        let Some(id) = id else {
            return;
        };
        if selected {
            self.ids.insert(id.clone());
        } else {
            self.ids.remove(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that are no longer present after a refresh.
    pub fn retain_present(&mut self, records: &[Record]) {
        let present: BTreeSet<&RecordId> = records.iter().filter_map(|r| r.id.as_ref()).collect();
        self.ids.retain(|id| present.contains(id));
    }
}

/// Drop null ids and fail fast when nothing remains.
pub fn filter_selection<'a>(
    candidates: impl IntoIterator<Item = Option<&'a RecordId>>,
) -> Result<Vec<RecordId>, EngineError> {
    let ids: Vec<RecordId> = candidates.into_iter().flatten().cloned().collect();
    if ids.is_empty() {
        return Err(EngineError::Validation(EMPTY_SELECTION_MESSAGE.to_string()));
    }
    Ok(ids)
}
