use crate::model::{Narrator, NarratorId};

/// Known narrators and the active filter, in selection order.
#[derive(Default)]
pub struct NarratorState {
    pub(in crate::app) available: Vec<Narrator>,
    pub(in crate::app) selected: Vec<NarratorId>,
}

impl NarratorState {
    pub(in crate::app) fn filter_active(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Returns whether `id` is selected afterwards.
    pub(in crate::app) fn toggle(&mut self, id: NarratorId) -> bool {
        if let Some(pos) = self.selected.iter().position(|selected| *selected == id) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(id);
            true
        }
    }
}
