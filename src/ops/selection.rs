use std::collections::BTreeSet;

use crate::model::task::TaskId;

/// State of the "select all" checkbox in the table header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckbox {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Session-only set of selected task ids.
///
/// Ids hidden under a collapsed parent stay selected; only the bulk toggle
/// looks at what is currently visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<TaskId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: TaskId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.ids.iter().copied()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Invert membership of one id.
    pub fn toggle_row(&mut self, id: TaskId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Deselect every visible id if all are selected, otherwise select
    /// them all. Hidden ids are left alone either way.
    pub fn toggle_all(&mut self, visible_ids: &[TaskId]) {
        if self.all_selected(visible_ids) {
            for id in visible_ids {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(visible_ids.iter().copied());
        }
    }

    /// How many of the visible ids are selected
    pub fn selected_visible_count(&self, visible_ids: &[TaskId]) -> usize {
        visible_ids.iter().filter(|id| self.ids.contains(id)).count()
    }

    fn all_selected(&self, visible_ids: &[TaskId]) -> bool {
        visible_ids.iter().all(|id| self.ids.contains(id))
    }

    pub fn header_state(&self, visible_ids: &[TaskId]) -> HeaderCheckbox {
        let selected = self.selected_visible_count(visible_ids);
        if selected == 0 {
            HeaderCheckbox::Unchecked
        } else if selected == visible_ids.len() {
            HeaderCheckbox::Checked
        } else {
            HeaderCheckbox::Indeterminate
        }
    }
}
