use chrono::Utc;

use crate::model::column::{Column, ColumnId};
use crate::model::view::{
    DisplayDensity, FilterRule, SortConfig, View, default_view, next_sort,
};

/// All saved views, the active one, and the optional default pointer.
///
/// Setters touch only the active view. Every effective change bumps
/// `revision`, which the controller uses to decide when to persist and
/// when to re-derive.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewStore {
    views: Vec<View>,
    active_view_id: String,
    default_view_id: Option<String>,
    revision: u64,
}

impl Default for ViewStore {
    fn default() -> Self {
        let view = default_view();
        ViewStore {
            active_view_id: view.id.clone(),
            views: vec![view],
            default_view_id: None,
            revision: 0,
        }
    }
}

impl ViewStore {
    /// Build a store from persisted parts. An empty list falls back to the
    /// default view; an unknown active id falls back to the default id,
    /// then to the first view.
    pub fn from_parts(
        views: Vec<View>,
        active_view_id: Option<String>,
        default_view_id: Option<String>,
    ) -> Self {
        if views.is_empty() {
            return ViewStore {
                default_view_id,
                ..ViewStore::default()
            };
        }
        let exists = |id: &str| views.iter().any(|v| v.id == id);
        let active = active_view_id
            .filter(|id| exists(id.as_str()))
            .or_else(|| default_view_id.clone().filter(|id| exists(id.as_str())))
            .unwrap_or_else(|| views[0].id.clone());
        ViewStore {
            views,
            active_view_id: active,
            default_view_id,
            revision: 0,
        }
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn active_view_id(&self) -> &str {
        &self.active_view_id
    }

    pub fn default_view_id(&self) -> Option<&str> {
        self.default_view_id.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    /// The active view. The store always holds at least one view and the
    /// active id always names one of them.
    pub fn active_view(&self) -> &View {
        self.view(&self.active_view_id)
            .unwrap_or(&self.views[0])
    }

    fn active_view_mut(&mut self) -> &mut View {
        let idx = self
            .views
            .iter()
            .position(|v| v.id == self.active_view_id)
            .unwrap_or(0);
        &mut self.views[idx]
    }

    /// Apply `f` to the active view; bump the revision if it changed.
    fn edit_active(&mut self, f: impl FnOnce(&mut View)) -> bool {
        let view = self.active_view_mut();
        let before = view.clone();
        f(view);
        let changed = *view != before;
        if changed {
            self.revision += 1;
        }
        changed
    }

    fn fresh_view_id(&self) -> String {
        let base = format!("view-{}", Utc::now().timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while self.view(&id).is_some() {
            n += 1;
            id = format!("{}-{}", base, n);
        }
        id
    }

    // -----------------------------------------------------------------------
    // View lifecycle
    // -----------------------------------------------------------------------

    /// Clone the active view's settings into a new view and switch to it.
    /// Returns the new id.
    pub fn create_view(&mut self, name: &str) -> String {
        let id = self.fresh_view_id();
        let source = self.active_view();
        let view = View {
            id: id.clone(),
            name: name.to_string(),
            columns: source.columns.clone(),
            display_density: source.display_density,
            show_grid_lines: source.show_grid_lines,
            sort_config: source.sort_config,
            search_query: source.search_query.clone(),
            filters: source.filters.clone(),
        };
        self.views.push(view);
        self.active_view_id = id.clone();
        self.revision += 1;
        id
    }

    pub fn rename_view(&mut self, id: &str, name: &str) -> bool {
        match self.views.iter_mut().find(|v| v.id == id) {
            Some(view) if view.name != name => {
                view.name = name.to_string();
                self.revision += 1;
                true
            }
            _ => false,
        }
    }

    /// Remove a view. Refused for the last remaining view. Deleting the
    /// active view switches to the default view when it still exists,
    /// otherwise to the first remaining one.
    pub fn delete_view(&mut self, id: &str) -> bool {
        if self.views.len() <= 1 {
            return false;
        }
        let Some(idx) = self.views.iter().position(|v| v.id == id) else {
            return false;
        };
        self.views.remove(idx);

        if self.active_view_id == id {
            let fallback = self
                .default_view_id
                .as_deref()
                .filter(|d| *d != id && self.view(d).is_some())
                .map(str::to_string)
                .unwrap_or_else(|| self.views[0].id.clone());
            self.active_view_id = fallback;
        }
        self.revision += 1;
        true
    }

    /// Remember `id` as the default view. Independent of the active view.
    pub fn set_default_view(&mut self, id: &str) -> bool {
        if self.default_view_id.as_deref() == Some(id) {
            return false;
        }
        self.default_view_id = Some(id.to_string());
        self.revision += 1;
        true
    }

    /// Switch the active view. Unknown ids are ignored.
    pub fn set_active_view(&mut self, id: &str) -> bool {
        if self.active_view_id == id || self.view(id).is_none() {
            return false;
        }
        self.active_view_id = id.to_string();
        self.revision += 1;
        true
    }

    // -----------------------------------------------------------------------
    // Active view settings
    // -----------------------------------------------------------------------

    pub fn set_columns(&mut self, columns: Vec<Column>) -> bool {
        self.edit_active(|v| v.columns = columns)
    }

    /// Edit the active view's columns in place.
    pub fn update_columns(&mut self, f: impl FnOnce(&mut Vec<Column>)) -> bool {
        self.edit_active(|v| f(&mut v.columns))
    }

    pub fn set_search_query(&mut self, query: &str) -> bool {
        self.edit_active(|v| v.search_query = query.to_string())
    }

    pub fn set_filters(&mut self, filters: Vec<FilterRule>) -> bool {
        self.edit_active(|v| v.filters = filters)
    }

    pub fn set_display_density(&mut self, density: DisplayDensity) -> bool {
        self.edit_active(|v| v.display_density = density)
    }

    pub fn set_show_grid_lines(&mut self, show: bool) -> bool {
        self.edit_active(|v| v.show_grid_lines = show)
    }

    pub fn set_sort_config(&mut self, sort: Option<SortConfig>) -> bool {
        self.edit_active(|v| v.sort_config = sort)
    }

    /// Header click: advance the three-state sort cycle for `column`.
    pub fn sort_by(&mut self, column: ColumnId) -> Option<SortConfig> {
        let next = next_sort(self.active_view().sort_config, column);
        self.set_sort_config(next);
        next
    }
}
