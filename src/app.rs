use crate::io::kv::KeyValueStore;
use crate::io::view_io::{load_view_store, save_view_store};
use crate::model::column::{Column, ColumnId};
use crate::model::task::{Task, TaskId, TaskPatch};
use crate::model::view::{DisplayDensity, FilterRule, View};
use crate::ops::board::{BoardLane, board_lanes};
use crate::ops::column_ops::{
    self, DEFAULT_MIN_WIDTH, DropPosition, move_column, move_column_to, resize_column,
    set_visibility, toggle_visibility,
};
use crate::ops::derive::{Derived, derive};
use crate::ops::selection::{HeaderCheckbox, Selection};
use crate::ops::task_ops::TaskTree;
use crate::ops::timeline::Timeline;
use crate::ops::view_ops::ViewStore;

/// How the derived rows are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Table,
    Board,
    Gantt,
    Lookahead,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Table => "table",
            RenderMode::Board => "board",
            RenderMode::Gantt => "gantt",
            RenderMode::Lookahead => "lookahead",
        }
    }
}

/// The cell currently open for inline editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub task_id: TaskId,
    pub column: ColumnId,
}

/// One user action. Render collaborators build these; [`App::dispatch`]
/// applies them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Task tree
    ToggleExpansion(TaskId),
    UpdateTask { id: TaskId, patch: TaskPatch },

    // Selection
    ToggleRow(TaskId),
    ToggleAll,

    // Views
    CreateView { name: String },
    RenameView { id: String, name: String },
    DeleteView(String),
    SetDefaultView(String),
    SwitchView(String),
    SetSearchQuery(String),
    SetFilters(Vec<FilterRule>),
    SetColumns(Vec<Column>),
    SetDisplayDensity(DisplayDensity),
    SetShowGridLines(bool),
    SortBy(ColumnId),

    // Column layout of the active view
    ToggleColumn(ColumnId),
    SetColumnVisible { column: ColumnId, visible: bool },
    MoveColumn {
        dragged: ColumnId,
        target: ColumnId,
        position: DropPosition,
    },
    MoveColumnTo { column: ColumnId, index: usize },
    ResizeColumn { column: ColumnId, width_px: u32 },
    ResetColumns,

    // Ephemeral UI
    EditCell(Option<CellRef>),
    ShowDetails(Option<TaskId>),
    SetRenderMode(RenderMode),
}

impl Action {
    /// Actions after which an open cell edit must close
    fn closes_edit(&self) -> bool {
        matches!(
            self,
            Action::ToggleExpansion(_)
                | Action::UpdateTask { .. }
                | Action::CreateView { .. }
                | Action::DeleteView(_)
                | Action::SwitchView(_)
                | Action::SetSearchQuery(_)
                | Action::SetFilters(_)
        )
    }
}

/// Controller state: the task tree, saved views, selection, and the
/// ephemeral UI pointers, plus the memoized derivation.
pub struct App {
    tree: TaskTree,
    views: ViewStore,
    selection: Selection,
    edit_cell: Option<CellRef>,
    details: Option<TaskId>,
    mode: RenderMode,
    kv: Box<dyn KeyValueStore>,
    default_min_width: u32,
    derived: Derived,
    /// (tree generation, store revision) the derived output was built from
    derived_key: (u64, u64),
    derive_count: u64,
}

impl App {
    /// Load saved views from `kv` and derive the initial rows.
    pub fn new(tree: TaskTree, kv: Box<dyn KeyValueStore>) -> Self {
        let views = load_view_store(kv.as_ref());
        let derived = derive(tree.roots(), views.active_view());
        let derived_key = (tree.generation(), views.revision());
        App {
            tree,
            views,
            selection: Selection::new(),
            edit_cell: None,
            details: None,
            mode: RenderMode::default(),
            kv,
            default_min_width: DEFAULT_MIN_WIDTH,
            derived,
            derived_key,
            derive_count: 1,
        }
    }

    pub fn with_default_min_width(mut self, width: u32) -> Self {
        self.default_min_width = width;
        self
    }

    pub fn tree(&self) -> &TaskTree {
        &self.tree
    }

    pub fn views(&self) -> &ViewStore {
        &self.views
    }

    pub fn active_view(&self) -> &View {
        self.views.active_view()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn edit_cell(&self) -> Option<CellRef> {
        self.edit_cell
    }

    pub fn details(&self) -> Option<&Task> {
        self.details.and_then(|id| self.tree.find(id))
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    /// How many times the pipeline has actually run
    pub fn derive_count(&self) -> u64 {
        self.derive_count
    }

    pub fn header_checkbox(&self) -> HeaderCheckbox {
        self.selection.header_state(&self.derived.visible_ids)
    }

    pub fn board(&self) -> Vec<BoardLane<'_>> {
        board_lanes(&self.derived)
    }

    pub fn timeline(&self) -> Option<Timeline> {
        Timeline::from_tasks(&self.derived.visible_tree)
    }

    /// Apply one action. Returns true if any state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        tracing::debug!(?action, "dispatch");
        let revision = self.views.revision();
        if action.closes_edit() {
            self.edit_cell = None;
        }

        let changed = match action {
            Action::ToggleExpansion(id) => self.tree.toggle_expansion(id),
            Action::UpdateTask { id, patch } => self.tree.update_task(id, &patch),

            Action::ToggleRow(id) => {
                self.selection.toggle_row(id);
                true
            }
            Action::ToggleAll => {
                let before = self.selection.clone();
                self.selection.toggle_all(&self.derived.visible_ids);
                self.selection != before
            }

            Action::CreateView { name } => {
                self.views.create_view(&name);
                true
            }
            Action::RenameView { id, name } => self.views.rename_view(&id, &name),
            Action::DeleteView(id) => self.views.delete_view(&id),
            Action::SetDefaultView(id) => self.views.set_default_view(&id),
            Action::SwitchView(id) => self.views.set_active_view(&id),
            Action::SetSearchQuery(query) => self.views.set_search_query(&query),
            Action::SetFilters(filters) => self.views.set_filters(filters),
            Action::SetColumns(columns) => self.views.set_columns(columns),
            Action::SetDisplayDensity(density) => self.views.set_display_density(density),
            Action::SetShowGridLines(show) => self.views.set_show_grid_lines(show),
            Action::SortBy(column) => {
                self.views.sort_by(column);
                true
            }

            Action::ToggleColumn(column) => self
                .views
                .update_columns(|cols| {
                    toggle_visibility(cols, column);
                }),
            Action::SetColumnVisible { column, visible } => self
                .views
                .update_columns(|cols| {
                    set_visibility(cols, column, visible);
                }),
            Action::MoveColumn {
                dragged,
                target,
                position,
            } => self.views.update_columns(|cols| {
                move_column(cols, dragged, target, position);
            }),
            Action::MoveColumnTo { column, index } => self.views.update_columns(|cols| {
                move_column_to(cols, column, index);
            }),
            Action::ResizeColumn { column, width_px } => {
                let min = self.default_min_width;
                self.views.update_columns(|cols| {
                    resize_column(cols, column, width_px, min);
                })
            }
            Action::ResetColumns => self.views.set_columns(column_ops::reset_columns()),

            Action::EditCell(cell) => {
                let cell = cell.filter(|c| self.tree.contains(c.task_id));
                let changed = self.edit_cell != cell;
                self.edit_cell = cell;
                changed
            }
            Action::ShowDetails(id) => {
                let id = id.filter(|id| self.tree.contains(*id));
                let changed = self.details != id;
                self.details = id;
                changed
            }
            Action::SetRenderMode(mode) => {
                let changed = self.mode != mode;
                self.mode = mode;
                changed
            }
        };

        if self.views.revision() != revision {
            self.persist_views();
        }
        self.refresh();
        changed
    }

    fn persist_views(&mut self) {
        if let Err(e) = save_view_store(self.kv.as_mut(), &self.views) {
            tracing::warn!(error = %e, "could not save views");
        }
    }

    /// Re-run the pipeline only when the tree or the store moved on.
    fn refresh(&mut self) {
        let key = (self.tree.generation(), self.views.revision());
        if key == self.derived_key {
            return;
        }
        self.derived = derive(self.tree.roots(), self.views.active_view());
        self.derived_key = key;
        self.derive_count += 1;
    }
}
