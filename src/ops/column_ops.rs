use crate::model::column::{Column, ColumnId, default_columns};

/// Minimum width for columns that don't declare their own
pub const DEFAULT_MIN_WIDTH: u32 = 60;

/// Which side of the hovered column a dragged column lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

/// Resolve the drop side from the cursor against the hovered row's midpoint.
pub fn drop_position(cursor_y: f64, row_top: f64, row_height: f64) -> DropPosition {
    if cursor_y < row_top + row_height / 2.0 {
        DropPosition::Before
    } else {
        DropPosition::After
    }
}

fn index_of(columns: &[Column], id: ColumnId) -> Option<usize> {
    columns.iter().position(|c| c.id == id)
}

/// Move `dragged` next to `target`. Returns false when either column is
/// missing, they are the same column, or the order would not change.
pub fn move_column(
    columns: &mut Vec<Column>,
    dragged: ColumnId,
    target: ColumnId,
    position: DropPosition,
) -> bool {
    if dragged == target {
        return false;
    }
    let (Some(from), Some(_)) = (index_of(columns, dragged), index_of(columns, target)) else {
        return false;
    };
    let before: Vec<ColumnId> = columns.iter().map(|c| c.id).collect();

    let col = columns.remove(from);
    let target_idx = index_of(columns, target).unwrap_or(columns.len());
    let insert_at = match position {
        DropPosition::Before => target_idx,
        DropPosition::After => target_idx + 1,
    };
    columns.insert(insert_at.min(columns.len()), col);

    columns.iter().map(|c| c.id).ne(before)
}

/// Move a column to an absolute ordinal position (clamped to the end).
pub fn move_column_to(columns: &mut Vec<Column>, id: ColumnId, to: usize) -> bool {
    let Some(from) = index_of(columns, id) else {
        return false;
    };
    let to = to.min(columns.len() - 1);
    if from == to {
        return false;
    }
    let col = columns.remove(from);
    columns.insert(to, col);
    true
}

/// Flip visibility of one column; order is untouched.
pub fn toggle_visibility(columns: &mut [Column], id: ColumnId) -> bool {
    match columns.iter_mut().find(|c| c.id == id) {
        Some(col) => {
            col.visible = !col.visible;
            true
        }
        None => false,
    }
}

pub fn set_visibility(columns: &mut [Column], id: ColumnId, visible: bool) -> bool {
    match columns.iter_mut().find(|c| c.id == id) {
        Some(col) if col.visible != visible => {
            col.visible = visible;
            true
        }
        _ => false,
    }
}

/// Set a column's width, clamped to its `min_width` or `default_min`.
/// Returns the width actually applied.
pub fn resize_column(
    columns: &mut [Column],
    id: ColumnId,
    width_px: u32,
    default_min: u32,
) -> Option<u32> {
    let col = columns.iter_mut().find(|c| c.id == id)?;
    let min = col.min_width.unwrap_or(default_min);
    let applied = width_px.max(min);
    col.set_width_px(applied);
    Some(applied)
}

/// The default column set, replacing any customization
pub fn reset_columns() -> Vec<Column> {
    default_columns()
}
