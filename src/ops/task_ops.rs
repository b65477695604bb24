use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::io::kv::atomic_write;
use crate::model::task::{Task, TaskId, TaskPatch};

/// Error type for task tree operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("duplicate task id: {0}")]
    DuplicateId(TaskId),
    #[error("task {id}: progress {percentage}% is over 100")]
    ProgressOutOfRange { id: TaskId, percentage: u8 },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse task file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The task forest plus a generation counter.
///
/// Every mutation goes through [`TaskTree::update_task`] or
/// [`TaskTree::toggle_expansion`]; only the addressed node is touched and the
/// generation is bumped when something actually changed, so derived views
/// can be memoized on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTree {
    roots: Vec<Task>,
    generation: u64,
}

impl TaskTree {
    /// Wrap a forest, checking that ids are unique across all levels.
    pub fn new(roots: Vec<Task>) -> Result<Self, TaskError> {
        if let Some(dup) = find_duplicate_id(&roots) {
            return Err(TaskError::DuplicateId(dup));
        }
        if let Some((id, percentage)) = find_progress_over_100(&roots) {
            return Err(TaskError::ProgressOutOfRange { id, percentage });
        }
        Ok(TaskTree {
            roots,
            generation: 0,
        })
    }

    pub fn roots(&self) -> &[Task] {
        &self.roots
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn into_roots(self) -> Vec<Task> {
        self.roots
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        find_task_in_list(&self.roots, id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.find(id).is_some()
    }

    /// Total number of tasks at every depth
    pub fn len(&self) -> usize {
        let mut n = 0;
        for_each_task(&self.roots, &mut |_| n += 1);
        n
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// All ids in depth-first pre-order, ignoring expansion
    pub fn ids(&self) -> Vec<TaskId> {
        let mut ids = Vec::new();
        for_each_task(&self.roots, &mut |t| ids.push(t.id));
        ids
    }

    /// Merge `patch` into the task with `id`. Returns false (and leaves the
    /// tree untouched) if the id is unknown or nothing changed.
    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> bool {
        let Some(task) = find_task_mut_in_list(&mut self.roots, id) else {
            return false;
        };
        let changed = patch.apply(task);
        if changed {
            self.generation += 1;
        }
        changed
    }

    /// Flip `is_expanded` on the task with `id`. Leaves (no `children`
    /// field) are never expanded, so toggling one is a no-op.
    pub fn toggle_expansion(&mut self, id: TaskId) -> bool {
        let Some(task) = find_task_mut_in_list(&mut self.roots, id) else {
            return false;
        };
        if task.children.is_none() {
            return false;
        }
        task.is_expanded = !task.is_expanded;
        self.generation += 1;
        true
    }
}

/// Load a JSON task forest from disk.
pub fn load_tasks(path: &Path) -> Result<TaskTree, TaskError> {
    let text = fs::read_to_string(path).map_err(|e| TaskError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let roots: Vec<Task> = serde_json::from_str(&text)?;
    TaskTree::new(roots)
}

/// Write a task forest back to disk as pretty JSON, atomically.
pub fn save_tasks(path: &Path, tree: &TaskTree) -> Result<(), TaskError> {
    let content = serde_json::to_string_pretty(tree.roots())?;
    atomic_write(path, content.as_bytes())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn find_duplicate_id(tasks: &[Task]) -> Option<TaskId> {
    let mut seen = HashSet::new();
    let mut dup = None;
    for_each_task(tasks, &mut |task: &Task| {
        if dup.is_none() && !seen.insert(task.id) {
            dup = Some(task.id);
        }
    });
    dup
}

fn find_progress_over_100(tasks: &[Task]) -> Option<(TaskId, u8)> {
    let mut bad = None;
    for_each_task(tasks, &mut |task: &Task| {
        if bad.is_none()
            && let Some(p) = &task.progress
            && let Some(pct) = std::iter::once(p.percentage)
                .chain(p.history.iter().copied())
                .find(|pct| *pct > 100)
        {
            bad = Some((task.id, pct));
        }
    });
    bad
}

/// Find a task by id at any depth.
pub fn find_task_in_list(tasks: &[Task], id: TaskId) -> Option<&Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(t) = find_task_in_list(task.children(), id) {
            return Some(t);
        }
    }
    None
}

fn find_task_mut_in_list(tasks: &mut [Task], id: TaskId) -> Option<&mut Task> {
    for task in tasks.iter_mut() {
        if task.id == id {
            return Some(task);
        }
        if let Some(children) = task.children.as_deref_mut()
            && let Some(t) = find_task_mut_in_list(children, id)
        {
            return Some(t);
        }
    }
    None
}

/// Visit every task depth-first, pre-order, regardless of expansion.
pub fn for_each_task(tasks: &[Task], f: &mut dyn FnMut(&Task)) {
    for task in tasks {
        f(task);
        for_each_task(task.children(), f);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
