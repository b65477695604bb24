use std::collections::HashMap;

use crate::model::task::{Task, TaskId};
use crate::model::view::View;
use crate::ops::filter::{filter_by_rules, filter_by_search};
use crate::ops::sort::sort_tree;

/// Output of the derivation pipeline for one (tree, view) pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derived {
    /// Filtered and sorted copy of the forest, with display-only expansion
    /// overrides applied
    pub visible_tree: Vec<Task>,
    /// Depth-first ids of the rows on screen
    pub visible_ids: Vec<TaskId>,
    /// 1-based row number of every row on screen
    pub row_numbers: HashMap<TaskId, usize>,
}

/// A row of the flattened table
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub task: &'a Task,
    pub depth: usize,
    pub row_number: usize,
}

impl Derived {
    pub fn row_number(&self, id: TaskId) -> Option<usize> {
        self.row_numbers.get(&id).copied()
    }

    pub fn is_visible(&self, id: TaskId) -> bool {
        self.row_numbers.contains_key(&id)
    }

    /// The rows on screen, in order, with their nesting depth
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let mut rows = Vec::with_capacity(self.visible_ids.len());
        flatten_rows(&self.visible_tree, 0, &mut rows);
        rows
    }
}

fn flatten_rows<'a>(tasks: &'a [Task], depth: usize, rows: &mut Vec<VisibleRow<'a>>) {
    for task in tasks {
        let row_number = rows.len() + 1;
        rows.push(VisibleRow {
            task,
            depth,
            row_number,
        });
        if task.is_expanded {
            flatten_rows(task.children(), depth + 1, rows);
        }
    }
}

/// Run search → rule filter → sort over `tasks` for `view`.
/// Pure: inputs are never modified.
pub fn derive(tasks: &[Task], view: &View) -> Derived {
    let mut tree = if view.search_query.is_empty() {
        tasks.to_vec()
    } else {
        filter_by_search(tasks, &view.search_query)
    };

    if !view.filters.is_empty() {
        tree = filter_by_rules(&tree, &view.filters);
    }

    if let Some(config) = view.sort_config {
        sort_tree(&mut tree, config);
    }

    let visible_ids = collect_visible_ids(&tree);
    let row_numbers = row_number_map(&visible_ids);
    Derived {
        visible_tree: tree,
        visible_ids,
        row_numbers,
    }
}

/// Pre-order ids, descending only into expanded nodes.
pub fn collect_visible_ids(tasks: &[Task]) -> Vec<TaskId> {
    let mut ids = Vec::new();
    push_visible_ids(tasks, &mut ids);
    ids
}

fn push_visible_ids(tasks: &[Task], ids: &mut Vec<TaskId>) {
    for task in tasks {
        ids.push(task.id);
        if task.is_expanded {
            push_visible_ids(task.children(), ids);
        }
    }
}

/// Consecutive 1-based numbers in visible order.
pub fn row_number_map(visible_ids: &[TaskId]) -> HashMap<TaskId, usize> {
    visible_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::column::ColumnId;
    use crate::model::sample::sample_tasks;
    use crate::model::task::Status;
    use crate::model::view::{FilterOperator, FilterRule, FilterValue, SortConfig, default_view};
    use pretty_assertions::assert_eq;

    fn research_only() -> Vec<Task> {
        let mut research = Task::new(10, "Research", Status::Completed);
        research.children = Some(vec![
            Task::new(11, "Stakeholder Research", Status::Completed),
            Task::new(12, "User Research", Status::Completed),
        ]);
        vec![research]
    }

    #[test]
    fn unfiltered_view_shows_expanded_rows() {
        let derived = derive(&sample_tasks(), &default_view());
        assert_eq!(derived.visible_ids, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(derived.row_number(9), Some(9));
    }

    #[test]
    fn search_scenario_auto_expands_parent() {
        let mut view = default_view();
        view.search_query = "user".into();
        let derived = derive(&research_only(), &view);

        assert_eq!(derived.visible_tree.len(), 1);
        let research = &derived.visible_tree[0];
        assert!(research.is_expanded);
        assert_eq!(research.children().len(), 1);
        assert_eq!(research.children()[0].name, "User Research");
        assert_eq!(derived.visible_ids, vec![10, 12]);
        assert_eq!(
            derived.row_numbers,
            HashMap::from([(10, 1), (12, 2)])
        );
    }

    #[test]
    fn collapsed_node_is_numbered_but_children_are_not() {
        let mut tasks = sample_tasks();
        tasks[0].children.as_mut().unwrap()[0].is_expanded = false;
        let derived = derive(&tasks, &default_view());
        assert_eq!(derived.visible_ids, vec![1, 2, 5, 6, 7, 8, 9]);
        assert_eq!(derived.row_number(2), Some(2));
        assert_eq!(derived.row_number(5), Some(3));
        assert_eq!(derived.row_number(3), None);
    }

    #[test]
    fn derivation_is_deterministic_and_pure() {
        let tasks = sample_tasks();
        let mut view = default_view();
        view.search_query = "design".into();
        view.sort_config = Some(SortConfig::desc(ColumnId::Name));
        let a = derive(&tasks, &view);
        let b = derive(&tasks, &view);
        assert_eq!(a, b);
        assert_eq!(tasks, sample_tasks());
    }

    #[test]
    fn search_never_grows_visible_set() {
        let tasks = sample_tasks();
        let all = derive(&tasks, &default_view());
        for query in ["a", "research", "sam", "zzz", "e"] {
            let mut view = default_view();
            view.search_query = query.into();
            let filtered = derive(&tasks, &view);
            assert!(filtered.visible_ids.len() <= all.visible_ids.len());
            assert!(filtered.visible_ids.iter().all(|id| all.visible_ids.contains(id)));
        }
    }

    #[test]
    fn asc_and_desc_are_reverses() {
        let tasks = sample_tasks();
        let mut view = default_view();
        view.sort_config = Some(SortConfig::asc(ColumnId::Name));
        let asc = derive(&tasks, &view);
        view.sort_config = Some(SortConfig::desc(ColumnId::Name));
        let desc = derive(&tasks, &view);

        let asc_children: Vec<_> = asc.visible_tree[0].children().iter().map(|t| t.id).collect();
        let mut desc_children: Vec<_> = desc.visible_tree[0].children().iter().map(|t| t.id).collect();
        desc_children.reverse();
        assert_eq!(asc_children, desc_children);
    }

    #[test]
    fn filters_apply_after_search() {
        let mut view = default_view();
        view.search_query = "research".into();
        view.filters = vec![FilterRule {
            id: "f1".into(),
            column_id: ColumnId::Name,
            operator: FilterOperator::Contains,
            value: Some(FilterValue::One("stakeholder".into())),
        }];
        let derived = derive(&sample_tasks(), &view);
        assert_eq!(derived.visible_ids, vec![1, 2, 3]);
    }

    #[test]
    fn visible_rows_carry_depth() {
        let derived = derive(&sample_tasks(), &default_view());
        let rows = derived.visible_rows();
        let depths: Vec<_> = rows.iter().map(|r| (r.task.id, r.depth, r.row_number)).collect();
        assert_eq!(&depths[..4], &[(1, 0, 1), (2, 1, 2), (3, 2, 3), (4, 2, 4)]);
    }
}
