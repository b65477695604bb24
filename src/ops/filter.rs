use crate::model::column::{ColumnId, ColumnKind};
use crate::model::task::Task;
use crate::model::view::{FilterOperator, FilterRule};

/// Copy every field of a task except its subtree.
fn detached(task: &Task) -> Task {
    Task {
        id: task.id,
        name: task.name.clone(),
        assignees: task.assignees.clone(),
        status: task.status,
        priority: task.priority,
        impact: task.impact,
        start_date: task.start_date.clone(),
        due_date: task.due_date.clone(),
        budget: task.budget,
        progress: task.progress.clone(),
        health: task.health.clone(),
        children: None,
        is_expanded: task.is_expanded,
    }
}

/// Keep tasks that match `pred` or have a surviving descendant.
///
/// A kept task with surviving children is expanded in the result so the
/// matches are on screen. A kept task that had children keeps only the
/// survivors (possibly none).
pub fn filter_tree(tasks: &[Task], pred: &dyn Fn(&Task) -> bool) -> Vec<Task> {
    let mut result = Vec::new();
    for task in tasks {
        let children = task.children.as_deref().map(|c| filter_tree(c, pred));
        let children_match = children.as_ref().is_some_and(|c| !c.is_empty());

        if children_match || pred(task) {
            let mut kept = detached(task);
            kept.is_expanded = children_match || task.is_expanded;
            kept.children = children;
            result.push(kept);
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Case-insensitive substring match on the name or any assignee's name.
/// `query_lower` must already be lowercased.
pub fn matches_search(task: &Task, query_lower: &str) -> bool {
    task.name.to_lowercase().contains(query_lower)
        || task
            .assignees
            .iter()
            .any(|a| a.name.to_lowercase().contains(query_lower))
}

pub fn filter_by_search(tasks: &[Task], query: &str) -> Vec<Task> {
    let query_lower = query.to_lowercase();
    filter_tree(tasks, &|t| matches_search(t, &query_lower))
}

// ---------------------------------------------------------------------------
// Filter rules
// ---------------------------------------------------------------------------

pub fn filter_by_rules(tasks: &[Task], rules: &[FilterRule]) -> Vec<Task> {
    filter_tree(tasks, &|t| matches_all_rules(t, rules))
}

/// All rules must hold (logical AND).
pub fn matches_all_rules(task: &Task, rules: &[FilterRule]) -> bool {
    rules.iter().all(|r| rule_matches(task, r))
}

/// Evaluate one rule against one task. Incomplete rules (no value where
/// one is needed) and operators that don't apply to the column pass.
pub fn rule_matches(task: &Task, rule: &FilterRule) -> bool {
    let column = rule.column_id;
    let op = rule.operator;
    if !FilterOperator::for_column(column).contains(&op) {
        return true;
    }

    match op {
        FilterOperator::IsEmpty => return field_is_empty(task, column),
        FilterOperator::IsNotEmpty => return !field_is_empty(task, column),
        _ => {}
    }

    match column.kind() {
        ColumnKind::Text => {
            let Some(needle) = rule
                .value
                .as_ref()
                .and_then(|v| v.as_text())
                .filter(|s| !s.is_empty())
            else {
                return true;
            };
            let haystack = text_field(task, column).to_lowercase();
            let needle = needle.to_lowercase();
            match op {
                FilterOperator::Contains => haystack.contains(&needle),
                FilterOperator::NotContains => !haystack.contains(&needle),
                FilterOperator::Is => haystack == needle,
                FilterOperator::IsNot => haystack != needle,
                _ => true,
            }
        }
        ColumnKind::Enum => {
            let set = rule
                .value
                .as_ref()
                .map(|v| v.as_set())
                .unwrap_or_default();
            if set.is_empty() {
                return true;
            }
            let hit = enum_field_in_set(task, column, &set);
            match op {
                FilterOperator::Is => hit,
                FilterOperator::IsNot => !hit,
                _ => true,
            }
        }
        ColumnKind::Display => true,
    }
}

fn text_field(task: &Task, column: ColumnId) -> String {
    match column {
        ColumnId::Dates => task.date_range_label(),
        _ => task.name.clone(),
    }
}

fn field_is_empty(task: &Task, column: ColumnId) -> bool {
    match column {
        ColumnId::Name => task.name.trim().is_empty(),
        ColumnId::Status => false,
        ColumnId::Priority => task.priority.is_none(),
        ColumnId::Impact => task.impact.is_none(),
        ColumnId::Assignee => task.assignees.is_empty(),
        ColumnId::Dates => task.start_date.is_none() && task.due_date.is_none(),
        ColumnId::Progress => task.progress.is_none(),
        ColumnId::Details => false,
    }
}

fn enum_field_in_set(task: &Task, column: ColumnId, set: &[&str]) -> bool {
    let has = |label: &str| set.iter().any(|v| v.eq_ignore_ascii_case(label));
    match column {
        ColumnId::Status => has(task.status.as_str()),
        ColumnId::Priority => task.priority.is_some_and(|p| has(p.as_str())),
        ColumnId::Impact => task.impact.is_some_and(|i| has(i.as_str())),
        ColumnId::Assignee => task.assignees.iter().any(|a| set.contains(&a.id.as_str())),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample::sample_tasks;
    use crate::model::task::{Priority, Status};
    use crate::model::view::FilterValue;

    fn rule(column_id: ColumnId, operator: FilterOperator, value: Option<FilterValue>) -> FilterRule {
        FilterRule {
            id: "r1".into(),
            column_id,
            operator,
            value,
        }
    }

    fn one(s: &str) -> Option<FilterValue> {
        Some(FilterValue::One(s.into()))
    }

    fn many(v: &[&str]) -> Option<FilterValue> {
        Some(FilterValue::Many(v.iter().map(|s| s.to_string()).collect()))
    }

    fn names(tasks: &[Task]) -> Vec<String> {
        let mut out = Vec::new();
        crate::ops::task_ops::for_each_task(tasks, &mut |t| out.push(t.name.clone()));
        out
    }

    #[test]
    fn search_keeps_ancestors_of_matches() {
        let filtered = filter_by_search(&sample_tasks(), "user");
        assert_eq!(
            names(&filtered),
            vec!["New Product Launch", "Research", "User Research"]
        );
        assert!(filtered[0].children()[0].is_expanded);
    }

    #[test]
    fn search_matches_assignee_names() {
        let filtered = filter_by_search(&sample_tasks(), "sam");
        assert_eq!(
            names(&filtered),
            vec![
                "New Product Launch",
                "Initial Design",
                "Design review",
                "1369667897: Marketing request",
                "Final Quality Assurance",
            ]
        );
    }

    #[test]
    fn matching_parent_keeps_only_surviving_children() {
        let filtered = filter_by_search(&sample_tasks(), "launch");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].children, Some(vec![]));
    }

    #[test]
    fn collapsed_parent_is_forced_open_for_descendant_match() {
        let mut tasks = sample_tasks();
        tasks[0].is_expanded = false;
        let filtered = filter_by_search(&tasks, "review");
        assert!(filtered[0].is_expanded);
        // input untouched
        assert!(!tasks[0].is_expanded);
    }

    #[test]
    fn rule_filter_opens_collapsed_parent() {
        let mut tasks = sample_tasks();
        tasks[0].is_expanded = false;
        let before = tasks.clone();

        let r = rule(ColumnId::Status, FilterOperator::Is, one("Completed"));
        let filtered = filter_by_rules(&tasks, &[r]);
        assert!(filtered[0].is_expanded);
        assert_eq!(
            names(&filtered),
            vec!["New Product Launch", "Research", "Stakeholder Research", "User Research"]
        );
        assert_eq!(tasks, before);
    }

    #[test]
    fn status_is_rule_uses_display_strings() {
        let r = rule(ColumnId::Status, FilterOperator::Is, many(&["New", "In review"]));
        let filtered = filter_by_rules(&sample_tasks(), &[r]);
        assert_eq!(
            names(&filtered),
            vec![
                "New Product Launch",
                "Design review",
                "1369667897: Marketing request",
                "Final Quality Assurance",
            ]
        );
    }

    #[test]
    fn rules_are_anded() {
        let rules = vec![
            rule(ColumnId::Assignee, FilterOperator::Is, many(&["sl"])),
            rule(ColumnId::Priority, FilterOperator::IsNot, many(&["Urgent"])),
        ];
        let mut task = Task::new(1, "x", Status::New);
        assert!(!matches_all_rules(&task, &rules));
        task.assignees = sample_tasks()[0].children()[5].assignees.clone();
        assert!(matches_all_rules(&task, &rules));
        task.priority = Some(Priority::Urgent);
        assert!(!matches_all_rules(&task, &rules));
    }

    #[test]
    fn name_text_operators() {
        let task = Task::new(1, "User Research", Status::New);
        assert!(rule_matches(&task, &rule(ColumnId::Name, FilterOperator::Contains, one("USER"))));
        assert!(!rule_matches(&task, &rule(ColumnId::Name, FilterOperator::NotContains, one("user"))));
        assert!(rule_matches(&task, &rule(ColumnId::Name, FilterOperator::Is, one("user research"))));
        assert!(rule_matches(&task, &rule(ColumnId::Name, FilterOperator::IsNot, one("user"))));
        assert!(rule_matches(&task, &rule(ColumnId::Name, FilterOperator::IsNotEmpty, None)));
    }

    #[test]
    fn dates_rule_matches_range_label() {
        let mut task = Task::new(1, "x", Status::New);
        assert!(rule_matches(&task, &rule(ColumnId::Dates, FilterOperator::IsEmpty, None)));
        task.start_date = Some("15/05/2024".into());
        task.due_date = Some("30/06/2024".into());
        assert!(!rule_matches(&task, &rule(ColumnId::Dates, FilterOperator::IsEmpty, None)));
        assert!(rule_matches(&task, &rule(ColumnId::Dates, FilterOperator::Contains, one("05/2024 - 30"))));
        assert!(rule_matches(&task, &rule(ColumnId::Dates, FilterOperator::Is, one("15/05/2024 - 30/06/2024"))));
    }

    #[test]
    fn empty_checks_on_optional_enums() {
        let mut task = Task::new(1, "x", Status::New);
        assert!(rule_matches(&task, &rule(ColumnId::Impact, FilterOperator::IsEmpty, None)));
        assert!(!rule_matches(&task, &rule(ColumnId::Status, FilterOperator::IsEmpty, None)));
        assert!(rule_matches(&task, &rule(ColumnId::Assignee, FilterOperator::IsEmpty, None)));
        task.priority = Some(Priority::None);
        assert!(rule_matches(&task, &rule(ColumnId::Priority, FilterOperator::IsNotEmpty, None)));
    }

    #[test]
    fn incomplete_or_inapplicable_rules_pass() {
        let task = Task::new(1, "x", Status::New);
        assert!(rule_matches(&task, &rule(ColumnId::Name, FilterOperator::Contains, None)));
        assert!(rule_matches(&task, &rule(ColumnId::Status, FilterOperator::Is, many(&[]))));
        assert!(rule_matches(&task, &rule(ColumnId::Status, FilterOperator::Contains, one("zzz"))));
        assert!(rule_matches(&task, &rule(ColumnId::Progress, FilterOperator::Is, one("10"))));
    }
}
