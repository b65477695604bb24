use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};

use crate::model::column::ColumnId;
use crate::model::task::Task;
use crate::model::view::{SortConfig, SortDirection};
use crate::ops::dates::sort_timestamp;

/// Comparable value extracted from a task for one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Text(String),
    Number(i64),
    /// Columns without a defined ordering; all equal, so the stable sort
    /// keeps the original order.
    Constant,
}

pub fn sort_key(task: &Task, column: ColumnId) -> SortKey {
    match column {
        ColumnId::Name => SortKey::Text(task.name.to_lowercase()),
        ColumnId::Status => SortKey::Text(task.status.as_str().to_string()),
        ColumnId::Assignee => SortKey::Text(
            task.assignees
                .first()
                .map(|a| a.name.to_lowercase())
                .unwrap_or_default(),
        ),
        ColumnId::Dates => SortKey::Number(sort_timestamp(task.start_date.as_deref())),
        ColumnId::Progress => SortKey::Number(
            task.progress
                .as_ref()
                .map(|p| i64::from(p.percentage))
                .unwrap_or(-1),
        ),
        ColumnId::Details | ColumnId::Priority | ColumnId::Impact => SortKey::Constant,
    }
}

thread_local! {
    /// Root-locale collator with default (tertiary) strength
    static COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// Locale-aware string ordering, with an exact comparison as tiebreak.
/// Falls back to a lowercase comparison if no collator could be built.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(c) => c.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        })
        .then_with(|| a.cmp(b))
}

pub fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Text(x), SortKey::Text(y)) => locale_compare(x, y),
        (SortKey::Number(x), SortKey::Number(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Stable-sort siblings at every level. Levels are never mixed.
pub fn sort_tree(tasks: &mut Vec<Task>, config: SortConfig) {
    let mut keyed: Vec<(SortKey, Task)> = tasks
        .drain(..)
        .map(|t| (sort_key(&t, config.column_id), t))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = compare_keys(a, b);
        match config.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    tasks.extend(keyed.into_iter().map(|(_, t)| t));

    for task in tasks.iter_mut() {
        if let Some(children) = task.children.as_mut() {
            sort_tree(children, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample::sample_tasks;
    use crate::model::task::{Progress, Status};

    fn child_names(tasks: &[Task]) -> Vec<&str> {
        tasks[0].children().iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let mut tasks = vec![
            Task::new(1, "beta", Status::New),
            Task::new(2, "Alpha", Status::New),
            Task::new(3, "alpha", Status::New),
        ];
        sort_tree(&mut tasks, SortConfig::asc(ColumnId::Name));
        let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut tasks = vec![
            Task::new(1, "Zebra rollout", Status::New),
            Task::new(2, "Élan review", Status::New),
            Task::new(3, "apple", Status::New),
        ];
        sort_tree(&mut tasks, SortConfig::asc(ColumnId::Name));
        let names: Vec<_> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "Élan review", "Zebra rollout"]);

        assert_eq!(locale_compare("résumé", "resume"), Ordering::Greater);
        assert_eq!(locale_compare("ångström", "zulu"), Ordering::Less);
    }

    #[test]
    fn sorting_stays_within_levels() {
        let mut tasks = sample_tasks();
        sort_tree(&mut tasks, SortConfig::asc(ColumnId::Name));
        assert_eq!(tasks.len(), 1);
        assert_eq!(
            child_names(&tasks),
            vec![
                "1369667897: Marketing request",
                "Design review",
                "Final Quality Assurance",
                "Initial Design",
                "Requirement gathering",
                "Research",
            ]
        );
        let research = &tasks[0].children()[5];
        assert_eq!(research.children()[0].name, "Stakeholder Research");
    }

    #[test]
    fn status_sorts_by_display_string() {
        let mut tasks = sample_tasks();
        sort_tree(&mut tasks, SortConfig::asc(ColumnId::Status));
        let statuses: Vec<_> = tasks[0].children().iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![
                Status::Completed,
                Status::InProgress,
                Status::InReview,
                Status::New,
                Status::New,
                Status::Planned,
            ]
        );
    }

    #[test]
    fn missing_progress_sorts_below_zero() {
        let mut a = Task::new(1, "a", Status::New);
        a.progress = Some(Progress::new(0));
        let b = Task::new(2, "b", Status::New);
        let mut tasks = vec![a, b];
        sort_tree(&mut tasks, SortConfig::asc(ColumnId::Progress));
        assert_eq!(tasks[0].id, 2);
    }

    #[test]
    fn malformed_start_date_sorts_first() {
        let mut tasks = sample_tasks();
        let children = tasks[0].children.as_mut().unwrap();
        children[4].start_date = Some("31/02/2024".into());
        sort_tree(&mut tasks, SortConfig::asc(ColumnId::Dates));
        assert_eq!(tasks[0].children()[0].name, "1369667897: Marketing request");
    }

    #[test]
    fn constant_columns_keep_order() {
        let mut tasks = sample_tasks();
        let before = tasks.clone();
        sort_tree(&mut tasks, SortConfig::desc(ColumnId::Priority));
        assert_eq!(tasks, before);
    }
}
