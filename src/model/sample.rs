//! Built-in sample project, used when no task file is configured.

use super::task::{Assignee, Impact, Priority, Progress, Status, Task, TaskId};

fn jane_smith() -> Assignee {
    Assignee {
        id: "js".into(),
        name: "Jane Smith".into(),
        initials: "JS".into(),
        avatar_color: "purple".into(),
    }
}

fn sam_lee() -> Assignee {
    Assignee {
        id: "sl".into(),
        name: "Sam Lee".into(),
        initials: "SL".into(),
        avatar_color: "pink".into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: TaskId,
    name: &str,
    assignees: Vec<Assignee>,
    status: Status,
    dates: (&str, &str),
    priority: Option<Priority>,
    impact: Option<Impact>,
    progress: Option<u8>,
    history: &[u8],
) -> Task {
    let mut t = Task::new(id, name, status);
    t.assignees = assignees;
    t.start_date = Some(dates.0.to_string());
    t.due_date = Some(dates.1.to_string());
    t.priority = priority;
    t.impact = impact;
    t.progress = progress.map(|percentage| Progress {
        percentage,
        history: history.to_vec(),
    });
    t
}

/// The "New Product Launch" tree: one root, a two-level "Research" branch,
/// and six more leaves.
pub fn sample_tasks() -> Vec<Task> {
    let mut research = task(
        2,
        "Research",
        vec![jane_smith()],
        Status::Completed,
        ("15/05/2024", "28/05/2024"),
        Some(Priority::High),
        Some(Impact::Medium),
        Some(100),
        &[20, 50, 80, 100],
    );
    research.is_expanded = true;
    research.children = Some(vec![
        task(
            3,
            "Stakeholder Research",
            vec![jane_smith()],
            Status::Completed,
            ("15/05/2024", "20/05/2024"),
            Some(Priority::Medium),
            None,
            Some(100),
            &[],
        ),
        task(
            4,
            "User Research",
            vec![jane_smith()],
            Status::Completed,
            ("21/05/2024", "28/05/2024"),
            Some(Priority::Medium),
            None,
            Some(100),
            &[],
        ),
    ]);

    let mut root = task(
        1,
        "New Product Launch",
        vec![jane_smith()],
        Status::InProgress,
        ("15/05/2024", "30/06/2024"),
        Some(Priority::High),
        Some(Impact::High),
        Some(45),
        &[10, 15, 25, 30, 45],
    );
    root.is_expanded = true;
    root.children = Some(vec![
        research,
        task(
            5,
            "Requirement gathering",
            vec![jane_smith()],
            Status::InProgress,
            ("29/05/2024", "04/06/2024"),
            Some(Priority::High),
            None,
            Some(80),
            &[10, 30, 90, 85, 80],
        ),
        task(
            6,
            "Initial Design",
            vec![jane_smith(), sam_lee()],
            Status::Planned,
            ("05/06/2024", "15/06/2024"),
            Some(Priority::Low),
            Some(Impact::Low),
            Some(15),
            &[0, 5, 10, 15],
        ),
        task(
            7,
            "Design review",
            vec![jane_smith(), sam_lee()],
            Status::New,
            ("16/06/2024", "20/06/2024"),
            Some(Priority::None),
            None,
            None,
            &[],
        ),
        task(
            8,
            "1369667897: Marketing request",
            vec![sam_lee()],
            Status::New,
            ("05/06/2024", "10/06/2024"),
            Some(Priority::Medium),
            None,
            Some(5),
            &[20, 15, 10, 8, 5],
        ),
        task(
            9,
            "Final Quality Assurance",
            vec![sam_lee()],
            Status::InReview,
            ("21/06/2024", "25/06/2024"),
            Some(Priority::Urgent),
            Some(Impact::High),
            Some(40),
            &[80, 85, 90, 50, 40],
        ),
    ]);

    vec![root]
}
