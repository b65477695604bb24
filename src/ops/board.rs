use crate::model::task::{Status, Task};
use crate::ops::derive::Derived;

/// One kanban lane
#[derive(Debug, Clone)]
pub struct BoardLane<'a> {
    pub status: Status,
    pub tasks: Vec<&'a Task>,
}

/// Group the rows on screen into one lane per status, in workflow order.
/// Rows keep their visible order inside a lane; empty lanes are kept.
pub fn board_lanes(derived: &Derived) -> Vec<BoardLane<'_>> {
    let rows = derived.visible_rows();
    Status::ALL
        .into_iter()
        .map(|status| BoardLane {
            status,
            tasks: rows
                .iter()
                .filter(|r| r.task.status == status)
                .map(|r| r.task)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample::sample_tasks;
    use crate::model::view::default_view;
    use crate::ops::derive::derive;

    #[test]
    fn lanes_follow_workflow_order() {
        let derived = derive(&sample_tasks(), &default_view());
        let lanes = board_lanes(&derived);
        let summary: Vec<(Status, Vec<u64>)> = lanes
            .iter()
            .map(|l| (l.status, l.tasks.iter().map(|t| t.id).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Status::New, vec![7, 8]),
                (Status::Planned, vec![6]),
                (Status::InProgress, vec![1, 5]),
                (Status::InReview, vec![9]),
                (Status::Completed, vec![2, 3, 4]),
            ]
        );
    }

    #[test]
    fn empty_lanes_are_kept() {
        let mut view = default_view();
        view.search_query = "quality".into();
        let derived = derive(&sample_tasks(), &view);
        let lanes = board_lanes(&derived);
        assert_eq!(lanes.len(), 5);
        assert!(lanes[0].tasks.is_empty());
        assert_eq!(lanes[3].tasks.len(), 1);
    }
}
