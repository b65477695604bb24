use serde::{Deserialize, Serialize};

/// Stable integer identity of a task
pub type TaskId = u64;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "New")]
    New,
    #[serde(rename = "Planned")]
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "In review")]
    InReview,
    #[serde(rename = "Completed")]
    Completed,
}

impl Status {
    /// All statuses in board lane order
    pub const ALL: [Status; 5] = [
        Status::New,
        Status::Planned,
        Status::InProgress,
        Status::InReview,
        Status::Completed,
    ];

    /// The display string, also used for sorting and filtering
    pub fn as_str(self) -> &'static str {
        match self {
            Status::New => "New",
            Status::Planned => "Planned",
            Status::InProgress => "In Progress",
            Status::InReview => "In review",
            Status::Completed => "Completed",
        }
    }

    /// Parse a display string (case-insensitive). Also accepts the
    /// kebab form used on the command line, e.g. `in-progress`.
    pub fn parse(s: &str) -> Option<Status> {
        let norm = normalize_label(s);
        Status::ALL
            .into_iter()
            .find(|st| normalize_label(st.as_str()) == norm)
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
    None,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::None => "None",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        let norm = normalize_label(s);
        Priority::ALL
            .into_iter()
            .find(|p| normalize_label(p.as_str()) == norm)
    }
}

/// Task impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub const ALL: [Impact; 3] = [Impact::High, Impact::Medium, Impact::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Impact> {
        let norm = normalize_label(s);
        Impact::ALL
            .into_iter()
            .find(|i| normalize_label(i.as_str()) == norm)
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// A person a task is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub id: String,
    pub name: String,
    pub initials: String,
    /// Avatar color tag
    pub avatar_color: String,
}

/// Completion percentage plus the past values used for the trend sparkline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub percentage: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<u8>,
}

/// Direction of the last change in a progress history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Progress {
    pub fn new(percentage: u8) -> Self {
        Progress {
            percentage: percentage.min(100),
            history: Vec::new(),
        }
    }

    /// Compare the two most recent history points.
    pub fn trend(&self) -> Trend {
        match self.history.as_slice() {
            [.., prev, last] if last > prev => Trend::Up,
            [.., prev, last] if last < prev => Trend::Down,
            _ => Trend::Flat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Complete,
    AtRisk,
    Blocked,
}

/// One line of the health checklist shown in the details panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A node in the task forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
    /// `DD/MM/YYYY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// `DD/MM/YYYY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health: Vec<HealthCheck>,
    /// `None` marks a leaf; `Some(vec![])` is a parent whose children
    /// were all filtered out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Task>>,
    #[serde(default)]
    pub is_expanded: bool,
}

impl Task {
    /// Create a leaf task with only the required fields set
    pub fn new(id: TaskId, name: impl Into<String>, status: Status) -> Self {
        Task {
            id,
            name: name.into(),
            assignees: Vec::new(),
            status,
            priority: None,
            impact: None,
            start_date: None,
            due_date: None,
            budget: None,
            progress: None,
            health: Vec::new(),
            children: None,
            is_expanded: false,
        }
    }

    /// Children slice, empty for leaves
    pub fn children(&self) -> &[Task] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Number of direct children (the "sub-items" badge)
    pub fn sub_items_count(&self) -> usize {
        self.children().len()
    }

    /// The `"{start} - {due}"` text shown in the dates column.
    /// Absent dates render as empty strings.
    pub fn date_range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.as_deref().unwrap_or(""),
            self.due_date.as_deref().unwrap_or("")
        )
    }
}

/// A partial update: every `Some` field replaces the task's value.
/// Nested options (`Some(None)`) clear optional fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub assignees: Option<Vec<Assignee>>,
    pub status: Option<Status>,
    pub priority: Option<Option<Priority>>,
    pub impact: Option<Option<Impact>>,
    pub start_date: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
    pub budget: Option<Option<f64>>,
    pub progress: Option<Option<Progress>>,
    pub health: Option<Vec<HealthCheck>>,
}

impl TaskPatch {
    pub fn name(name: impl Into<String>) -> Self {
        TaskPatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn status(status: Status) -> Self {
        TaskPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        TaskPatch {
            priority: Some(Some(priority)),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Merge into `task`. Returns true if any field actually changed.
    pub fn apply(&self, task: &mut Task) -> bool {
        let mut changed = false;
        merge(&mut task.name, &self.name, &mut changed);
        merge(&mut task.assignees, &self.assignees, &mut changed);
        merge(&mut task.status, &self.status, &mut changed);
        merge(&mut task.priority, &self.priority, &mut changed);
        merge(&mut task.impact, &self.impact, &mut changed);
        merge(&mut task.start_date, &self.start_date, &mut changed);
        merge(&mut task.due_date, &self.due_date, &mut changed);
        merge(&mut task.budget, &self.budget, &mut changed);
        merge(&mut task.progress, &self.progress, &mut changed);
        merge(&mut task.health, &self.health, &mut changed);
        changed
    }
}

fn merge<T: Clone + PartialEq>(field: &mut T, update: &Option<T>, changed: &mut bool) {
    if let Some(value) = update
        && field != value
    {
        *field = value.clone();
        *changed = true;
    }
}
