use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tt", about = concat!("tasktable v", env!("CARGO_PKG_VERSION"), " - hierarchical tasks with saved views"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON task file (default: `tasks_file` from config, else the sample project)
    #[arg(long, global = true, value_name = "FILE")]
    pub tasks: Option<PathBuf>,

    /// JSON state file holding saved views
    #[arg(long, global = true, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/tasktable/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Colorize output with the theme palette
    #[arg(long, global = true)]
    pub color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the active view as a table
    Table(TableArgs),
    /// Print the active view as status lanes
    Board,
    /// Print the active view as a Gantt chart
    Gantt,
    /// Print the two-week weather strip from the project start
    Lookahead(LookaheadArgs),
    /// Show one task's details
    Show(ShowArgs),
    /// Manage saved views
    View(ViewCmd),
    /// Manage the active view's columns
    Column(ColumnCmd),
    /// Set the active view's search query (no argument clears it)
    Search(SearchArgs),
    /// Cycle the sort on a column: ascending, descending, off
    Sort(SortArgs),
    /// Manage the active view's filter rules
    Filter(FilterCmd),
    /// Expand or collapse a task
    Toggle(ToggleArgs),
    /// Edit task fields
    Set(SetArgs),
}

// ---------------------------------------------------------------------------
// Render commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TableArgs {
    /// Output rows as JSON
    #[arg(long)]
    pub json: bool,
    /// Mark these task ids as selected (repeatable)
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<u64>,
}

#[derive(Args)]
pub struct LookaheadArgs {
    /// JSON array of `{date, icon, temp}` forecasts
    #[arg(long, value_name = "FILE")]
    pub forecast: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task id
    pub id: u64,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ViewCmd {
    #[command(subcommand)]
    pub action: Option<ViewAction>,
}

#[derive(Subcommand)]
pub enum ViewAction {
    /// List saved views (default)
    List,
    /// Create a view from the active one and switch to it
    New(ViewNewArgs),
    /// Rename a view
    Rename(ViewRenameArgs),
    /// Delete a view (the last view cannot be deleted)
    Delete(ViewIdArgs),
    /// Remember a view as the default
    Default(ViewIdArgs),
    /// Switch the active view
    Use(ViewIdArgs),
    /// Set row density: compact, standard, comfortable
    Density(DensityArgs),
    /// Show or hide grid lines
    Grid(GridArgs),
}

#[derive(Args)]
pub struct ViewNewArgs {
    /// Display name
    pub name: String,
}

#[derive(Args)]
pub struct ViewRenameArgs {
    /// View id
    pub id: String,
    /// New display name
    pub name: String,
}

#[derive(Args)]
pub struct ViewIdArgs {
    /// View id
    pub id: String,
}

#[derive(Args)]
pub struct DensityArgs {
    pub density: String,
}

#[derive(Args)]
pub struct GridArgs {
    /// on or off
    #[arg(value_parser = ["on", "off"])]
    pub state: String,
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ColumnCmd {
    #[command(subcommand)]
    pub action: Option<ColumnAction>,
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// List columns in order (default)
    List,
    /// Make a column visible
    Show(ColumnIdArgs),
    /// Hide a column
    Hide(ColumnIdArgs),
    /// Reorder a column
    Move(ColumnMoveArgs),
    /// Set a column's width in pixels
    Width(ColumnWidthArgs),
    /// Restore the default columns of the active view
    Reset,
}

#[derive(Args)]
pub struct ColumnIdArgs {
    /// Column id (name, status, assignee, dates, progress, details, priority, impact)
    pub column: String,
}

#[derive(Args)]
pub struct ColumnMoveArgs {
    /// Column to move
    pub column: String,
    /// Place before this column
    #[arg(long, conflicts_with_all = ["after", "to"])]
    pub before: Option<String>,
    /// Place after this column
    #[arg(long, conflicts_with = "to")]
    pub after: Option<String>,
    /// Move to this position (0-indexed)
    #[arg(long)]
    pub to: Option<usize>,
}

#[derive(Args)]
pub struct ColumnWidthArgs {
    pub column: String,
    /// Width in pixels (clamped to the column minimum)
    pub px: u32,
}

// ---------------------------------------------------------------------------
// Search, sort, filter
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SearchArgs {
    /// Case-insensitive substring of the task name
    pub query: Option<String>,
}

#[derive(Args)]
pub struct SortArgs {
    /// Column id
    pub column: String,
}

#[derive(Args)]
pub struct FilterCmd {
    #[command(subcommand)]
    pub action: Option<FilterAction>,
}

#[derive(Subcommand)]
pub enum FilterAction {
    /// List filter rules (default)
    List,
    /// Add a rule: COLUMN OPERATOR [VALUE...]
    Add(FilterAddArgs),
    /// Remove one rule by id
    Remove(FilterRemoveArgs),
    /// Remove all rules
    Clear,
}

#[derive(Args)]
pub struct FilterAddArgs {
    /// Column id
    pub column: String,
    /// contains, not_contains, is, is_not, is_empty, is_not_empty
    pub operator: String,
    /// One value for text columns; one or more for status, priority,
    /// impact and assignee
    pub values: Vec<String>,
}

#[derive(Args)]
pub struct FilterRemoveArgs {
    /// Rule id
    pub id: String,
}

// ---------------------------------------------------------------------------
// Task edits
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ToggleArgs {
    /// Task id
    pub id: u64,
}

#[derive(Args)]
pub struct SetArgs {
    /// Task id
    pub id: u64,
    #[arg(long)]
    pub name: Option<String>,
    /// New, Planned, "In Progress", "In review", Completed
    #[arg(long)]
    pub status: Option<String>,
    /// Urgent, High, Medium, Low, None
    #[arg(long)]
    pub priority: Option<String>,
    /// High, Medium, Low
    #[arg(long)]
    pub impact: Option<String>,
    /// Start date as YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// Due date as YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,
    /// Completion percentage, 0-100
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub progress: Option<u8>,
}
