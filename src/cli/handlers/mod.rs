use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::app::{Action, App, RenderMode};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{default_config_path, read_settings};
use crate::io::kv::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::model::column::ColumnId;
use crate::model::config::Settings;
use crate::model::sample::sample_tasks;
use crate::model::task::{Impact, Priority, Progress, Status, TaskId, TaskPatch};
use crate::model::view::{DisplayDensity, FilterOperator, FilterRule, FilterValue, SortDirection};
use crate::ops::column_ops::DropPosition;
use crate::ops::dates::from_input_format;
use crate::ops::task_ops::{self, TaskTree};
use crate::ops::timeline::{WeatherForecast, weather_strip};
use crate::theme::Palette;

type CmdResult = Result<(), Box<dyn Error>>;

/// Everything a command needs: the controller plus where tasks live.
struct Session {
    app: App,
    tasks_path: Option<PathBuf>,
    palette: Option<Palette>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let settings = read_settings(&config_path)?;
    let mut session = open_session(&cli, &settings)?;

    match cli.command {
        Commands::Table(args) => cmd_table(&mut session, args),
        Commands::Board => cmd_board(&mut session),
        Commands::Gantt => cmd_gantt(&mut session),
        Commands::Lookahead(args) => cmd_lookahead(&mut session, args),
        Commands::Show(args) => cmd_show(&mut session, args),
        Commands::View(cmd) => cmd_view(&mut session, cmd),
        Commands::Column(cmd) => cmd_column(&mut session, cmd),
        Commands::Search(args) => cmd_search(&mut session, args),
        Commands::Sort(args) => cmd_sort(&mut session, args),
        Commands::Filter(cmd) => cmd_filter(&mut session, cmd),
        Commands::Toggle(args) => cmd_toggle(&mut session, args),
        Commands::Set(args) => cmd_set(&mut session, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_session(cli: &Cli, settings: &Settings) -> Result<Session, Box<dyn Error>> {
    let tasks_path = cli.tasks.clone().or_else(|| settings.tasks_file.clone());
    let tree = match &tasks_path {
        Some(path) => task_ops::load_tasks(path)?,
        None => TaskTree::new(sample_tasks())?,
    };

    let state_path = cli.state.clone().unwrap_or_else(|| settings.state_path());
    let kv = open_store(&state_path);
    let app = App::new(tree, kv).with_default_min_width(settings.columns.default_min_width);
    let palette = cli.color.then(|| Palette::from_config(&settings.ui));

    Ok(Session {
        app,
        tasks_path,
        palette,
    })
}

/// An unreadable state file degrades to an in-memory store for this run.
fn open_store(path: &Path) -> Box<dyn KeyValueStore> {
    match JsonFileStore::open(path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "state file unusable, views will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

fn parse_column(s: &str) -> Result<ColumnId, String> {
    ColumnId::parse(s).ok_or_else(|| {
        let known: Vec<&str> = ColumnId::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown column '{}' (expected: {})", s, known.join(", "))
    })
}

fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: New, Planned, In Progress, In review, Completed)",
            s
        )
    })
}

fn parse_input_date(s: &str) -> Result<String, String> {
    from_input_format(s).ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}

fn require_tasks_path(session: &Session) -> Result<&Path, String> {
    session
        .tasks_path
        .as_deref()
        .ok_or_else(|| "no task file configured (use --tasks FILE)".to_string())
}

fn require_task(session: &Session, id: TaskId) -> Result<(), String> {
    if session.app.tree().contains(id) {
        Ok(())
    } else {
        Err(format!("task {} not found", id))
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Render commands
// ---------------------------------------------------------------------------

fn cmd_table(session: &mut Session, args: TableArgs) -> CmdResult {
    let app = &mut session.app;
    app.dispatch(Action::SetRenderMode(RenderMode::Table));
    for id in args.select {
        app.dispatch(Action::ToggleRow(id));
    }
    if args.json {
        let json = table_to_json(app.derived(), app.active_view(), app.selection());
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print_lines(&format_table(
            app.derived(),
            app.active_view(),
            app.selection(),
            session.palette.as_ref(),
        ));
    }
    Ok(())
}

fn cmd_board(session: &mut Session) -> CmdResult {
    session
        .app
        .dispatch(Action::SetRenderMode(RenderMode::Board));
    print_lines(&format_board(&session.app.board(), session.palette.as_ref()));
    Ok(())
}

fn cmd_gantt(session: &mut Session) -> CmdResult {
    session
        .app
        .dispatch(Action::SetRenderMode(RenderMode::Gantt));
    let timeline = session.app.timeline();
    print_lines(&format_gantt(session.app.derived(), timeline.as_ref()));
    Ok(())
}

fn cmd_lookahead(session: &mut Session, args: LookaheadArgs) -> CmdResult {
    session
        .app
        .dispatch(Action::SetRenderMode(RenderMode::Lookahead));
    let forecasts: Vec<WeatherForecast> = match &args.forecast {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("could not read {}: {}", path.display(), e))?;
            serde_json::from_str(&text)?
        }
        None => Vec::new(),
    };
    let (start, days) = match session.app.timeline() {
        Some(tl) => (tl.start, tl.total_days()),
        None => (Utc::now().date_naive(), 14),
    };
    print_lines(&format_weather_strip(&weather_strip(start, days, &forecasts)));
    Ok(())
}

fn cmd_show(session: &mut Session, args: ShowArgs) -> CmdResult {
    require_task(session, args.id)?;
    session.app.dispatch(Action::ShowDetails(Some(args.id)));
    if let Some(task) = session.app.details() {
        print_lines(&format_task_detail(task));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

fn cmd_view(session: &mut Session, cmd: ViewCmd) -> CmdResult {
    let app = &mut session.app;
    match cmd.action.unwrap_or(ViewAction::List) {
        ViewAction::List => {}
        ViewAction::New(args) => {
            app.dispatch(Action::CreateView { name: args.name });
            println!("created view {}", app.active_view().id);
            return Ok(());
        }
        ViewAction::Rename(args) => {
            if app.views().view(&args.id).is_none() {
                return Err(format!("view '{}' not found", args.id).into());
            }
            app.dispatch(Action::RenameView {
                id: args.id,
                name: args.name,
            });
        }
        ViewAction::Delete(args) => {
            if app.views().view(&args.id).is_none() {
                return Err(format!("view '{}' not found", args.id).into());
            }
            if !app.dispatch(Action::DeleteView(args.id)) {
                return Err("cannot delete the only view".into());
            }
        }
        ViewAction::Default(args) => {
            if app.views().view(&args.id).is_none() {
                return Err(format!("view '{}' not found", args.id).into());
            }
            app.dispatch(Action::SetDefaultView(args.id));
        }
        ViewAction::Use(args) => {
            if app.views().view(&args.id).is_none() {
                return Err(format!("view '{}' not found", args.id).into());
            }
            app.dispatch(Action::SwitchView(args.id));
        }
        ViewAction::Density(args) => {
            let density = DisplayDensity::parse(&args.density).ok_or_else(|| {
                format!(
                    "unknown density '{}' (expected: compact, standard, comfortable)",
                    args.density
                )
            })?;
            app.dispatch(Action::SetDisplayDensity(density));
        }
        ViewAction::Grid(args) => {
            app.dispatch(Action::SetShowGridLines(args.state == "on"));
        }
    }
    print_lines(&format_view_list(app.views()));
    Ok(())
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

fn cmd_column(session: &mut Session, cmd: ColumnCmd) -> CmdResult {
    let app = &mut session.app;
    match cmd.action.unwrap_or(ColumnAction::List) {
        ColumnAction::List => {}
        ColumnAction::Show(args) => {
            let column = parse_column(&args.column)?;
            app.dispatch(Action::SetColumnVisible {
                column,
                visible: true,
            });
        }
        ColumnAction::Hide(args) => {
            let column = parse_column(&args.column)?;
            app.dispatch(Action::SetColumnVisible {
                column,
                visible: false,
            });
        }
        ColumnAction::Move(args) => {
            let column = parse_column(&args.column)?;
            let action = match (args.before, args.after, args.to) {
                (Some(target), _, _) => Action::MoveColumn {
                    dragged: column,
                    target: parse_column(&target)?,
                    position: DropPosition::Before,
                },
                (None, Some(target), _) => Action::MoveColumn {
                    dragged: column,
                    target: parse_column(&target)?,
                    position: DropPosition::After,
                },
                (None, None, Some(index)) => Action::MoveColumnTo { column, index },
                (None, None, None) => {
                    return Err("column move needs --before, --after or --to".into());
                }
            };
            app.dispatch(action);
        }
        ColumnAction::Width(args) => {
            let column = parse_column(&args.column)?;
            app.dispatch(Action::ResizeColumn {
                column,
                width_px: args.px,
            });
        }
        ColumnAction::Reset => {
            app.dispatch(Action::ResetColumns);
        }
    }
    print_lines(&format_column_list(app.active_view()));
    Ok(())
}

// ---------------------------------------------------------------------------
// Search, sort, filter
// ---------------------------------------------------------------------------

fn cmd_search(session: &mut Session, args: SearchArgs) -> CmdResult {
    let query = args.query.unwrap_or_default();
    session.app.dispatch(Action::SetSearchQuery(query));
    let app = &session.app;
    print_lines(&format_table(
        app.derived(),
        app.active_view(),
        app.selection(),
        session.palette.as_ref(),
    ));
    Ok(())
}

fn cmd_sort(session: &mut Session, args: SortArgs) -> CmdResult {
    let column = parse_column(&args.column)?;
    session.app.dispatch(Action::SortBy(column));
    match session.app.active_view().sort_config {
        Some(sc) => {
            let direction = match sc.direction {
                SortDirection::Asc => "ascending",
                SortDirection::Desc => "descending",
            };
            println!("sorted by {} {}", sc.column_id, direction);
        }
        None => println!("sort cleared"),
    }
    Ok(())
}

fn cmd_filter(session: &mut Session, cmd: FilterCmd) -> CmdResult {
    let app = &mut session.app;
    match cmd.action.unwrap_or(FilterAction::List) {
        FilterAction::List => {}
        FilterAction::Add(args) => {
            let column = parse_column(&args.column)?;
            let operator = FilterOperator::parse(&args.operator)
                .filter(|op| FilterOperator::for_column(column).contains(op))
                .ok_or_else(|| {
                    let allowed: Vec<&str> = FilterOperator::for_column(column)
                        .iter()
                        .map(|op| op.as_str())
                        .collect();
                    format!(
                        "operator '{}' not available for {} (expected: {})",
                        args.operator,
                        column,
                        allowed.join(", ")
                    )
                })?;
            let value = match args.values.len() {
                _ if !operator.takes_value() => None,
                0 => return Err(format!("{} needs a value", operator.as_str()).into()),
                1 => args.values.into_iter().next().map(FilterValue::One),
                _ => Some(FilterValue::Many(args.values)),
            };
            let mut filters = app.active_view().filters.clone();
            filters.push(FilterRule {
                id: format!("filter-{}", Utc::now().timestamp_millis()),
                column_id: column,
                operator,
                value,
            });
            app.dispatch(Action::SetFilters(filters));
        }
        FilterAction::Remove(args) => {
            let mut filters = app.active_view().filters.clone();
            let before = filters.len();
            filters.retain(|f| f.id != args.id);
            if filters.len() == before {
                return Err(format!("filter '{}' not found", args.id).into());
            }
            app.dispatch(Action::SetFilters(filters));
        }
        FilterAction::Clear => {
            app.dispatch(Action::SetFilters(Vec::new()));
        }
    }
    for rule in &app.active_view().filters {
        println!("{}", format_filter(rule));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task edits
// ---------------------------------------------------------------------------

fn cmd_toggle(session: &mut Session, args: ToggleArgs) -> CmdResult {
    let path = require_tasks_path(session)?.to_path_buf();
    require_task(session, args.id)?;
    if session.app.dispatch(Action::ToggleExpansion(args.id)) {
        task_ops::save_tasks(&path, session.app.tree())?;
    }
    let expanded = session
        .app
        .tree()
        .find(args.id)
        .is_some_and(|t| t.is_expanded);
    println!(
        "{} {}",
        args.id,
        if expanded { "expanded" } else { "collapsed" }
    );
    Ok(())
}

fn cmd_set(session: &mut Session, args: SetArgs) -> CmdResult {
    let path = require_tasks_path(session)?.to_path_buf();
    require_task(session, args.id)?;

    let mut patch = TaskPatch {
        name: args.name,
        ..Default::default()
    };
    if let Some(s) = &args.status {
        patch.status = Some(parse_status(s)?);
    }
    if let Some(p) = &args.priority {
        let priority = Priority::parse(p).ok_or_else(|| format!("unknown priority '{}'", p))?;
        patch.priority = Some(Some(priority));
    }
    if let Some(i) = &args.impact {
        let impact = Impact::parse(i).ok_or_else(|| format!("unknown impact '{}'", i))?;
        patch.impact = Some(Some(impact));
    }
    if let Some(d) = &args.start {
        patch.start_date = Some(Some(parse_input_date(d)?));
    }
    if let Some(d) = &args.due {
        patch.due_date = Some(Some(parse_input_date(d)?));
    }
    if let Some(pct) = args.progress {
        let mut progress = session
            .app
            .tree()
            .find(args.id)
            .and_then(|t| t.progress.clone())
            .unwrap_or_else(|| Progress::new(pct));
        progress.percentage = pct;
        progress.history.push(pct);
        patch.progress = Some(Some(progress));
    }
    if patch.is_empty() {
        return Err("nothing to set (see tt set --help)".into());
    }

    if session.app.dispatch(Action::UpdateTask {
        id: args.id,
        patch,
    }) {
        task_ops::save_tasks(&path, session.app.tree())?;
    }
    if let Some(task) = session.app.tree().find(args.id) {
        print_lines(&format_task_detail(task));
    }
    Ok(())
}
