use chrono::NaiveDate;
use crossterm::style::{Stylize, style};
use serde::Serialize;

use crate::model::column::{Column, ColumnId};
use crate::model::task::{Impact, Priority, Status, Task, TaskId, Trend};
use crate::model::view::{FilterRule, FilterValue, View};
use crate::ops::board::BoardLane;
use crate::ops::derive::Derived;
use crate::ops::selection::{HeaderCheckbox, Selection};
use crate::ops::timeline::{Timeline, WeatherForecast, WeatherIcon};
use crate::ops::view_ops::ViewStore;
use crate::theme::{Palette, Rgb};
use crate::util::unicode::{Align, fit_cell};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RowJson {
    pub row: usize,
    pub id: TaskId,
    pub depth: usize,
    pub name: String,
    pub status: Status,
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    pub sub_items: usize,
    pub expanded: bool,
    pub selected: bool,
}

#[derive(Serialize)]
pub struct TableJson {
    pub view: String,
    pub header: &'static str,
    pub rows: Vec<RowJson>,
}

pub fn table_to_json(derived: &Derived, view: &View, selection: &Selection) -> TableJson {
    let rows = derived
        .visible_rows()
        .into_iter()
        .map(|r| RowJson {
            row: r.row_number,
            id: r.task.id,
            depth: r.depth,
            name: r.task.name.clone(),
            status: r.task.status,
            assignees: r.task.assignees.iter().map(|a| a.initials.clone()).collect(),
            start_date: r.task.start_date.clone(),
            due_date: r.task.due_date.clone(),
            priority: r.task.priority,
            impact: r.task.impact,
            progress: r.task.progress.as_ref().map(|p| p.percentage),
            sub_items: r.task.sub_items_count(),
            expanded: r.task.is_expanded,
            selected: selection.is_selected(r.task.id),
        })
        .collect();
    TableJson {
        view: view.id.clone(),
        header: header_label(selection.header_state(&derived.visible_ids)),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

pub fn header_label(state: HeaderCheckbox) -> &'static str {
    match state {
        HeaderCheckbox::Unchecked => "unchecked",
        HeaderCheckbox::Indeterminate => "indeterminate",
        HeaderCheckbox::Checked => "checked",
    }
}

fn header_box(state: HeaderCheckbox) -> &'static str {
    match state {
        HeaderCheckbox::Unchecked => "[ ]",
        HeaderCheckbox::Indeterminate => "[-]",
        HeaderCheckbox::Checked => "[x]",
    }
}

/// Terminal cells for a column: nine pixels per cell
pub fn column_cells(column: &Column) -> usize {
    (column.width_px() / 9).max(3) as usize
}

fn trend_glyph(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "↗",
        Trend::Down => "↘",
        Trend::Flat => "→",
    }
}

/// Plain text of one cell
pub fn cell_text(task: &Task, column: ColumnId, depth: usize) -> String {
    match column {
        ColumnId::Name => {
            let marker = match task.children {
                Some(_) if task.is_expanded => "▾ ",
                Some(_) => "▸ ",
                None => "  ",
            };
            format!("{}{}{}", "  ".repeat(depth), marker, task.name)
        }
        ColumnId::Status => format!("● {}", task.status.as_str()),
        ColumnId::Assignee => task
            .assignees
            .iter()
            .map(|a| a.initials.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        ColumnId::Dates => task.date_range_label(),
        ColumnId::Progress => task
            .progress
            .as_ref()
            .map(|p| format!("{}% {}", p.percentage, trend_glyph(p.trend())))
            .unwrap_or_default(),
        ColumnId::Details => match task.sub_items_count() {
            0 => String::new(),
            1 => "1 sub-item".to_string(),
            n => format!("{} sub-items", n),
        },
        ColumnId::Priority => task
            .priority
            .map(|p| format!("{} {}", Palette::default().priority_style(p).1, p.as_str()))
            .unwrap_or_default(),
        ColumnId::Impact => task
            .impact
            .map(|i| i.as_str().to_string())
            .unwrap_or_default(),
    }
}

fn cell_color(task: &Task, column: ColumnId, palette: &Palette) -> Option<Rgb> {
    match column {
        ColumnId::Status => Some(palette.status_color(task.status)),
        ColumnId::Priority => task.priority.map(|p| palette.priority_style(p).0),
        ColumnId::Impact => task.impact.map(|i| palette.impact_color(i)),
        _ => None,
    }
}

fn paint(text: String, color: Option<Rgb>) -> String {
    match color {
        Some(rgb) => style(text).with(rgb.color()).to_string(),
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// The active view as aligned rows: a header, then one line per visible row.
pub fn format_table(
    derived: &Derived,
    view: &View,
    selection: &Selection,
    palette: Option<&Palette>,
) -> Vec<String> {
    let columns: Vec<&Column> = view.visible_columns().collect();
    let sep = if view.show_grid_lines { " │ " } else { "  " };
    let mut lines = Vec::new();

    let mut header = format!(
        "{} {:>3}",
        header_box(selection.header_state(&derived.visible_ids)),
        "#"
    );
    for col in &columns {
        header.push_str(sep);
        header.push_str(&fit_cell(&col.label, column_cells(col), Align::Left));
    }
    lines.push(header.trim_end().to_string());

    for row in derived.visible_rows() {
        let mark = if selection.is_selected(row.task.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let mut line = format!("{} {:>3}", mark, row.row_number);
        for col in &columns {
            line.push_str(sep);
            let text = fit_cell(
                &cell_text(row.task, col.id, row.depth),
                column_cells(col),
                Align::Left,
            );
            let color = palette.and_then(|p| cell_color(row.task, col.id, p));
            line.push_str(&paint(text, color));
        }
        lines.push(line.trim_end().to_string());
    }

    if derived.visible_ids.is_empty() {
        lines.push("(no matching tasks)".to_string());
    }
    lines
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

pub fn format_board(lanes: &[BoardLane<'_>], palette: Option<&Palette>) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, lane) in lanes.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let dot = paint("●".to_string(), palette.map(|p| p.status_color(lane.status)));
        lines.push(format!(
            "{} {} ({})",
            dot,
            lane.status.as_str(),
            lane.tasks.len()
        ));
        for task in &lane.tasks {
            let who = task
                .assignees
                .iter()
                .map(|a| a.initials.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if who.is_empty() {
                lines.push(format!("  {} {}", task.id, task.name));
            } else {
                lines.push(format!("  {} {} [{}]", task.id, task.name, who));
            }
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Gantt
// ---------------------------------------------------------------------------

const GANTT_NAME_CELLS: usize = 28;

/// One character per day. Bars are `█`; weekends are shaded `·`.
pub fn format_gantt(derived: &Derived, timeline: Option<&Timeline>) -> Vec<String> {
    let Some(timeline) = timeline else {
        return vec!["(no dated tasks)".to_string()];
    };
    let bars = timeline.bars(&derived.visible_tree);
    let days: Vec<NaiveDate> = timeline.days().collect();
    let mut lines = Vec::new();

    let mut months = " ".repeat(GANTT_NAME_CELLS + 1);
    for span in timeline.month_spans() {
        let label = NaiveDate::from_ymd_opt(span.year, span.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_default();
        months.push_str(&fit_cell(&label, span.days, Align::Left));
    }
    lines.push(months.trim_end().to_string());

    for row in derived.visible_rows() {
        let name = fit_cell(
            &cell_text(row.task, ColumnId::Name, row.depth),
            GANTT_NAME_CELLS,
            Align::Left,
        );
        let bar = bars.get(&row.task.id);
        let track: String = days
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let i = i as i64;
                match bar {
                    Some(b) if i >= b.offset_days && i < b.offset_days + b.span_days => '█',
                    _ if Timeline::is_weekend(*day) => '·',
                    _ => ' ',
                }
            })
            .collect();
        lines.push(format!("{} {}", name, track).trim_end().to_string());
    }
    lines
}

// ---------------------------------------------------------------------------
// Lookahead
// ---------------------------------------------------------------------------

fn weather_glyph(icon: WeatherIcon) -> &'static str {
    match icon {
        WeatherIcon::Sun => "☀",
        WeatherIcon::Cloud => "☁",
        WeatherIcon::Rain => "☂",
    }
}

pub fn format_weather_strip(strip: &[(NaiveDate, Option<&WeatherForecast>)]) -> Vec<String> {
    strip
        .iter()
        .map(|(date, forecast)| {
            let weather = match forecast {
                Some(f) => format!("{} {}°", weather_glyph(f.icon), f.temperature),
                None => "-".to_string(),
            };
            format!("{}  {}", date.format("%a %d %b"), weather)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Details, views, columns, filters
// ---------------------------------------------------------------------------

pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![format!("{} {}", task.id, task.name)];
    lines.push(format!("status: {}", task.status.as_str()));
    if let Some(p) = task.priority {
        lines.push(format!("priority: {}", p.as_str()));
    }
    if let Some(i) = task.impact {
        lines.push(format!("impact: {}", i.as_str()));
    }
    if !task.assignees.is_empty() {
        let names: Vec<&str> = task.assignees.iter().map(|a| a.name.as_str()).collect();
        lines.push(format!("assignees: {}", names.join(", ")));
    }
    if task.start_date.is_some() || task.due_date.is_some() {
        lines.push(format!("dates: {}", task.date_range_label()));
    }
    if let Some(budget) = task.budget {
        lines.push(format!("budget: {:.2}", budget));
    }
    if let Some(p) = &task.progress {
        lines.push(format!(
            "progress: {}% {}",
            p.percentage,
            trend_glyph(p.trend())
        ));
    }
    if task.has_children() {
        lines.push(format!("sub-items: {}", task.sub_items_count()));
    }
    if !task.health.is_empty() {
        lines.push("health:".to_string());
        for check in &task.health {
            let state = serde_json::to_value(check.status)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            match &check.details {
                Some(d) => lines.push(format!("  [{}] {} - {}", state, check.name, d)),
                None => lines.push(format!("  [{}] {}", state, check.name)),
            }
        }
    }
    lines
}

pub fn format_view_list(store: &ViewStore) -> Vec<String> {
    store
        .views()
        .iter()
        .map(|v| {
            let active = if v.id == store.active_view_id() { "*" } else { " " };
            let default = if store.default_view_id() == Some(v.id.as_str()) {
                " (default)"
            } else {
                ""
            };
            format!("{} {}  {}{}", active, v.id, v.name, default)
        })
        .collect()
}

pub fn format_column_list(view: &View) -> Vec<String> {
    view.columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{} [{}] {:<9} {:<22} {}",
                i,
                if c.visible { "x" } else { " " },
                c.id.as_str(),
                c.label,
                c.width
            )
        })
        .collect()
}

pub fn format_filter(rule: &FilterRule) -> String {
    let value = match &rule.value {
        Some(FilterValue::One(s)) => format!(" {:?}", s),
        Some(FilterValue::Many(v)) => format!(" [{}]", v.join(", ")),
        None => String::new(),
    };
    format!(
        "{}  {} {}{}",
        rule.id,
        rule.column_id.as_str(),
        rule.operator.as_str(),
        value
    )
}
